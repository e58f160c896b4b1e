//! HTTP handlers for the GST rate master

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::gst::{CreateGstRateInput, GstService, UpdateGstRateInput};
use crate::AppState;

/// Create a GST rate
pub async fn create_gst_rate(
    State(state): State<AppState>,
    Json(input): Json<CreateGstRateInput>,
) -> AppResult<impl IntoResponse> {
    let service = GstService::new(state.db);
    let rate = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(rate)))
}

/// Get a GST rate by ID
pub async fn get_gst_rate(
    State(state): State<AppState>,
    Path(rate_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = GstService::new(state.db);
    let rate = service.get(rate_id).await?;
    Ok(Json(rate))
}

/// List all GST rates
pub async fn list_gst_rates(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = GstService::new(state.db);
    let rates = service.list().await?;
    Ok(Json(rates))
}

/// Update a GST rate
pub async fn update_gst_rate(
    State(state): State<AppState>,
    Path(rate_id): Path<Uuid>,
    Json(input): Json<UpdateGstRateInput>,
) -> AppResult<impl IntoResponse> {
    let service = GstService::new(state.db);
    let rate = service.update(rate_id, input).await?;
    Ok(Json(rate))
}

/// Delete a GST rate
pub async fn delete_gst_rate(
    State(state): State<AppState>,
    Path(rate_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = GstService::new(state.db);
    service.delete(rate_id).await?;
    Ok(Json(()))
}
