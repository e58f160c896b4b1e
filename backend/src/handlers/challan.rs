//! HTTP handlers for outward challans

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::challan::{ChallanService, CreateChallanInput, UpdateChallanInput};
use crate::AppState;

/// Create an outward challan (converts RM to FG)
pub async fn create_challan(
    State(state): State<AppState>,
    Json(input): Json<CreateChallanInput>,
) -> AppResult<impl IntoResponse> {
    let service = ChallanService::new(state.db);
    let challan = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(challan)))
}

/// Get a challan with its references
pub async fn get_challan(
    State(state): State<AppState>,
    Path(challan_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = ChallanService::new(state.db);
    let challan = service.get(challan_id).await?;
    Ok(Json(challan))
}

/// List challans
pub async fn list_challans(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = ChallanService::new(state.db);
    let challans = service.list().await?;
    Ok(Json(challans))
}

/// Edit a challan's quantity, rate, process counts, or date
pub async fn update_challan(
    State(state): State<AppState>,
    Path(challan_id): Path<Uuid>,
    Json(input): Json<UpdateChallanInput>,
) -> AppResult<impl IntoResponse> {
    let service = ChallanService::new(state.db);
    let challan = service.update(challan_id, input).await?;
    Ok(Json(challan))
}

/// Delete a challan, reversing its stock movement
pub async fn delete_challan(
    State(state): State<AppState>,
    Path(challan_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = ChallanService::new(state.db);
    let summary = service.delete(challan_id).await?;
    Ok(Json(summary))
}
