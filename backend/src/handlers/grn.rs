//! HTTP handlers for goods receipts

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::grn::{CreateGrnInput, GrnService};
use crate::AppState;

/// Record a goods receipt (raises RM stock)
pub async fn create_grn(
    State(state): State<AppState>,
    Json(input): Json<CreateGrnInput>,
) -> AppResult<impl IntoResponse> {
    let service = GrnService::new(state.db);
    let receipt = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Get a receipt with its references
pub async fn get_grn(
    State(state): State<AppState>,
    Path(grn_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = GrnService::new(state.db);
    let receipt = service.get(grn_id).await?;
    Ok(Json(receipt))
}

/// List receipts
pub async fn list_grns(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = GrnService::new(state.db);
    let receipts = service.list().await?;
    Ok(Json(receipts))
}

/// Delete a receipt, taking its RM stock back out
pub async fn delete_grn(
    State(state): State<AppState>,
    Path(grn_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = GrnService::new(state.db);
    service.delete(grn_id).await?;
    Ok(Json(()))
}
