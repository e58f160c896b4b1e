//! HTTP handlers for dashboard reporting

use axum::{extract::State, response::IntoResponse, Json};

use crate::error::AppResult;
use crate::services::reporting::ReportingService;
use crate::AppState;

/// Dashboard summary: document counts and stock totals
pub async fn get_dashboard_summary(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let summary = service.dashboard_summary().await?;
    Ok(Json(summary))
}
