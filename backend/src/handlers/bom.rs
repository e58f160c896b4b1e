//! HTTP handlers for the BOM registry

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::bom::{BomService, CreateBomRuleInput, UpdateBomRuleInput};
use crate::AppState;

/// Filter for rule listings
#[derive(Debug, Deserialize)]
pub struct BomListQuery {
    pub fg_size: Option<String>,
}

/// Create a BOM rule
pub async fn create_bom_rule(
    State(state): State<AppState>,
    Json(input): Json<CreateBomRuleInput>,
) -> AppResult<impl IntoResponse> {
    let service = BomService::new(state.db);
    let rule = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

/// Get a BOM rule by ID
pub async fn get_bom_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = BomService::new(state.db);
    let rule = service.get(rule_id).await?;
    Ok(Json(rule))
}

/// List BOM rules, optionally scoped to active rules for one FG size
pub async fn list_bom_rules(
    State(state): State<AppState>,
    Query(query): Query<BomListQuery>,
) -> AppResult<impl IntoResponse> {
    let service = BomService::new(state.db);
    let rules = service.list(query.fg_size).await?;
    Ok(Json(rules))
}

/// Update a BOM rule
pub async fn update_bom_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
    Json(input): Json<UpdateBomRuleInput>,
) -> AppResult<impl IntoResponse> {
    let service = BomService::new(state.db);
    let rule = service.update(rule_id, input).await?;
    Ok(Json(rule))
}

/// Delete a BOM rule
pub async fn delete_bom_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = BomService::new(state.db);
    service.delete(rule_id).await?;
    Ok(Json(()))
}

/// "What can this RM become": active rules consuming an RM item
pub async fn list_conversion_options(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = BomService::new(state.db);
    let rules = service.options_for_rm_item(item_id).await?;
    Ok(Json(rules))
}

/// Rule an FG item would be produced under, if any
pub async fn resolve_conversion(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = BomService::new(state.db);
    let rule = service.resolve_for_fg_item(item_id).await?;
    Ok(Json(rule))
}
