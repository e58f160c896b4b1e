//! HTTP handlers for the item master

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::ItemCategory;

use crate::error::AppResult;
use crate::services::item::{CreateItemInput, ItemService, UpdateItemInput};
use crate::AppState;

/// Filter for item listings
#[derive(Debug, Deserialize)]
pub struct ItemListQuery {
    pub category: Option<ItemCategory>,
}

/// Create an item
pub async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<CreateItemInput>,
) -> AppResult<impl IntoResponse> {
    let service = ItemService::new(state.db);
    let item = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Get an item by ID
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = ItemService::new(state.db);
    let item = service.get(item_id).await?;
    Ok(Json(item))
}

/// List items
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemListQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ItemService::new(state.db);
    let items = service.list(query.category).await?;
    Ok(Json(items))
}

/// Update an item
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<impl IntoResponse> {
    let service = ItemService::new(state.db);
    let item = service.update(item_id, input).await?;
    Ok(Json(item))
}

/// Delete an item
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = ItemService::new(state.db);
    service.delete(item_id).await?;
    Ok(Json(()))
}
