//! HTTP handlers for the stock ledger

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::ItemCategory;

use crate::error::AppResult;
use crate::services::stock::StockService;
use crate::AppState;

/// Filter for ledger listings
#[derive(Debug, Deserialize)]
pub struct StockListQuery {
    pub category: Option<ItemCategory>,
}

/// Quantity response for a single item
#[derive(Debug, Serialize)]
pub struct StockLevelResponse {
    pub category: ItemCategory,
    pub item_id: Uuid,
    pub quantity: Decimal,
}

/// List ledger rows with their item labels
pub async fn list_stock(
    State(state): State<AppState>,
    Query(query): Query<StockListQuery>,
) -> AppResult<impl IntoResponse> {
    let service = StockService::new(state.db);
    let stock = service.list(query.category).await?;
    Ok(Json(stock))
}

/// Current quantity for one item; zero when it has never moved
pub async fn get_stock_level(
    State(state): State<AppState>,
    Path((category, item_id)): Path<(ItemCategory, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let service = StockService::new(state.db);
    let quantity = service.get(category, item_id).await?;
    Ok(Json(StockLevelResponse {
        category,
        item_id,
        quantity,
    }))
}
