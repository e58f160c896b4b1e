//! Stock ledger service
//!
//! One running quantity per (category, item). The ledger never reasons about
//! *why* stock moved; goods receipts and the outward conversion workflow own
//! that. Mutations are connection-scoped so callers can compose them inside a
//! single transaction; the non-negativity floor is enforced by a guarded
//! UPDATE, so concurrent consumers of the same item serialize on the row.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use shared::ItemCategory;

use crate::error::{AppError, AppResult};

/// Stock service for ledger reads
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// One ledger row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockEntry {
    pub id: Uuid,
    pub category: String,
    pub item_id: Uuid,
    pub quantity: Decimal,
    pub last_updated: DateTime<Utc>,
}

/// Ledger row joined with its item labels, for the stock screen
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockView {
    pub category: String,
    pub item_id: Uuid,
    pub size: String,
    pub grade: String,
    pub mill: String,
    pub quantity: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Current quantity for an item; zero when no entry exists yet
    pub async fn get(&self, category: ItemCategory, item_id: Uuid) -> AppResult<Decimal> {
        let mut conn = self.db.acquire().await?;
        quantity_of(&mut conn, category, item_id).await
    }

    /// All ledger rows, optionally filtered by category
    pub async fn list(&self, category: Option<ItemCategory>) -> AppResult<Vec<StockView>> {
        let rows = sqlx::query_as::<_, StockView>(
            r#"
            SELECT s.category, s.item_id, i.size, i.grade, i.mill, s.quantity, s.last_updated
            FROM stock_entries s
            JOIN item_master i ON i.id = s.item_id
            WHERE $1::text IS NULL OR s.category = $1
            ORDER BY s.category, s.last_updated DESC
            "#,
        )
        .bind(category.map(|c| c.as_str()))
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}

// ============================================================================
// Connection-scoped ledger mutations
// ============================================================================

/// Read the quantity for an item inside the caller's transaction
pub async fn quantity_of(
    conn: &mut PgConnection,
    category: ItemCategory,
    item_id: Uuid,
) -> AppResult<Decimal> {
    let quantity = sqlx::query_scalar::<_, Decimal>(
        "SELECT quantity FROM stock_entries WHERE category = $1 AND item_id = $2",
    )
    .bind(category.as_str())
    .bind(item_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(quantity.unwrap_or(Decimal::ZERO))
}

/// Apply a signed delta to an item's quantity.
///
/// A positive delta lazily creates the entry; a negative delta fails with
/// `InsufficientStock` when it would drive the quantity below zero.
pub async fn adjust(
    conn: &mut PgConnection,
    category: ItemCategory,
    item_id: Uuid,
    delta: Decimal,
) -> AppResult<Decimal> {
    if delta >= Decimal::ZERO {
        let quantity = sqlx::query_scalar::<_, Decimal>(
            r#"
            INSERT INTO stock_entries (category, item_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (category, item_id)
            DO UPDATE SET quantity = stock_entries.quantity + EXCLUDED.quantity,
                          last_updated = NOW()
            RETURNING quantity
            "#,
        )
        .bind(category.as_str())
        .bind(item_id)
        .bind(delta)
        .fetch_one(&mut *conn)
        .await?;

        return Ok(quantity);
    }

    let required = -delta;

    // Guarded decrement: the WHERE clause keeps the floor and the row lock
    // serializes concurrent consumers of the same item.
    let updated = sqlx::query_scalar::<_, Decimal>(
        r#"
        UPDATE stock_entries
        SET quantity = quantity - $3, last_updated = NOW()
        WHERE category = $1 AND item_id = $2 AND quantity >= $3
        RETURNING quantity
        "#,
    )
    .bind(category.as_str())
    .bind(item_id)
    .bind(required)
    .fetch_optional(&mut *conn)
    .await?;

    match updated {
        Some(quantity) => Ok(quantity),
        None => {
            let available = quantity_of(conn, category, item_id).await?;
            Err(AppError::InsufficientStock {
                available,
                required,
            })
        }
    }
}

/// Add to an item's quantity, creating the entry on first movement.
///
/// Negative amounts behave exactly like `adjust`, which edit workflows rely
/// on when a quantity delta runs the other way.
pub async fn increase(
    conn: &mut PgConnection,
    category: ItemCategory,
    item_id: Uuid,
    amount: Decimal,
) -> AppResult<Decimal> {
    adjust(conn, category, item_id, amount).await
}

/// Subtract from an item's quantity, failing when it would go negative
pub async fn decrease(
    conn: &mut PgConnection,
    category: ItemCategory,
    item_id: Uuid,
    amount: Decimal,
) -> AppResult<Decimal> {
    adjust(conn, category, item_id, -amount).await
}
