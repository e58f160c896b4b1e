//! Goods receipt (GRN) service
//!
//! A receipt books incoming raw material against the sending party's own
//! challan number and raises RM stock in the same transaction. Deleting a
//! receipt takes that stock back out, which only works while the material
//! is still on hand.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{validate_label, validate_non_negative_rate, validate_positive_quantity, ItemCategory};

use crate::error::{AppError, AppResult};
use crate::services::{item, party, stock};

/// Goods receipt service
#[derive(Clone)]
pub struct GrnService {
    db: PgPool,
}

/// Goods receipt record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GoodsReceipt {
    pub id: Uuid,
    pub sending_party_id: Uuid,
    pub party_challan_number: String,
    pub rm_size_id: Uuid,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub total_value: Decimal,
    pub grn_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Receipt row joined with its references, for listings
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GoodsReceiptView {
    pub id: Uuid,
    pub sending_party_id: Uuid,
    pub party_name: String,
    pub party_challan_number: String,
    pub rm_size_id: Uuid,
    pub rm_size: String,
    pub grade: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub total_value: Decimal,
    pub grn_date: NaiveDate,
}

/// Input for recording a goods receipt
#[derive(Debug, Deserialize)]
pub struct CreateGrnInput {
    pub sending_party_id: Uuid,
    pub party_challan_number: String,
    pub rm_size_id: Uuid,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub grn_date: Option<NaiveDate>,
}

const GRN_COLUMNS: &str = "id, sending_party_id, party_challan_number, rm_size_id, quantity, \
                           rate, total_value, grn_date, created_at, updated_at";

impl GrnService {
    /// Create a new GrnService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a receipt and raise RM stock
    pub async fn create(&self, input: CreateGrnInput) -> AppResult<GoodsReceipt> {
        validate_positive_quantity(input.quantity)
            .map_err(|e| AppError::validation("quantity", e))?;
        validate_non_negative_rate(input.rate).map_err(|e| AppError::validation("rate", e))?;
        validate_label(&input.party_challan_number)
            .map_err(|e| AppError::validation("party_challan_number", e))?;

        let mut tx = self.db.begin().await?;

        let sending_party = party::find_party(&mut tx, input.sending_party_id).await?;
        let rm_item =
            item::find_item_in_category(&mut tx, input.rm_size_id, ItemCategory::Rm).await?;

        let total_value = input.quantity * input.rate;
        let grn_date = input.grn_date.unwrap_or_else(|| Utc::now().date_naive());

        let receipt = sqlx::query_as::<_, GoodsReceipt>(&format!(
            r#"
            INSERT INTO grn_records (sending_party_id, party_challan_number, rm_size_id,
                                     quantity, rate, total_value, grn_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {GRN_COLUMNS}
            "#
        ))
        .bind(sending_party.id)
        .bind(input.party_challan_number.trim())
        .bind(rm_item.id)
        .bind(input.quantity)
        .bind(input.rate)
        .bind(total_value)
        .bind(grn_date)
        .fetch_one(&mut *tx)
        .await?;

        stock::increase(&mut tx, ItemCategory::Rm, rm_item.id, input.quantity).await?;

        tx.commit().await.map_err(|e| AppError::PartialFailure {
            operation: "goods receipt create",
            source: e,
        })?;

        Ok(receipt)
    }

    /// Get a receipt with its references
    pub async fn get(&self, grn_id: Uuid) -> AppResult<GoodsReceiptView> {
        sqlx::query_as::<_, GoodsReceiptView>(&format!("{GRN_VIEW_QUERY} WHERE g.id = $1"))
            .bind(grn_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "Goods receipt",
                id: grn_id.to_string(),
            })
    }

    /// List receipts, newest first
    pub async fn list(&self) -> AppResult<Vec<GoodsReceiptView>> {
        let receipts = sqlx::query_as::<_, GoodsReceiptView>(&format!(
            "{GRN_VIEW_QUERY} ORDER BY g.grn_date DESC, g.created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(receipts)
    }

    /// Delete a receipt, taking its RM stock back out.
    ///
    /// Fails when the received material was already drawn down by outward
    /// challans; the ledger never dips below zero to honor a deletion.
    pub async fn delete(&self, grn_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, GoodsReceipt>(&format!(
            "SELECT {GRN_COLUMNS} FROM grn_records WHERE id = $1 FOR UPDATE"
        ))
        .bind(grn_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound {
            entity: "Goods receipt",
            id: grn_id.to_string(),
        })?;

        stock::decrease(&mut tx, ItemCategory::Rm, existing.rm_size_id, existing.quantity)
            .await
            .map_err(|e| match e {
                AppError::InsufficientStock {
                    available,
                    required,
                } => AppError::StockInconsistency {
                    category: ItemCategory::Rm,
                    available,
                    required,
                },
                other => other,
            })?;

        sqlx::query("DELETE FROM grn_records WHERE id = $1")
            .bind(grn_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await.map_err(|e| AppError::PartialFailure {
            operation: "goods receipt delete",
            source: e,
        })?;

        Ok(())
    }
}

const GRN_VIEW_QUERY: &str = r#"
    SELECT g.id, g.sending_party_id, p.party_name, g.party_challan_number,
           g.rm_size_id, rm.size AS rm_size, rm.grade,
           g.quantity, g.rate, g.total_value, g.grn_date
    FROM grn_records g
    JOIN party_master p ON p.id = g.sending_party_id
    JOIN item_master rm ON rm.id = g.rm_size_id
"#;
