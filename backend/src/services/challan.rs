//! Outward challan service
//!
//! An outward challan records one RM -> FG conversion for a party: the BOM
//! rule gates the process counts, the party's charge schedule is snapshotted
//! onto the document, and the stock ledger moves by the challan quantity on
//! both sides. Every create/update/delete runs inside a single transaction
//! so the two ledger movements and the document row commit or abort
//! together.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{compute_charges, validate_non_negative_rate, validate_positive_quantity, ItemCategory};

use crate::error::{AppError, AppResult};
use crate::services::{bom, item, party, sequence, stock};

/// Outward challan service
#[derive(Clone)]
pub struct ChallanService {
    db: PgPool,
}

/// Outward challan record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Challan {
    pub id: Uuid,
    pub challan_number: String,
    pub party_id: Uuid,
    pub finish_size_id: Uuid,
    pub original_size_id: Uuid,
    pub annealing_count: i32,
    pub draw_pass_count: i32,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub annealing_charge: Decimal,
    pub draw_charge: Decimal,
    pub total_amount: Decimal,
    pub challan_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Challan row joined with its references, for listings
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChallanView {
    pub id: Uuid,
    pub challan_number: String,
    pub party_id: Uuid,
    pub party_name: String,
    pub finish_size_id: Uuid,
    pub finish_size: String,
    pub original_size_id: Uuid,
    pub original_size: String,
    pub grade: String,
    pub annealing_count: i32,
    pub draw_pass_count: i32,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub annealing_charge: Decimal,
    pub draw_charge: Decimal,
    pub total_amount: Decimal,
    pub challan_date: NaiveDate,
}

/// Input for creating an outward challan
#[derive(Debug, Deserialize)]
pub struct CreateChallanInput {
    pub party_id: Uuid,
    pub finish_size_id: Uuid,
    pub original_size_id: Uuid,
    pub annealing_count: i32,
    pub draw_pass_count: i32,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub challan_date: Option<NaiveDate>,
}

/// Input for editing an outward challan.
///
/// Party and item references are fixed at creation; an edit can change how
/// much was converted and at what price/process, not what was converted.
#[derive(Debug, Deserialize)]
pub struct UpdateChallanInput {
    pub quantity: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub annealing_count: Option<i32>,
    pub draw_pass_count: Option<i32>,
    pub challan_date: Option<NaiveDate>,
}

/// Ledger movements applied by a challan deletion
#[derive(Debug, Clone, Serialize)]
pub struct ReversalSummary {
    pub challan_number: String,
    pub rm_restored: Decimal,
    pub fg_removed: Decimal,
}

const CHALLAN_COLUMNS: &str = "id, challan_number, party_id, finish_size_id, original_size_id, \
                               annealing_count, draw_pass_count, quantity, rate, \
                               annealing_charge, draw_charge, total_amount, challan_date, \
                               created_at, updated_at";

impl ChallanService {
    /// Create a new ChallanService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an outward challan and move stock.
    ///
    /// Validations all precede the first write: party and items must
    /// resolve, the conversion must have an active BOM rule whose envelope
    /// admits both process counts, and RM stock must cover the quantity.
    pub async fn create(&self, input: CreateChallanInput) -> AppResult<Challan> {
        validate_positive_quantity(input.quantity)
            .map_err(|e| AppError::validation("quantity", e))?;
        validate_non_negative_rate(input.rate).map_err(|e| AppError::validation("rate", e))?;

        let mut tx = self.db.begin().await?;

        let party = party::find_party(&mut tx, input.party_id).await?;
        let fg_item =
            item::find_item_in_category(&mut tx, input.finish_size_id, ItemCategory::Fg).await?;
        let rm_item =
            item::find_item_in_category(&mut tx, input.original_size_id, ItemCategory::Rm).await?;

        bom::validate_conversion(
            &mut tx,
            &fg_item.size,
            &rm_item.size,
            &fg_item.grade,
            input.annealing_count,
            input.draw_pass_count,
        )
        .await?;

        // Charges are snapshotted from the party's current schedule; later
        // party-master edits do not touch this challan.
        let charges = compute_charges(
            input.quantity,
            input.rate,
            party.annealing_charge,
            party.draw_charge,
            input.annealing_count,
            input.draw_pass_count,
        );

        stock::decrease(&mut tx, ItemCategory::Rm, rm_item.id, input.quantity).await?;
        stock::increase(&mut tx, ItemCategory::Fg, fg_item.id, input.quantity).await?;

        let challan_number = sequence::next_number(&mut tx, "CH").await?;
        let challan_date = input.challan_date.unwrap_or_else(|| Utc::now().date_naive());

        let challan = sqlx::query_as::<_, Challan>(&format!(
            r#"
            INSERT INTO outward_challans (challan_number, party_id, finish_size_id, original_size_id,
                                          annealing_count, draw_pass_count, quantity, rate,
                                          annealing_charge, draw_charge, total_amount, challan_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {CHALLAN_COLUMNS}
            "#
        ))
        .bind(&challan_number)
        .bind(party.id)
        .bind(fg_item.id)
        .bind(rm_item.id)
        .bind(input.annealing_count)
        .bind(input.draw_pass_count)
        .bind(input.quantity)
        .bind(input.rate)
        .bind(party.annealing_charge)
        .bind(party.draw_charge)
        .bind(charges.total)
        .bind(challan_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await.map_err(|e| AppError::PartialFailure {
            operation: "challan create",
            source: e,
        })?;

        tracing::info!(
            challan_number = %challan.challan_number,
            quantity = %challan.quantity,
            "outward challan created"
        );

        Ok(challan)
    }

    /// Edit a challan and move stock by the quantity delta.
    ///
    /// Process counts are re-validated against the rule for the stored
    /// conversion; the annealing/draw charges stay as snapshotted at
    /// creation, so historical pricing survives party-master edits.
    pub async fn update(&self, challan_id: Uuid, input: UpdateChallanInput) -> AppResult<Challan> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Challan>(&format!(
            "SELECT {CHALLAN_COLUMNS} FROM outward_challans WHERE id = $1 FOR UPDATE"
        ))
        .bind(challan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound {
            entity: "Outward challan",
            id: challan_id.to_string(),
        })?;

        let quantity = input.quantity.unwrap_or(existing.quantity);
        let rate = input.rate.unwrap_or(existing.rate);
        let annealing_count = input.annealing_count.unwrap_or(existing.annealing_count);
        let draw_pass_count = input.draw_pass_count.unwrap_or(existing.draw_pass_count);
        let challan_date = input.challan_date.unwrap_or(existing.challan_date);

        validate_positive_quantity(quantity).map_err(|e| AppError::validation("quantity", e))?;
        validate_non_negative_rate(rate).map_err(|e| AppError::validation("rate", e))?;

        let fg_item = item::find_item(&mut tx, existing.finish_size_id).await?;
        let rm_item = item::find_item(&mut tx, existing.original_size_id).await?;

        bom::validate_conversion(
            &mut tx,
            &fg_item.size,
            &rm_item.size,
            &fg_item.grade,
            annealing_count,
            draw_pass_count,
        )
        .await?;

        // A larger output consumes more RM and produces more FG; a smaller
        // one reverses the difference on both sides.
        let delta = quantity - existing.quantity;
        if !delta.is_zero() {
            stock::adjust(&mut tx, ItemCategory::Rm, rm_item.id, -delta).await?;
            stock::adjust(&mut tx, ItemCategory::Fg, fg_item.id, delta).await?;
        }

        let charges = compute_charges(
            quantity,
            rate,
            existing.annealing_charge,
            existing.draw_charge,
            annealing_count,
            draw_pass_count,
        );

        let challan = sqlx::query_as::<_, Challan>(&format!(
            r#"
            UPDATE outward_challans
            SET annealing_count = $1, draw_pass_count = $2, quantity = $3, rate = $4,
                total_amount = $5, challan_date = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {CHALLAN_COLUMNS}
            "#
        ))
        .bind(annealing_count)
        .bind(draw_pass_count)
        .bind(quantity)
        .bind(rate)
        .bind(charges.total)
        .bind(challan_date)
        .bind(challan_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await.map_err(|e| AppError::PartialFailure {
            operation: "challan update",
            source: e,
        })?;

        Ok(challan)
    }

    /// Delete a challan, reversing its stock movement.
    ///
    /// RM comes back and FG goes out by the original quantity. When the
    /// produced FG was already consumed downstream, the reversal cannot be
    /// applied and the deletion aborts instead of driving FG negative.
    pub async fn delete(&self, challan_id: Uuid) -> AppResult<ReversalSummary> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Challan>(&format!(
            "SELECT {CHALLAN_COLUMNS} FROM outward_challans WHERE id = $1 FOR UPDATE"
        ))
        .bind(challan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound {
            entity: "Outward challan",
            id: challan_id.to_string(),
        })?;

        let has_invoice = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM tax_invoices WHERE challan_id = $1)",
        )
        .bind(challan_id)
        .fetch_one(&mut *tx)
        .await?;

        if has_invoice {
            return Err(AppError::Conflict {
                key: format!("challan {} has a derived tax invoice", existing.challan_number),
            });
        }

        stock::increase(&mut tx, ItemCategory::Rm, existing.original_size_id, existing.quantity)
            .await?;

        stock::decrease(&mut tx, ItemCategory::Fg, existing.finish_size_id, existing.quantity)
            .await
            .map_err(|e| match e {
                AppError::InsufficientStock {
                    available,
                    required,
                } => AppError::StockInconsistency {
                    category: ItemCategory::Fg,
                    available,
                    required,
                },
                other => other,
            })?;

        sqlx::query("DELETE FROM outward_challans WHERE id = $1")
            .bind(challan_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await.map_err(|e| AppError::PartialFailure {
            operation: "challan delete",
            source: e,
        })?;

        tracing::info!(
            challan_number = %existing.challan_number,
            quantity = %existing.quantity,
            "outward challan deleted, stock reversed"
        );

        Ok(ReversalSummary {
            challan_number: existing.challan_number,
            rm_restored: existing.quantity,
            fg_removed: existing.quantity,
        })
    }

    /// Get a challan with its references
    pub async fn get(&self, challan_id: Uuid) -> AppResult<ChallanView> {
        sqlx::query_as::<_, ChallanView>(&format!("{CHALLAN_VIEW_QUERY} WHERE c.id = $1"))
            .bind(challan_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "Outward challan",
                id: challan_id.to_string(),
            })
    }

    /// List challans, newest first
    pub async fn list(&self) -> AppResult<Vec<ChallanView>> {
        let challans = sqlx::query_as::<_, ChallanView>(&format!(
            "{CHALLAN_VIEW_QUERY} ORDER BY c.challan_date DESC, c.created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(challans)
    }
}

const CHALLAN_VIEW_QUERY: &str = r#"
    SELECT c.id, c.challan_number, c.party_id, p.party_name,
           c.finish_size_id, fg.size AS finish_size,
           c.original_size_id, rm.size AS original_size, fg.grade,
           c.annealing_count, c.draw_pass_count, c.quantity, c.rate,
           c.annealing_charge, c.draw_charge, c.total_amount, c.challan_date
    FROM outward_challans c
    JOIN party_master p ON p.id = c.party_id
    JOIN item_master fg ON fg.id = c.finish_size_id
    JOIN item_master rm ON rm.id = c.original_size_id
"#;
