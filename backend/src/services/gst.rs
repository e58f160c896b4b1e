//! GST rate master service
//!
//! One active rate per HSN code; invoice derivation looks up the rate by the
//! finished good's HSN.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use shared::{validate_gst_percentage, validate_hsn_code};

use crate::error::{AppError, AppResult};

/// GST rate master service
#[derive(Clone)]
pub struct GstService {
    db: PgPool,
}

/// GST rate record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GstRate {
    pub id: Uuid,
    pub hsn_code: String,
    pub gst_percentage: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a GST rate
#[derive(Debug, Deserialize)]
pub struct CreateGstRateInput {
    pub hsn_code: String,
    pub gst_percentage: Decimal,
}

/// Input for updating a GST rate
#[derive(Debug, Deserialize)]
pub struct UpdateGstRateInput {
    pub gst_percentage: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl GstService {
    /// Create a new GstService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a GST rate
    pub async fn create(&self, input: CreateGstRateInput) -> AppResult<GstRate> {
        validate_hsn_code(input.hsn_code.trim())
            .map_err(|e| AppError::validation("hsn_code", e))?;
        validate_gst_percentage(input.gst_percentage)
            .map_err(|e| AppError::validation("gst_percentage", e))?;

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM gst_master WHERE hsn_code = $1)")
                .bind(input.hsn_code.trim())
                .fetch_one(&self.db)
                .await?;

        if exists {
            return Err(AppError::Conflict {
                key: input.hsn_code.trim().to_string(),
            });
        }

        let rate = sqlx::query_as::<_, GstRate>(
            r#"
            INSERT INTO gst_master (hsn_code, gst_percentage)
            VALUES ($1, $2)
            RETURNING id, hsn_code, gst_percentage, is_active, created_at, updated_at
            "#,
        )
        .bind(input.hsn_code.trim())
        .bind(input.gst_percentage)
        .fetch_one(&self.db)
        .await?;

        Ok(rate)
    }

    /// Get a GST rate by ID
    pub async fn get(&self, rate_id: Uuid) -> AppResult<GstRate> {
        sqlx::query_as::<_, GstRate>(
            "SELECT id, hsn_code, gst_percentage, is_active, created_at, updated_at FROM gst_master WHERE id = $1",
        )
        .bind(rate_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound {
            entity: "GST rate",
            id: rate_id.to_string(),
        })
    }

    /// List all GST rates
    pub async fn list(&self) -> AppResult<Vec<GstRate>> {
        let rates = sqlx::query_as::<_, GstRate>(
            r#"
            SELECT id, hsn_code, gst_percentage, is_active, created_at, updated_at
            FROM gst_master
            ORDER BY hsn_code
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rates)
    }

    /// Update a GST rate
    pub async fn update(&self, rate_id: Uuid, input: UpdateGstRateInput) -> AppResult<GstRate> {
        let existing = self.get(rate_id).await?;

        let gst_percentage = input.gst_percentage.unwrap_or(existing.gst_percentage);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        validate_gst_percentage(gst_percentage)
            .map_err(|e| AppError::validation("gst_percentage", e))?;

        let rate = sqlx::query_as::<_, GstRate>(
            r#"
            UPDATE gst_master
            SET gst_percentage = $1, is_active = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING id, hsn_code, gst_percentage, is_active, created_at, updated_at
            "#,
        )
        .bind(gst_percentage)
        .bind(is_active)
        .bind(rate_id)
        .fetch_one(&self.db)
        .await?;

        Ok(rate)
    }

    /// Delete a GST rate
    pub async fn delete(&self, rate_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM gst_master WHERE id = $1")
            .bind(rate_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                entity: "GST rate",
                id: rate_id.to_string(),
            });
        }

        Ok(())
    }
}

// ============================================================================
// Connection-scoped lookup for invoice derivation
// ============================================================================

/// Active GST percentage for an HSN code
pub async fn find_active_rate(conn: &mut PgConnection, hsn_code: &str) -> AppResult<Decimal> {
    sqlx::query_scalar::<_, Decimal>(
        "SELECT gst_percentage FROM gst_master WHERE hsn_code = $1 AND is_active = TRUE",
    )
    .bind(hsn_code)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NoGstRate {
        hsn_code: hsn_code.to_string(),
    })
}
