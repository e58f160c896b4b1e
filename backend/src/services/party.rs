//! Party master service
//!
//! Parties are the customers the shop does job-work for. Each carries its
//! own annealing/draw charge schedule; outward challans snapshot those
//! charges at creation time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use shared::{validate_gstin, validate_label, validate_non_negative_rate};

use crate::error::{AppError, AppResult};

/// Party master service
#[derive(Clone)]
pub struct PartyService {
    db: PgPool,
}

/// Party master record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Party {
    pub id: Uuid,
    pub party_name: String,
    pub address: String,
    pub gst_number: String,
    pub contact_number: String,
    pub annealing_charge: Decimal,
    pub draw_charge: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a party
#[derive(Debug, Deserialize)]
pub struct CreatePartyInput {
    pub party_name: String,
    pub address: String,
    pub gst_number: String,
    pub contact_number: String,
    pub annealing_charge: Decimal,
    pub draw_charge: Decimal,
}

/// Input for updating a party
#[derive(Debug, Deserialize)]
pub struct UpdatePartyInput {
    pub address: Option<String>,
    pub gst_number: Option<String>,
    pub contact_number: Option<String>,
    pub annealing_charge: Option<Decimal>,
    pub draw_charge: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl PartyService {
    /// Create a new PartyService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a party
    pub async fn create(&self, input: CreatePartyInput) -> AppResult<Party> {
        let gst_number = input.gst_number.trim().to_uppercase();
        validate_party_fields(
            &input.party_name,
            &gst_number,
            input.annealing_charge,
            input.draw_charge,
        )?;

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM party_master WHERE party_name = $1)")
                .bind(input.party_name.trim())
                .fetch_one(&self.db)
                .await?;

        if exists {
            return Err(AppError::Conflict {
                key: input.party_name.trim().to_string(),
            });
        }

        let party = sqlx::query_as::<_, Party>(
            r#"
            INSERT INTO party_master (party_name, address, gst_number, contact_number, annealing_charge, draw_charge)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, party_name, address, gst_number, contact_number,
                      annealing_charge, draw_charge, is_active, created_at, updated_at
            "#,
        )
        .bind(input.party_name.trim())
        .bind(input.address.trim())
        .bind(&gst_number)
        .bind(input.contact_number.trim())
        .bind(input.annealing_charge)
        .bind(input.draw_charge)
        .fetch_one(&self.db)
        .await?;

        Ok(party)
    }

    /// Get a party by ID
    pub async fn get(&self, party_id: Uuid) -> AppResult<Party> {
        let mut conn = self.db.acquire().await?;
        find_party(&mut conn, party_id).await
    }

    /// List all parties
    pub async fn list(&self) -> AppResult<Vec<Party>> {
        let parties = sqlx::query_as::<_, Party>(
            r#"
            SELECT id, party_name, address, gst_number, contact_number,
                   annealing_charge, draw_charge, is_active, created_at, updated_at
            FROM party_master
            ORDER BY party_name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(parties)
    }

    /// Update a party.
    ///
    /// Charge schedule changes only affect future challans; existing ones
    /// keep their creation-time snapshot.
    pub async fn update(&self, party_id: Uuid, input: UpdatePartyInput) -> AppResult<Party> {
        let mut conn = self.db.acquire().await?;
        let existing = find_party(&mut conn, party_id).await?;

        let address = input.address.unwrap_or(existing.address);
        let gst_number = input
            .gst_number
            .map(|g| g.trim().to_uppercase())
            .unwrap_or(existing.gst_number);
        let contact_number = input.contact_number.unwrap_or(existing.contact_number);
        let annealing_charge = input.annealing_charge.unwrap_or(existing.annealing_charge);
        let draw_charge = input.draw_charge.unwrap_or(existing.draw_charge);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        validate_party_fields(&existing.party_name, &gst_number, annealing_charge, draw_charge)?;

        let party = sqlx::query_as::<_, Party>(
            r#"
            UPDATE party_master
            SET address = $1, gst_number = $2, contact_number = $3,
                annealing_charge = $4, draw_charge = $5, is_active = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING id, party_name, address, gst_number, contact_number,
                      annealing_charge, draw_charge, is_active, created_at, updated_at
            "#,
        )
        .bind(address.trim())
        .bind(&gst_number)
        .bind(contact_number.trim())
        .bind(annealing_charge)
        .bind(draw_charge)
        .bind(is_active)
        .bind(party_id)
        .fetch_one(&self.db)
        .await?;

        Ok(party)
    }

    /// Delete a party that no documents reference
    pub async fn delete(&self, party_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM party_master WHERE id = $1")
            .bind(party_id)
            .execute(&self.db)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(AppError::NotFound {
                entity: "Party",
                id: party_id.to_string(),
            }),
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(AppError::Conflict {
                    key: format!("party {} is referenced by documents", party_id),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_party_fields(
    party_name: &str,
    gst_number: &str,
    annealing_charge: Decimal,
    draw_charge: Decimal,
) -> AppResult<()> {
    validate_label(party_name).map_err(|e| AppError::validation("party_name", e))?;
    validate_gstin(gst_number.trim()).map_err(|e| AppError::validation("gst_number", e))?;
    validate_non_negative_rate(annealing_charge)
        .map_err(|e| AppError::validation("annealing_charge", e))?;
    validate_non_negative_rate(draw_charge).map_err(|e| AppError::validation("draw_charge", e))?;
    Ok(())
}

// ============================================================================
// Connection-scoped lookups for the workflows
// ============================================================================

/// Load a party inside the caller's transaction
pub async fn find_party(conn: &mut PgConnection, party_id: Uuid) -> AppResult<Party> {
    sqlx::query_as::<_, Party>(
        r#"
        SELECT id, party_name, address, gst_number, contact_number,
               annealing_charge, draw_charge, is_active, created_at, updated_at
        FROM party_master
        WHERE id = $1
        "#,
    )
    .bind(party_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound {
        entity: "Party",
        id: party_id.to_string(),
    })
}
