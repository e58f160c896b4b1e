//! BOM registry service
//!
//! Each rule describes one legal RM -> FG conversion path and the process
//! parameter envelope (annealing count, draw pass count) allowed on it. A
//! single RM size may feed several FG sizes; lookups work in both
//! directions because the outward screen can start from either end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use shared::{check_process_range, validate_label, validate_rule_bounds, BomStatus, ItemCategory};

use crate::error::{AppError, AppResult};
use crate::services::item::find_item_in_category;

/// BOM registry service
#[derive(Clone)]
pub struct BomService {
    db: PgPool,
}

/// One conversion rule
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BomRule {
    pub id: Uuid,
    pub fg_size: String,
    pub rm_size: String,
    pub grade: String,
    pub annealing_min: i32,
    pub annealing_max: i32,
    pub draw_pass_min: i32,
    pub draw_pass_max: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a BOM rule
#[derive(Debug, Deserialize)]
pub struct CreateBomRuleInput {
    pub fg_size: String,
    pub rm_size: String,
    pub grade: String,
    pub annealing_min: i32,
    pub annealing_max: i32,
    pub draw_pass_min: i32,
    pub draw_pass_max: i32,
    pub status: Option<BomStatus>,
}

/// Input for updating a BOM rule
#[derive(Debug, Deserialize)]
pub struct UpdateBomRuleInput {
    pub annealing_min: Option<i32>,
    pub annealing_max: Option<i32>,
    pub draw_pass_min: Option<i32>,
    pub draw_pass_max: Option<i32>,
    pub status: Option<BomStatus>,
}

const RULE_COLUMNS: &str = "id, fg_size, rm_size, grade, annealing_min, annealing_max, \
                            draw_pass_min, draw_pass_max, status, created_at, updated_at";

impl BomService {
    /// Create a new BomService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a conversion rule
    pub async fn create(&self, input: CreateBomRuleInput) -> AppResult<BomRule> {
        validate_label(&input.fg_size).map_err(|e| AppError::validation("fg_size", e))?;
        validate_label(&input.rm_size).map_err(|e| AppError::validation("rm_size", e))?;
        validate_label(&input.grade).map_err(|e| AppError::validation("grade", e))?;
        validate_rule_bounds(
            input.annealing_min,
            input.annealing_max,
            input.draw_pass_min,
            input.draw_pass_max,
        )
        .map_err(|e| AppError::validation("bounds", e))?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bom_rules WHERE fg_size = $1 AND rm_size = $2 AND grade = $3)",
        )
        .bind(input.fg_size.trim())
        .bind(input.rm_size.trim())
        .bind(input.grade.trim())
        .fetch_one(&self.db)
        .await?;

        if exists {
            return Err(AppError::Conflict {
                key: format!("{} / {} / {}", input.fg_size, input.rm_size, input.grade),
            });
        }

        let status = input.status.unwrap_or_default();

        let rule = sqlx::query_as::<_, BomRule>(&format!(
            r#"
            INSERT INTO bom_rules (fg_size, rm_size, grade, annealing_min, annealing_max,
                                   draw_pass_min, draw_pass_max, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RULE_COLUMNS}
            "#
        ))
        .bind(input.fg_size.trim())
        .bind(input.rm_size.trim())
        .bind(input.grade.trim())
        .bind(input.annealing_min)
        .bind(input.annealing_max)
        .bind(input.draw_pass_min)
        .bind(input.draw_pass_max)
        .bind(status.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(rule)
    }

    /// Get a rule by ID
    pub async fn get(&self, rule_id: Uuid) -> AppResult<BomRule> {
        sqlx::query_as::<_, BomRule>(&format!(
            "SELECT {RULE_COLUMNS} FROM bom_rules WHERE id = $1"
        ))
        .bind(rule_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound {
            entity: "BOM rule",
            id: rule_id.to_string(),
        })
    }

    /// List rules. With an FG size filter, only active rules for that size
    /// are returned (the outward screen's use); without one, everything.
    pub async fn list(&self, fg_size: Option<String>) -> AppResult<Vec<BomRule>> {
        let rules = sqlx::query_as::<_, BomRule>(&format!(
            r#"
            SELECT {RULE_COLUMNS}
            FROM bom_rules
            WHERE $1::text IS NULL OR (fg_size = $1 AND status = 'Active')
            ORDER BY fg_size, rm_size
            "#
        ))
        .bind(fg_size)
        .fetch_all(&self.db)
        .await?;

        Ok(rules)
    }

    /// Update a rule's bounds or status
    pub async fn update(&self, rule_id: Uuid, input: UpdateBomRuleInput) -> AppResult<BomRule> {
        let existing = self.get(rule_id).await?;

        let annealing_min = input.annealing_min.unwrap_or(existing.annealing_min);
        let annealing_max = input.annealing_max.unwrap_or(existing.annealing_max);
        let draw_pass_min = input.draw_pass_min.unwrap_or(existing.draw_pass_min);
        let draw_pass_max = input.draw_pass_max.unwrap_or(existing.draw_pass_max);
        let status = input
            .status
            .or_else(|| BomStatus::parse(&existing.status))
            .unwrap_or_default();

        validate_rule_bounds(annealing_min, annealing_max, draw_pass_min, draw_pass_max)
            .map_err(|e| AppError::validation("bounds", e))?;

        let rule = sqlx::query_as::<_, BomRule>(&format!(
            r#"
            UPDATE bom_rules
            SET annealing_min = $1, annealing_max = $2, draw_pass_min = $3, draw_pass_max = $4,
                status = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING {RULE_COLUMNS}
            "#
        ))
        .bind(annealing_min)
        .bind(annealing_max)
        .bind(draw_pass_min)
        .bind(draw_pass_max)
        .bind(status.as_str())
        .bind(rule_id)
        .fetch_one(&self.db)
        .await?;

        Ok(rule)
    }

    /// Delete a rule
    pub async fn delete(&self, rule_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM bom_rules WHERE id = $1")
            .bind(rule_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                entity: "BOM rule",
                id: rule_id.to_string(),
            });
        }

        Ok(())
    }

    /// First active rule producing `fg_size` in `grade`, if any
    pub async fn find_rule_for(&self, fg_size: &str, grade: &str) -> AppResult<Option<BomRule>> {
        let mut conn = self.db.acquire().await?;
        find_rule_for(&mut conn, fg_size, grade).await
    }

    /// All active rules consuming `rm_size`
    pub async fn find_rules_for_rm(&self, rm_size: &str) -> AppResult<Vec<BomRule>> {
        let mut conn = self.db.acquire().await?;
        find_rules_for_rm(&mut conn, rm_size).await
    }

    /// "What can this RM become": active rules for an RM item's size
    pub async fn options_for_rm_item(&self, item_id: Uuid) -> AppResult<Vec<BomRule>> {
        let mut conn = self.db.acquire().await?;
        let item = find_item_in_category(&mut conn, item_id, ItemCategory::Rm).await?;
        find_rules_for_rm(&mut conn, &item.size).await
    }

    /// Rule an FG item would be produced under, if one is defined
    pub async fn resolve_for_fg_item(&self, item_id: Uuid) -> AppResult<Option<BomRule>> {
        let mut conn = self.db.acquire().await?;
        let item = find_item_in_category(&mut conn, item_id, ItemCategory::Fg).await?;
        find_rule_for(&mut conn, &item.size, &item.grade).await
    }
}

// ============================================================================
// Connection-scoped lookups and validation
// ============================================================================

/// First active rule for an FG size + grade, ordered by RM size for a
/// deterministic pick
pub async fn find_rule_for(
    conn: &mut PgConnection,
    fg_size: &str,
    grade: &str,
) -> AppResult<Option<BomRule>> {
    let rule = sqlx::query_as::<_, BomRule>(&format!(
        r#"
        SELECT {RULE_COLUMNS}
        FROM bom_rules
        WHERE fg_size = $1 AND grade = $2 AND status = 'Active'
        ORDER BY rm_size
        LIMIT 1
        "#
    ))
    .bind(fg_size)
    .bind(grade)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(rule)
}

/// All active rules consuming an RM size
pub async fn find_rules_for_rm(conn: &mut PgConnection, rm_size: &str) -> AppResult<Vec<BomRule>> {
    let rules = sqlx::query_as::<_, BomRule>(&format!(
        r#"
        SELECT {RULE_COLUMNS}
        FROM bom_rules
        WHERE rm_size = $1 AND status = 'Active'
        ORDER BY fg_size
        "#
    ))
    .bind(rm_size)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rules)
}

/// Validate a proposed conversion against the registry.
///
/// Resolves the active rule for the exact (fg_size, rm_size, grade) triple,
/// then checks both process counts against the rule's envelope. Returns the
/// resolved rule so callers can surface its bounds.
pub async fn validate_conversion(
    conn: &mut PgConnection,
    fg_size: &str,
    rm_size: &str,
    grade: &str,
    annealing_count: i32,
    draw_pass_count: i32,
) -> AppResult<BomRule> {
    let rule = sqlx::query_as::<_, BomRule>(&format!(
        r#"
        SELECT {RULE_COLUMNS}
        FROM bom_rules
        WHERE fg_size = $1 AND rm_size = $2 AND grade = $3 AND status = 'Active'
        LIMIT 1
        "#
    ))
    .bind(fg_size)
    .bind(rm_size)
    .bind(grade)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NoBomRule {
        fg_size: fg_size.to_string(),
        rm_size: rm_size.to_string(),
        grade: grade.to_string(),
    })?;

    check_process_range(annealing_count, rule.annealing_min, rule.annealing_max).map_err(|v| {
        AppError::ProcessRange {
            field: "annealing",
            value: v.value,
            min: v.min,
            max: v.max,
        }
    })?;

    check_process_range(draw_pass_count, rule.draw_pass_min, rule.draw_pass_max).map_err(|v| {
        AppError::ProcessRange {
            field: "draw_pass",
            value: v.value,
            min: v.min,
            max: v.max,
        }
    })?;

    Ok(rule)
}
