//! Item master service
//!
//! Items are the size/grade/mill identities stock is tracked against. The
//! category and sizing fields are frozen after creation; only the HSN code,
//! mill, and active flag can change, so ledger history keeps its meaning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use shared::{validate_hsn_code, validate_label, ItemCategory};

use crate::error::{AppError, AppResult};

/// Item master service
#[derive(Clone)]
pub struct ItemService {
    db: PgPool,
}

/// Item master record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub category: String,
    pub size: String,
    pub grade: String,
    pub mill: String,
    pub hsn_code: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Parsed category; persisted values are constrained by the schema
    pub fn category(&self) -> ItemCategory {
        ItemCategory::parse(&self.category).unwrap_or(ItemCategory::Rm)
    }
}

/// Input for creating an item
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub category: ItemCategory,
    pub size: String,
    pub grade: String,
    pub mill: String,
    pub hsn_code: String,
}

/// Input for updating an item
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub mill: Option<String>,
    pub hsn_code: Option<String>,
    pub is_active: Option<bool>,
}

impl ItemService {
    /// Create a new ItemService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an item
    pub async fn create(&self, input: CreateItemInput) -> AppResult<Item> {
        validate_label(&input.size).map_err(|e| AppError::validation("size", e))?;
        validate_label(&input.grade).map_err(|e| AppError::validation("grade", e))?;
        validate_label(&input.mill).map_err(|e| AppError::validation("mill", e))?;
        validate_hsn_code(&input.hsn_code).map_err(|e| AppError::validation("hsn_code", e))?;

        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM item_master
                WHERE category = $1 AND size = $2 AND grade = $3 AND mill = $4
            )
            "#,
        )
        .bind(input.category.as_str())
        .bind(input.size.trim())
        .bind(input.grade.trim())
        .bind(input.mill.trim())
        .fetch_one(&self.db)
        .await?;

        if exists {
            return Err(AppError::Conflict {
                key: format!(
                    "{} {} / {} / {}",
                    input.category, input.size, input.grade, input.mill
                ),
            });
        }

        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO item_master (category, size, grade, mill, hsn_code)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, category, size, grade, mill, hsn_code, is_active, created_at, updated_at
            "#,
        )
        .bind(input.category.as_str())
        .bind(input.size.trim())
        .bind(input.grade.trim())
        .bind(input.mill.trim())
        .bind(input.hsn_code.trim())
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    /// Get an item by ID
    pub async fn get(&self, item_id: Uuid) -> AppResult<Item> {
        let mut conn = self.db.acquire().await?;
        find_item(&mut conn, item_id).await
    }

    /// List items, optionally filtered by category
    pub async fn list(&self, category: Option<ItemCategory>) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, category, size, grade, mill, hsn_code, is_active, created_at, updated_at
            FROM item_master
            WHERE $1::text IS NULL OR category = $1
            ORDER BY category, size, grade
            "#,
        )
        .bind(category.map(|c| c.as_str()))
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Update an item's mutable fields
    pub async fn update(&self, item_id: Uuid, input: UpdateItemInput) -> AppResult<Item> {
        let mut conn = self.db.acquire().await?;
        let existing = find_item(&mut conn, item_id).await?;

        let mill = input.mill.unwrap_or(existing.mill);
        let hsn_code = input.hsn_code.unwrap_or(existing.hsn_code);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        validate_label(&mill).map_err(|e| AppError::validation("mill", e))?;
        validate_hsn_code(&hsn_code).map_err(|e| AppError::validation("hsn_code", e))?;

        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE item_master
            SET mill = $1, hsn_code = $2, is_active = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, category, size, grade, mill, hsn_code, is_active, created_at, updated_at
            "#,
        )
        .bind(mill.trim())
        .bind(hsn_code.trim())
        .bind(is_active)
        .bind(item_id)
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    /// Delete an item that nothing references yet
    pub async fn delete(&self, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM item_master WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(AppError::NotFound {
                entity: "Item",
                id: item_id.to_string(),
            }),
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(AppError::Conflict {
                    key: format!("item {} is referenced by stock or documents", item_id),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Connection-scoped lookups for the workflows
// ============================================================================

/// Load an item inside the caller's transaction
pub async fn find_item(conn: &mut PgConnection, item_id: Uuid) -> AppResult<Item> {
    sqlx::query_as::<_, Item>(
        r#"
        SELECT id, category, size, grade, mill, hsn_code, is_active, created_at, updated_at
        FROM item_master
        WHERE id = $1
        "#,
    )
    .bind(item_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound {
        entity: "Item",
        id: item_id.to_string(),
    })
}

/// Load an item and require it to be in `expected` category
pub async fn find_item_in_category(
    conn: &mut PgConnection,
    item_id: Uuid,
    expected: ItemCategory,
) -> AppResult<Item> {
    let item = find_item(conn, item_id).await?;
    if item.category() != expected {
        return Err(AppError::CategoryMismatch {
            expected,
            actual: item.category(),
        });
    }
    Ok(item)
}
