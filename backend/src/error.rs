//! Error handling for the Wire Works Operations Platform
//!
//! Every error kind maps to a stable machine-readable code plus a
//! human-readable message; storage-layer detail stays in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::ItemCategory;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Expected a {expected} item but got {actual}")]
    CategoryMismatch {
        expected: ItemCategory,
        actual: ItemCategory,
    },

    #[error("No active BOM rule for FG {fg_size}, RM {rm_size}, grade {grade}")]
    NoBomRule {
        fg_size: String,
        rm_size: String,
        grade: String,
    },

    #[error("{field} count {value} is outside allowed range [{min}-{max}]")]
    ProcessRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("Insufficient stock. Available: {available}, Required: {required}")]
    InsufficientStock {
        available: Decimal,
        required: Decimal,
    },

    #[error("No active GST rate for HSN code {hsn_code}")]
    NoGstRate { hsn_code: String },

    #[error("Conflict: {key}")]
    Conflict { key: String },

    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Stock reversal would drive {category} stock negative. Available: {available}, Required: {required}")]
    StockInconsistency {
        category: ItemCategory,
        available: Decimal,
        required: Decimal,
    },

    #[error("Corrupted {entity} record {id}: {reason}")]
    DataIntegrity {
        entity: &'static str,
        id: String,
        reason: String,
    },

    #[error("Commit outcome unknown for {operation}")]
    PartialFailure {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for a field-level validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, field) = match &self {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", None),
            AppError::CategoryMismatch { .. } => {
                (StatusCode::BAD_REQUEST, "CATEGORY_MISMATCH", None)
            }
            AppError::NoBomRule { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "NO_BOM_RULE", None),
            AppError::ProcessRange { field, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PROCESS_RANGE_VIOLATION",
                Some(field.to_string()),
            ),
            AppError::InsufficientStock { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_STOCK", None)
            }
            AppError::NoGstRate { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "NO_GST_RATE", None),
            AppError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT", None),
            AppError::Validation { field, .. } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                Some(field.clone()),
            ),
            AppError::StockInconsistency { .. } => {
                (StatusCode::CONFLICT, "STOCK_INCONSISTENCY", None)
            }
            AppError::DataIntegrity { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DATA_INTEGRITY", None)
            }
            AppError::PartialFailure { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PARTIAL_FAILURE", None)
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", None),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None),
        };

        // Storage-layer errors keep their detail out of the response body
        let message = match &self {
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        };

        tracing::error!("Error: {:?}", self);

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for services and handlers
pub type AppResult<T> = Result<T, AppError>;
