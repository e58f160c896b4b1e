//! HTTP handlers for tax invoices

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::invoice::{DeriveInvoiceInput, InvoiceService};
use crate::AppState;

/// Derive a tax invoice from an outward challan
pub async fn derive_invoice(
    State(state): State<AppState>,
    Json(input): Json<DeriveInvoiceInput>,
) -> AppResult<impl IntoResponse> {
    let service = InvoiceService::new(state.db);
    let invoice = service.derive(input).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// Get an invoice by ID
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = InvoiceService::new(state.db);
    let invoice = service.get(invoice_id).await?;
    Ok(Json(invoice))
}

/// List invoices with their references
pub async fn list_invoices(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = InvoiceService::new(state.db);
    let invoices = service.list().await?;
    Ok(Json(invoices))
}

/// Delete an invoice (stock is untouched)
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = InvoiceService::new(state.db);
    service.delete(invoice_id).await?;
    Ok(Json(()))
}
