//! Tax invoice service
//!
//! An invoice is derived once from a completed outward challan: the
//! challan's quantity, rate, and snapshotted charges become the base
//! amount, the GST rate comes from the FG item's HSN code, and the levy is
//! split CGST/SGST for intra-state supplies or charged as IGST across
//! state lines. Amounts are fixed at derivation; invoices are never
//! recomputed, only deleted.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{compute_charges, compute_invoice_amounts, validate_non_negative_rate, TaxTreatment};

use crate::error::{AppError, AppResult};
use crate::services::{gst, item, sequence};

/// Tax invoice service
#[derive(Clone)]
pub struct InvoiceService {
    db: PgPool,
}

/// Tax invoice record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TaxInvoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub challan_id: Uuid,
    pub party_id: Uuid,
    pub finish_size_id: Uuid,
    pub original_size_id: Uuid,
    pub annealing_count: i32,
    pub draw_pass_count: i32,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub annealing_charge: Decimal,
    pub draw_charge: Decimal,
    pub base_amount: Decimal,
    pub transport_charges: Decimal,
    pub assessable_value: Decimal,
    pub gst_percentage: Decimal,
    pub cgst_percentage: Decimal,
    pub sgst_percentage: Decimal,
    pub igst_percentage: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub igst_amount: Decimal,
    pub gst_amount: Decimal,
    pub tcs_percentage: Decimal,
    pub tcs_amount: Decimal,
    pub total_amount: Decimal,
    pub invoice_date: NaiveDate,
    pub irn_number: Option<String>,
    pub po_number: Option<String>,
    pub payment_term: String,
    pub supplier_code: String,
    pub vehicle_number: Option<String>,
    pub eway_bill_number: Option<String>,
    pub dispatched_through: String,
    pub packing_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for deriving an invoice from a challan
#[derive(Debug, Deserialize)]
pub struct DeriveInvoiceInput {
    pub challan_id: Uuid,
    pub invoice_date: Option<NaiveDate>,
    /// Defaults to the intra-state CGST/SGST split
    pub tax_treatment: Option<TaxTreatment>,
    pub transport_charges: Option<Decimal>,
    pub tcs_percentage: Option<Decimal>,
    pub irn_number: Option<String>,
    pub po_number: Option<String>,
    pub payment_term: Option<String>,
    pub supplier_code: Option<String>,
    pub vehicle_number: Option<String>,
    pub eway_bill_number: Option<String>,
    pub dispatched_through: Option<String>,
    pub packing_type: Option<String>,
}

/// Invoice row joined with its references, for listings
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceView {
    pub id: Uuid,
    pub invoice_number: String,
    pub challan_number: String,
    pub party_name: String,
    pub finish_size: String,
    pub original_size: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub assessable_value: Decimal,
    pub gst_amount: Decimal,
    pub total_amount: Decimal,
    pub invoice_date: NaiveDate,
}

/// Row backing `InvoiceView`; reference columns are nullable so a broken
/// reference surfaces as a data-integrity failure instead of being hidden
/// or silently cleaned up.
#[derive(Debug, FromRow)]
struct InvoiceViewRow {
    id: Uuid,
    invoice_number: String,
    challan_number: Option<String>,
    party_name: Option<String>,
    finish_size: Option<String>,
    original_size: Option<String>,
    quantity: Decimal,
    rate: Decimal,
    assessable_value: Decimal,
    gst_amount: Decimal,
    total_amount: Decimal,
    invoice_date: NaiveDate,
}

impl InvoiceViewRow {
    fn into_view(self) -> AppResult<InvoiceView> {
        let id = self.id;
        let number = self.invoice_number.clone();
        let require = |value: Option<String>, what: &'static str| {
            value.ok_or_else(|| AppError::DataIntegrity {
                entity: "Tax invoice",
                id: format!("{} ({})", number, id),
                reason: format!("missing {} reference", what),
            })
        };

        Ok(InvoiceView {
            id: self.id,
            invoice_number: self.invoice_number.clone(),
            challan_number: require(self.challan_number, "challan")?,
            party_name: require(self.party_name, "party")?,
            finish_size: require(self.finish_size, "finish size")?,
            original_size: require(self.original_size, "original size")?,
            quantity: self.quantity,
            rate: self.rate,
            assessable_value: self.assessable_value,
            gst_amount: self.gst_amount,
            total_amount: self.total_amount,
            invoice_date: self.invoice_date,
        })
    }
}

const INVOICE_COLUMNS: &str = "id, invoice_number, challan_id, party_id, finish_size_id, \
                               original_size_id, annealing_count, draw_pass_count, quantity, \
                               rate, annealing_charge, draw_charge, base_amount, \
                               transport_charges, assessable_value, gst_percentage, \
                               cgst_percentage, sgst_percentage, igst_percentage, cgst_amount, \
                               sgst_amount, igst_amount, gst_amount, tcs_percentage, tcs_amount, \
                               total_amount, invoice_date, irn_number, po_number, payment_term, \
                               supplier_code, vehicle_number, eway_bill_number, \
                               dispatched_through, packing_type, created_at, updated_at";

impl InvoiceService {
    /// Create a new InvoiceService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Derive a tax invoice from an outward challan
    pub async fn derive(&self, input: DeriveInvoiceInput) -> AppResult<TaxInvoice> {
        let transport_charges = input.transport_charges.unwrap_or(Decimal::ZERO);
        let tcs_percentage = input.tcs_percentage.unwrap_or(Decimal::ZERO);
        let treatment = input.tax_treatment.unwrap_or_default();

        validate_non_negative_rate(transport_charges)
            .map_err(|e| AppError::validation("transport_charges", e))?;
        validate_non_negative_rate(tcs_percentage)
            .map_err(|e| AppError::validation("tcs_percentage", e))?;

        let mut tx = self.db.begin().await?;

        let challan = sqlx::query_as::<_, ChallanFigures>(
            r#"
            SELECT id, challan_number, party_id, finish_size_id, original_size_id,
                   annealing_count, draw_pass_count, quantity, rate, annealing_charge, draw_charge
            FROM outward_challans
            WHERE id = $1
            "#,
        )
        .bind(input.challan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound {
            entity: "Outward challan",
            id: input.challan_id.to_string(),
        })?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM tax_invoices WHERE challan_id = $1)",
        )
        .bind(challan.id)
        .fetch_one(&mut *tx)
        .await?;

        if exists {
            return Err(AppError::Conflict {
                key: format!("invoice for challan {}", challan.challan_number),
            });
        }

        // The challan's FG item must still resolve; a dangling reference is
        // an operator problem, not something to clean up on the fly.
        let fg_item = item::find_item(&mut tx, challan.finish_size_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound { .. } => AppError::DataIntegrity {
                    entity: "Outward challan",
                    id: challan.challan_number.clone(),
                    reason: "finish size item no longer exists".to_string(),
                },
                other => other,
            })?;

        let gst_percentage = gst::find_active_rate(&mut tx, &fg_item.hsn_code).await?;

        let base = compute_charges(
            challan.quantity,
            challan.rate,
            challan.annealing_charge,
            challan.draw_charge,
            challan.annealing_count,
            challan.draw_pass_count,
        );

        let amounts = compute_invoice_amounts(
            base.total,
            transport_charges,
            gst_percentage,
            treatment,
            tcs_percentage,
        );

        let invoice_number = sequence::next_number(&mut tx, "INV").await?;
        let invoice_date = input.invoice_date.unwrap_or_else(|| Utc::now().date_naive());

        let invoice = sqlx::query_as::<_, TaxInvoice>(&format!(
            r#"
            INSERT INTO tax_invoices (invoice_number, challan_id, party_id, finish_size_id,
                                      original_size_id, annealing_count, draw_pass_count,
                                      quantity, rate, annealing_charge, draw_charge, base_amount,
                                      transport_charges, assessable_value, gst_percentage,
                                      cgst_percentage, sgst_percentage, igst_percentage,
                                      cgst_amount, sgst_amount, igst_amount, gst_amount,
                                      tcs_percentage, tcs_amount, total_amount, invoice_date,
                                      irn_number, po_number, payment_term, supplier_code,
                                      vehicle_number, eway_bill_number, dispatched_through,
                                      packing_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                    $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32,
                    $33, $34)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(&invoice_number)
        .bind(challan.id)
        .bind(challan.party_id)
        .bind(challan.finish_size_id)
        .bind(challan.original_size_id)
        .bind(challan.annealing_count)
        .bind(challan.draw_pass_count)
        .bind(challan.quantity)
        .bind(challan.rate)
        .bind(challan.annealing_charge)
        .bind(challan.draw_charge)
        .bind(amounts.base_amount)
        .bind(transport_charges)
        .bind(amounts.assessable_value)
        .bind(gst_percentage)
        .bind(amounts.gst.cgst_percentage)
        .bind(amounts.gst.sgst_percentage)
        .bind(amounts.gst.igst_percentage)
        .bind(amounts.gst.cgst_amount)
        .bind(amounts.gst.sgst_amount)
        .bind(amounts.gst.igst_amount)
        .bind(amounts.gst.gst_amount)
        .bind(tcs_percentage)
        .bind(amounts.tcs_amount)
        .bind(amounts.total_amount)
        .bind(invoice_date)
        .bind(input.irn_number.as_deref().map(str::trim))
        .bind(input.po_number.as_deref().map(str::trim))
        .bind(input.payment_term.as_deref().unwrap_or("0 Days"))
        .bind(input.supplier_code.as_deref().unwrap_or("0"))
        .bind(input.vehicle_number.as_deref().map(str::trim))
        .bind(input.eway_bill_number.as_deref().map(str::trim))
        .bind(input.dispatched_through.as_deref().unwrap_or("By Road"))
        .bind(input.packing_type.as_deref().unwrap_or("KGS"))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await.map_err(|e| AppError::PartialFailure {
            operation: "invoice derive",
            source: e,
        })?;

        tracing::info!(
            invoice_number = %invoice.invoice_number,
            challan_number = %challan.challan_number,
            total_amount = %invoice.total_amount,
            "tax invoice derived"
        );

        Ok(invoice)
    }

    /// Get an invoice by ID
    pub async fn get(&self, invoice_id: Uuid) -> AppResult<TaxInvoice> {
        sqlx::query_as::<_, TaxInvoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM tax_invoices WHERE id = $1"
        ))
        .bind(invoice_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound {
            entity: "Tax invoice",
            id: invoice_id.to_string(),
        })
    }

    /// List invoices with their references, newest first
    pub async fn list(&self) -> AppResult<Vec<InvoiceView>> {
        let rows = sqlx::query_as::<_, InvoiceViewRow>(
            r#"
            SELECT i.id, i.invoice_number, c.challan_number, p.party_name,
                   fg.size AS finish_size, rm.size AS original_size,
                   i.quantity, i.rate, i.assessable_value, i.gst_amount, i.total_amount,
                   i.invoice_date
            FROM tax_invoices i
            LEFT JOIN outward_challans c ON c.id = i.challan_id
            LEFT JOIN party_master p ON p.id = i.party_id
            LEFT JOIN item_master fg ON fg.id = i.finish_size_id
            LEFT JOIN item_master rm ON rm.id = i.original_size_id
            ORDER BY i.invoice_date DESC, i.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(InvoiceViewRow::into_view).collect()
    }

    /// Delete an invoice. Invoices are fiscal records, not inventory; stock
    /// is untouched.
    pub async fn delete(&self, invoice_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM tax_invoices WHERE id = $1")
            .bind(invoice_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                entity: "Tax invoice",
                id: invoice_id.to_string(),
            });
        }

        Ok(())
    }
}

/// The challan figures invoice derivation copies over
#[derive(Debug, FromRow)]
struct ChallanFigures {
    id: Uuid,
    challan_number: String,
    party_id: Uuid,
    finish_size_id: Uuid,
    original_size_id: Uuid,
    annealing_count: i32,
    draw_pass_count: i32,
    quantity: Decimal,
    rate: Decimal,
    annealing_charge: Decimal,
    draw_charge: Decimal,
}
