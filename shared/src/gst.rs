//! GST breakdown math for tax invoices
//!
//! Mirrors India's GST structure: an intra-state supply splits the looked-up
//! rate evenly into CGST + SGST, an inter-state supply levies the whole rate
//! as IGST. TCS, where applicable, is charged on assessable value + GST.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::TaxTreatment;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const TWO: Decimal = Decimal::TWO;

/// Percentages and amounts for one invoice's GST levy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GstBreakdown {
    pub cgst_percentage: Decimal,
    pub sgst_percentage: Decimal,
    pub igst_percentage: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub igst_amount: Decimal,
    /// Sum of whichever components apply
    pub gst_amount: Decimal,
}

impl GstBreakdown {
    /// Split `gst_percentage` according to the treatment and apply it to the
    /// assessable value.
    pub fn compute(
        assessable_value: Decimal,
        gst_percentage: Decimal,
        treatment: TaxTreatment,
    ) -> Self {
        match treatment {
            TaxTreatment::IntraState => {
                let half = gst_percentage / TWO;
                let component = assessable_value * half / HUNDRED;
                Self {
                    cgst_percentage: half,
                    sgst_percentage: half,
                    igst_percentage: Decimal::ZERO,
                    cgst_amount: component,
                    sgst_amount: component,
                    igst_amount: Decimal::ZERO,
                    gst_amount: component + component,
                }
            }
            TaxTreatment::InterState => {
                let amount = assessable_value * gst_percentage / HUNDRED;
                Self {
                    cgst_percentage: Decimal::ZERO,
                    sgst_percentage: Decimal::ZERO,
                    igst_percentage: gst_percentage,
                    cgst_amount: Decimal::ZERO,
                    sgst_amount: Decimal::ZERO,
                    igst_amount: amount,
                    gst_amount: amount,
                }
            }
        }
    }
}

/// Final money figures for an invoice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvoiceAmounts {
    /// Conversion charge total from the challan
    pub base_amount: Decimal,
    /// base + transport charges
    pub assessable_value: Decimal,
    pub gst: GstBreakdown,
    pub tcs_amount: Decimal,
    pub total_amount: Decimal,
}

/// Compute the complete invoice money column.
///
/// `tcs_percentage` is applied on assessable value + GST; both TCS and
/// transport charges default to zero upstream when not supplied.
pub fn compute_invoice_amounts(
    base_amount: Decimal,
    transport_charges: Decimal,
    gst_percentage: Decimal,
    treatment: TaxTreatment,
    tcs_percentage: Decimal,
) -> InvoiceAmounts {
    let assessable_value = base_amount + transport_charges;
    let gst = GstBreakdown::compute(assessable_value, gst_percentage, treatment);
    let tcs_amount = (assessable_value + gst.gst_amount) * tcs_percentage / HUNDRED;
    let total_amount = assessable_value + gst.gst_amount + tcs_amount;

    InvoiceAmounts {
        base_amount,
        assessable_value,
        gst,
        tcs_amount,
        total_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_intra_state_even_split() {
        let gst = GstBreakdown::compute(dec("1000"), dec("18"), TaxTreatment::IntraState);
        assert_eq!(gst.cgst_percentage, dec("9"));
        assert_eq!(gst.sgst_percentage, dec("9"));
        assert_eq!(gst.igst_percentage, Decimal::ZERO);
        assert_eq!(gst.cgst_amount, dec("90"));
        assert_eq!(gst.sgst_amount, dec("90"));
        assert_eq!(gst.gst_amount, dec("180"));
    }

    #[test]
    fn test_inter_state_single_levy() {
        let gst = GstBreakdown::compute(dec("1000"), dec("18"), TaxTreatment::InterState);
        assert_eq!(gst.igst_percentage, dec("18"));
        assert_eq!(gst.igst_amount, dec("180"));
        assert_eq!(gst.cgst_amount, Decimal::ZERO);
        assert_eq!(gst.sgst_amount, Decimal::ZERO);
        assert_eq!(gst.gst_amount, dec("180"));
    }

    #[test]
    fn test_intra_and_inter_levy_same_total() {
        let intra = GstBreakdown::compute(dec("123.45"), dec("12"), TaxTreatment::IntraState);
        let inter = GstBreakdown::compute(dec("123.45"), dec("12"), TaxTreatment::InterState);
        assert_eq!(intra.gst_amount, inter.gst_amount);
    }

    #[test]
    fn test_odd_rate_halves_exactly() {
        // 5% splits into 2.5 + 2.5, no rounding loss in Decimal
        let gst = GstBreakdown::compute(dec("200"), dec("5"), TaxTreatment::IntraState);
        assert_eq!(gst.cgst_percentage, dec("2.5"));
        assert_eq!(gst.gst_amount, dec("10.00"));
    }

    #[test]
    fn test_invoice_amounts_without_extras() {
        let inv = compute_invoice_amounts(
            dec("2000"),
            Decimal::ZERO,
            dec("18"),
            TaxTreatment::IntraState,
            Decimal::ZERO,
        );
        assert_eq!(inv.assessable_value, dec("2000"));
        assert_eq!(inv.gst.gst_amount, dec("360.00"));
        assert_eq!(inv.tcs_amount, Decimal::ZERO);
        assert_eq!(inv.total_amount, dec("2360.00"));
    }

    #[test]
    fn test_invoice_amounts_with_transport_and_tcs() {
        let inv = compute_invoice_amounts(
            dec("1000"),
            dec("100"),
            dec("18"),
            TaxTreatment::IntraState,
            dec("1"),
        );
        assert_eq!(inv.assessable_value, dec("1100"));
        assert_eq!(inv.gst.gst_amount, dec("198.00"));
        // 1% of (1100 + 198)
        assert_eq!(inv.tcs_amount, dec("12.9800"));
        assert_eq!(inv.total_amount, dec("1310.9800"));
    }

    #[test]
    fn test_zero_rate() {
        let inv = compute_invoice_amounts(
            dec("500"),
            Decimal::ZERO,
            Decimal::ZERO,
            TaxTreatment::IntraState,
            Decimal::ZERO,
        );
        assert_eq!(inv.gst.gst_amount, Decimal::ZERO);
        assert_eq!(inv.total_amount, dec("500"));
    }
}
