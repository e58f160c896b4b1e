//! Validation utilities for the Wire Works Operations Platform
//!
//! Includes India-specific validations for GST compliance.

use rust_decimal::Decimal;

// ============================================================================
// Process Parameter Validations
// ============================================================================

/// Hard schema bound for annealing counts on any BOM rule
pub const ANNEALING_BOUND: i32 = 7;
/// Hard schema bound for draw pass counts on any BOM rule
pub const DRAW_PASS_BOUND: i32 = 10;

/// A value that fell outside its BOM-defined envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeViolation {
    pub value: i32,
    pub min: i32,
    pub max: i32,
}

/// Check a process count against a rule's [min, max] envelope
pub fn check_process_range(value: i32, min: i32, max: i32) -> Result<(), RangeViolation> {
    if value < min || value > max {
        return Err(RangeViolation { value, min, max });
    }
    Ok(())
}

/// Validate the bounds of a BOM rule at write time
pub fn validate_rule_bounds(
    annealing_min: i32,
    annealing_max: i32,
    draw_pass_min: i32,
    draw_pass_max: i32,
) -> Result<(), &'static str> {
    if annealing_min < 0 || annealing_max > ANNEALING_BOUND {
        return Err("Annealing bounds must lie within 0-7");
    }
    if draw_pass_min < 0 || draw_pass_max > DRAW_PASS_BOUND {
        return Err("Draw pass bounds must lie within 0-10");
    }
    if annealing_min > annealing_max {
        return Err("Annealing minimum cannot be greater than maximum");
    }
    if draw_pass_min > draw_pass_max {
        return Err("Draw pass minimum cannot be greater than maximum");
    }
    Ok(())
}

// ============================================================================
// Document Field Validations
// ============================================================================

/// Challan/receipt quantities must be strictly positive
pub fn validate_positive_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be greater than 0");
    }
    Ok(())
}

/// Rates and per-unit charges may be zero but never negative
pub fn validate_non_negative_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO {
        return Err("Rate cannot be negative");
    }
    Ok(())
}

/// Size labels and grades must carry content after trimming
pub fn validate_label(label: &str) -> Result<(), &'static str> {
    if label.trim().is_empty() {
        return Err("Value cannot be blank");
    }
    Ok(())
}

// ============================================================================
// India-Specific Validations
// ============================================================================

/// Validate a GSTIN (Goods and Services Tax Identification Number)
///
/// Format: 2-digit state code, 5-letter PAN prefix, 4 PAN digits, 1 PAN
/// letter, 1 entity code, literal 'Z', 1 check character.
/// Example: 27AAPFU0939F1ZV
pub fn validate_gstin(gstin: &str) -> Result<(), &'static str> {
    let chars: Vec<char> = gstin.chars().collect();

    if chars.len() != 15 {
        return Err("GSTIN must be 15 characters");
    }
    if !chars[0..2].iter().all(|c| c.is_ascii_digit()) {
        return Err("GSTIN must start with a 2-digit state code");
    }
    if !chars[2..7].iter().all(|c| c.is_ascii_uppercase()) {
        return Err("GSTIN characters 3-7 must be uppercase letters");
    }
    if !chars[7..11].iter().all(|c| c.is_ascii_digit()) {
        return Err("GSTIN characters 8-11 must be digits");
    }
    if !chars[11].is_ascii_uppercase() {
        return Err("GSTIN character 12 must be an uppercase letter");
    }
    if !chars[12].is_ascii_alphanumeric() {
        return Err("GSTIN character 13 must be alphanumeric");
    }
    if chars[13] != 'Z' {
        return Err("GSTIN character 14 must be 'Z'");
    }
    if !chars[14].is_ascii_alphanumeric() {
        return Err("GSTIN character 15 must be alphanumeric");
    }

    Ok(())
}

/// Validate an HSN (Harmonized System of Nomenclature) tax code: 4, 6, or 8
/// digits
pub fn validate_hsn_code(hsn: &str) -> Result<(), &'static str> {
    if !matches!(hsn.len(), 4 | 6 | 8) {
        return Err("HSN code must be 4, 6, or 8 digits");
    }
    if !hsn.chars().all(|c| c.is_ascii_digit()) {
        return Err("HSN code must be numeric");
    }
    Ok(())
}

/// GST percentages run 0-100
pub fn validate_gst_percentage(percentage: Decimal) -> Result<(), &'static str> {
    if percentage < Decimal::ZERO {
        return Err("GST percentage cannot be negative");
    }
    if percentage > Decimal::ONE_HUNDRED {
        return Err("GST percentage cannot exceed 100");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // ========================================================================
    // Process Parameter Validation Tests
    // ========================================================================

    #[test]
    fn test_check_process_range_inside() {
        for count in 2..=5 {
            assert!(check_process_range(count, 2, 5).is_ok());
        }
    }

    #[test]
    fn test_check_process_range_outside() {
        let low = check_process_range(1, 2, 5).unwrap_err();
        assert_eq!(low, RangeViolation { value: 1, min: 2, max: 5 });

        let high = check_process_range(6, 2, 5).unwrap_err();
        assert_eq!(high, RangeViolation { value: 6, min: 2, max: 5 });
    }

    #[test]
    fn test_check_process_range_degenerate() {
        assert!(check_process_range(3, 3, 3).is_ok());
        assert!(check_process_range(2, 3, 3).is_err());
    }

    #[test]
    fn test_validate_rule_bounds_valid() {
        assert!(validate_rule_bounds(0, 7, 0, 10).is_ok());
        assert!(validate_rule_bounds(2, 5, 3, 6).is_ok());
    }

    #[test]
    fn test_validate_rule_bounds_inverted() {
        assert!(validate_rule_bounds(5, 2, 0, 10).is_err());
        assert!(validate_rule_bounds(0, 7, 6, 3).is_err());
    }

    #[test]
    fn test_validate_rule_bounds_outside_envelope() {
        assert!(validate_rule_bounds(0, 8, 0, 10).is_err());
        assert!(validate_rule_bounds(-1, 7, 0, 10).is_err());
        assert!(validate_rule_bounds(0, 7, 0, 11).is_err());
    }

    // ========================================================================
    // Document Field Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_positive_quantity() {
        assert!(validate_positive_quantity(dec("0.01")).is_ok());
        assert!(validate_positive_quantity(Decimal::ZERO).is_err());
        assert!(validate_positive_quantity(dec("-5")).is_err());
    }

    #[test]
    fn test_validate_non_negative_rate() {
        assert!(validate_non_negative_rate(Decimal::ZERO).is_ok());
        assert!(validate_non_negative_rate(dec("55.50")).is_ok());
        assert!(validate_non_negative_rate(dec("-0.01")).is_err());
    }

    #[test]
    fn test_validate_label() {
        assert!(validate_label("8mm").is_ok());
        assert!(validate_label("").is_err());
        assert!(validate_label("   ").is_err());
    }

    // ========================================================================
    // India-Specific Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_gstin_valid() {
        assert!(validate_gstin("27AAPFU0939F1ZV").is_ok());
        assert!(validate_gstin("06BZAHM6385P6Z2").is_ok());
    }

    #[test]
    fn test_validate_gstin_invalid() {
        // Wrong length
        assert!(validate_gstin("27AAPFU0939F1Z").is_err());
        // Lowercase PAN letters
        assert!(validate_gstin("27aapfu0939F1ZV").is_err());
        // Missing literal Z at position 14
        assert!(validate_gstin("27AAPFU0939F1XV").is_err());
        // Letters where state code digits belong
        assert!(validate_gstin("XXAAPFU0939F1ZV").is_err());
    }

    #[test]
    fn test_validate_hsn_code_valid() {
        assert!(validate_hsn_code("7223").is_ok());
        assert!(validate_hsn_code("722300").is_ok());
        assert!(validate_hsn_code("72230099").is_ok());
    }

    #[test]
    fn test_validate_hsn_code_invalid() {
        assert!(validate_hsn_code("72").is_err());
        assert!(validate_hsn_code("72230").is_err());
        assert!(validate_hsn_code("7223A").is_err());
        assert!(validate_hsn_code("").is_err());
    }

    #[test]
    fn test_validate_gst_percentage() {
        assert!(validate_gst_percentage(Decimal::ZERO).is_ok());
        assert!(validate_gst_percentage(dec("18")).is_ok());
        assert!(validate_gst_percentage(dec("100")).is_ok());
        assert!(validate_gst_percentage(dec("-1")).is_err());
        assert!(validate_gst_percentage(dec("101")).is_err());
    }
}
