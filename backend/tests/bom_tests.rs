//! BOM registry tests
//!
//! Tests for conversion rule bounds and process parameter range
//! enforcement.

use proptest::prelude::*;
use shared::validation::{
    check_process_range, validate_rule_bounds, RangeViolation, ANNEALING_BOUND, DRAW_PASS_BOUND,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A rule allowing annealing 2-5 rejects 1 and 6 and accepts
    /// everything between.
    #[test]
    fn test_annealing_range_enforcement() {
        assert_eq!(
            check_process_range(1, 2, 5),
            Err(RangeViolation { value: 1, min: 2, max: 5 })
        );
        assert_eq!(
            check_process_range(6, 2, 5),
            Err(RangeViolation { value: 6, min: 2, max: 5 })
        );
        for count in 2..=5 {
            assert!(check_process_range(count, 2, 5).is_ok());
        }
    }

    #[test]
    fn test_draw_pass_range_enforcement() {
        assert!(check_process_range(0, 0, 10).is_ok());
        assert!(check_process_range(10, 0, 10).is_ok());
        assert!(check_process_range(11, 0, 10).is_err());
        assert!(check_process_range(-1, 0, 10).is_err());
    }

    /// A count past the schema envelope fails even against a wide rule
    #[test]
    fn test_count_past_rule_maximum_fails() {
        let violation = check_process_range(9, 0, 5).unwrap_err();
        assert_eq!(violation.value, 9);
        assert_eq!(violation.max, 5);
    }

    #[test]
    fn test_rule_bounds_accept_full_envelope() {
        assert!(validate_rule_bounds(0, ANNEALING_BOUND, 0, DRAW_PASS_BOUND).is_ok());
    }

    #[test]
    fn test_rule_bounds_reject_inverted_ranges() {
        assert!(validate_rule_bounds(5, 2, 0, 10).is_err());
        assert!(validate_rule_bounds(0, 7, 8, 3).is_err());
    }

    #[test]
    fn test_rule_bounds_reject_out_of_envelope() {
        assert!(validate_rule_bounds(0, ANNEALING_BOUND + 1, 0, 10).is_err());
        assert!(validate_rule_bounds(-1, 7, 0, 10).is_err());
        assert!(validate_rule_bounds(0, 7, 0, DRAW_PASS_BOUND + 1).is_err());
        assert!(validate_rule_bounds(0, 7, -2, 10).is_err());
    }

    #[test]
    fn test_rule_bounds_accept_degenerate_range() {
        // A rule may pin a parameter to one exact value
        assert!(validate_rule_bounds(3, 3, 6, 6).is_ok());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for a valid annealing range
    fn annealing_range_strategy() -> impl Strategy<Value = (i32, i32)> {
        (0..=ANNEALING_BOUND, 0..=ANNEALING_BOUND)
            .prop_map(|(a, b)| (a.min(b), a.max(b)))
    }

    /// Strategy for a valid draw pass range
    fn draw_range_strategy() -> impl Strategy<Value = (i32, i32)> {
        (0..=DRAW_PASS_BOUND, 0..=DRAW_PASS_BOUND)
            .prop_map(|(a, b)| (a.min(b), a.max(b)))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Every count inside the envelope passes, every count outside
        /// fails with the envelope echoed back.
        #[test]
        fn prop_range_check_partitions_counts(
            (min, max) in annealing_range_strategy(),
            value in -5..=15i32
        ) {
            let result = check_process_range(value, min, max);
            if value >= min && value <= max {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(result, Err(RangeViolation { value, min, max }));
            }
        }

        /// Any ordered pair of in-envelope bounds makes a valid rule.
        #[test]
        fn prop_ordered_bounds_are_valid(
            (a_min, a_max) in annealing_range_strategy(),
            (d_min, d_max) in draw_range_strategy()
        ) {
            prop_assert!(validate_rule_bounds(a_min, a_max, d_min, d_max).is_ok());
        }

        /// Inverted bounds are always rejected.
        #[test]
        fn prop_inverted_bounds_are_rejected(
            (a_min, a_max) in annealing_range_strategy(),
            (d_min, d_max) in draw_range_strategy()
        ) {
            if a_min < a_max {
                prop_assert!(validate_rule_bounds(a_max, a_min, d_min, d_max).is_err());
            }
            if d_min < d_max {
                prop_assert!(validate_rule_bounds(a_min, a_max, d_max, d_min).is_err());
            }
        }

        /// The rule's bounds are themselves legal process counts.
        #[test]
        fn prop_bounds_admit_their_own_endpoints(
            (min, max) in draw_range_strategy()
        ) {
            prop_assert!(check_process_range(min, min, max).is_ok());
            prop_assert!(check_process_range(max, min, max).is_ok());
        }
    }
}
