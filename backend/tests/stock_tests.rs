//! Stock ledger tests
//!
//! Tests for the ledger invariants:
//! - Quantities never go below zero
//! - Failed operations leave state unchanged
//! - Entries are created lazily on first movement

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// In-memory mirror of the ledger semantics: one quantity per
/// (category, item), lazily created, floored at zero.
#[derive(Debug, Default, Clone, PartialEq)]
struct Ledger {
    entries: HashMap<(&'static str, &'static str), Decimal>,
}

/// Failed movement: (available, required)
type Insufficient = (Decimal, Decimal);

impl Ledger {
    fn get(&self, category: &'static str, item: &'static str) -> Decimal {
        self.entries
            .get(&(category, item))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn adjust(
        &mut self,
        category: &'static str,
        item: &'static str,
        delta: Decimal,
    ) -> Result<Decimal, Insufficient> {
        let current = self.get(category, item);
        let next = current + delta;
        if next < Decimal::ZERO {
            return Err((current, -delta));
        }
        self.entries.insert((category, item), next);
        Ok(next)
    }

    fn increase(
        &mut self,
        category: &'static str,
        item: &'static str,
        amount: Decimal,
    ) -> Result<Decimal, Insufficient> {
        self.adjust(category, item, amount)
    }

    fn decrease(
        &mut self,
        category: &'static str,
        item: &'static str,
        amount: Decimal,
    ) -> Result<Decimal, Insufficient> {
        self.adjust(category, item, -amount)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_absent_entry_reads_zero() {
        let ledger = Ledger::default();
        assert_eq!(ledger.get("RM", "8mm"), Decimal::ZERO);
    }

    #[test]
    fn test_increase_creates_entry_lazily() {
        let mut ledger = Ledger::default();
        let quantity = ledger.increase("RM", "8mm", dec("100")).unwrap();
        assert_eq!(quantity, dec("100"));
        assert_eq!(ledger.get("RM", "8mm"), dec("100"));
    }

    #[test]
    fn test_increase_accumulates() {
        let mut ledger = Ledger::default();
        ledger.increase("RM", "8mm", dec("100")).unwrap();
        ledger.increase("RM", "8mm", dec("50.5")).unwrap();
        assert_eq!(ledger.get("RM", "8mm"), dec("150.5"));
    }

    #[test]
    fn test_decrease_within_balance() {
        let mut ledger = Ledger::default();
        ledger.increase("RM", "8mm", dec("100")).unwrap();
        let quantity = ledger.decrease("RM", "8mm", dec("30")).unwrap();
        assert_eq!(quantity, dec("70"));
    }

    #[test]
    fn test_decrease_to_exactly_zero() {
        let mut ledger = Ledger::default();
        ledger.increase("RM", "8mm", dec("100")).unwrap();
        let quantity = ledger.decrease("RM", "8mm", dec("100")).unwrap();
        assert_eq!(quantity, Decimal::ZERO);
    }

    #[test]
    fn test_decrease_below_zero_fails_with_detail() {
        let mut ledger = Ledger::default();
        ledger.increase("RM", "8mm", dec("100")).unwrap();
        let err = ledger.decrease("RM", "8mm", dec("150")).unwrap_err();
        assert_eq!(err, (dec("100"), dec("150")));
    }

    #[test]
    fn test_failed_decrease_leaves_state_unchanged() {
        let mut ledger = Ledger::default();
        ledger.increase("RM", "8mm", dec("100")).unwrap();
        let before = ledger.clone();

        assert!(ledger.decrease("RM", "8mm", dec("150")).is_err());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_decrease_on_absent_entry_fails() {
        let mut ledger = Ledger::default();
        let err = ledger.decrease("FG", "6mm", dec("1")).unwrap_err();
        assert_eq!(err, (Decimal::ZERO, dec("1")));
    }

    #[test]
    fn test_adjust_signed_both_ways() {
        let mut ledger = Ledger::default();
        ledger.adjust("FG", "6mm", dec("40")).unwrap();
        ledger.adjust("FG", "6mm", dec("-15")).unwrap();
        assert_eq!(ledger.get("FG", "6mm"), dec("25"));
    }

    #[test]
    fn test_increase_with_negative_amount_behaves_like_adjust() {
        let mut ledger = Ledger::default();
        ledger.increase("FG", "6mm", dec("40")).unwrap();
        ledger.increase("FG", "6mm", dec("-10")).unwrap();
        assert_eq!(ledger.get("FG", "6mm"), dec("30"));

        // Still floored at zero
        assert!(ledger.increase("FG", "6mm", dec("-31")).is_err());
    }

    #[test]
    fn test_categories_are_independent() {
        let mut ledger = Ledger::default();
        ledger.increase("RM", "8mm", dec("100")).unwrap();
        ledger.increase("FG", "8mm", dec("5")).unwrap();

        ledger.decrease("RM", "8mm", dec("50")).unwrap();
        assert_eq!(ledger.get("RM", "8mm"), dec("50"));
        assert_eq!(ledger.get("FG", "8mm"), dec("5"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating positive quantities
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100_000i64).prop_map(|n| Decimal::new(n, 2)) // 0.01 to 1000.00
    }

    /// Strategy for generating signed deltas
    fn delta_strategy() -> impl Strategy<Value = Decimal> {
        (-100_000i64..=100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Non-negativity: no sequence of adjustments drives the ledger
        /// below zero; rejected operations change nothing.
        #[test]
        fn prop_quantity_never_negative(deltas in prop::collection::vec(delta_strategy(), 1..40)) {
            let mut ledger = Ledger::default();

            for delta in deltas {
                let before = ledger.get("RM", "8mm");
                match ledger.adjust("RM", "8mm", delta) {
                    Ok(after) => prop_assert_eq!(after, before + delta),
                    Err((available, required)) => {
                        prop_assert_eq!(available, before);
                        prop_assert_eq!(required, -delta);
                        prop_assert_eq!(ledger.get("RM", "8mm"), before);
                    }
                }
                prop_assert!(ledger.get("RM", "8mm") >= Decimal::ZERO);
            }
        }

        /// Balance accuracy: applied movements sum exactly to the balance.
        #[test]
        fn prop_balance_is_sum_of_applied_movements(
            deltas in prop::collection::vec(delta_strategy(), 1..40)
        ) {
            let mut ledger = Ledger::default();
            let mut applied = Decimal::ZERO;

            for delta in deltas {
                if ledger.adjust("RM", "8mm", delta).is_ok() {
                    applied += delta;
                }
            }

            prop_assert_eq!(ledger.get("RM", "8mm"), applied);
        }

        /// Increase then equal decrease returns to the starting balance.
        #[test]
        fn prop_decrease_inverts_increase(
            start in quantity_strategy(),
            moved in quantity_strategy()
        ) {
            let mut ledger = Ledger::default();
            ledger.increase("RM", "8mm", start).unwrap();

            ledger.increase("RM", "8mm", moved).unwrap();
            ledger.decrease("RM", "8mm", moved).unwrap();

            prop_assert_eq!(ledger.get("RM", "8mm"), start);
        }

        /// A decrease strictly greater than the balance always fails.
        #[test]
        fn prop_overdraw_always_fails(
            balance in quantity_strategy(),
            extra in quantity_strategy()
        ) {
            let mut ledger = Ledger::default();
            ledger.increase("RM", "8mm", balance).unwrap();

            let result = ledger.decrease("RM", "8mm", balance + extra);
            prop_assert!(result.is_err());
            prop_assert_eq!(ledger.get("RM", "8mm"), balance);
        }
    }
}
