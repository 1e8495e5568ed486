//! Cashback reward math.
//!
//! A cashback movement carries a computed monetary effect; the matching
//! (account, cycle) ledger row folds those effects into running totals.

use rust_decimal::Decimal;

use kakebo_shared::types::money::round_currency;

use super::types::{CashbackEligibility, CashbackKind};

/// Computes the monetary effect of a cashback reward.
///
/// Percent rewards are `base × value / 100` rounded to 2 decimal places;
/// fixed rewards are the value itself.
#[must_use]
pub fn cashback_amount(kind: CashbackKind, value: Decimal, base: Decimal) -> Decimal {
    match kind {
        CashbackKind::Percent => round_currency(base * value / Decimal::ONE_HUNDRED),
        CashbackKind::Fixed => round_currency(value),
    }
}

/// Running totals of a cashback ledger row.
///
/// `remaining_budget` loosely tracks `budget_cap − total_cashback`; apply
/// maintains it incrementally, revert re-derives it from the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashbackTotals {
    /// Sum of applied movement amounts for the key.
    pub total_cashback: Decimal,
    /// Budget left for the cycle.
    pub remaining_budget: Decimal,
    /// Cashback budget cap for the cycle (0 = unknown).
    pub budget_cap: Decimal,
}

impl CashbackTotals {
    /// Totals for a ledger row created lazily by its first movement.
    ///
    /// The cap is unknown at creation, so the first movement's amount seeds
    /// both the total and the remaining budget.
    #[must_use]
    pub fn seed(amount: Decimal) -> Self {
        Self {
            total_cashback: amount,
            remaining_budget: amount,
            budget_cap: Decimal::ZERO,
        }
    }

    /// Folds an applied movement into the totals.
    pub fn apply(&mut self, amount: Decimal) {
        self.total_cashback += amount;
        self.remaining_budget -= amount;
    }

    /// Unwinds a rolled-back movement.
    ///
    /// The remaining budget is re-derived from the cap rather than
    /// incremented, repairing any drift the loose tracking accumulated.
    pub fn revert(&mut self, amount: Decimal) {
        self.total_cashback -= amount;
        self.remaining_budget = self.budget_cap - self.total_cashback;
    }
}

/// Derives the eligibility of a ledger row after a mutation.
///
/// A positive cap that the running total has met or exceeded flips the row
/// to `ReachedCap`; otherwise the current eligibility is kept (evaluation
/// of eligible/not_eligible is an administrative concern).
#[must_use]
pub fn derive_eligibility(
    budget_cap: Decimal,
    total_cashback: Decimal,
    current: CashbackEligibility,
) -> CashbackEligibility {
    if budget_cap > Decimal::ZERO && total_cashback >= budget_cap {
        CashbackEligibility::ReachedCap
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_cashback_amount() {
        assert_eq!(
            cashback_amount(CashbackKind::Percent, dec!(5.0), dec!(82.40)),
            dec!(4.12)
        );
        assert_eq!(
            cashback_amount(CashbackKind::Percent, dec!(2.5), dec!(100)),
            dec!(2.50)
        );
        // Rounds half-up at the 2nd decimal place.
        assert_eq!(
            cashback_amount(CashbackKind::Percent, dec!(1.0), dec!(0.55)),
            dec!(0.01)
        );
    }

    #[test]
    fn test_fixed_cashback_amount() {
        assert_eq!(
            cashback_amount(CashbackKind::Fixed, dec!(10.00), dec!(999.99)),
            dec!(10.00)
        );
    }

    #[test]
    fn test_seed_totals() {
        let totals = CashbackTotals::seed(dec!(4.12));
        assert_eq!(totals.total_cashback, dec!(4.12));
        assert_eq!(totals.remaining_budget, dec!(4.12));
        assert_eq!(totals.budget_cap, dec!(0));
    }

    #[test]
    fn test_apply_on_existing_row() {
        let mut totals = CashbackTotals {
            total_cashback: dec!(10.00),
            remaining_budget: dec!(40.00),
            budget_cap: dec!(50.00),
        };
        totals.apply(dec!(5.00));
        assert_eq!(totals.total_cashback, dec!(15.00));
        assert_eq!(totals.remaining_budget, dec!(35.00));
    }

    #[test]
    fn test_revert_restores_seeded_row_to_zero() {
        let mut totals = CashbackTotals::seed(dec!(4.12));
        totals.revert(dec!(4.12));
        assert_eq!(totals.total_cashback, dec!(0.00));
        assert_eq!(totals.remaining_budget, dec!(0.00));
    }

    #[test]
    fn test_apply_then_revert_is_exact_inverse_on_capped_row() {
        let before = CashbackTotals {
            total_cashback: dec!(10.00),
            remaining_budget: dec!(40.00),
            budget_cap: dec!(50.00),
        };
        let mut totals = before;
        totals.apply(dec!(4.12));
        totals.revert(dec!(4.12));
        assert_eq!(totals, before);
    }

    #[test]
    fn test_derive_eligibility_reaches_cap() {
        assert_eq!(
            derive_eligibility(dec!(50.00), dec!(50.00), CashbackEligibility::Eligible),
            CashbackEligibility::ReachedCap
        );
        assert_eq!(
            derive_eligibility(dec!(50.00), dec!(62.10), CashbackEligibility::Pending),
            CashbackEligibility::ReachedCap
        );
    }

    #[test]
    fn test_derive_eligibility_keeps_current_below_cap() {
        assert_eq!(
            derive_eligibility(dec!(50.00), dec!(10.00), CashbackEligibility::Eligible),
            CashbackEligibility::Eligible
        );
        // Cap of zero means "unknown" and never flips the row.
        assert_eq!(
            derive_eligibility(dec!(0), dec!(100.00), CashbackEligibility::Pending),
            CashbackEligibility::Pending
        );
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Apply followed by revert restores both totals exactly whenever
        /// the remaining budget agreed with the cap beforehand.
        #[test]
        fn prop_apply_revert_inverse(
            cap in amount_strategy(),
            total in amount_strategy(),
            amount in amount_strategy(),
        ) {
            let before = CashbackTotals {
                total_cashback: total,
                remaining_budget: cap - total,
                budget_cap: cap,
            };
            let mut totals = before;
            totals.apply(amount);
            totals.revert(amount);
            prop_assert_eq!(totals, before);
        }

        /// Percent rewards never exceed 2 decimal places.
        #[test]
        fn prop_percent_amount_scale(
            value in (0i64..10_000i64).prop_map(|n| Decimal::new(n, 1)),
            base in amount_strategy(),
        ) {
            let amount = cashback_amount(CashbackKind::Percent, value, base);
            prop_assert!(amount.scale() <= 2);
        }
    }
}
