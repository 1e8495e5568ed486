//! Debt ledger component math.
//!
//! A debt ledger row stores four running component fields; the net position
//! is always recomputed in full from those components, never from a rescan
//! of the movement table.

use rust_decimal::Decimal;

use super::types::{DebtLedgerStatus, DebtMovementKind};

/// The component fields of a debt ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebtComponents {
    /// Balance carried into the ledger when it was opened.
    pub initial_debt: Decimal,
    /// Debt accumulated by movements (borrow, adjust, split).
    pub new_debt: Decimal,
    /// Total repaid.
    pub repayments: Decimal,
    /// Total forgiven.
    pub debt_discount: Decimal,
}

impl DebtComponents {
    /// Recomputes the outstanding balance from the component fields.
    #[must_use]
    pub fn net_debt(&self) -> Decimal {
        self.initial_debt + self.new_debt - self.repayments - self.debt_discount
    }

    /// Folds a movement into the component matching its kind.
    ///
    /// `adjust` and `split` both raise the owed principal: an adjustment is
    /// a manual correction, a split is the person's share of a shared
    /// expense.
    pub fn apply(&mut self, kind: DebtMovementKind, amount: Decimal) {
        match kind {
            DebtMovementKind::Borrow | DebtMovementKind::Adjust | DebtMovementKind::Split => {
                self.new_debt += amount;
            }
            DebtMovementKind::Repay => self.repayments += amount,
            DebtMovementKind::Discount => self.debt_discount += amount,
        }
    }

    /// Unwinds a rolled-back movement from the component matching its kind.
    pub fn revert(&mut self, kind: DebtMovementKind, amount: Decimal) {
        match kind {
            DebtMovementKind::Borrow | DebtMovementKind::Adjust | DebtMovementKind::Split => {
                self.new_debt -= amount;
            }
            DebtMovementKind::Repay => self.repayments -= amount,
            DebtMovementKind::Discount => self.debt_discount -= amount,
        }
    }
}

/// Derives the ledger status from the outstanding balance.
#[must_use]
pub fn derive_debt_status(net_debt: Decimal) -> DebtLedgerStatus {
    if net_debt > Decimal::ZERO {
        DebtLedgerStatus::Open
    } else {
        DebtLedgerStatus::Repaid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_borrow_on_fresh_ledger() {
        let mut components = DebtComponents::default();
        components.apply(DebtMovementKind::Borrow, dec!(1200.00));

        assert_eq!(components.new_debt, dec!(1200.00));
        assert_eq!(components.repayments, dec!(0.00));
        assert_eq!(components.net_debt(), dec!(1200.00));
        assert_eq!(
            derive_debt_status(components.net_debt()),
            DebtLedgerStatus::Open
        );
    }

    #[test]
    fn test_repay_reduces_net() {
        let mut components = DebtComponents::default();
        components.apply(DebtMovementKind::Borrow, dec!(1200.00));
        components.apply(DebtMovementKind::Repay, dec!(200.00));

        assert_eq!(components.new_debt, dec!(1200.00));
        assert_eq!(components.repayments, dec!(200.00));
        assert_eq!(components.net_debt(), dec!(1000.00));
        assert_eq!(
            derive_debt_status(components.net_debt()),
            DebtLedgerStatus::Open
        );
    }

    #[test]
    fn test_full_repayment_marks_repaid() {
        let mut components = DebtComponents::default();
        components.apply(DebtMovementKind::Borrow, dec!(500.00));
        components.apply(DebtMovementKind::Repay, dec!(400.00));
        components.apply(DebtMovementKind::Discount, dec!(100.00));

        assert_eq!(components.net_debt(), dec!(0.00));
        assert_eq!(
            derive_debt_status(components.net_debt()),
            DebtLedgerStatus::Repaid
        );
    }

    #[test]
    fn test_adjust_and_split_raise_principal() {
        let mut components = DebtComponents::default();
        components.apply(DebtMovementKind::Adjust, dec!(50.00));
        components.apply(DebtMovementKind::Split, dec!(25.00));

        assert_eq!(components.new_debt, dec!(75.00));
        assert_eq!(components.net_debt(), dec!(75.00));
    }

    #[test]
    fn test_initial_debt_counts_toward_net() {
        let components = DebtComponents {
            initial_debt: dec!(300.00),
            new_debt: dec!(100.00),
            repayments: dec!(150.00),
            debt_discount: dec!(50.00),
        };
        assert_eq!(components.net_debt(), dec!(200.00));
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn kind_strategy() -> impl Strategy<Value = DebtMovementKind> {
        prop_oneof![
            Just(DebtMovementKind::Borrow),
            Just(DebtMovementKind::Repay),
            Just(DebtMovementKind::Adjust),
            Just(DebtMovementKind::Discount),
            Just(DebtMovementKind::Split),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Net debt always equals the component formula, whatever sequence
        /// of movements produced the row.
        #[test]
        fn prop_net_debt_formula(
            initial in amount_strategy(),
            moves in proptest::collection::vec((kind_strategy(), amount_strategy()), 0..20),
        ) {
            let mut components = DebtComponents {
                initial_debt: initial,
                ..DebtComponents::default()
            };
            for (kind, amount) in &moves {
                components.apply(*kind, *amount);
            }
            prop_assert_eq!(
                components.net_debt(),
                components.initial_debt + components.new_debt
                    - components.repayments
                    - components.debt_discount
            );
        }

        /// Apply followed by revert of the same movement restores every
        /// component exactly.
        #[test]
        fn prop_apply_revert_inverse(
            kind in kind_strategy(),
            amount in amount_strategy(),
            initial in amount_strategy(),
        ) {
            let before = DebtComponents {
                initial_debt: initial,
                new_debt: dec!(100.00),
                repayments: dec!(40.00),
                debt_discount: dec!(10.00),
            };
            let mut components = before;
            components.apply(kind, amount);
            components.revert(kind, amount);
            prop_assert_eq!(components, before);
        }

        /// Status derivation is total: positive nets are open, everything
        /// else is repaid.
        #[test]
        fn prop_status_derivation(net in -10_000_000i64..10_000_000i64) {
            let net = Decimal::new(net, 2);
            let status = derive_debt_status(net);
            if net > Decimal::ZERO {
                prop_assert_eq!(status, DebtLedgerStatus::Open);
            } else {
                prop_assert_eq!(status, DebtLedgerStatus::Repaid);
            }
        }
    }
}
