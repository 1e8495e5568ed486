//! Domain enums for transactions, movements, and ledgers.
//!
//! String representations match the Postgres enum labels so values
//! round-trip through the database and the API unchanged.

use serde::{Deserialize, Serialize};

/// Transaction classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money spent.
    Expense,
    /// Money received.
    Income,
    /// A loan to another person.
    Debt,
    /// A repayment from another person.
    Repayment,
    /// A cashback reward credit.
    Cashback,
    /// A recurring subscription charge.
    Subscription,
    /// A row brought in by a bulk import.
    Import,
    /// A manual correction.
    Adjustment,
}

/// Transaction lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Transaction counts toward balances.
    Active,
    /// Transaction is awaiting settlement.
    Pending,
    /// Transaction was voided after posting.
    Void,
    /// Transaction was canceled before settling.
    Canceled,
}

/// How a cashback reward is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashbackKind {
    /// Percentage of the transaction amount.
    Percent,
    /// Fixed reward amount.
    Fixed,
}

/// Cashback movement status.
///
/// A movement is append-only: the only transition is applied → invalidated,
/// and an invalidated movement is never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashbackMovementStatus {
    /// Movement contributes to its ledger row.
    Applied,
    /// Movement was rolled back and no longer contributes.
    Invalidated,
}

impl CashbackMovementStatus {
    /// Returns true if the movement can still be rolled back.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Cashback eligibility for an (account, cycle) ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashbackEligibility {
    /// Spend qualifies for cashback this cycle.
    Eligible,
    /// Spend does not qualify.
    NotEligible,
    /// The cycle's budget cap has been exhausted.
    ReachedCap,
    /// Not yet evaluated.
    Pending,
}

/// Cashback ledger row status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashbackLedgerStatus {
    /// Cycle is still accumulating movements.
    Open,
    /// Cycle has been closed out.
    Closed,
}

/// Debt movement classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtMovementKind {
    /// Person borrowed money.
    Borrow,
    /// Person paid money back.
    Repay,
    /// Manual correction to the owed principal.
    Adjust,
    /// Forgiven debt.
    Discount,
    /// A person's share of a shared expense.
    Split,
}

impl DebtMovementKind {
    /// All accepted movement kinds, in display order.
    pub const ALL: [Self; 5] = [
        Self::Borrow,
        Self::Repay,
        Self::Adjust,
        Self::Discount,
        Self::Split,
    ];
}

/// Debt movement status.
///
/// `active → reversed` happens via rollback; `active → settled` is an
/// external administrative transition. Both end states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtMovementStatus {
    /// Movement contributes to its ledger row.
    Active,
    /// Movement was settled out-of-band.
    Settled,
    /// Movement was rolled back.
    Reversed,
}

impl DebtMovementStatus {
    /// Returns true if the movement is in a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::Reversed)
    }
}

/// Debt ledger row status.
///
/// The engines only ever derive `Open` and `Repaid`; `Partial` and
/// `Overdue` are set administratively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtLedgerStatus {
    /// Outstanding balance remains.
    Open,
    /// Partially repaid (administrative).
    Partial,
    /// Fully repaid.
    Repaid,
    /// Past due (administrative).
    Overdue,
}

macro_rules! enum_strings {
    ($ty:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            /// Returns the database label for this value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("Unknown ", stringify!($ty), ": {}"), s)),
                }
            }
        }
    };
}

enum_strings!(TransactionKind {
    Expense => "expense",
    Income => "income",
    Debt => "debt",
    Repayment => "repayment",
    Cashback => "cashback",
    Subscription => "subscription",
    Import => "import",
    Adjustment => "adjustment",
});

enum_strings!(TransactionStatus {
    Active => "active",
    Pending => "pending",
    Void => "void",
    Canceled => "canceled",
});

enum_strings!(CashbackKind {
    Percent => "percent",
    Fixed => "fixed",
});

enum_strings!(CashbackMovementStatus {
    Applied => "applied",
    Invalidated => "invalidated",
});

enum_strings!(CashbackEligibility {
    Eligible => "eligible",
    NotEligible => "not_eligible",
    ReachedCap => "reached_cap",
    Pending => "pending",
});

enum_strings!(CashbackLedgerStatus {
    Open => "open",
    Closed => "closed",
});

enum_strings!(DebtMovementKind {
    Borrow => "borrow",
    Repay => "repay",
    Adjust => "adjust",
    Discount => "discount",
    Split => "split",
});

enum_strings!(DebtMovementStatus {
    Active => "active",
    Settled => "settled",
    Reversed => "reversed",
});

enum_strings!(DebtLedgerStatus {
    Open => "open",
    Partial => "partial",
    Repaid => "repaid",
    Overdue => "overdue",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_movement_kind_round_trip() {
        for kind in DebtMovementKind::ALL {
            assert_eq!(DebtMovementKind::from_str(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_movement_kind_rejected() {
        assert!(DebtMovementKind::from_str("loan").is_err());
        assert!(DebtMovementKind::from_str("").is_err());
        assert!(DebtMovementKind::from_str("Borrow").is_err());
    }

    #[test]
    fn test_cashback_kind_round_trip() {
        assert_eq!(
            CashbackKind::from_str("percent").unwrap(),
            CashbackKind::Percent
        );
        assert_eq!(CashbackKind::from_str("fixed").unwrap(), CashbackKind::Fixed);
        assert!(CashbackKind::from_str("points").is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!DebtMovementStatus::Active.is_terminal());
        assert!(DebtMovementStatus::Settled.is_terminal());
        assert!(DebtMovementStatus::Reversed.is_terminal());

        assert!(CashbackMovementStatus::Applied.is_applied());
        assert!(!CashbackMovementStatus::Invalidated.is_applied());
    }

    #[test]
    fn test_eligibility_labels() {
        assert_eq!(CashbackEligibility::NotEligible.as_str(), "not_eligible");
        assert_eq!(CashbackEligibility::ReachedCap.as_str(), "reached_cap");
    }

    #[test]
    fn test_transaction_kind_labels() {
        assert_eq!(TransactionKind::Expense.as_str(), "expense");
        assert_eq!(
            TransactionKind::from_str("repayment").unwrap(),
            TransactionKind::Repayment
        );
        assert!(TransactionKind::from_str("transfer").is_err());
    }
}
