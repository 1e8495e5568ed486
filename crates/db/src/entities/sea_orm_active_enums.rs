//! Database enum mappings.
//!
//! Labels mirror the Postgres enum types created by the initial migration
//! and the domain enums in `kakebo_core::ledger::types`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_kind")]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Physical cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank account.
    #[sea_orm(string_value = "bank")]
    Bank,
    /// Credit card.
    #[sea_orm(string_value = "credit_card")]
    CreditCard,
    /// Electronic wallet.
    #[sea_orm(string_value = "ewallet")]
    Ewallet,
}

/// Category direction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "category_direction")]
#[serde(rename_all = "snake_case")]
pub enum CategoryDirection {
    /// Spending category.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Income category.
    #[sea_orm(string_value = "income")]
    Income,
}

/// Transaction classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money spent.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Money received.
    #[sea_orm(string_value = "income")]
    Income,
    /// A loan to another person.
    #[sea_orm(string_value = "debt")]
    Debt,
    /// A repayment from another person.
    #[sea_orm(string_value = "repayment")]
    Repayment,
    /// A cashback reward credit.
    #[sea_orm(string_value = "cashback")]
    Cashback,
    /// A recurring subscription charge.
    #[sea_orm(string_value = "subscription")]
    Subscription,
    /// A row brought in by a bulk import.
    #[sea_orm(string_value = "import")]
    Import,
    /// A manual correction.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

/// Transaction lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Counts toward balances.
    #[sea_orm(string_value = "active")]
    Active,
    /// Awaiting settlement.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Voided after posting.
    #[sea_orm(string_value = "void")]
    Void,
    /// Canceled before settling.
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

/// How a cashback reward is computed.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cashback_kind")]
#[serde(rename_all = "snake_case")]
pub enum CashbackKind {
    /// Percentage of the transaction amount.
    #[sea_orm(string_value = "percent")]
    Percent,
    /// Fixed reward amount.
    #[sea_orm(string_value = "fixed")]
    Fixed,
}

/// Cashback movement status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "cashback_movement_status"
)]
#[serde(rename_all = "snake_case")]
pub enum CashbackMovementStatus {
    /// Contributes to its ledger row.
    #[sea_orm(string_value = "applied")]
    Applied,
    /// Rolled back; kept for audit history.
    #[sea_orm(string_value = "invalidated")]
    Invalidated,
}

/// Cashback eligibility.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cashback_eligibility")]
#[serde(rename_all = "snake_case")]
pub enum CashbackEligibility {
    /// Spend qualifies for cashback.
    #[sea_orm(string_value = "eligible")]
    Eligible,
    /// Spend does not qualify.
    #[sea_orm(string_value = "not_eligible")]
    NotEligible,
    /// Budget cap exhausted.
    #[sea_orm(string_value = "reached_cap")]
    ReachedCap,
    /// Not yet evaluated.
    #[sea_orm(string_value = "pending")]
    Pending,
}

/// Cashback ledger row status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "cashback_ledger_status"
)]
#[serde(rename_all = "snake_case")]
pub enum CashbackLedgerStatus {
    /// Still accumulating movements.
    #[sea_orm(string_value = "open")]
    Open,
    /// Closed out.
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Debt movement classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "debt_movement_kind")]
#[serde(rename_all = "snake_case")]
pub enum DebtMovementKind {
    /// Person borrowed money.
    #[sea_orm(string_value = "borrow")]
    Borrow,
    /// Person paid money back.
    #[sea_orm(string_value = "repay")]
    Repay,
    /// Manual correction to the owed principal.
    #[sea_orm(string_value = "adjust")]
    Adjust,
    /// Forgiven debt.
    #[sea_orm(string_value = "discount")]
    Discount,
    /// A person's share of a shared expense.
    #[sea_orm(string_value = "split")]
    Split,
}

/// Debt movement status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "debt_movement_status")]
#[serde(rename_all = "snake_case")]
pub enum DebtMovementStatus {
    /// Contributes to its ledger row.
    #[sea_orm(string_value = "active")]
    Active,
    /// Settled out-of-band (terminal).
    #[sea_orm(string_value = "settled")]
    Settled,
    /// Rolled back (terminal).
    #[sea_orm(string_value = "reversed")]
    Reversed,
}

/// Debt ledger row status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "debt_ledger_status")]
#[serde(rename_all = "snake_case")]
pub enum DebtLedgerStatus {
    /// Outstanding balance remains.
    #[sea_orm(string_value = "open")]
    Open,
    /// Partially repaid (administrative).
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Fully repaid.
    #[sea_orm(string_value = "repaid")]
    Repaid,
    /// Past due (administrative).
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

// Conversions between database enums and the pure domain enums in
// kakebo-core, so repositories can hand values to the ledger math.

impl From<TransactionKind> for kakebo_core::ledger::TransactionKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Expense => Self::Expense,
            TransactionKind::Income => Self::Income,
            TransactionKind::Debt => Self::Debt,
            TransactionKind::Repayment => Self::Repayment,
            TransactionKind::Cashback => Self::Cashback,
            TransactionKind::Subscription => Self::Subscription,
            TransactionKind::Import => Self::Import,
            TransactionKind::Adjustment => Self::Adjustment,
        }
    }
}

impl From<kakebo_core::ledger::TransactionKind> for TransactionKind {
    fn from(kind: kakebo_core::ledger::TransactionKind) -> Self {
        match kind {
            kakebo_core::ledger::TransactionKind::Expense => Self::Expense,
            kakebo_core::ledger::TransactionKind::Income => Self::Income,
            kakebo_core::ledger::TransactionKind::Debt => Self::Debt,
            kakebo_core::ledger::TransactionKind::Repayment => Self::Repayment,
            kakebo_core::ledger::TransactionKind::Cashback => Self::Cashback,
            kakebo_core::ledger::TransactionKind::Subscription => Self::Subscription,
            kakebo_core::ledger::TransactionKind::Import => Self::Import,
            kakebo_core::ledger::TransactionKind::Adjustment => Self::Adjustment,
        }
    }
}

impl From<TransactionStatus> for kakebo_core::ledger::TransactionStatus {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Active => Self::Active,
            TransactionStatus::Pending => Self::Pending,
            TransactionStatus::Void => Self::Void,
            TransactionStatus::Canceled => Self::Canceled,
        }
    }
}

impl From<kakebo_core::ledger::TransactionStatus> for TransactionStatus {
    fn from(status: kakebo_core::ledger::TransactionStatus) -> Self {
        match status {
            kakebo_core::ledger::TransactionStatus::Active => Self::Active,
            kakebo_core::ledger::TransactionStatus::Pending => Self::Pending,
            kakebo_core::ledger::TransactionStatus::Void => Self::Void,
            kakebo_core::ledger::TransactionStatus::Canceled => Self::Canceled,
        }
    }
}

impl From<DebtMovementKind> for kakebo_core::ledger::DebtMovementKind {
    fn from(kind: DebtMovementKind) -> Self {
        match kind {
            DebtMovementKind::Borrow => Self::Borrow,
            DebtMovementKind::Repay => Self::Repay,
            DebtMovementKind::Adjust => Self::Adjust,
            DebtMovementKind::Discount => Self::Discount,
            DebtMovementKind::Split => Self::Split,
        }
    }
}

impl From<kakebo_core::ledger::DebtMovementKind> for DebtMovementKind {
    fn from(kind: kakebo_core::ledger::DebtMovementKind) -> Self {
        match kind {
            kakebo_core::ledger::DebtMovementKind::Borrow => Self::Borrow,
            kakebo_core::ledger::DebtMovementKind::Repay => Self::Repay,
            kakebo_core::ledger::DebtMovementKind::Adjust => Self::Adjust,
            kakebo_core::ledger::DebtMovementKind::Discount => Self::Discount,
            kakebo_core::ledger::DebtMovementKind::Split => Self::Split,
        }
    }
}

impl From<CashbackKind> for kakebo_core::ledger::CashbackKind {
    fn from(kind: CashbackKind) -> Self {
        match kind {
            CashbackKind::Percent => Self::Percent,
            CashbackKind::Fixed => Self::Fixed,
        }
    }
}

impl From<kakebo_core::ledger::CashbackKind> for CashbackKind {
    fn from(kind: kakebo_core::ledger::CashbackKind) -> Self {
        match kind {
            kakebo_core::ledger::CashbackKind::Percent => Self::Percent,
            kakebo_core::ledger::CashbackKind::Fixed => Self::Fixed,
        }
    }
}

impl From<CashbackEligibility> for kakebo_core::ledger::CashbackEligibility {
    fn from(value: CashbackEligibility) -> Self {
        match value {
            CashbackEligibility::Eligible => Self::Eligible,
            CashbackEligibility::NotEligible => Self::NotEligible,
            CashbackEligibility::ReachedCap => Self::ReachedCap,
            CashbackEligibility::Pending => Self::Pending,
        }
    }
}

impl From<kakebo_core::ledger::CashbackEligibility> for CashbackEligibility {
    fn from(value: kakebo_core::ledger::CashbackEligibility) -> Self {
        match value {
            kakebo_core::ledger::CashbackEligibility::Eligible => Self::Eligible,
            kakebo_core::ledger::CashbackEligibility::NotEligible => Self::NotEligible,
            kakebo_core::ledger::CashbackEligibility::ReachedCap => Self::ReachedCap,
            kakebo_core::ledger::CashbackEligibility::Pending => Self::Pending,
        }
    }
}

impl From<kakebo_core::ledger::DebtLedgerStatus> for DebtLedgerStatus {
    fn from(status: kakebo_core::ledger::DebtLedgerStatus) -> Self {
        match status {
            kakebo_core::ledger::DebtLedgerStatus::Open => Self::Open,
            kakebo_core::ledger::DebtLedgerStatus::Partial => Self::Partial,
            kakebo_core::ledger::DebtLedgerStatus::Repaid => Self::Repaid,
            kakebo_core::ledger::DebtLedgerStatus::Overdue => Self::Overdue,
        }
    }
}
