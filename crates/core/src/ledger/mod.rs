//! Cashback and debt ledger logic.
//!
//! This module implements the movement/ledger math shared by both derived
//! ledgers:
//! - Cashback amount computation, running totals, and eligibility
//! - Debt component folding and net-debt recomputation
//! - Movement validation rules
//! - Domain enums for movements, ledgers, and transactions
//! - Error types for ledger operations

pub mod cashback;
pub mod debt;
pub mod error;
pub mod types;
pub mod validation;

pub use cashback::{CashbackTotals, cashback_amount, derive_eligibility};
pub use debt::{DebtComponents, derive_debt_status};
pub use error::LedgerError;
pub use types::{
    CashbackEligibility, CashbackKind, CashbackLedgerStatus, CashbackMovementStatus,
    DebtLedgerStatus, DebtMovementKind, DebtMovementStatus, TransactionKind, TransactionStatus,
};
pub use validation::{validate_amount, validate_cycle_tag, validate_rate};
