//! Ledger error types for validation failures.
//!
//! All variants here are raised before any write; a movement that fails
//! validation never reaches the movement store.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while validating ledger movements.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Movement amount cannot be negative.
    #[error("Movement amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Movement amount carries more precision than the currency allows.
    #[error("Movement amount has more than 2 decimal places: {0}")]
    ExcessivePrecision(Decimal),

    /// Cashback rate cannot be negative.
    #[error("Cashback rate cannot be negative: {0}")]
    NegativeRate(Decimal),

    /// Cycle tag does not match the expected YYYY-MM shape.
    #[error("Invalid cycle tag (expected YYYY-MM): {0}")]
    InvalidCycleTag(String),

    /// Unknown movement kind supplied by the caller.
    #[error("Invalid movement kind: {0}")]
    InvalidMovementKind(String),

    /// Unknown cashback kind supplied by the caller.
    #[error("Invalid cashback kind: {0}")]
    InvalidCashbackKind(String),

    /// A required reference was missing from the movement.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
