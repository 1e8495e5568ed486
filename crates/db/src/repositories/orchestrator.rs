//! Cross-ledger orchestration.
//!
//! Routes transaction lifecycle events to the ledger engines. The
//! orchestrator performs no monetary bookkeeping of its own: it validates
//! the caller-supplied intent, then invokes every registered
//! [`LedgerEffect`] inside the transaction scope the lifecycle manager
//! opened, so the transaction row and its ledger side effects commit or
//! fail together.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::DatabaseTransaction;
use uuid::Uuid;

use kakebo_core::ledger::{self, LedgerError, cashback_amount, validate_rate};
use kakebo_shared::types::CycleTag;

use crate::entities::transactions;

use super::cashback::{self, CashbackError, CreateCashbackMovementInput};
use super::debt::{self, CreateDebtMovementInput, DebtError};

/// Error types for orchestration.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// Intent failed validation before any engine ran.
    #[error("Invalid posting intent: {0}")]
    Validation(#[from] LedgerError),

    /// Cashback engine failure.
    #[error(transparent)]
    Cashback(#[from] CashbackError),

    /// Debt engine failure.
    #[error(transparent)]
    Debt(#[from] DebtError),
}

/// Caller-supplied ledger intent accompanying a transaction write.
///
/// Kinds arrive as raw strings and are validated here rather than at the
/// HTTP boundary, so every caller of the lifecycle manager gets the same
/// guard.
#[derive(Debug, Clone, Default)]
pub struct PostingIntent {
    /// Debt counterparty; falls back to the transaction's person ref.
    pub person_id: Option<Uuid>,
    /// Debt ledger intent.
    pub debt_movement: Option<DebtIntent>,
    /// Cashback ledger intent.
    pub cashback: Option<CashbackIntent>,
}

/// Debt side of a posting intent.
#[derive(Debug, Clone)]
pub struct DebtIntent {
    /// One of borrow, repay, adjust, discount, split.
    pub movement_kind: String,
    /// Statement period, or None for the rolling ledger.
    pub cycle_tag: Option<String>,
}

/// Cashback side of a posting intent.
#[derive(Debug, Clone)]
pub struct CashbackIntent {
    /// One of percent, fixed.
    pub cashback_kind: String,
    /// Rate (percent) or fixed reward value.
    pub cashback_value: Decimal,
    /// Statement period; defaults to the transaction's occurred-on month.
    pub cycle_tag: Option<String>,
    /// Budget cap snapshot, when the caller knows it.
    pub budget_cap: Option<Decimal>,
}

impl PostingIntent {
    /// Returns true if the intent carries no ledger work.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.debt_movement.is_none() && self.cashback.is_none()
    }

    /// Validates the intent without touching any engine.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown movement or cashback
    /// kind, a malformed cycle tag, or a negative cashback value.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if let Some(debt) = &self.debt_movement {
            ledger::DebtMovementKind::from_str(&debt.movement_kind)
                .map_err(|_| LedgerError::InvalidMovementKind(debt.movement_kind.clone()))?;
            if let Some(tag) = &debt.cycle_tag {
                ledger::validate_cycle_tag(tag)?;
            }
        }

        if let Some(cb) = &self.cashback {
            ledger::CashbackKind::from_str(&cb.cashback_kind)
                .map_err(|_| LedgerError::InvalidCashbackKind(cb.cashback_kind.clone()))?;
            validate_rate(cb.cashback_value)?;
            if let Some(tag) = &cb.cycle_tag {
                ledger::validate_cycle_tag(tag)?;
            }
        }

        Ok(())
    }
}

/// A ledger that reacts to transaction lifecycle events.
///
/// Both engines implement this seam; the orchestrator iterates the
/// registered effects instead of naming each ledger.
#[async_trait::async_trait]
pub trait LedgerEffect: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Applies this ledger's share of the intent, if any.
    async fn apply(
        &self,
        txn: &DatabaseTransaction,
        transaction: &transactions::Model,
        intent: &PostingIntent,
    ) -> Result<(), OrchestratorError>;

    /// Unwinds every live movement this ledger holds for a transaction.
    async fn rollback_for_transaction(
        &self,
        txn: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> Result<(), OrchestratorError>;
}

/// Cashback ledger effect.
struct CashbackEffect;

#[async_trait::async_trait]
impl LedgerEffect for CashbackEffect {
    fn name(&self) -> &'static str {
        "cashback"
    }

    async fn apply(
        &self,
        txn: &DatabaseTransaction,
        transaction: &transactions::Model,
        intent: &PostingIntent,
    ) -> Result<(), OrchestratorError> {
        let Some(cb) = &intent.cashback else {
            return Ok(());
        };

        let kind = ledger::CashbackKind::from_str(&cb.cashback_kind)
            .map_err(|_| LedgerError::InvalidCashbackKind(cb.cashback_kind.clone()))?;
        let amount = cashback_amount(kind, cb.cashback_value, transaction.amount);
        let cycle_tag = cb
            .cycle_tag
            .clone()
            .unwrap_or_else(|| CycleTag::from_date(transaction.occurred_on).to_string());

        cashback::apply_movement_in(
            txn,
            CreateCashbackMovementInput {
                id: None,
                transaction_id: transaction.id,
                account_id: transaction.account_id,
                cycle_tag,
                cashback_kind: kind.into(),
                cashback_value: cb.cashback_value,
                cashback_amount: amount,
                budget_cap: cb.budget_cap.unwrap_or(Decimal::ZERO),
                note: None,
            },
        )
        .await?;

        Ok(())
    }

    async fn rollback_for_transaction(
        &self,
        txn: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> Result<(), OrchestratorError> {
        cashback::rollback_for_transaction_in(txn, transaction_id).await?;
        Ok(())
    }
}

/// Debt ledger effect.
struct DebtEffect;

#[async_trait::async_trait]
impl LedgerEffect for DebtEffect {
    fn name(&self) -> &'static str {
        "debt"
    }

    async fn apply(
        &self,
        txn: &DatabaseTransaction,
        transaction: &transactions::Model,
        intent: &PostingIntent,
    ) -> Result<(), OrchestratorError> {
        let Some(debt_intent) = &intent.debt_movement else {
            return Ok(());
        };
        let Some(person_id) = intent.person_id.or(transaction.person_id) else {
            return Ok(());
        };

        let kind = ledger::DebtMovementKind::from_str(&debt_intent.movement_kind)
            .map_err(|_| LedgerError::InvalidMovementKind(debt_intent.movement_kind.clone()))?;

        debt::apply_movement_in(
            txn,
            CreateDebtMovementInput {
                id: None,
                transaction_id: transaction.id,
                person_id,
                account_id: transaction.account_id,
                movement_kind: kind.into(),
                amount: transaction.amount,
                cycle_tag: debt_intent.cycle_tag.clone(),
                notes: None,
            },
        )
        .await?;

        Ok(())
    }

    async fn rollback_for_transaction(
        &self,
        txn: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> Result<(), OrchestratorError> {
        debt::rollback_for_transaction_in(txn, transaction_id).await?;
        Ok(())
    }
}

/// Routes validated posting intent to every registered ledger effect.
#[derive(Clone)]
pub struct LedgerOrchestrator {
    effects: Vec<Arc<dyn LedgerEffect>>,
}

impl LedgerOrchestrator {
    /// Creates an orchestrator with the cashback and debt effects.
    #[must_use]
    pub fn new() -> Self {
        Self {
            effects: vec![Arc::new(CashbackEffect), Arc::new(DebtEffect)],
        }
    }

    /// Applies the intent's ledger effects for a created or updated
    /// transaction, inside the caller's transaction scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the intent is invalid or any engine fails; the
    /// caller is expected to abandon its scope on error.
    pub async fn on_transaction_posted(
        &self,
        txn: &DatabaseTransaction,
        transaction: &transactions::Model,
        intent: &PostingIntent,
    ) -> Result<(), OrchestratorError> {
        intent.validate()?;

        for effect in &self.effects {
            effect.apply(txn, transaction, intent).await?;
        }

        Ok(())
    }

    /// Unwinds every movement referencing a deleted transaction, inside the
    /// caller's transaction scope, before the row itself goes away.
    ///
    /// # Errors
    ///
    /// Returns an error if any engine fails.
    pub async fn on_transaction_deleted(
        &self,
        txn: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> Result<(), OrchestratorError> {
        for effect in &self.effects {
            effect.rollback_for_transaction(txn, transaction_id).await?;
        }

        Ok(())
    }
}

impl Default for LedgerOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LedgerOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.effects.iter().map(|e| e.name()).collect();
        f.debug_struct("LedgerOrchestrator")
            .field("effects", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_intent_is_valid() {
        assert!(PostingIntent::default().validate().is_ok());
        assert!(PostingIntent::default().is_empty());
    }

    #[test]
    fn test_valid_debt_intent() {
        let intent = PostingIntent {
            person_id: Some(Uuid::new_v4()),
            debt_movement: Some(DebtIntent {
                movement_kind: "borrow".to_string(),
                cycle_tag: Some("2025-09".to_string()),
            }),
            cashback: None,
        };
        assert!(intent.validate().is_ok());
    }

    #[test]
    fn test_unknown_movement_kind_fails_validation() {
        let intent = PostingIntent {
            person_id: Some(Uuid::new_v4()),
            debt_movement: Some(DebtIntent {
                movement_kind: "loan".to_string(),
                cycle_tag: None,
            }),
            cashback: None,
        };
        assert!(matches!(
            intent.validate(),
            Err(LedgerError::InvalidMovementKind(_))
        ));
    }

    #[test]
    fn test_malformed_cycle_tag_fails_validation() {
        let intent = PostingIntent {
            person_id: None,
            debt_movement: Some(DebtIntent {
                movement_kind: "repay".to_string(),
                cycle_tag: Some("september".to_string()),
            }),
            cashback: None,
        };
        assert!(matches!(
            intent.validate(),
            Err(LedgerError::InvalidCycleTag(_))
        ));
    }

    #[test]
    fn test_cashback_intent_validation() {
        let mut intent = PostingIntent {
            person_id: None,
            debt_movement: None,
            cashback: Some(CashbackIntent {
                cashback_kind: "percent".to_string(),
                cashback_value: dec!(5.0),
                cycle_tag: None,
                budget_cap: None,
            }),
        };
        assert!(intent.validate().is_ok());

        intent.cashback.as_mut().unwrap().cashback_kind = "points".to_string();
        assert!(matches!(
            intent.validate(),
            Err(LedgerError::InvalidCashbackKind(_))
        ));
    }
}
