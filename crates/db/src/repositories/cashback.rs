//! Cashback ledger engine.
//!
//! Applies and rolls back cashback movements while keeping the matching
//! (account, cycle) ledger row in sync. Every mutation runs inside one
//! database transaction covering the movement write and the ledger write;
//! the ledger row is read under `SELECT ... FOR UPDATE` so concurrent
//! movements against the same key serialize instead of losing updates.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use kakebo_core::ledger::{
    CashbackTotals, LedgerError, derive_eligibility, validate_amount, validate_cycle_tag,
    validate_rate,
};

use crate::entities::{
    cashback_ledgers, cashback_movements,
    sea_orm_active_enums::{
        CashbackEligibility, CashbackKind, CashbackLedgerStatus, CashbackMovementStatus,
    },
};

/// Error types for cashback ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum CashbackError {
    /// Movement not found, or already invalidated (double-rollback guard).
    #[error("Cashback movement not found: {0}")]
    MovementNotFound(Uuid),

    /// Movement failed validation before any write.
    #[error("Invalid cashback movement: {0}")]
    Validation(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for applying a cashback movement.
#[derive(Debug, Clone)]
pub struct CreateCashbackMovementInput {
    /// Movement ID; generated when absent.
    pub id: Option<Uuid>,
    /// Originating transaction.
    pub transaction_id: Uuid,
    /// Account earning the cashback.
    pub account_id: Uuid,
    /// Statement period (`YYYY-MM`).
    pub cycle_tag: String,
    /// How the reward was computed.
    pub cashback_kind: CashbackKind,
    /// Rate or fixed value the reward was computed from.
    pub cashback_value: Decimal,
    /// Computed monetary effect.
    pub cashback_amount: Decimal,
    /// Budget cap snapshot at the time of the movement.
    pub budget_cap: Decimal,
    /// Optional free-text note.
    pub note: Option<String>,
}

/// Cashback ledger engine.
#[derive(Debug, Clone)]
pub struct CashbackRepository {
    db: DatabaseConnection,
}

impl CashbackRepository {
    /// Creates a new cashback repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies a cashback movement and folds it into its ledger row.
    ///
    /// The movement insert and the ledger upsert commit atomically; if
    /// either fails the whole scope rolls back.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or a database operation fails.
    pub async fn apply_movement(
        &self,
        input: CreateCashbackMovementInput,
    ) -> Result<cashback_movements::Model, CashbackError> {
        let txn = self.db.begin().await?;
        let movement = apply_movement_in(&txn, input).await?;
        txn.commit().await?;
        Ok(movement)
    }

    /// Rolls back an applied movement.
    ///
    /// Marks the movement invalidated and unwinds its contribution from the
    /// ledger row. Fails with `MovementNotFound` if the movement does not
    /// exist or was already invalidated, so a retried rollback cannot
    /// double-correct the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement is missing/terminal or a database
    /// operation fails.
    pub async fn rollback_movement(
        &self,
        movement_id: Uuid,
    ) -> Result<cashback_movements::Model, CashbackError> {
        let txn = self.db.begin().await?;
        let movement = rollback_movement_in(&txn, movement_id).await?;
        txn.commit().await?;
        Ok(movement)
    }

    /// Returns the total cashback accumulated for (account, cycle).
    ///
    /// Absence of a ledger row is a zero balance, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_balance(
        &self,
        account_id: Uuid,
        cycle_tag: &str,
    ) -> Result<Decimal, CashbackError> {
        let ledger = cashback_ledgers::Entity::find()
            .filter(cashback_ledgers::Column::AccountId.eq(account_id))
            .filter(cashback_ledgers::Column::CycleTag.eq(cycle_tag))
            .one(&self.db)
            .await?;

        Ok(ledger.map_or(Decimal::ZERO, |row| row.total_cashback))
    }

    /// Returns the ledger row for (account, cycle), if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_ledger(
        &self,
        account_id: Uuid,
        cycle_tag: &str,
    ) -> Result<Option<cashback_ledgers::Model>, CashbackError> {
        let ledger = cashback_ledgers::Entity::find()
            .filter(cashback_ledgers::Column::AccountId.eq(account_id))
            .filter(cashback_ledgers::Column::CycleTag.eq(cycle_tag))
            .one(&self.db)
            .await?;

        Ok(ledger)
    }
}

/// Applies a movement inside an existing transaction scope.
///
/// Used directly by the repository and by the cross-ledger orchestrator,
/// which shares its scope with the transaction row write.
pub(crate) async fn apply_movement_in(
    txn: &DatabaseTransaction,
    input: CreateCashbackMovementInput,
) -> Result<cashback_movements::Model, CashbackError> {
    validate_amount(input.cashback_amount)?;
    validate_rate(input.cashback_value)?;
    validate_cycle_tag(&input.cycle_tag)?;

    let now = Utc::now().into();
    let movement_id = input.id.unwrap_or_else(Uuid::new_v4);

    let movement = cashback_movements::ActiveModel {
        id: Set(movement_id),
        transaction_id: Set(input.transaction_id),
        account_id: Set(input.account_id),
        cycle_tag: Set(input.cycle_tag.clone()),
        cashback_kind: Set(input.cashback_kind),
        cashback_value: Set(input.cashback_value),
        cashback_amount: Set(input.cashback_amount),
        status: Set(CashbackMovementStatus::Applied),
        budget_cap: Set(input.budget_cap),
        note: Set(input.note.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let inserted = movement.insert(txn).await?;

    // Lock the ledger row for the key so concurrent movements serialize.
    let ledger = cashback_ledgers::Entity::find()
        .filter(cashback_ledgers::Column::AccountId.eq(input.account_id))
        .filter(cashback_ledgers::Column::CycleTag.eq(&input.cycle_tag))
        .lock_exclusive()
        .one(txn)
        .await?;

    match ledger {
        Some(row) => {
            let mut totals = CashbackTotals {
                total_cashback: row.total_cashback,
                remaining_budget: row.remaining_budget,
                budget_cap: row.budget_cap,
            };
            totals.apply(input.cashback_amount);
            let eligibility = derive_eligibility(
                totals.budget_cap,
                totals.total_cashback,
                row.eligibility.clone().into(),
            );

            let mut active: cashback_ledgers::ActiveModel = row.into();
            active.total_cashback = Set(totals.total_cashback);
            active.remaining_budget = Set(totals.remaining_budget);
            active.eligibility = Set(eligibility.into());
            active.updated_at = Set(now);
            active.update(txn).await?;
        }
        None => {
            // First movement for the key: create the ledger row lazily with
            // the cap unknown.
            let totals = CashbackTotals::seed(input.cashback_amount);
            let row = cashback_ledgers::ActiveModel {
                id: Set(Uuid::new_v4()),
                account_id: Set(input.account_id),
                cycle_tag: Set(input.cycle_tag),
                total_spend: Set(Decimal::ZERO),
                total_cashback: Set(totals.total_cashback),
                budget_cap: Set(totals.budget_cap),
                eligibility: Set(CashbackEligibility::Pending),
                remaining_budget: Set(totals.remaining_budget),
                status: Set(CashbackLedgerStatus::Open),
                updated_at: Set(now),
            };
            row.insert(txn).await?;
        }
    }

    Ok(inserted)
}

/// Rolls back a movement inside an existing transaction scope.
pub(crate) async fn rollback_movement_in(
    txn: &DatabaseTransaction,
    movement_id: Uuid,
) -> Result<cashback_movements::Model, CashbackError> {
    let movement = cashback_movements::Entity::find_by_id(movement_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(CashbackError::MovementNotFound(movement_id))?;

    // Idempotent guard: an already-invalidated movement reads as not found.
    if movement.status != CashbackMovementStatus::Applied {
        return Err(CashbackError::MovementNotFound(movement_id));
    }

    let now = Utc::now().into();
    let account_id = movement.account_id;
    let cycle_tag = movement.cycle_tag.clone();
    let amount = movement.cashback_amount;

    let mut active: cashback_movements::ActiveModel = movement.into();
    active.status = Set(CashbackMovementStatus::Invalidated);
    active.updated_at = Set(now);
    let invalidated = active.update(txn).await?;

    let ledger = cashback_ledgers::Entity::find()
        .filter(cashback_ledgers::Column::AccountId.eq(account_id))
        .filter(cashback_ledgers::Column::CycleTag.eq(&cycle_tag))
        .lock_exclusive()
        .one(txn)
        .await?;

    match ledger {
        Some(row) => {
            let mut totals = CashbackTotals {
                total_cashback: row.total_cashback,
                remaining_budget: row.remaining_budget,
                budget_cap: row.budget_cap,
            };
            totals.revert(amount);

            let mut active: cashback_ledgers::ActiveModel = row.into();
            active.total_cashback = Set(totals.total_cashback);
            active.remaining_budget = Set(totals.remaining_budget);
            active.updated_at = Set(now);
            active.update(txn).await?;
        }
        None => {
            // Accepted soft spot: the movement still invalidates, but there
            // is no ledger row to correct and none is created.
            warn!(
                movement_id = %movement_id,
                account_id = %account_id,
                cycle_tag = %cycle_tag,
                "rollback found no cashback ledger row; skipping ledger correction"
            );
        }
    }

    Ok(invalidated)
}

/// Rolls back every applied movement referencing a transaction.
///
/// Invoked by the orchestrator when the transaction is deleted, so ledgers
/// never retain contributions from a vanished transaction.
pub(crate) async fn rollback_for_transaction_in(
    txn: &DatabaseTransaction,
    transaction_id: Uuid,
) -> Result<(), CashbackError> {
    let movements = cashback_movements::Entity::find()
        .filter(cashback_movements::Column::TransactionId.eq(transaction_id))
        .filter(cashback_movements::Column::Status.eq(CashbackMovementStatus::Applied))
        .all(txn)
        .await?;

    for movement in movements {
        rollback_movement_in(txn, movement.id).await?;
    }

    Ok(())
}
