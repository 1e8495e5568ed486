//! Debt ledger engine.
//!
//! Applies and rolls back debt movements while keeping the matching
//! (person, cycle) ledger row in sync. The row's four component fields are
//! the running totals; the net position is always recomputed in full from
//! them, never from a rescan of the movement table. A NULL cycle tag is the
//! person's rolling ledger and matches only other NULL tags.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use kakebo_core::ledger::{
    DebtComponents, LedgerError, derive_debt_status, validate_amount, validate_cycle_tag,
};

use crate::entities::{
    debt_ledgers, debt_movements,
    sea_orm_active_enums::{DebtMovementKind, DebtMovementStatus},
};

/// Error types for debt ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum DebtError {
    /// Movement not found, or already in a terminal state (double-rollback
    /// guard).
    #[error("Debt movement not found: {0}")]
    MovementNotFound(Uuid),

    /// Movement failed validation before any write.
    #[error("Invalid debt movement: {0}")]
    Validation(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for applying a debt movement.
#[derive(Debug, Clone)]
pub struct CreateDebtMovementInput {
    /// Movement ID; generated when absent.
    pub id: Option<Uuid>,
    /// Originating transaction.
    pub transaction_id: Uuid,
    /// Person whose ledger the movement affects.
    pub person_id: Uuid,
    /// Account the money moved through.
    pub account_id: Uuid,
    /// Movement classification.
    pub movement_kind: DebtMovementKind,
    /// Positive magnitude; the sign of the effect comes from the kind.
    pub amount: Decimal,
    /// Statement period, or None for the rolling ledger.
    pub cycle_tag: Option<String>,
    /// Optional free-text notes.
    pub notes: Option<String>,
}

/// Debt ledger engine.
#[derive(Debug, Clone)]
pub struct DebtRepository {
    db: DatabaseConnection,
}

impl DebtRepository {
    /// Creates a new debt repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies a debt movement and folds it into its ledger row.
    ///
    /// The movement insert and the ledger upsert commit atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or a database operation fails.
    pub async fn apply_movement(
        &self,
        input: CreateDebtMovementInput,
    ) -> Result<debt_movements::Model, DebtError> {
        let txn = self.db.begin().await?;
        let movement = apply_movement_in(&txn, input).await?;
        txn.commit().await?;
        Ok(movement)
    }

    /// Rolls back an active movement.
    ///
    /// Marks the movement reversed and subtracts its amount from the
    /// component field its kind maps to. Fails with `MovementNotFound` if
    /// the movement does not exist or is already terminal, so a retried
    /// rollback cannot double-correct the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement is missing/terminal or a database
    /// operation fails.
    pub async fn rollback_movement(
        &self,
        movement_id: Uuid,
    ) -> Result<debt_movements::Model, DebtError> {
        let txn = self.db.begin().await?;
        let movement = rollback_movement_in(&txn, movement_id).await?;
        txn.commit().await?;
        Ok(movement)
    }

    /// Returns the net debt for (person, cycle).
    ///
    /// Absence of a ledger row is a zero balance, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_balance(
        &self,
        person_id: Uuid,
        cycle_tag: Option<&str>,
    ) -> Result<Decimal, DebtError> {
        let ledger = find_ledger(&self.db, person_id, cycle_tag).await?;
        Ok(ledger.map_or(Decimal::ZERO, |row| row.net_debt))
    }

    /// Returns the ledger row for (person, cycle), if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_ledger(
        &self,
        person_id: Uuid,
        cycle_tag: Option<&str>,
    ) -> Result<Option<debt_ledgers::Model>, DebtError> {
        find_ledger(&self.db, person_id, cycle_tag).await
    }
}

async fn find_ledger<C: sea_orm::ConnectionTrait>(
    conn: &C,
    person_id: Uuid,
    cycle_tag: Option<&str>,
) -> Result<Option<debt_ledgers::Model>, DebtError> {
    let mut query =
        debt_ledgers::Entity::find().filter(debt_ledgers::Column::PersonId.eq(person_id));

    // NULL matches only NULL, never a wildcard.
    query = match cycle_tag {
        Some(tag) => query.filter(debt_ledgers::Column::CycleTag.eq(tag)),
        None => query.filter(debt_ledgers::Column::CycleTag.is_null()),
    };

    Ok(query.one(conn).await?)
}

/// Applies a movement inside an existing transaction scope.
///
/// Used directly by the repository and by the cross-ledger orchestrator,
/// which shares its scope with the transaction row write.
pub(crate) async fn apply_movement_in(
    txn: &DatabaseTransaction,
    input: CreateDebtMovementInput,
) -> Result<debt_movements::Model, DebtError> {
    validate_amount(input.amount)?;
    if let Some(tag) = &input.cycle_tag {
        validate_cycle_tag(tag)?;
    }

    let now = Utc::now().into();
    let movement_id = input.id.unwrap_or_else(Uuid::new_v4);

    let movement = debt_movements::ActiveModel {
        id: Set(movement_id),
        transaction_id: Set(input.transaction_id),
        person_id: Set(input.person_id),
        account_id: Set(input.account_id),
        movement_kind: Set(input.movement_kind.clone()),
        amount: Set(input.amount),
        cycle_tag: Set(input.cycle_tag.clone()),
        status: Set(DebtMovementStatus::Active),
        notes: Set(input.notes.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let inserted = movement.insert(txn).await?;

    let ledger = find_ledger_locked(txn, input.person_id, input.cycle_tag.as_deref()).await?;
    let kind: kakebo_core::ledger::DebtMovementKind = input.movement_kind.into();

    match ledger {
        Some(row) => {
            let mut components = DebtComponents {
                initial_debt: row.initial_debt,
                new_debt: row.new_debt,
                repayments: row.repayments,
                debt_discount: row.debt_discount,
            };
            components.apply(kind, input.amount);
            let net_debt = components.net_debt();

            let mut active: debt_ledgers::ActiveModel = row.into();
            active.new_debt = Set(components.new_debt);
            active.repayments = Set(components.repayments);
            active.debt_discount = Set(components.debt_discount);
            active.net_debt = Set(net_debt);
            active.status = Set(derive_debt_status(net_debt).into());
            active.updated_at = Set(now);
            active.update(txn).await?;
        }
        None => {
            // First movement for the key: seed a fresh row with zero
            // initial debt and this movement's contribution.
            let mut components = DebtComponents::default();
            components.apply(kind, input.amount);
            let net_debt = components.net_debt();

            let row = debt_ledgers::ActiveModel {
                id: Set(Uuid::new_v4()),
                person_id: Set(input.person_id),
                cycle_tag: Set(input.cycle_tag),
                initial_debt: Set(Decimal::ZERO),
                new_debt: Set(components.new_debt),
                repayments: Set(components.repayments),
                debt_discount: Set(components.debt_discount),
                net_debt: Set(net_debt),
                status: Set(derive_debt_status(net_debt).into()),
                notes: Set(None),
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
) -> Result<debt_movements::Model, DebtError> {
    let movement = debt_movements::Entity::find_by_id(movement_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(DebtError::MovementNotFound(movement_id))?;

    // Idempotent guard: reversed and settled are terminal, both read as
    // not found.
    if movement.status != DebtMovementStatus::Active {
        return Err(DebtError::MovementNotFound(movement_id));
    }

    let now = Utc::now().into();
    let person_id = movement.person_id;
    let cycle_tag = movement.cycle_tag.clone();
    let kind: kakebo_core::ledger::DebtMovementKind = movement.movement_kind.clone().into();
    let amount = movement.amount;

    let mut active: debt_movements::ActiveModel = movement.into();
    active.status = Set(DebtMovementStatus::Reversed);
    active.updated_at = Set(now);
    let reversed = active.update(txn).await?;

    let ledger = find_ledger_locked(txn, person_id, cycle_tag.as_deref()).await?;

    match ledger {
        Some(row) => {
            let mut components = DebtComponents {
                initial_debt: row.initial_debt,
                new_debt: row.new_debt,
                repayments: row.repayments,
                debt_discount: row.debt_discount,
            };
            components.revert(kind, amount);
            let net_debt = components.net_debt();

            let mut active: debt_ledgers::ActiveModel = row.into();
            active.new_debt = Set(components.new_debt);
            active.repayments = Set(components.repayments);
            active.debt_discount = Set(components.debt_discount);
            active.net_debt = Set(net_debt);
            active.status = Set(derive_debt_status(net_debt).into());
            active.updated_at = Set(now);
            active.update(txn).await?;
        }
        None => {
            // Accepted soft spot: the movement still reverses, but there is
            // no ledger row to correct and none is created.
            warn!(
                movement_id = %movement_id,
                person_id = %person_id,
                cycle_tag = ?cycle_tag,
                "rollback found no debt ledger row; skipping ledger correction"
            );
        }
    }

    Ok(reversed)
}

/// Rolls back every active movement referencing a transaction.
pub(crate) async fn rollback_for_transaction_in(
    txn: &DatabaseTransaction,
    transaction_id: Uuid,
) -> Result<(), DebtError> {
    let movements = debt_movements::Entity::find()
        .filter(debt_movements::Column::TransactionId.eq(transaction_id))
        .filter(debt_movements::Column::Status.eq(DebtMovementStatus::Active))
        .all(txn)
        .await?;

    for movement in movements {
        rollback_movement_in(txn, movement.id).await?;
    }

    Ok(())
}

async fn find_ledger_locked(
    txn: &DatabaseTransaction,
    person_id: Uuid,
    cycle_tag: Option<&str>,
) -> Result<Option<debt_ledgers::Model>, DebtError> {
    let mut query = debt_ledgers::Entity::find()
        .filter(debt_ledgers::Column::PersonId.eq(person_id))
        .lock_exclusive();

    query = match cycle_tag {
        Some(tag) => query.filter(debt_ledgers::Column::CycleTag.eq(tag)),
        None => query.filter(debt_ledgers::Column::CycleTag.is_null()),
    };

    Ok(query.one(txn).await?)
}
