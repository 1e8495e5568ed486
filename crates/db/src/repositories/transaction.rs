//! Transaction lifecycle manager.
//!
//! Owns transaction row CRUD and delegates ledger side effects to the
//! cross-ledger orchestrator. Each operation runs the row write and every
//! ledger effect inside one database transaction, so a transaction and its
//! movements commit or fail together.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use kakebo_core::ledger::{LedgerError, validate_amount};

use crate::entities::{
    sea_orm_active_enums::{TransactionKind, TransactionStatus},
    transactions,
};

use super::orchestrator::{LedgerOrchestrator, OrchestratorError, PostingIntent};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Input failed validation before any write.
    #[error("Invalid transaction: {0}")]
    Validation(#[from] LedgerError),

    /// A ledger engine rejected the posting.
    #[error(transparent)]
    Ledger(#[from] OrchestratorError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Transaction ID; generated when absent.
    pub id: Option<Uuid>,
    /// Account the money moved through.
    pub account_id: Uuid,
    /// Optional debt counterparty.
    pub person_id: Option<Uuid>,
    /// Optional category.
    pub category_id: Option<Uuid>,
    /// Optional shop.
    pub shop_id: Option<Uuid>,
    /// Optional subscription the charge belongs to.
    pub subscription_id: Option<Uuid>,
    /// Optional group linking related transactions.
    pub linked_group_id: Option<Uuid>,
    /// Transaction classification.
    pub kind: TransactionKind,
    /// Lifecycle status.
    pub status: TransactionStatus,
    /// Amount (positive magnitude, 2 decimal places).
    pub amount: Decimal,
    /// Optional fee.
    pub fee: Option<Decimal>,
    /// Date the transaction occurred.
    pub occurred_on: NaiveDate,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Ledger intent routed to the orchestrator.
    pub intent: PostingIntent,
}

/// Input for updating a transaction.
///
/// Every field is optional; absent fields keep their current value.
/// Resubmitting movement intent re-applies ledger effects, so callers must
/// only carry intent when the update is meant to post new movements.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// New account.
    pub account_id: Option<Uuid>,
    /// New person (None keeps, Some(None) clears).
    pub person_id: Option<Option<Uuid>>,
    /// New category.
    pub category_id: Option<Option<Uuid>>,
    /// New shop.
    pub shop_id: Option<Option<Uuid>>,
    /// New subscription.
    pub subscription_id: Option<Option<Uuid>>,
    /// New classification.
    pub kind: Option<TransactionKind>,
    /// New status.
    pub status: Option<TransactionStatus>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New fee.
    pub fee: Option<Option<Decimal>>,
    /// New occurrence date.
    pub occurred_on: Option<NaiveDate>,
    /// New notes.
    pub notes: Option<Option<String>>,
    /// Ledger intent routed to the orchestrator.
    pub intent: PostingIntent,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by account.
    pub account_id: Option<Uuid>,
    /// Filter by person.
    pub person_id: Option<Uuid>,
    /// Filter by kind.
    pub kind: Option<TransactionKind>,
    /// Filter by status.
    pub status: Option<TransactionStatus>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// Transaction repository for CRUD with ledger side effects.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
    orchestrator: LedgerOrchestrator,
}

impl TransactionRepository {
    /// Creates a new transaction repository with the default orchestrator.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            orchestrator: LedgerOrchestrator::new(),
        }
    }

    /// Creates a transaction and posts its ledger effects atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the intent is rejected, or a
    /// database operation fails; nothing is committed on error.
    pub async fn create(
        &self,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        validate_amount(input.amount)?;
        if let Some(fee) = input.fee {
            validate_amount(fee)?;
        }
        input.intent.validate()?;

        let now = Utc::now().into();
        let transaction_id = input.id.unwrap_or_else(Uuid::new_v4);

        let txn = self.db.begin().await?;

        let transaction = transactions::ActiveModel {
            id: Set(transaction_id),
            account_id: Set(input.account_id),
            person_id: Set(input.person_id),
            category_id: Set(input.category_id),
            shop_id: Set(input.shop_id),
            subscription_id: Set(input.subscription_id),
            linked_group_id: Set(input.linked_group_id),
            kind: Set(input.kind),
            status: Set(input.status),
            amount: Set(input.amount),
            fee: Set(input.fee),
            occurred_on: Set(input.occurred_on),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = transaction.insert(&txn).await?;

        self.orchestrator
            .on_transaction_posted(&txn, &inserted, &input.intent)
            .await?;

        txn.commit().await?;
        Ok(inserted)
    }

    /// Updates a transaction and re-posts any supplied ledger intent
    /// atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is missing, validation fails,
    /// or a database operation fails; nothing is committed on error.
    pub async fn update(
        &self,
        transaction_id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        if let Some(amount) = input.amount {
            validate_amount(amount)?;
        }
        if let Some(Some(fee)) = input.fee {
            validate_amount(fee)?;
        }
        input.intent.validate()?;

        let txn = self.db.begin().await?;

        let transaction = transactions::Entity::find_by_id(transaction_id)
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))?;

        let mut active: transactions::ActiveModel = transaction.into();

        if let Some(account_id) = input.account_id {
            active.account_id = Set(account_id);
        }
        if let Some(person_id) = input.person_id {
            active.person_id = Set(person_id);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(shop_id) = input.shop_id {
            active.shop_id = Set(shop_id);
        }
        if let Some(subscription_id) = input.subscription_id {
            active.subscription_id = Set(subscription_id);
        }
        if let Some(kind) = input.kind {
            active.kind = Set(kind);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(fee) = input.fee {
            active.fee = Set(fee);
        }
        if let Some(occurred_on) = input.occurred_on {
            active.occurred_on = Set(occurred_on);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await?;

        self.orchestrator
            .on_transaction_posted(&txn, &updated, &input.intent)
            .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a transaction, rolling back every movement that references
    /// it first, atomically.
    ///
    /// Returns the deleted row.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is missing or a database
    /// operation fails; nothing is committed on error.
    pub async fn delete(&self, transaction_id: Uuid) -> Result<transactions::Model, TransactionError> {
        let txn = self.db.begin().await?;

        let transaction = transactions::Entity::find_by_id(transaction_id)
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))?;

        // Unwind ledger contributions before the row disappears.
        self.orchestrator
            .on_transaction_deleted(&txn, transaction_id)
            .await?;

        transaction.clone().delete(&txn).await?;

        txn.commit().await?;
        Ok(transaction)
    }

    /// Gets a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is missing or the query fails.
    pub async fn get(&self, transaction_id: Uuid) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(transaction_id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))
    }

    /// Lists transactions with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let mut query = transactions::Entity::find();

        if let Some(account_id) = filter.account_id {
            query = query.filter(transactions::Column::AccountId.eq(account_id));
        }
        if let Some(person_id) = filter.person_id {
            query = query.filter(transactions::Column::PersonId.eq(person_id));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(transactions::Column::OccurredOn.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(transactions::Column::OccurredOn.lte(date_to));
        }

        let rows = query
            .order_by_desc(transactions::Column::OccurredOn)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows)
    }
}
