//! Account repository for account catalog database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{
    accounts, sea_orm_active_enums::AccountKind, transactions,
};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Account name already exists.
    #[error("Account name '{0}' already exists")]
    DuplicateName(String),

    /// Cannot delete an account that has transactions.
    #[error("Cannot delete account: it has {0} transactions")]
    HasTransactions(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account name (unique).
    pub name: String,
    /// Account classification.
    pub kind: AccountKind,
    /// Currency label.
    pub currency: String,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New name.
    pub name: Option<String>,
    /// New classification.
    pub kind: Option<AccountKind>,
    /// New currency label.
    pub currency: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account with a unique name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the insert fails.
    pub async fn create(&self, input: CreateAccountInput) -> Result<accounts::Model, AccountError> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(AccountError::DuplicateName(input.name));
        }

        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            kind: Set(input.kind),
            currency: Set(input.currency),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Gets an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn get(&self, account_id: Uuid) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(account_id))
    }

    /// Lists all accounts, active first, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<accounts::Model>, AccountError> {
        let rows = accounts::Entity::find()
            .order_by_desc(accounts::Column::IsActive)
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Updates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the update fails.
    pub async fn update(
        &self,
        account_id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        let mut active: accounts::ActiveModel = account.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(kind) = input.kind {
            active.kind = Set(kind);
        }
        if let Some(currency) = input.currency {
            active.currency = Set(currency);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an account that has no transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing, still referenced, or
    /// the delete fails.
    pub async fn delete(&self, account_id: Uuid) -> Result<(), AccountError> {
        let _account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        let references = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .count(&self.db)
            .await?;

        if references > 0 {
            return Err(AccountError::HasTransactions(references));
        }

        accounts::Entity::delete_by_id(account_id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}
