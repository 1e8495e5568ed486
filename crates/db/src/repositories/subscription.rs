//! Subscription repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{accounts, subscriptions};

/// Error types for subscription operations.
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    /// Subscription not found.
    #[error("Subscription not found: {0}")]
    NotFound(Uuid),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Billing day outside 1..=31.
    #[error("Invalid billing day: {0}")]
    InvalidBillingDay(i16),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a subscription.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionInput {
    /// Subscription name.
    pub name: String,
    /// Charged account.
    pub account_id: Uuid,
    /// Recurring amount.
    pub amount: Decimal,
    /// Day of month the charge lands.
    pub billing_day: i16,
}

/// Input for updating a subscription.
#[derive(Debug, Clone, Default)]
pub struct UpdateSubscriptionInput {
    /// New name.
    pub name: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New billing day.
    pub billing_day: Option<i16>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Subscription repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    db: DatabaseConnection,
}

impl SubscriptionRepository {
    /// Creates a new subscription repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a subscription against an existing account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing, the billing day is out
    /// of range, or the insert fails.
    pub async fn create(
        &self,
        input: CreateSubscriptionInput,
    ) -> Result<subscriptions::Model, SubscriptionError> {
        if !(1..=31).contains(&input.billing_day) {
            return Err(SubscriptionError::InvalidBillingDay(input.billing_day));
        }

        accounts::Entity::find_by_id(input.account_id)
            .one(&self.db)
            .await?
            .ok_or(SubscriptionError::AccountNotFound(input.account_id))?;

        let now = Utc::now().into();
        let subscription = subscriptions::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            account_id: Set(input.account_id),
            amount: Set(input.amount),
            billing_day: Set(input.billing_day),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(subscription.insert(&self.db).await?)
    }

    /// Gets a subscription by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the subscription does not exist.
    pub async fn get(&self, subscription_id: Uuid) -> Result<subscriptions::Model, SubscriptionError> {
        subscriptions::Entity::find_by_id(subscription_id)
            .one(&self.db)
            .await?
            .ok_or(SubscriptionError::NotFound(subscription_id))
    }

    /// Lists subscriptions, optionally only active ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        only_active: bool,
    ) -> Result<Vec<subscriptions::Model>, SubscriptionError> {
        let mut query = subscriptions::Entity::find();
        if only_active {
            query = query.filter(subscriptions::Column::IsActive.eq(true));
        }
        Ok(query
            .order_by_asc(subscriptions::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Updates a subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription is missing, the billing day is
    /// out of range, or the update fails.
    pub async fn update(
        &self,
        subscription_id: Uuid,
        input: UpdateSubscriptionInput,
    ) -> Result<subscriptions::Model, SubscriptionError> {
        if let Some(day) = input.billing_day {
            if !(1..=31).contains(&day) {
                return Err(SubscriptionError::InvalidBillingDay(day));
            }
        }

        let subscription = subscriptions::Entity::find_by_id(subscription_id)
            .one(&self.db)
            .await?
            .ok_or(SubscriptionError::NotFound(subscription_id))?;

        let mut active: subscriptions::ActiveModel = subscription.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(day) = input.billing_day {
            active.billing_day = Set(day);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription is missing or the delete fails.
    pub async fn delete(&self, subscription_id: Uuid) -> Result<(), SubscriptionError> {
        let result = subscriptions::Entity::delete_by_id(subscription_id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(SubscriptionError::NotFound(subscription_id));
        }

        Ok(())
    }
}
