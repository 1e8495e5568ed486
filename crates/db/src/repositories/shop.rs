//! Shop repository.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::entities::shops;

/// Error types for shop operations.
#[derive(Debug, thiserror::Error)]
pub enum ShopError {
    /// Shop not found.
    #[error("Shop not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a shop.
#[derive(Debug, Clone)]
pub struct CreateShopInput {
    /// Shop name.
    pub name: String,
    /// Optional note.
    pub note: Option<String>,
}

/// Shop repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ShopRepository {
    db: DatabaseConnection,
}

impl ShopRepository {
    /// Creates a new shop repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(&self, input: CreateShopInput) -> Result<shops::Model, ShopError> {
        let now = Utc::now().into();
        let shop = shops::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            note: Set(input.note),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(shop.insert(&self.db).await?)
    }

    /// Gets a shop by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the shop does not exist.
    pub async fn get(&self, shop_id: Uuid) -> Result<shops::Model, ShopError> {
        shops::Entity::find_by_id(shop_id)
            .one(&self.db)
            .await?
            .ok_or(ShopError::NotFound(shop_id))
    }

    /// Lists all shops by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<shops::Model>, ShopError> {
        Ok(shops::Entity::find()
            .order_by_asc(shops::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Deletes a shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop is missing or the delete fails.
    pub async fn delete(&self, shop_id: Uuid) -> Result<(), ShopError> {
        let result = shops::Entity::delete_by_id(shop_id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(ShopError::NotFound(shop_id));
        }

        Ok(())
    }
}
