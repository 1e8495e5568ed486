//! Category repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{categories, sea_orm_active_enums::CategoryDirection};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Parent category not found.
    #[error("Parent category not found: {0}")]
    ParentNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Category name.
    pub name: String,
    /// Spending or income.
    pub direction: CategoryDirection,
    /// Optional parent for hierarchy.
    pub parent_id: Option<Uuid>,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category, validating the parent when supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent is missing or the insert fails.
    pub async fn create(
        &self,
        input: CreateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        if let Some(parent_id) = input.parent_id {
            categories::Entity::find_by_id(parent_id)
                .one(&self.db)
                .await?
                .ok_or(CategoryError::ParentNotFound(parent_id))?;
        }

        let now = Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            direction: Set(input.direction),
            parent_id: Set(input.parent_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Gets a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category does not exist.
    pub async fn get(&self, category_id: Uuid) -> Result<categories::Model, CategoryError> {
        categories::Entity::find_by_id(category_id)
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(category_id))
    }

    /// Lists categories, optionally filtered by direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        direction: Option<CategoryDirection>,
    ) -> Result<Vec<categories::Model>, CategoryError> {
        let mut query = categories::Entity::find();
        if let Some(direction) = direction {
            query = query.filter(categories::Column::Direction.eq(direction));
        }
        Ok(query
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Deletes a category. Children keep existing with their parent
    /// cleared by the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is missing or the delete fails.
    pub async fn delete(&self, category_id: Uuid) -> Result<(), CategoryError> {
        let result = categories::Entity::delete_by_id(category_id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CategoryError::NotFound(category_id));
        }

        Ok(())
    }
}
