//! Person repository for debt counterparty database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{debt_ledgers, people};

/// Error types for person operations.
#[derive(Debug, thiserror::Error)]
pub enum PersonError {
    /// Person not found.
    #[error("Person not found: {0}")]
    NotFound(Uuid),

    /// Person name already exists.
    #[error("Person name '{0}' already exists")]
    DuplicateName(String),

    /// Cannot delete a person that has debt ledgers.
    #[error("Cannot delete person: they have {0} debt ledgers")]
    HasLedgers(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a person.
#[derive(Debug, Clone)]
pub struct CreatePersonInput {
    /// Display name (unique).
    pub name: String,
    /// Optional contact note.
    pub note: Option<String>,
}

/// Input for updating a person.
#[derive(Debug, Clone, Default)]
pub struct UpdatePersonInput {
    /// New name.
    pub name: Option<String>,
    /// New note (None keeps, Some(None) clears).
    pub note: Option<Option<String>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Person repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PersonRepository {
    db: DatabaseConnection,
}

impl PersonRepository {
    /// Creates a new person repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new person with a unique name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the insert fails.
    pub async fn create(&self, input: CreatePersonInput) -> Result<people::Model, PersonError> {
        let existing = people::Entity::find()
            .filter(people::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(PersonError::DuplicateName(input.name));
        }

        let now = Utc::now().into();
        let person = people::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            note: Set(input.note),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(person.insert(&self.db).await?)
    }

    /// Gets a person by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the person does not exist.
    pub async fn get(&self, person_id: Uuid) -> Result<people::Model, PersonError> {
        people::Entity::find_by_id(person_id)
            .one(&self.db)
            .await?
            .ok_or(PersonError::NotFound(person_id))
    }

    /// Lists all people by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<people::Model>, PersonError> {
        let rows = people::Entity::find()
            .order_by_asc(people::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Updates a person.
    ///
    /// # Errors
    ///
    /// Returns an error if the person is missing or the update fails.
    pub async fn update(
        &self,
        person_id: Uuid,
        input: UpdatePersonInput,
    ) -> Result<people::Model, PersonError> {
        let person = people::Entity::find_by_id(person_id)
            .one(&self.db)
            .await?
            .ok_or(PersonError::NotFound(person_id))?;

        let mut active: people::ActiveModel = person.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(note) = input.note {
            active.note = Set(note);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a person that has no debt ledgers.
    ///
    /// # Errors
    ///
    /// Returns an error if the person is missing, still referenced, or the
    /// delete fails.
    pub async fn delete(&self, person_id: Uuid) -> Result<(), PersonError> {
        let _person = people::Entity::find_by_id(person_id)
            .one(&self.db)
            .await?
            .ok_or(PersonError::NotFound(person_id))?;

        let ledgers = debt_ledgers::Entity::find()
            .filter(debt_ledgers::Column::PersonId.eq(person_id))
            .count(&self.db)
            .await?;

        if ledgers > 0 {
            return Err(PersonError::HasLedgers(ledgers));
        }

        people::Entity::delete_by_id(person_id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}
