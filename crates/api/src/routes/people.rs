//! People catalog routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use kakebo_db::entities::people;
use kakebo_db::repositories::{
    CreatePersonInput, PersonError, PersonRepository, UpdatePersonInput,
};

/// Creates the people routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/people", get(list_people))
        .route("/people", post(create_person))
        .route("/people/{person_id}", get(get_person))
        .route("/people/{person_id}", patch(update_person))
        .route("/people/{person_id}", delete(delete_person))
}

/// Request body for creating a person.
#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    /// Display name (unique).
    pub name: String,
    /// Optional contact note.
    pub note: Option<String>,
}

/// Request body for updating a person.
#[derive(Debug, Deserialize)]
pub struct UpdatePersonRequest {
    /// New name.
    pub name: Option<String>,
    /// New note.
    pub note: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Response for a person.
#[derive(Debug, Serialize)]
pub struct PersonResponse {
    /// Person ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Note.
    pub note: Option<String>,
    /// Active flag.
    pub is_active: bool,
}

impl From<people::Model> for PersonResponse {
    fn from(model: people::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            note: model.note,
            is_active: model.is_active,
        }
    }
}

fn error_response(err: &PersonError) -> axum::response::Response {
    match err {
        PersonError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "person_not_found",
                "message": format!("Person not found: {id}")
            })),
        )
            .into_response(),
        PersonError::DuplicateName(name) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_name",
                "message": format!("Person name '{name}' already exists")
            })),
        )
            .into_response(),
        PersonError::HasLedgers(count) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "person_in_use",
                "message": format!("Person has {count} debt ledgers")
            })),
        )
            .into_response(),
        PersonError::Database(e) => {
            error!(error = %e, "Person database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

/// GET `/people` - List people.
async fn list_people(State(state): State<AppState>) -> impl IntoResponse {
    let repo = PersonRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(rows) => {
            let items: Vec<PersonResponse> = rows.into_iter().map(PersonResponse::from).collect();
            (StatusCode::OK, Json(json!({ "people": items }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/people` - Create a person.
async fn create_person(
    State(state): State<AppState>,
    Json(payload): Json<CreatePersonRequest>,
) -> impl IntoResponse {
    let repo = PersonRepository::new((*state.db).clone());
    let input = CreatePersonInput {
        name: payload.name,
        note: payload.note,
    };

    match repo.create(input).await {
        Ok(person) => (StatusCode::CREATED, Json(PersonResponse::from(person))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/people/{person_id}` - Get a person.
async fn get_person(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PersonRepository::new((*state.db).clone());

    match repo.get(person_id).await {
        Ok(person) => (StatusCode::OK, Json(PersonResponse::from(person))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PATCH `/people/{person_id}` - Update a person.
async fn update_person(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
    Json(payload): Json<UpdatePersonRequest>,
) -> impl IntoResponse {
    let repo = PersonRepository::new((*state.db).clone());
    let input = UpdatePersonInput {
        name: payload.name,
        note: payload.note.map(Some),
        is_active: payload.is_active,
    };

    match repo.update(person_id, input).await {
        Ok(person) => (StatusCode::OK, Json(PersonResponse::from(person))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE `/people/{person_id}` - Delete a person with no ledgers.
async fn delete_person(
    State(state): State<AppState>,
    Path(person_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PersonRepository::new((*state.db).clone());

    match repo.delete(person_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}
