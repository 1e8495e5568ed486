//! Category catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use kakebo_db::entities::{categories, sea_orm_active_enums::CategoryDirection};
use kakebo_db::repositories::{CategoryError, CategoryRepository, CreateCategoryInput};

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories", post(create_category))
        .route("/categories/{category_id}", get(get_category))
        .route("/categories/{category_id}", delete(delete_category))
}

/// Query parameters for listing categories.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// Filter by direction: expense, income.
    pub direction: Option<String>,
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name.
    pub name: String,
    /// Direction: expense, income.
    pub direction: String,
    /// Optional parent category.
    pub parent_id: Option<Uuid>,
}

/// Response for a category.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Direction.
    pub direction: String,
    /// Parent category.
    pub parent_id: Option<Uuid>,
}

impl From<categories::Model> for CategoryResponse {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            direction: match model.direction {
                CategoryDirection::Expense => "expense".to_string(),
                CategoryDirection::Income => "income".to_string(),
            },
            parent_id: model.parent_id,
        }
    }
}

fn parse_direction(s: &str) -> Option<CategoryDirection> {
    match s {
        "expense" => Some(CategoryDirection::Expense),
        "income" => Some(CategoryDirection::Income),
        _ => None,
    }
}

fn error_response(err: &CategoryError) -> axum::response::Response {
    match err {
        CategoryError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "category_not_found",
                "message": format!("Category not found: {id}")
            })),
        )
            .into_response(),
        CategoryError::ParentNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "parent_not_found",
                "message": format!("Parent category not found: {id}")
            })),
        )
            .into_response(),
        CategoryError::Database(e) => {
            error!(error = %e, "Category database error");
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

/// GET `/categories` - List categories.
async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListCategoriesQuery>,
) -> impl IntoResponse {
    let direction = match query.direction.as_deref() {
        None => None,
        Some(s) => match parse_direction(s) {
            Some(direction) => Some(direction),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_direction",
                        "message": "Invalid category direction"
                    })),
                )
                    .into_response();
            }
        },
    };

    let repo = CategoryRepository::new((*state.db).clone());

    match repo.list(direction).await {
        Ok(rows) => {
            let items: Vec<CategoryResponse> =
                rows.into_iter().map(CategoryResponse::from).collect();
            (StatusCode::OK, Json(json!({ "categories": items }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    let Some(direction) = parse_direction(&payload.direction) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_direction",
                "message": "Invalid category direction"
            })),
        )
            .into_response();
    };

    let repo = CategoryRepository::new((*state.db).clone());
    let input = CreateCategoryInput {
        name: payload.name,
        direction,
        parent_id: payload.parent_id,
    };

    match repo.create(input).await {
        Ok(category) => {
            (StatusCode::CREATED, Json(CategoryResponse::from(category))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/categories/{category_id}` - Get a category.
async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.get(category_id).await {
        Ok(category) => (StatusCode::OK, Json(CategoryResponse::from(category))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE `/categories/{category_id}` - Delete a category.
async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.delete(category_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}
