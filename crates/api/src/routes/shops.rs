//! Shop catalog routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use kakebo_db::entities::shops;
use kakebo_db::repositories::{CreateShopInput, ShopError, ShopRepository};

/// Creates the shop routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shops", get(list_shops))
        .route("/shops", post(create_shop))
        .route("/shops/{shop_id}", get(get_shop))
        .route("/shops/{shop_id}", delete(delete_shop))
}

/// Request body for creating a shop.
#[derive(Debug, Deserialize)]
pub struct CreateShopRequest {
    /// Shop name.
    pub name: String,
    /// Optional note.
    pub note: Option<String>,
}

/// Response for a shop.
#[derive(Debug, Serialize)]
pub struct ShopResponse {
    /// Shop ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Note.
    pub note: Option<String>,
}

impl From<shops::Model> for ShopResponse {
    fn from(model: shops::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            note: model.note,
        }
    }
}

fn error_response(err: &ShopError) -> axum::response::Response {
    match err {
        ShopError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "shop_not_found",
                "message": format!("Shop not found: {id}")
            })),
        )
            .into_response(),
        ShopError::Database(e) => {
            error!(error = %e, "Shop database error");
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

/// GET `/shops` - List shops.
async fn list_shops(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ShopRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(rows) => {
            let items: Vec<ShopResponse> = rows.into_iter().map(ShopResponse::from).collect();
            (StatusCode::OK, Json(json!({ "shops": items }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/shops` - Create a shop.
async fn create_shop(
    State(state): State<AppState>,
    Json(payload): Json<CreateShopRequest>,
) -> impl IntoResponse {
    let repo = ShopRepository::new((*state.db).clone());
    let input = CreateShopInput {
        name: payload.name,
        note: payload.note,
    };

    match repo.create(input).await {
        Ok(shop) => (StatusCode::CREATED, Json(ShopResponse::from(shop))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/shops/{shop_id}` - Get a shop.
async fn get_shop(State(state): State<AppState>, Path(shop_id): Path<Uuid>) -> impl IntoResponse {
    let repo = ShopRepository::new((*state.db).clone());

    match repo.get(shop_id).await {
        Ok(shop) => (StatusCode::OK, Json(ShopResponse::from(shop))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE `/shops/{shop_id}` - Delete a shop.
async fn delete_shop(
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ShopRepository::new((*state.db).clone());

    match repo.delete(shop_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}
