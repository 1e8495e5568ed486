//! Subscription catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use kakebo_db::entities::subscriptions;
use kakebo_db::repositories::{
    CreateSubscriptionInput, SubscriptionError, SubscriptionRepository, UpdateSubscriptionInput,
};
use kakebo_shared::types::money::{format_currency, parse_currency};

/// Creates the subscription routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", get(list_subscriptions))
        .route("/subscriptions", post(create_subscription))
        .route("/subscriptions/{subscription_id}", get(get_subscription))
        .route("/subscriptions/{subscription_id}", patch(update_subscription))
        .route("/subscriptions/{subscription_id}", delete(delete_subscription))
}

/// Query parameters for listing subscriptions.
#[derive(Debug, Deserialize)]
pub struct ListSubscriptionsQuery {
    /// Only return active subscriptions.
    #[serde(default)]
    pub active: bool,
}

/// Request body for creating a subscription.
#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    /// Subscription name.
    pub name: String,
    /// Charged account.
    pub account_id: Uuid,
    /// Recurring amount as a decimal string.
    pub amount: String,
    /// Day of month the charge lands.
    pub billing_day: i16,
}

/// Request body for updating a subscription.
#[derive(Debug, Deserialize)]
pub struct UpdateSubscriptionRequest {
    /// New name.
    pub name: Option<String>,
    /// New amount as a decimal string.
    pub amount: Option<String>,
    /// New billing day.
    pub billing_day: Option<i16>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Response for a subscription.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    /// Subscription ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Charged account.
    pub account_id: Uuid,
    /// Recurring amount.
    pub amount: String,
    /// Billing day.
    pub billing_day: i16,
    /// Active flag.
    pub is_active: bool,
}

impl From<subscriptions::Model> for SubscriptionResponse {
    fn from(model: subscriptions::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            account_id: model.account_id,
            amount: format_currency(model.amount),
            billing_day: model.billing_day,
            is_active: model.is_active,
        }
    }
}

fn error_response(err: &SubscriptionError) -> axum::response::Response {
    match err {
        SubscriptionError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "subscription_not_found",
                "message": format!("Subscription not found: {id}")
            })),
        )
            .into_response(),
        SubscriptionError::AccountNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "account_not_found",
                "message": format!("Account not found: {id}")
            })),
        )
            .into_response(),
        SubscriptionError::InvalidBillingDay(day) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_billing_day",
                "message": format!("Invalid billing day: {day}")
            })),
        )
            .into_response(),
        SubscriptionError::Database(e) => {
            error!(error = %e, "Subscription database error");
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

/// GET `/subscriptions` - List subscriptions.
async fn list_subscriptions(
    State(state): State<AppState>,
    Query(query): Query<ListSubscriptionsQuery>,
) -> impl IntoResponse {
    let repo = SubscriptionRepository::new((*state.db).clone());

    match repo.list(query.active).await {
        Ok(rows) => {
            let items: Vec<SubscriptionResponse> =
                rows.into_iter().map(SubscriptionResponse::from).collect();
            (StatusCode::OK, Json(json!({ "subscriptions": items }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/subscriptions` - Create a subscription.
async fn create_subscription(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubscriptionRequest>,
) -> impl IntoResponse {
    let Ok(amount) = parse_currency(&payload.amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_amount", "message": "Invalid amount" })),
        )
            .into_response();
    };

    let repo = SubscriptionRepository::new((*state.db).clone());
    let input = CreateSubscriptionInput {
        name: payload.name,
        account_id: payload.account_id,
        amount,
        billing_day: payload.billing_day,
    };

    match repo.create(input).await {
        Ok(subscription) => (
            StatusCode::CREATED,
            Json(SubscriptionResponse::from(subscription)),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/subscriptions/{subscription_id}` - Get a subscription.
async fn get_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = SubscriptionRepository::new((*state.db).clone());

    match repo.get(subscription_id).await {
        Ok(subscription) => (
            StatusCode::OK,
            Json(SubscriptionResponse::from(subscription)),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// PATCH `/subscriptions/{subscription_id}` - Update a subscription.
async fn update_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<Uuid>,
    Json(payload): Json<UpdateSubscriptionRequest>,
) -> impl IntoResponse {
    let amount = match payload.amount.as_deref() {
        None => None,
        Some(a) => match parse_currency(a) {
            Ok(amount) => Some(amount),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "invalid_amount", "message": "Invalid amount" })),
                )
                    .into_response();
            }
        },
    };

    let repo = SubscriptionRepository::new((*state.db).clone());
    let input = UpdateSubscriptionInput {
        name: payload.name,
        amount,
        billing_day: payload.billing_day,
        is_active: payload.is_active,
    };

    match repo.update(subscription_id, input).await {
        Ok(subscription) => (
            StatusCode::OK,
            Json(SubscriptionResponse::from(subscription)),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE `/subscriptions/{subscription_id}` - Delete a subscription.
async fn delete_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = SubscriptionRepository::new((*state.db).clone());

    match repo.delete(subscription_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}
