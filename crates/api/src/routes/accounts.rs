//! Account catalog routes.

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
use kakebo_db::entities::{accounts, sea_orm_active_enums::AccountKind};
use kakebo_db::repositories::{
    AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput,
};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
        .route("/accounts/{account_id}", get(get_account))
        .route("/accounts/{account_id}", patch(update_account))
        .route("/accounts/{account_id}", delete(delete_account))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account name (unique).
    pub name: String,
    /// Kind: cash, bank, credit_card, ewallet.
    pub kind: String,
    /// Currency label; defaults to USD.
    pub currency: Option<String>,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// New name.
    pub name: Option<String>,
    /// New kind.
    pub kind: Option<String>,
    /// New currency label.
    pub currency: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Kind.
    pub kind: String,
    /// Currency label.
    pub currency: String,
    /// Active flag.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<accounts::Model> for AccountResponse {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            kind: kind_to_string(&model.kind).to_string(),
            currency: model.currency,
            is_active: model.is_active,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

fn kind_to_string(kind: &AccountKind) -> &'static str {
    match kind {
        AccountKind::Cash => "cash",
        AccountKind::Bank => "bank",
        AccountKind::CreditCard => "credit_card",
        AccountKind::Ewallet => "ewallet",
    }
}

fn string_to_kind(s: &str) -> Option<AccountKind> {
    match s {
        "cash" => Some(AccountKind::Cash),
        "bank" => Some(AccountKind::Bank),
        "credit_card" => Some(AccountKind::CreditCard),
        "ewallet" => Some(AccountKind::Ewallet),
        _ => None,
    }
}

fn error_response(err: &AccountError) -> axum::response::Response {
    match err {
        AccountError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "account_not_found",
                "message": format!("Account not found: {id}")
            })),
        )
            .into_response(),
        AccountError::DuplicateName(name) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_name",
                "message": format!("Account name '{name}' already exists")
            })),
        )
            .into_response(),
        AccountError::HasTransactions(count) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "account_in_use",
                "message": format!("Account has {count} transactions")
            })),
        )
            .into_response(),
        AccountError::Database(e) => {
            error!(error = %e, "Account database error");
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

/// GET `/accounts` - List accounts.
async fn list_accounts(State(state): State<AppState>) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(rows) => {
            let items: Vec<AccountResponse> =
                rows.into_iter().map(AccountResponse::from).collect();
            (StatusCode::OK, Json(json!({ "accounts": items }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let Some(kind) = string_to_kind(&payload.kind) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_account_kind",
                "message": "Invalid account kind"
            })),
        )
            .into_response();
    };

    let repo = AccountRepository::new((*state.db).clone());
    let input = CreateAccountInput {
        name: payload.name,
        kind,
        currency: payload.currency.unwrap_or_else(|| "USD".to_string()),
    };

    match repo.create(input).await {
        Ok(account) => (StatusCode::CREATED, Json(AccountResponse::from(account))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/accounts/{account_id}` - Get an account.
async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.get(account_id).await {
        Ok(account) => (StatusCode::OK, Json(AccountResponse::from(account))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PATCH `/accounts/{account_id}` - Update an account.
async fn update_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    let kind = match payload.kind.as_deref() {
        None => None,
        Some(s) => match string_to_kind(s) {
            Some(kind) => Some(kind),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_account_kind",
                        "message": "Invalid account kind"
                    })),
                )
                    .into_response();
            }
        },
    };

    let repo = AccountRepository::new((*state.db).clone());
    let input = UpdateAccountInput {
        name: payload.name,
        kind,
        currency: payload.currency,
        is_active: payload.is_active,
    };

    match repo.update(account_id, input).await {
        Ok(account) => (StatusCode::OK, Json(AccountResponse::from(account))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE `/accounts/{account_id}` - Delete an unused account.
async fn delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.delete(account_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}
