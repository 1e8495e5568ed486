//! Transaction management routes.
//!
//! Create/update/delete carry an optional ledger intent (`person_id`,
//! `debt_movement`, `cashback`) that the lifecycle manager routes through
//! the cross-ledger orchestrator inside the same database transaction.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use kakebo_core::ledger;
use kakebo_db::entities::{
    sea_orm_active_enums::{TransactionKind, TransactionStatus},
    transactions,
};
use kakebo_db::repositories::{
    CashbackIntent, CreateTransactionInput, DebtIntent, PostingIntent, TransactionError,
    TransactionFilter, TransactionRepository, UpdateTransactionInput,
};
use kakebo_shared::types::money::{format_currency, parse_currency};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
        .route("/transactions/{transaction_id}", get(get_transaction))
        .route("/transactions/{transaction_id}", patch(update_transaction))
        .route("/transactions/{transaction_id}", delete(delete_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by account.
    pub account_id: Option<Uuid>,
    /// Filter by person.
    pub person_id: Option<Uuid>,
    /// Filter by transaction kind.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// Debt intent in a transaction request.
#[derive(Debug, Deserialize)]
pub struct DebtMovementRequest {
    /// Movement kind: borrow, repay, adjust, discount, split.
    pub movement_type: String,
    /// Statement period, or absent for the rolling ledger.
    pub cycle_tag: Option<String>,
}

/// Cashback intent in a transaction request.
#[derive(Debug, Deserialize)]
pub struct CashbackRequest {
    /// Cashback kind: percent, fixed.
    pub cashback_type: String,
    /// Rate or fixed value as a decimal string.
    pub cashback_value: String,
    /// Statement period; defaults to the transaction's month.
    pub cycle_tag: Option<String>,
    /// Budget cap snapshot as a decimal string.
    pub budget_cap: Option<String>,
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Account the money moved through.
    pub account_id: Uuid,
    /// Optional debt counterparty.
    pub person_id: Option<Uuid>,
    /// Optional category.
    pub category_id: Option<Uuid>,
    /// Optional shop.
    pub shop_id: Option<Uuid>,
    /// Optional subscription.
    pub subscription_id: Option<Uuid>,
    /// Transaction kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Status; defaults to active.
    pub status: Option<String>,
    /// Amount as a decimal string (2 dp).
    pub amount: String,
    /// Optional fee as a decimal string.
    pub fee: Option<String>,
    /// Date the transaction occurred (YYYY-MM-DD).
    pub occurred_on: NaiveDate,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Debt ledger intent.
    pub debt_movement: Option<DebtMovementRequest>,
    /// Cashback ledger intent.
    pub cashback: Option<CashbackRequest>,
}

/// Request body for updating a transaction.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New account.
    pub account_id: Option<Uuid>,
    /// New person.
    pub person_id: Option<Uuid>,
    /// New category.
    pub category_id: Option<Uuid>,
    /// New shop.
    pub shop_id: Option<Uuid>,
    /// New kind.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// New status.
    pub status: Option<String>,
    /// New amount as a decimal string.
    pub amount: Option<String>,
    /// New fee as a decimal string.
    pub fee: Option<String>,
    /// New occurrence date.
    pub occurred_on: Option<NaiveDate>,
    /// New notes.
    pub notes: Option<String>,
    /// Debt ledger intent; resubmitting re-applies ledger effects.
    pub debt_movement: Option<DebtMovementRequest>,
    /// Cashback ledger intent; resubmitting re-applies ledger effects.
    pub cashback: Option<CashbackRequest>,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Account ID.
    pub account_id: Uuid,
    /// Person ID.
    pub person_id: Option<Uuid>,
    /// Category ID.
    pub category_id: Option<Uuid>,
    /// Shop ID.
    pub shop_id: Option<Uuid>,
    /// Subscription ID.
    pub subscription_id: Option<Uuid>,
    /// Transaction kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Status.
    pub status: String,
    /// Amount as a fixed-point string.
    pub amount: String,
    /// Fee as a fixed-point string.
    pub fee: Option<String>,
    /// Occurrence date.
    pub occurred_on: String,
    /// Notes.
    pub notes: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(model: transactions::Model) -> Self {
        let kind: ledger::TransactionKind = model.kind.into();
        let status: ledger::TransactionStatus = model.status.into();
        Self {
            id: model.id,
            account_id: model.account_id,
            person_id: model.person_id,
            category_id: model.category_id,
            shop_id: model.shop_id,
            subscription_id: model.subscription_id,
            kind: kind.to_string(),
            status: status.to_string(),
            amount: format_currency(model.amount),
            fee: model.fee.map(format_currency),
            occurred_on: model.occurred_on.to_string(),
            notes: model.notes,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn bad_request(code: &str, message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": code, "message": message })),
    )
        .into_response()
}

fn parse_kind(s: &str) -> Option<TransactionKind> {
    ledger::TransactionKind::from_str(s).ok().map(Into::into)
}

fn parse_status(s: &str) -> Option<TransactionStatus> {
    ledger::TransactionStatus::from_str(s).ok().map(Into::into)
}

fn build_intent(
    person_id: Option<Uuid>,
    debt_movement: Option<DebtMovementRequest>,
    cashback: Option<CashbackRequest>,
) -> Result<PostingIntent, axum::response::Response> {
    let debt = debt_movement.map(|d| DebtIntent {
        movement_kind: d.movement_type,
        cycle_tag: d.cycle_tag,
    });

    let cashback = match cashback {
        Some(cb) => {
            // Rates carry up to 4 decimal places, unlike currency amounts.
            let value: rust_decimal::Decimal = cb
                .cashback_value
                .trim()
                .parse()
                .map_err(|_| bad_request("invalid_cashback_value", "Invalid cashback value"))?;
            let budget_cap = match cb.budget_cap {
                Some(cap) => Some(
                    parse_currency(&cap)
                        .map_err(|_| bad_request("invalid_budget_cap", "Invalid budget cap"))?,
                ),
                None => None,
            };
            Some(CashbackIntent {
                cashback_kind: cb.cashback_type,
                cashback_value: value,
                cycle_tag: cb.cycle_tag,
                budget_cap,
            })
        }
        None => None,
    };

    Ok(PostingIntent {
        person_id,
        debt_movement: debt,
        cashback,
    })
}

fn transaction_error_response(err: &TransactionError) -> axum::response::Response {
    match err {
        TransactionError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "transaction_not_found",
                "message": format!("Transaction not found: {id}")
            })),
        )
            .into_response(),
        TransactionError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "validation_error", "message": e.to_string() })),
        )
            .into_response(),
        TransactionError::Ledger(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "ledger_error", "message": e.to_string() })),
        )
            .into_response(),
        TransactionError::Database(e) => {
            error!(error = %e, "Transaction database error");
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

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions` - List transactions with filters.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    let filter = TransactionFilter {
        account_id: query.account_id,
        person_id: query.person_id,
        kind: query.kind.as_deref().and_then(parse_kind),
        status: query.status.as_deref().and_then(parse_status),
        date_from: query.from,
        date_to: query.to,
    };

    match repo.list(filter).await {
        Ok(rows) => {
            let items: Vec<TransactionResponse> =
                rows.into_iter().map(TransactionResponse::from).collect();
            (StatusCode::OK, Json(json!({ "transactions": items }))).into_response()
        }
        Err(e) => transaction_error_response(&e),
    }
}

/// POST `/transactions` - Create a transaction and post its ledger effects.
async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let Some(kind) = parse_kind(&payload.kind) else {
        return bad_request("invalid_transaction_type", "Invalid transaction type");
    };

    let status = match payload.status.as_deref() {
        None => TransactionStatus::Active,
        Some(s) => match parse_status(s) {
            Some(status) => status,
            None => return bad_request("invalid_status", "Invalid transaction status"),
        },
    };

    let Ok(amount) = parse_currency(&payload.amount) else {
        return bad_request("invalid_amount", "Invalid amount");
    };

    let fee = match payload.fee.as_deref() {
        None => None,
        Some(f) => match parse_currency(f) {
            Ok(fee) => Some(fee),
            Err(_) => return bad_request("invalid_fee", "Invalid fee"),
        },
    };

    let intent = match build_intent(payload.person_id, payload.debt_movement, payload.cashback) {
        Ok(intent) => intent,
        Err(response) => return response,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    let input = CreateTransactionInput {
        id: None,
        account_id: payload.account_id,
        person_id: payload.person_id,
        category_id: payload.category_id,
        shop_id: payload.shop_id,
        subscription_id: payload.subscription_id,
        linked_group_id: None,
        kind,
        status,
        amount,
        fee,
        occurred_on: payload.occurred_on,
        notes: payload.notes,
        intent,
    };

    match repo.create(input).await {
        Ok(transaction) => (
            StatusCode::CREATED,
            Json(TransactionResponse::from(transaction)),
        )
            .into_response(),
        Err(e) => transaction_error_response(&e),
    }
}

/// GET `/transactions/{transaction_id}` - Get a transaction.
async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.get(transaction_id).await {
        Ok(transaction) => {
            (StatusCode::OK, Json(TransactionResponse::from(transaction))).into_response()
        }
        Err(e) => transaction_error_response(&e),
    }
}

/// PATCH `/transactions/{transaction_id}` - Update a transaction.
async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    let kind = match payload.kind.as_deref() {
        None => None,
        Some(s) => match parse_kind(s) {
            Some(kind) => Some(kind),
            None => return bad_request("invalid_transaction_type", "Invalid transaction type"),
        },
    };

    let status = match payload.status.as_deref() {
        None => None,
        Some(s) => match parse_status(s) {
            Some(status) => Some(status),
            None => return bad_request("invalid_status", "Invalid transaction status"),
        },
    };

    let amount = match payload.amount.as_deref() {
        None => None,
        Some(a) => match parse_currency(a) {
            Ok(amount) => Some(amount),
            Err(_) => return bad_request("invalid_amount", "Invalid amount"),
        },
    };

    let fee = match payload.fee.as_deref() {
        None => None,
        Some(f) => match parse_currency(f) {
            Ok(fee) => Some(Some(fee)),
            Err(_) => return bad_request("invalid_fee", "Invalid fee"),
        },
    };

    let intent = match build_intent(payload.person_id, payload.debt_movement, payload.cashback) {
        Ok(intent) => intent,
        Err(response) => return response,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    let input = UpdateTransactionInput {
        account_id: payload.account_id,
        person_id: payload.person_id.map(Some),
        category_id: payload.category_id.map(Some),
        shop_id: payload.shop_id.map(Some),
        subscription_id: None,
        kind,
        status,
        amount,
        fee,
        occurred_on: payload.occurred_on,
        notes: payload.notes.map(Some),
        intent,
    };

    match repo.update(transaction_id, input).await {
        Ok(transaction) => {
            (StatusCode::OK, Json(TransactionResponse::from(transaction))).into_response()
        }
        Err(e) => transaction_error_response(&e),
    }
}

/// DELETE `/transactions/{transaction_id}` - Delete a transaction and roll
/// back its movements.
async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.delete(transaction_id).await {
        Ok(transaction) => {
            (StatusCode::OK, Json(TransactionResponse::from(transaction))).into_response()
        }
        Err(e) => transaction_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("expense", Some(TransactionKind::Expense))]
    #[case("repayment", Some(TransactionKind::Repayment))]
    #[case("cashback", Some(TransactionKind::Cashback))]
    #[case("transfer", None)]
    #[case("", None)]
    fn test_parse_kind(#[case] input: &str, #[case] expected: Option<TransactionKind>) {
        assert_eq!(parse_kind(input), expected);
    }

    #[rstest]
    #[case("active", Some(TransactionStatus::Active))]
    #[case("void", Some(TransactionStatus::Void))]
    #[case("draft", None)]
    fn test_parse_status(#[case] input: &str, #[case] expected: Option<TransactionStatus>) {
        assert_eq!(parse_status(input), expected);
    }

    #[test]
    fn test_build_intent_rejects_bad_cashback_value() {
        let result = build_intent(
            None,
            None,
            Some(CashbackRequest {
                cashback_type: "percent".to_string(),
                cashback_value: "five".to_string(),
                cycle_tag: None,
                budget_cap: None,
            }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_build_intent_passes_debt_through() {
        let intent = build_intent(
            None,
            Some(DebtMovementRequest {
                movement_type: "borrow".to_string(),
                cycle_tag: Some("2025-09".to_string()),
            }),
            None,
        )
        .expect("intent should build");

        let debt = intent.debt_movement.expect("debt intent present");
        assert_eq!(debt.movement_kind, "borrow");
        assert_eq!(debt.cycle_tag.as_deref(), Some("2025-09"));
    }
}
