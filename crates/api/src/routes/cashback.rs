//! Administrative cashback ledger routes.
//!
//! Direct movement creation and rollback, used by reconciliation tooling;
//! normal cashback flows go through the transaction routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use kakebo_core::ledger;
use kakebo_db::entities::cashback_movements;
use kakebo_db::repositories::{CashbackError, CashbackRepository, CreateCashbackMovementInput};
use kakebo_shared::types::money::{format_currency, format_rate, parse_currency};

/// Creates the cashback ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cashback/movements", post(create_movement))
        .route("/cashback/movements/{movement_id}/rollback", post(rollback_movement))
        .route("/cashback/balance", get(get_balance))
}

/// Request body for creating a cashback movement.
#[derive(Debug, Deserialize)]
pub struct CreateMovementRequest {
    /// Originating transaction.
    pub transaction_id: Uuid,
    /// Account earning the cashback.
    pub account_id: Uuid,
    /// Statement period (`YYYY-MM`).
    pub cycle_tag: String,
    /// Cashback kind: percent, fixed.
    pub cashback_type: String,
    /// Rate or fixed value as a decimal string.
    pub cashback_value: String,
    /// Computed monetary effect as a decimal string.
    pub cashback_amount: String,
    /// Budget cap snapshot as a decimal string.
    pub budget_cap: Option<String>,
    /// Optional note.
    pub note: Option<String>,
}

/// Query parameters for the balance lookup.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Account to look up.
    pub account_id: Uuid,
    /// Statement period.
    pub cycle_tag: String,
}

/// Response for a cashback movement.
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    /// Movement ID.
    pub id: Uuid,
    /// Originating transaction.
    pub transaction_id: Uuid,
    /// Account.
    pub account_id: Uuid,
    /// Statement period.
    pub cycle_tag: String,
    /// Cashback kind.
    pub cashback_type: String,
    /// Rate or fixed value.
    pub cashback_value: String,
    /// Monetary effect.
    pub cashback_amount: String,
    /// Movement status.
    pub status: String,
}

impl From<cashback_movements::Model> for MovementResponse {
    fn from(model: cashback_movements::Model) -> Self {
        let kind: ledger::CashbackKind = model.cashback_kind.into();
        Self {
            id: model.id,
            transaction_id: model.transaction_id,
            account_id: model.account_id,
            cycle_tag: model.cycle_tag,
            cashback_type: kind.to_string(),
            cashback_value: format_rate(model.cashback_value),
            cashback_amount: format_currency(model.cashback_amount),
            status: match model.status {
                kakebo_db::entities::sea_orm_active_enums::CashbackMovementStatus::Applied => {
                    "applied".to_string()
                }
                kakebo_db::entities::sea_orm_active_enums::CashbackMovementStatus::Invalidated => {
                    "invalidated".to_string()
                }
            },
        }
    }
}

fn error_response(err: &CashbackError) -> axum::response::Response {
    match err {
        CashbackError::MovementNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "movement_not_found",
                "message": format!("Cashback movement not found: {id}")
            })),
        )
            .into_response(),
        CashbackError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "validation_error", "message": e.to_string() })),
        )
            .into_response(),
        CashbackError::Database(e) => {
            error!(error = %e, "Cashback database error");
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

/// POST `/cashback/movements` - Apply a cashback movement directly.
async fn create_movement(
    State(state): State<AppState>,
    Json(payload): Json<CreateMovementRequest>,
) -> impl IntoResponse {
    let Ok(kind) = ledger::CashbackKind::from_str(&payload.cashback_type) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_cashback_type",
                "message": "Invalid cashback type"
            })),
        )
            .into_response();
    };

    let Ok(value) = payload.cashback_value.trim().parse::<Decimal>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_cashback_value",
                "message": "Invalid cashback value"
            })),
        )
            .into_response();
    };

    let Ok(amount) = parse_currency(&payload.cashback_amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": "Invalid cashback amount"
            })),
        )
            .into_response();
    };

    let budget_cap = match payload.budget_cap.as_deref() {
        None => Decimal::ZERO,
        Some(cap) => match parse_currency(cap) {
            Ok(cap) => cap,
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_budget_cap",
                        "message": "Invalid budget cap"
                    })),
                )
                    .into_response();
            }
        },
    };

    let repo = CashbackRepository::new((*state.db).clone());
    let input = CreateCashbackMovementInput {
        id: None,
        transaction_id: payload.transaction_id,
        account_id: payload.account_id,
        cycle_tag: payload.cycle_tag,
        cashback_kind: kind.into(),
        cashback_value: value,
        cashback_amount: amount,
        budget_cap,
        note: payload.note,
    };

    match repo.apply_movement(input).await {
        Ok(movement) => {
            (StatusCode::CREATED, Json(MovementResponse::from(movement))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/cashback/movements/{movement_id}/rollback` - Invalidate a movement.
async fn rollback_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CashbackRepository::new((*state.db).clone());

    match repo.rollback_movement(movement_id).await {
        Ok(movement) => (StatusCode::OK, Json(MovementResponse::from(movement))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/cashback/balance` - Total cashback for (account, cycle).
async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> impl IntoResponse {
    let repo = CashbackRepository::new((*state.db).clone());

    match repo.get_balance(query.account_id, &query.cycle_tag).await {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({
                "account_id": query.account_id,
                "cycle_tag": query.cycle_tag,
                "total_cashback": format_currency(balance),
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}
