//! Administrative debt ledger routes.
//!
//! Direct movement creation and rollback, used by reconciliation tooling;
//! normal debt flows go through the transaction routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use kakebo_core::ledger;
use kakebo_db::entities::debt_movements;
use kakebo_db::repositories::{CreateDebtMovementInput, DebtError, DebtRepository};
use kakebo_shared::types::money::{format_currency, parse_currency};

/// Creates the debt ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/debt/movements", post(create_movement))
        .route("/debt/movements/{movement_id}/rollback", post(rollback_movement))
        .route("/debt/balance", get(get_balance))
}

/// Request body for creating a debt movement.
#[derive(Debug, Deserialize)]
pub struct CreateMovementRequest {
    /// Originating transaction.
    pub transaction_id: Uuid,
    /// Person whose ledger the movement affects.
    pub person_id: Uuid,
    /// Account the money moved through.
    pub account_id: Uuid,
    /// Movement kind: borrow, repay, adjust, discount, split.
    pub movement_type: String,
    /// Positive magnitude as a decimal string.
    pub amount: String,
    /// Statement period, or absent for the rolling ledger.
    pub cycle_tag: Option<String>,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Query parameters for the balance lookup.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Person to look up.
    pub person_id: Uuid,
    /// Statement period; absent means the rolling ledger.
    pub cycle_tag: Option<String>,
}

/// Response for a debt movement.
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    /// Movement ID.
    pub id: Uuid,
    /// Originating transaction.
    pub transaction_id: Uuid,
    /// Person.
    pub person_id: Uuid,
    /// Account.
    pub account_id: Uuid,
    /// Movement kind.
    pub movement_type: String,
    /// Amount.
    pub amount: String,
    /// Statement period.
    pub cycle_tag: Option<String>,
    /// Movement status.
    pub status: String,
}

impl From<debt_movements::Model> for MovementResponse {
    fn from(model: debt_movements::Model) -> Self {
        let kind: ledger::DebtMovementKind = model.movement_kind.into();
        let status = match model.status {
            kakebo_db::entities::sea_orm_active_enums::DebtMovementStatus::Active => "active",
            kakebo_db::entities::sea_orm_active_enums::DebtMovementStatus::Settled => "settled",
            kakebo_db::entities::sea_orm_active_enums::DebtMovementStatus::Reversed => "reversed",
        };
        Self {
            id: model.id,
            transaction_id: model.transaction_id,
            person_id: model.person_id,
            account_id: model.account_id,
            movement_type: kind.to_string(),
            amount: format_currency(model.amount),
            cycle_tag: model.cycle_tag,
            status: status.to_string(),
        }
    }
}

fn error_response(err: &DebtError) -> axum::response::Response {
    match err {
        DebtError::MovementNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "movement_not_found",
                "message": format!("Debt movement not found: {id}")
            })),
        )
            .into_response(),
        DebtError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "validation_error", "message": e.to_string() })),
        )
            .into_response(),
        DebtError::Database(e) => {
            error!(error = %e, "Debt database error");
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

/// POST `/debt/movements` - Apply a debt movement directly.
async fn create_movement(
    State(state): State<AppState>,
    Json(payload): Json<CreateMovementRequest>,
) -> impl IntoResponse {
    let Ok(kind) = ledger::DebtMovementKind::from_str(&payload.movement_type) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_movement_type",
                "message": "Invalid movement type"
            })),
        )
            .into_response();
    };

    let Ok(amount) = parse_currency(&payload.amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_amount", "message": "Invalid amount" })),
        )
            .into_response();
    };

    let repo = DebtRepository::new((*state.db).clone());
    let input = CreateDebtMovementInput {
        id: None,
        transaction_id: payload.transaction_id,
        person_id: payload.person_id,
        account_id: payload.account_id,
        movement_kind: kind.into(),
        amount,
        cycle_tag: payload.cycle_tag,
        notes: payload.notes,
    };

    match repo.apply_movement(input).await {
        Ok(movement) => {
            (StatusCode::CREATED, Json(MovementResponse::from(movement))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/debt/movements/{movement_id}/rollback` - Reverse a movement.
async fn rollback_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DebtRepository::new((*state.db).clone());

    match repo.rollback_movement(movement_id).await {
        Ok(movement) => (StatusCode::OK, Json(MovementResponse::from(movement))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/debt/balance` - Net debt for (person, cycle).
async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> impl IntoResponse {
    let repo = DebtRepository::new((*state.db).clone());

    match repo
        .get_balance(query.person_id, query.cycle_tag.as_deref())
        .await
    {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({
                "person_id": query.person_id,
                "cycle_tag": query.cycle_tag,
                "net_debt": format_currency(balance),
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}
