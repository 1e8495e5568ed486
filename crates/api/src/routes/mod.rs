//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod cashback;
pub mod categories;
pub mod debt;
pub mod health;
pub mod people;
pub mod shops;
pub mod subscriptions;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(people::routes())
        .merge(categories::routes())
        .merge(shops::routes())
        .merge(subscriptions::routes())
        .merge(transactions::routes())
        .merge(cashback::routes())
        .merge(debt::routes())
}
