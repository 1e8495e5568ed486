//! Integration tests for the cashback ledger engine.
//!
//! These tests need a migrated Postgres database; set `DATABASE_URL` to
//! run them. Without it each test exits early.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use kakebo_db::entities::sea_orm_active_enums::{AccountKind, CashbackKind};
use kakebo_db::repositories::{
    AccountRepository, CashbackError, CashbackRepository, CreateAccountInput,
    CreateCashbackMovementInput,
};

async fn test_db() -> Option<sea_orm::DatabaseConnection> {
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(
        kakebo_db::connect(&url)
            .await
            .expect("Failed to connect to database"),
    )
}

async fn seed_account(db: &sea_orm::DatabaseConnection) -> Uuid {
    let repo = AccountRepository::new(db.clone());
    let account = repo
        .create(CreateAccountInput {
            name: format!("test-card-{}", Uuid::new_v4()),
            kind: AccountKind::CreditCard,
            currency: "USD".to_string(),
        })
        .await
        .expect("Failed to seed account");
    account.id
}

fn movement_input(account_id: Uuid, cycle_tag: &str, amount: Decimal) -> CreateCashbackMovementInput {
    CreateCashbackMovementInput {
        id: None,
        transaction_id: Uuid::new_v4(),
        account_id,
        cycle_tag: cycle_tag.to_string(),
        cashback_kind: CashbackKind::Percent,
        cashback_value: dec!(5.0),
        cashback_amount: amount,
        budget_cap: Decimal::ZERO,
        note: None,
    }
}

#[tokio::test]
async fn test_apply_creates_ledger_lazily() {
    let Some(db) = test_db().await else { return };
    let account_id = seed_account(&db).await;
    let repo = CashbackRepository::new(db);

    let movement = repo
        .apply_movement(movement_input(account_id, "2025-09", dec!(4.12)))
        .await
        .expect("Apply should succeed");

    assert_eq!(movement.cashback_amount, dec!(4.12));

    let ledger = repo
        .get_ledger(account_id, "2025-09")
        .await
        .expect("Ledger lookup should succeed")
        .expect("Ledger row should exist after first movement");

    assert_eq!(ledger.total_cashback, dec!(4.12));
    assert_eq!(ledger.remaining_budget, dec!(4.12));
    assert_eq!(ledger.budget_cap, Decimal::ZERO);
}

#[tokio::test]
async fn test_second_movement_updates_same_ledger_row() {
    let Some(db) = test_db().await else { return };
    let account_id = seed_account(&db).await;
    let repo = CashbackRepository::new(db);

    repo.apply_movement(movement_input(account_id, "2025-10", dec!(3.00)))
        .await
        .expect("First apply should succeed");
    repo.apply_movement(movement_input(account_id, "2025-10", dec!(2.50)))
        .await
        .expect("Second apply should succeed");

    let balance = repo
        .get_balance(account_id, "2025-10")
        .await
        .expect("Balance lookup should succeed");
    assert_eq!(balance, dec!(5.50));
}

#[tokio::test]
async fn test_rollback_restores_fresh_ledger_to_zero() {
    let Some(db) = test_db().await else { return };
    let account_id = seed_account(&db).await;
    let repo = CashbackRepository::new(db);

    let movement = repo
        .apply_movement(movement_input(account_id, "2025-11", dec!(4.12)))
        .await
        .expect("Apply should succeed");

    repo.rollback_movement(movement.id)
        .await
        .expect("Rollback should succeed");

    let ledger = repo
        .get_ledger(account_id, "2025-11")
        .await
        .expect("Ledger lookup should succeed")
        .expect("Ledger row survives rollback");

    assert_eq!(ledger.total_cashback, dec!(0.00));
    assert_eq!(ledger.remaining_budget, dec!(0.00));
}

#[tokio::test]
async fn test_double_rollback_is_rejected_and_ledger_untouched() {
    let Some(db) = test_db().await else { return };
    let account_id = seed_account(&db).await;
    let repo = CashbackRepository::new(db);

    let movement = repo
        .apply_movement(movement_input(account_id, "2025-12", dec!(1.00)))
        .await
        .expect("Apply should succeed");

    repo.rollback_movement(movement.id)
        .await
        .expect("First rollback should succeed");

    let balance_after_first = repo
        .get_balance(account_id, "2025-12")
        .await
        .expect("Balance lookup should succeed");

    let second = repo.rollback_movement(movement.id).await;
    assert!(matches!(second, Err(CashbackError::MovementNotFound(id)) if id == movement.id));

    let balance_after_second = repo
        .get_balance(account_id, "2025-12")
        .await
        .expect("Balance lookup should succeed");
    assert_eq!(balance_after_first, balance_after_second);
}

#[tokio::test]
async fn test_rollback_unknown_movement_not_found() {
    let Some(db) = test_db().await else { return };
    let repo = CashbackRepository::new(db);

    let missing = Uuid::new_v4();
    let result = repo.rollback_movement(missing).await;
    assert!(matches!(result, Err(CashbackError::MovementNotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_balance_of_unknown_key_is_zero() {
    let Some(db) = test_db().await else { return };
    let repo = CashbackRepository::new(db);

    let balance = repo
        .get_balance(Uuid::new_v4(), "2025-01")
        .await
        .expect("Balance lookup should succeed");
    assert_eq!(balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_invalid_cycle_tag_rejected_before_write() {
    let Some(db) = test_db().await else { return };
    let account_id = seed_account(&db).await;
    let repo = CashbackRepository::new(db);

    let result = repo
        .apply_movement(movement_input(account_id, "2025-13", dec!(1.00)))
        .await;
    assert!(matches!(result, Err(CashbackError::Validation(_))));
}

#[tokio::test]
async fn test_negative_amount_rejected_before_write() {
    let Some(db) = test_db().await else { return };
    let account_id = seed_account(&db).await;
    let repo = CashbackRepository::new(db);

    let result = repo
        .apply_movement(movement_input(account_id, "2025-09", dec!(-1.00)))
        .await;
    assert!(matches!(result, Err(CashbackError::Validation(_))));
}
