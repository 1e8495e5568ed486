//! Integration tests for the debt ledger engine.
//!
//! These tests need a migrated Postgres database; set `DATABASE_URL` to
//! run them. Without it each test exits early.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use kakebo_db::entities::sea_orm_active_enums::{AccountKind, DebtLedgerStatus, DebtMovementKind};
use kakebo_db::repositories::{
    AccountRepository, CreateAccountInput, CreateDebtMovementInput, CreatePersonInput, DebtError,
    DebtRepository, PersonRepository,
};

async fn test_db() -> Option<sea_orm::DatabaseConnection> {
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(
        kakebo_db::connect(&url)
            .await
            .expect("Failed to connect to database"),
    )
}

/// Seeds a person and a wallet account for movements to reference.
async fn seed_person_and_account(db: &sea_orm::DatabaseConnection) -> (Uuid, Uuid) {
    let person = PersonRepository::new(db.clone())
        .create(CreatePersonInput {
            name: format!("test-person-{}", Uuid::new_v4()),
            note: None,
        })
        .await
        .expect("Failed to seed person");

    let account = AccountRepository::new(db.clone())
        .create(CreateAccountInput {
            name: format!("test-wallet-{}", Uuid::new_v4()),
            kind: AccountKind::Cash,
            currency: "USD".to_string(),
        })
        .await
        .expect("Failed to seed account");

    (person.id, account.id)
}

fn movement_input(
    person_id: Uuid,
    account_id: Uuid,
    kind: DebtMovementKind,
    amount: Decimal,
    cycle_tag: Option<&str>,
) -> CreateDebtMovementInput {
    CreateDebtMovementInput {
        id: None,
        transaction_id: Uuid::new_v4(),
        person_id,
        account_id,
        movement_kind: kind,
        amount,
        cycle_tag: cycle_tag.map(String::from),
        notes: None,
    }
}

#[tokio::test]
async fn test_borrow_seeds_fresh_ledger() {
    let Some(db) = test_db().await else { return };
    let (person_id, account_id) = seed_person_and_account(&db).await;
    let repo = DebtRepository::new(db);

    repo.apply_movement(movement_input(
        person_id,
        account_id,
        DebtMovementKind::Borrow,
        dec!(1200.00),
        None,
    ))
    .await
    .expect("Apply should succeed");

    let ledger = repo
        .get_ledger(person_id, None)
        .await
        .expect("Ledger lookup should succeed")
        .expect("Ledger row should exist after first movement");

    assert_eq!(ledger.new_debt, dec!(1200.00));
    assert_eq!(ledger.repayments, dec!(0.00));
    assert_eq!(ledger.net_debt, dec!(1200.00));
    assert_eq!(ledger.status, DebtLedgerStatus::Open);
}

#[tokio::test]
async fn test_repay_updates_existing_ledger() {
    let Some(db) = test_db().await else { return };
    let (person_id, account_id) = seed_person_and_account(&db).await;
    let repo = DebtRepository::new(db);

    repo.apply_movement(movement_input(
        person_id,
        account_id,
        DebtMovementKind::Borrow,
        dec!(1200.00),
        Some("2025-09"),
    ))
    .await
    .expect("Borrow should succeed");

    repo.apply_movement(movement_input(
        person_id,
        account_id,
        DebtMovementKind::Repay,
        dec!(200.00),
        Some("2025-09"),
    ))
    .await
    .expect("Repay should succeed");

    let ledger = repo
        .get_ledger(person_id, Some("2025-09"))
        .await
        .expect("Ledger lookup should succeed")
        .expect("Ledger row should exist");

    assert_eq!(ledger.new_debt, dec!(1200.00));
    assert_eq!(ledger.repayments, dec!(200.00));
    assert_eq!(ledger.net_debt, dec!(1000.00));
    assert_eq!(ledger.status, DebtLedgerStatus::Open);
}

#[tokio::test]
async fn test_full_repayment_flips_status() {
    let Some(db) = test_db().await else { return };
    let (person_id, account_id) = seed_person_and_account(&db).await;
    let repo = DebtRepository::new(db);

    repo.apply_movement(movement_input(
        person_id,
        account_id,
        DebtMovementKind::Borrow,
        dec!(100.00),
        None,
    ))
    .await
    .expect("Borrow should succeed");

    repo.apply_movement(movement_input(
        person_id,
        account_id,
        DebtMovementKind::Repay,
        dec!(100.00),
        None,
    ))
    .await
    .expect("Repay should succeed");

    let ledger = repo
        .get_ledger(person_id, None)
        .await
        .expect("Ledger lookup should succeed")
        .expect("Ledger row should exist");

    assert_eq!(ledger.net_debt, dec!(0.00));
    assert_eq!(ledger.status, DebtLedgerStatus::Repaid);
}

#[tokio::test]
async fn test_null_cycle_is_separate_from_tagged_cycles() {
    let Some(db) = test_db().await else { return };
    let (person_id, account_id) = seed_person_and_account(&db).await;
    let repo = DebtRepository::new(db);

    repo.apply_movement(movement_input(
        person_id,
        account_id,
        DebtMovementKind::Borrow,
        dec!(50.00),
        None,
    ))
    .await
    .expect("Rolling borrow should succeed");

    repo.apply_movement(movement_input(
        person_id,
        account_id,
        DebtMovementKind::Borrow,
        dec!(70.00),
        Some("2025-09"),
    ))
    .await
    .expect("Tagged borrow should succeed");

    let rolling = repo
        .get_balance(person_id, None)
        .await
        .expect("Rolling balance lookup should succeed");
    let tagged = repo
        .get_balance(person_id, Some("2025-09"))
        .await
        .expect("Tagged balance lookup should succeed");

    assert_eq!(rolling, dec!(50.00));
    assert_eq!(tagged, dec!(70.00));
}

#[tokio::test]
async fn test_rollback_reverts_component_and_net() {
    let Some(db) = test_db().await else { return };
    let (person_id, account_id) = seed_person_and_account(&db).await;
    let repo = DebtRepository::new(db);

    repo.apply_movement(movement_input(
        person_id,
        account_id,
        DebtMovementKind::Borrow,
        dec!(300.00),
        None,
    ))
    .await
    .expect("Borrow should succeed");

    let repay = repo
        .apply_movement(movement_input(
            person_id,
            account_id,
            DebtMovementKind::Repay,
            dec!(100.00),
            None,
        ))
        .await
        .expect("Repay should succeed");

    repo.rollback_movement(repay.id)
        .await
        .expect("Rollback should succeed");

    let ledger = repo
        .get_ledger(person_id, None)
        .await
        .expect("Ledger lookup should succeed")
        .expect("Ledger row should exist");

    assert_eq!(ledger.repayments, dec!(0.00));
    assert_eq!(ledger.net_debt, dec!(300.00));
    assert_eq!(
        ledger.net_debt,
        ledger.initial_debt + ledger.new_debt - ledger.repayments - ledger.debt_discount
    );
}

#[tokio::test]
async fn test_double_rollback_is_rejected() {
    let Some(db) = test_db().await else { return };
    let (person_id, account_id) = seed_person_and_account(&db).await;
    let repo = DebtRepository::new(db);

    let movement = repo
        .apply_movement(movement_input(
            person_id,
            account_id,
            DebtMovementKind::Borrow,
            dec!(10.00),
            None,
        ))
        .await
        .expect("Borrow should succeed");

    repo.rollback_movement(movement.id)
        .await
        .expect("First rollback should succeed");

    let second = repo.rollback_movement(movement.id).await;
    assert!(matches!(second, Err(DebtError::MovementNotFound(id)) if id == movement.id));
}

#[tokio::test]
async fn test_rollback_with_ledger_deleted_out_of_band_is_soft() {
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    use kakebo_db::entities::{debt_ledgers, debt_movements, sea_orm_active_enums::DebtMovementStatus};

    let Some(db) = test_db().await else { return };
    let (person_id, account_id) = seed_person_and_account(&db).await;
    let repo = DebtRepository::new(db.clone());

    let movement = repo
        .apply_movement(movement_input(
            person_id,
            account_id,
            DebtMovementKind::Borrow,
            dec!(25.00),
            None,
        ))
        .await
        .expect("Borrow should succeed");

    // Remove the ledger row behind the engine's back.
    debt_ledgers::Entity::delete_many()
        .filter(debt_ledgers::Column::PersonId.eq(person_id))
        .exec(&db)
        .await
        .expect("Out-of-band delete should succeed");

    // Rollback still reverses the movement, raises nothing, and does not
    // recreate the ledger row.
    let reversed = repo
        .rollback_movement(movement.id)
        .await
        .expect("Rollback should be a soft no-op on the ledger");
    assert_eq!(reversed.status, DebtMovementStatus::Reversed);

    assert!(
        repo.get_ledger(person_id, None)
            .await
            .expect("Ledger lookup should succeed")
            .is_none()
    );

    let stored = debt_movements::Entity::find_by_id(movement.id)
        .one(&db)
        .await
        .expect("Movement lookup should succeed")
        .expect("Movement row is preserved for audit");
    assert_eq!(stored.status, DebtMovementStatus::Reversed);
}

#[tokio::test]
async fn test_rollback_unknown_movement_not_found() {
    let Some(db) = test_db().await else { return };
    let repo = DebtRepository::new(db);

    let missing = Uuid::new_v4();
    let result = repo.rollback_movement(missing).await;
    assert!(matches!(result, Err(DebtError::MovementNotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_balance_of_unknown_person_is_zero() {
    let Some(db) = test_db().await else { return };
    let repo = DebtRepository::new(db);

    let balance = repo
        .get_balance(Uuid::new_v4(), None)
        .await
        .expect("Balance lookup should succeed");
    assert_eq!(balance, Decimal::ZERO);
}
