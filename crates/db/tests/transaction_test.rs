//! Integration tests for the transaction lifecycle manager and the
//! cross-ledger orchestrator.
//!
//! These tests need a migrated Postgres database; set `DATABASE_URL` to
//! run them. Without it each test exits early.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use kakebo_db::entities::sea_orm_active_enums::{
    AccountKind, TransactionKind, TransactionStatus,
};
use kakebo_db::repositories::{
    AccountRepository, CashbackIntent, CashbackRepository, CreateAccountInput,
    CreatePersonInput, CreateTransactionInput, DebtIntent, DebtRepository, PersonRepository,
    PostingIntent, TransactionError, TransactionRepository, UpdateTransactionInput,
};

async fn test_db() -> Option<sea_orm::DatabaseConnection> {
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(
        kakebo_db::connect(&url)
            .await
            .expect("Failed to connect to database"),
    )
}

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
            name: format!("test-account-{}", Uuid::new_v4()),
            kind: AccountKind::Bank,
            currency: "USD".to_string(),
        })
        .await
        .expect("Failed to seed account");

    (person.id, account.id)
}

fn base_input(account_id: Uuid, amount: Decimal) -> CreateTransactionInput {
    CreateTransactionInput {
        id: None,
        account_id,
        person_id: None,
        category_id: None,
        shop_id: None,
        subscription_id: None,
        linked_group_id: None,
        kind: TransactionKind::Expense,
        status: TransactionStatus::Active,
        amount,
        fee: None,
        occurred_on: NaiveDate::from_ymd_opt(2025, 9, 14).unwrap(),
        notes: None,
        intent: PostingIntent::default(),
    }
}

#[tokio::test]
async fn test_create_without_intent_touches_no_ledgers() {
    let Some(db) = test_db().await else { return };
    let (person_id, account_id) = seed_person_and_account(&db).await;
    let repo = TransactionRepository::new(db.clone());

    let transaction = repo
        .create(base_input(account_id, dec!(42.00)))
        .await
        .expect("Create should succeed");

    assert_eq!(transaction.amount, dec!(42.00));

    let debt = DebtRepository::new(db.clone());
    assert_eq!(
        debt.get_balance(person_id, None)
            .await
            .expect("Balance lookup should succeed"),
        Decimal::ZERO
    );
}

#[tokio::test]
async fn test_create_with_debt_intent_posts_movement() {
    let Some(db) = test_db().await else { return };
    let (person_id, account_id) = seed_person_and_account(&db).await;
    let repo = TransactionRepository::new(db.clone());

    let mut input = base_input(account_id, dec!(1200.00));
    input.kind = TransactionKind::Debt;
    input.person_id = Some(person_id);
    input.intent = PostingIntent {
        person_id: Some(person_id),
        debt_movement: Some(DebtIntent {
            movement_kind: "borrow".to_string(),
            cycle_tag: None,
        }),
        cashback: None,
    };

    repo.create(input).await.expect("Create should succeed");

    let debt = DebtRepository::new(db);
    let ledger = debt
        .get_ledger(person_id, None)
        .await
        .expect("Ledger lookup should succeed")
        .expect("Debt ledger should exist after posting");

    assert_eq!(ledger.new_debt, dec!(1200.00));
    assert_eq!(ledger.net_debt, dec!(1200.00));
}

#[tokio::test]
async fn test_create_with_cashback_intent_posts_movement() {
    let Some(db) = test_db().await else { return };
    let (_, account_id) = seed_person_and_account(&db).await;
    let repo = TransactionRepository::new(db.clone());

    let mut input = base_input(account_id, dec!(82.40));
    input.intent = PostingIntent {
        person_id: None,
        debt_movement: None,
        cashback: Some(CashbackIntent {
            cashback_kind: "percent".to_string(),
            cashback_value: dec!(5.0),
            cycle_tag: Some("2025-09".to_string()),
            budget_cap: None,
        }),
    };

    repo.create(input).await.expect("Create should succeed");

    let cashback = CashbackRepository::new(db);
    let balance = cashback
        .get_balance(account_id, "2025-09")
        .await
        .expect("Balance lookup should succeed");
    assert_eq!(balance, dec!(4.12));
}

#[tokio::test]
async fn test_invalid_intent_rejected_and_nothing_persisted() {
    let Some(db) = test_db().await else { return };
    let (person_id, account_id) = seed_person_and_account(&db).await;
    let repo = TransactionRepository::new(db.clone());

    let transaction_id = Uuid::new_v4();
    let mut input = base_input(account_id, dec!(10.00));
    input.id = Some(transaction_id);
    input.person_id = Some(person_id);
    input.intent = PostingIntent {
        person_id: Some(person_id),
        debt_movement: Some(DebtIntent {
            movement_kind: "loan".to_string(),
            cycle_tag: None,
        }),
        cashback: None,
    };

    let result = repo.create(input).await;
    assert!(matches!(result, Err(TransactionError::Validation(_))));

    // The transaction row must not exist either.
    assert!(matches!(
        repo.get(transaction_id).await,
        Err(TransactionError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_rolls_back_ledger_contributions() {
    let Some(db) = test_db().await else { return };
    let (person_id, account_id) = seed_person_and_account(&db).await;
    let repo = TransactionRepository::new(db.clone());

    let mut input = base_input(account_id, dec!(500.00));
    input.kind = TransactionKind::Debt;
    input.person_id = Some(person_id);
    input.intent = PostingIntent {
        person_id: Some(person_id),
        debt_movement: Some(DebtIntent {
            movement_kind: "borrow".to_string(),
            cycle_tag: None,
        }),
        cashback: None,
    };

    let transaction = repo.create(input).await.expect("Create should succeed");

    let debt = DebtRepository::new(db.clone());
    assert_eq!(
        debt.get_balance(person_id, None)
            .await
            .expect("Balance lookup should succeed"),
        dec!(500.00)
    );

    repo.delete(transaction.id)
        .await
        .expect("Delete should succeed");

    // The ledger row survives but no longer carries the contribution.
    assert_eq!(
        debt.get_balance(person_id, None)
            .await
            .expect("Balance lookup should succeed"),
        dec!(0.00)
    );

    assert!(matches!(
        repo.get(transaction.id).await,
        Err(TransactionError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_update_without_intent_does_not_touch_ledgers() {
    let Some(db) = test_db().await else { return };
    let (person_id, account_id) = seed_person_and_account(&db).await;
    let repo = TransactionRepository::new(db.clone());

    let mut input = base_input(account_id, dec!(100.00));
    input.kind = TransactionKind::Debt;
    input.person_id = Some(person_id);
    input.intent = PostingIntent {
        person_id: Some(person_id),
        debt_movement: Some(DebtIntent {
            movement_kind: "borrow".to_string(),
            cycle_tag: None,
        }),
        cashback: None,
    };

    let transaction = repo.create(input).await.expect("Create should succeed");

    let updated = repo
        .update(
            transaction.id,
            UpdateTransactionInput {
                notes: Some(Some("lunch money".to_string())),
                ..UpdateTransactionInput::default()
            },
        )
        .await
        .expect("Update should succeed");
    assert_eq!(updated.notes.as_deref(), Some("lunch money"));

    let debt = DebtRepository::new(db);
    assert_eq!(
        debt.get_balance(person_id, None)
            .await
            .expect("Balance lookup should succeed"),
        dec!(100.00)
    );
}

#[tokio::test]
async fn test_update_unknown_transaction_not_found() {
    let Some(db) = test_db().await else { return };
    let repo = TransactionRepository::new(db);

    let missing = Uuid::new_v4();
    let result = repo.update(missing, UpdateTransactionInput::default()).await;
    assert!(matches!(result, Err(TransactionError::NotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_delete_unknown_transaction_not_found() {
    let Some(db) = test_db().await else { return };
    let repo = TransactionRepository::new(db);

    let missing = Uuid::new_v4();
    let result = repo.delete(missing).await;
    assert!(matches!(result, Err(TransactionError::NotFound(id)) if id == missing));
}
