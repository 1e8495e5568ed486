//! Database seeder for Kakebo development and testing.
//!
//! Seeds a starter account catalog, a couple of people, and common
//! categories for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use kakebo_db::entities::{
    accounts, categories, people,
    sea_orm_active_enums::{AccountKind, CategoryDirection},
};

/// Wallet account ID (consistent for all seeds)
const WALLET_ACCOUNT_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Main bank account ID (consistent for all seeds)
const BANK_ACCOUNT_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Credit card account ID (consistent for all seeds)
const CARD_ACCOUNT_ID: &str = "00000000-0000-0000-0000-000000000003";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = kakebo_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding accounts...");
    seed_accounts(&db).await;

    println!("Seeding people...");
    seed_people(&db).await;

    println!("Seeding categories...");
    seed_categories(&db).await;

    println!("Seeding complete!");
}

fn fixed_id(id: &str) -> Uuid {
    Uuid::parse_str(id).expect("seed UUID literal")
}

/// Seeds the starter account catalog.
async fn seed_accounts(db: &DatabaseConnection) {
    let seeds = [
        (WALLET_ACCOUNT_ID, "Wallet", AccountKind::Cash),
        (BANK_ACCOUNT_ID, "Main Bank", AccountKind::Bank),
        (CARD_ACCOUNT_ID, "Rewards Card", AccountKind::CreditCard),
    ];

    for (id, name, kind) in seeds {
        let id = fixed_id(id);
        if accounts::Entity::find_by_id(id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Account '{name}' already exists, skipping...");
            continue;
        }

        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            kind: Set(kind),
            currency: Set("USD".to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        account.insert(db).await.expect("Failed to seed account");
    }
}

/// Seeds example debt counterparties.
async fn seed_people(db: &DatabaseConnection) {
    for name in ["Alex", "Sam"] {
        let existing = people::Entity::find()
            .all(db)
            .await
            .unwrap_or_default()
            .into_iter()
            .any(|p| p.name == name);
        if existing {
            println!("  Person '{name}' already exists, skipping...");
            continue;
        }

        let now = Utc::now().into();
        let person = people::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            note: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        person.insert(db).await.expect("Failed to seed person");
    }
}

/// Seeds common expense and income categories.
async fn seed_categories(db: &DatabaseConnection) {
    let seeds = [
        ("Groceries", CategoryDirection::Expense),
        ("Dining", CategoryDirection::Expense),
        ("Transport", CategoryDirection::Expense),
        ("Utilities", CategoryDirection::Expense),
        ("Salary", CategoryDirection::Income),
        ("Cashback", CategoryDirection::Income),
    ];

    let existing = categories::Entity::find().all(db).await.unwrap_or_default();

    for (name, direction) in seeds {
        if existing.iter().any(|c| c.name == name) {
            println!("  Category '{name}' already exists, skipping...");
            continue;
        }

        let now = Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            direction: Set(direction),
            parent_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        category.insert(db).await.expect("Failed to seed category");
    }
}
