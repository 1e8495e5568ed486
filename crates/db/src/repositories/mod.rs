//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. The cashback and debt repositories are the two ledger
//! engines; the transaction repository is the lifecycle manager that
//! routes ledger side effects through the orchestrator.

pub mod account;
pub mod cashback;
pub mod category;
pub mod debt;
pub mod orchestrator;
pub mod person;
pub mod shop;
pub mod subscription;
pub mod transaction;

pub use account::{AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput};
pub use cashback::{CashbackError, CashbackRepository, CreateCashbackMovementInput};
pub use category::{CategoryError, CategoryRepository, CreateCategoryInput};
pub use debt::{CreateDebtMovementInput, DebtError, DebtRepository};
pub use orchestrator::{
    CashbackIntent, DebtIntent, LedgerEffect, LedgerOrchestrator, OrchestratorError,
    PostingIntent,
};
pub use person::{CreatePersonInput, PersonError, PersonRepository, UpdatePersonInput};
pub use shop::{CreateShopInput, ShopError, ShopRepository};
pub use subscription::{
    CreateSubscriptionInput, SubscriptionError, SubscriptionRepository, UpdateSubscriptionInput,
};
pub use transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    UpdateTransactionInput,
};
