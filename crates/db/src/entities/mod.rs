//! `SeaORM` entity definitions for the Kakebo schema.

pub mod accounts;
pub mod cashback_ledgers;
pub mod cashback_movements;
pub mod categories;
pub mod debt_ledgers;
pub mod debt_movements;
pub mod people;
pub mod sea_orm_active_enums;
pub mod shops;
pub mod subscriptions;
pub mod transactions;
