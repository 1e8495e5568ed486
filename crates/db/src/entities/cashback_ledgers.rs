//! `SeaORM` Entity for cashback_ledgers table.
//!
//! One row per (account, cycle), enforced by a unique constraint. Created
//! lazily on first movement, never deleted by the engines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CashbackEligibility, CashbackLedgerStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cashback_ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub cycle_tag: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_spend: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_cashback: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub budget_cap: Decimal,
    pub eligibility: CashbackEligibility,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub remaining_budget: Decimal,
    pub status: CashbackLedgerStatus,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
