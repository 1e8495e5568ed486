//! `SeaORM` Entity for cashback_movements table.
//!
//! Movements are append-only: the only permitted mutation is the status
//! transition applied → invalidated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CashbackKind, CashbackMovementStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cashback_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub account_id: Uuid,
    pub cycle_tag: String,
    pub cashback_kind: CashbackKind,
    #[sea_orm(column_type = "Decimal(Some((9, 4)))")]
    pub cashback_value: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub cashback_amount: Decimal,
    pub status: CashbackMovementStatus,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub budget_cap: Decimal,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id"
    )]
    Transactions,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
