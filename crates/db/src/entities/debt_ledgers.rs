//! `SeaORM` Entity for debt_ledgers table.
//!
//! One row per (person, cycle); a NULL cycle tag is the person's rolling
//! ledger and forms its own single group under the unique index. Created
//! lazily on first movement, never deleted by the engines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DebtLedgerStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "debt_ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub person_id: Uuid,
    pub cycle_tag: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub initial_debt: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub new_debt: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub repayments: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub debt_discount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub net_debt: Decimal,
    pub status: DebtLedgerStatus,
    pub notes: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::people::Entity",
        from = "Column::PersonId",
        to = "super::people::Column::Id"
    )]
    People,
}

impl Related<super::people::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::People.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
