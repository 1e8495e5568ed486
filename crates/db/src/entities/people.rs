//! `SeaORM` Entity for people table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "people")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub note: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::debt_movements::Entity")]
    DebtMovements,
    #[sea_orm(has_many = "super::debt_ledgers::Entity")]
    DebtLedgers,
}

impl Related<super::debt_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DebtMovements.def()
    }
}

impl Related<super::debt_ledgers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DebtLedgers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
