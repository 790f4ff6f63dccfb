use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Raw stock item tracked with a quantity and unit of measurement.
///
/// `current_stock` is the only contended mutable column in the system; it
/// is decremented exclusively inside the order placement transaction and
/// incremented by the restock operation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Ingredient name must be 1-100 characters"))]
    pub name: String,

    pub unit_of_measurement: String,
    pub current_stock: Decimal,
    pub reorder_level: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::portion_ingredient::Entity")]
    PortionIngredient,
}

impl Related<super::portion_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PortionIngredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
