use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priced combination of one food item and one portion, carrying the
/// recipe (per-unit ingredient requirements) through
/// `portion_ingredient`. A given (food_item_id, portion_id) pair has at
/// most one row, enforced by a unique index.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "food_item_portions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub food_item_id: Uuid,
    pub portion_id: Uuid,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::food_item::Entity",
        from = "Column::FoodItemId",
        to = "super::food_item::Column::Id"
    )]
    FoodItem,
    #[sea_orm(
        belongs_to = "super::portion::Entity",
        from = "Column::PortionId",
        to = "super::portion::Column::Id"
    )]
    Portion,
    #[sea_orm(has_many = "super::portion_ingredient::Entity")]
    PortionIngredient,
}

impl Related<super::food_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodItem.def()
    }
}

impl Related<super::portion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Portion.def()
    }
}

impl Related<super::portion_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PortionIngredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
