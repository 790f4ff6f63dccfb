use crate::{
    db::DbPool,
    entities::{food_item, food_item_portion, portion, portion_ingredient},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// One ingredient requirement of a recipe: quantity consumed per unit sold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRequirement {
    pub ingredient_id: Uuid,
    pub quantity_per_unit: Decimal,
}

/// Fully resolved (food item, portion) combination: price, active flags and
/// the ingredient requirements needed to produce one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetails {
    pub food_item_portion_id: Uuid,
    pub food_item_id: Uuid,
    pub food_item_name: String,
    pub food_item_active: bool,
    pub portion_id: Uuid,
    pub portion_name: String,
    pub portion_active: bool,
    pub price: Decimal,
    pub ingredients: Vec<IngredientRequirement>,
}

/// Priced portion of a menu entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuPortion {
    pub portion_id: Uuid,
    pub portion_name: String,
    pub price: Decimal,
}

/// Active menu item with its orderable portions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuEntry {
    pub food_item_id: Uuid,
    pub food_item_name: String,
    pub category_id: Uuid,
    pub portions: Vec<MenuPortion>,
}

/// Read-only catalog resolution for menu items, portions and recipes.
#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Resolves a (food item, portion) pair into its recipe.
    ///
    /// Generic over the connection so order placement can run the lookup
    /// on its open transaction and observe the same snapshot as the
    /// subsequent stock check.
    #[instrument(skip(self, conn), fields(food_item_id = %food_item_id, portion_id = %portion_id))]
    pub async fn lookup_recipe<C: ConnectionTrait>(
        &self,
        conn: &C,
        food_item_id: Uuid,
        portion_id: Uuid,
    ) -> Result<RecipeDetails, ServiceError> {
        let combination = food_item_portion::Entity::find()
            .filter(food_item_portion::Column::FoodItemId.eq(food_item_id))
            .filter(food_item_portion::Column::PortionId.eq(portion_id))
            .one(conn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "No portion combination for food item {} and portion {}",
                    food_item_id, portion_id
                ))
            })?;

        let item = food_item::Entity::find_by_id(food_item_id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Food item {} not found", food_item_id))
            })?;

        let portion = portion::Entity::find_by_id(portion_id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Portion {} not found", portion_id)))?;

        let ingredients = portion_ingredient::Entity::find()
            .filter(portion_ingredient::Column::FoodItemPortionId.eq(combination.id))
            .all(conn)
            .await?
            .into_iter()
            .map(|row| IngredientRequirement {
                ingredient_id: row.ingredient_id,
                quantity_per_unit: row.quantity,
            })
            .collect();

        Ok(RecipeDetails {
            food_item_portion_id: combination.id,
            food_item_id: item.id,
            food_item_name: item.name,
            food_item_active: item.is_active,
            portion_id: portion.id,
            portion_name: portion.name,
            portion_active: portion.is_active,
            price: combination.price,
            ingredients,
        })
    }

    /// Recipe lookup against the shared pool (read endpoints).
    pub async fn get_recipe(
        &self,
        food_item_id: Uuid,
        portion_id: Uuid,
    ) -> Result<RecipeDetails, ServiceError> {
        self.lookup_recipe(&*self.db_pool, food_item_id, portion_id)
            .await
    }

    /// Lists every active food item with its active, priced portions.
    #[instrument(skip(self))]
    pub async fn menu(&self) -> Result<Vec<MenuEntry>, ServiceError> {
        let db = &*self.db_pool;

        let items = food_item::Entity::find()
            .filter(food_item::Column::IsActive.eq(true))
            .order_by_asc(food_item::Column::Name)
            .all(db)
            .await?;

        let portions = portion::Entity::find()
            .filter(portion::Column::IsActive.eq(true))
            .all(db)
            .await?;

        let combinations = food_item_portion::Entity::find().all(db).await?;

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let portions_for_item: Vec<MenuPortion> = combinations
                .iter()
                .filter(|combo| combo.food_item_id == item.id)
                .filter_map(|combo| {
                    portions
                        .iter()
                        .find(|p| p.id == combo.portion_id)
                        .map(|p| MenuPortion {
                            portion_id: p.id,
                            portion_name: p.name.clone(),
                            price: combo.price,
                        })
                })
                .collect();

            entries.push(MenuEntry {
                food_item_id: item.id,
                food_item_name: item.name,
                category_id: item.category_id,
                portions: portions_for_item,
            });
        }

        Ok(entries)
    }
}
