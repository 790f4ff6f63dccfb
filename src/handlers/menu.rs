use axum::{
    extract::{Path, State},
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::catalog::{MenuEntry, RecipeDetails};
use crate::{errors::ServiceError, ApiResponse, AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuPortionResponse {
    pub portion_id: Uuid,
    pub portion_name: String,
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuEntryResponse {
    pub food_item_id: Uuid,
    pub food_item_name: String,
    pub category_id: Uuid,
    pub portions: Vec<MenuPortionResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngredientRequirementResponse {
    pub ingredient_id: Uuid,
    pub quantity_per_unit: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    pub food_item_id: Uuid,
    pub food_item_name: String,
    pub food_item_active: bool,
    pub portion_id: Uuid,
    pub portion_name: String,
    pub portion_active: bool,
    pub price: Decimal,
    pub ingredients: Vec<IngredientRequirementResponse>,
}

fn map_entry(entry: MenuEntry) -> MenuEntryResponse {
    MenuEntryResponse {
        food_item_id: entry.food_item_id,
        food_item_name: entry.food_item_name,
        category_id: entry.category_id,
        portions: entry
            .portions
            .into_iter()
            .map(|p| MenuPortionResponse {
                portion_id: p.portion_id,
                portion_name: p.portion_name,
                price: p.price,
            })
            .collect(),
    }
}

fn map_recipe(recipe: RecipeDetails) -> RecipeResponse {
    RecipeResponse {
        food_item_id: recipe.food_item_id,
        food_item_name: recipe.food_item_name,
        food_item_active: recipe.food_item_active,
        portion_id: recipe.portion_id,
        portion_name: recipe.portion_name,
        portion_active: recipe.portion_active,
        price: recipe.price,
        ingredients: recipe
            .ingredients
            .into_iter()
            .map(|r| IngredientRequirementResponse {
                ingredient_id: r.ingredient_id,
                quantity_per_unit: r.quantity_per_unit,
            })
            .collect(),
    }
}

/// List the active menu (items with priced portions)
#[utoipa::path(
    get,
    path = "/api/v1/menu",
    responses(
        (status = 200, description = "Menu retrieved", body = ApiResponse<Vec<MenuEntryResponse>>),
    ),
    tag = "menu"
)]
pub async fn get_menu(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MenuEntryResponse>>>, ServiceError> {
    let entries = state.services.catalog.menu().await?;
    Ok(Json(ApiResponse::success(
        entries.into_iter().map(map_entry).collect(),
    )))
}

/// Get the recipe for a (food item, portion) combination
#[utoipa::path(
    get,
    path = "/api/v1/menu/items/{food_item_id}/portions/{portion_id}",
    params(
        ("food_item_id" = Uuid, Path, description = "Food item id"),
        ("portion_id" = Uuid, Path, description = "Portion id"),
    ),
    responses(
        (status = 200, description = "Recipe retrieved", body = ApiResponse<RecipeResponse>),
        (status = 404, description = "Combination not found", body = crate::errors::ErrorResponse),
    ),
    tag = "menu"
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path((food_item_id, portion_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<RecipeResponse>>, ServiceError> {
    let recipe = state
        .services
        .catalog
        .get_recipe(food_item_id, portion_id)
        .await?;
    Ok(Json(ApiResponse::success(map_recipe(recipe))))
}
