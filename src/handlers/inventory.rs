use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::ingredient;
use crate::services::inventory::RestockCommand;
use crate::{errors::ServiceError, ApiResponse, AppState, ListQuery, PaginatedResponse};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngredientResponse {
    pub id: Uuid,
    pub name: String,
    pub unit_of_measurement: String,
    pub current_stock: Decimal,
    pub reorder_level: Decimal,
    pub is_active: bool,
    /// True when current stock sits at or below the reorder level.
    pub low_stock: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RestockBody {
    pub quantity: Decimal,
    pub reason: Option<String>,
}

fn map_ingredient(model: ingredient::Model) -> IngredientResponse {
    let low_stock = model.current_stock <= model.reorder_level;
    IngredientResponse {
        id: model.id,
        name: model.name,
        unit_of_measurement: model.unit_of_measurement,
        current_stock: model.current_stock,
        reorder_level: model.reorder_level,
        is_active: model.is_active,
        low_stock,
    }
}

/// List ingredients with pagination
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
    ),
    responses(
        (status = 200, description = "Ingredients retrieved", body = ApiResponse<PaginatedResponse<IngredientResponse>>),
    ),
    tag = "inventory"
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<IngredientResponse>>>, ServiceError> {
    let (items, total) = state
        .services
        .inventory
        .list_ingredients(query.page, query.limit)
        .await?;

    let total_pages = total.div_ceil(query.limit);

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items: items.into_iter().map(map_ingredient).collect(),
        total,
        page: query.page,
        limit: query.limit,
        total_pages,
    })))
}

/// List ingredients at or below their reorder level
#[utoipa::path(
    get,
    path = "/api/v1/ingredients/low-stock",
    responses(
        (status = 200, description = "Low-stock ingredients retrieved", body = ApiResponse<Vec<IngredientResponse>>),
    ),
    tag = "inventory"
)]
pub async fn low_stock(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<IngredientResponse>>>, ServiceError> {
    let rows = state.services.inventory.low_stock().await?;
    Ok(Json(ApiResponse::success(
        rows.into_iter().map(map_ingredient).collect(),
    )))
}

/// Get an ingredient by id
#[utoipa::path(
    get,
    path = "/api/v1/ingredients/{id}",
    params(("id" = Uuid, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient retrieved", body = ApiResponse<IngredientResponse>),
        (status = 404, description = "Ingredient not found", body = crate::errors::ErrorResponse),
    ),
    tag = "inventory"
)]
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<IngredientResponse>>, ServiceError> {
    let model = state.services.inventory.get_ingredient(id).await?;
    Ok(Json(ApiResponse::success(map_ingredient(model))))
}

/// Increment an ingredient's stock
#[utoipa::path(
    post,
    path = "/api/v1/ingredients/{id}/restock",
    params(("id" = Uuid, Path, description = "Ingredient id")),
    request_body = RestockBody,
    responses(
        (status = 200, description = "Ingredient restocked", body = ApiResponse<IngredientResponse>),
        (status = 400, description = "Invalid quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Ingredient not found", body = crate::errors::ErrorResponse),
    ),
    tag = "inventory"
)]
pub async fn restock_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RestockBody>,
) -> Result<Json<ApiResponse<IngredientResponse>>, ServiceError> {
    let model = state
        .services
        .inventory
        .restock(
            id,
            RestockCommand {
                quantity: body.quantity,
                reason: body.reason,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(map_ingredient(model))))
}
