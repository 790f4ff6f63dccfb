use crate::{
    db::DbPool,
    entities::ingredient::{self, Entity as IngredientEntity},
    errors::{ServiceError, StockShortfall},
    events::{Event, EventSender},
    services::demand::OrderDemand,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Restock input for a single ingredient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestockCommand {
    pub quantity: Decimal,
    pub reason: Option<String>,
}

/// Service owning ingredient stock: the availability check and the ledger
/// decrement used by order placement, plus the operational surface
/// (restock, listings, low-stock alerting).
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl InventoryService {
    /// Creates a new inventory service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Verifies that every demanded ingredient has sufficient stock on the
    /// given connection (the caller's open transaction during placement).
    ///
    /// Collects every shortfall rather than stopping at the first, so one
    /// rejection carries everything the caller needs to fix the order.
    #[instrument(skip(self, conn, demand), fields(ingredient_count = demand.per_ingredient.len()))]
    pub async fn check_availability<C: ConnectionTrait>(
        &self,
        conn: &C,
        demand: &OrderDemand,
    ) -> Result<(), ServiceError> {
        if demand.per_ingredient.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = demand.per_ingredient.keys().copied().collect();
        let rows = IngredientEntity::find()
            .filter(ingredient::Column::Id.is_in(ids))
            .all(conn)
            .await?;

        let by_id: HashMap<Uuid, &ingredient::Model> =
            rows.iter().map(|row| (row.id, row)).collect();

        let mut shortfalls = Vec::new();
        for (ingredient_id, required) in &demand.per_ingredient {
            let row = by_id.get(ingredient_id).ok_or_else(|| {
                ServiceError::NotFound(format!("Ingredient {} not found", ingredient_id))
            })?;

            if *required > row.current_stock {
                shortfalls.push(StockShortfall {
                    ingredient_id: row.id,
                    ingredient_name: row.name.clone(),
                    required: *required,
                    available: row.current_stock,
                });
            }
        }

        if !shortfalls.is_empty() {
            warn!(
                shortfall_count = shortfalls.len(),
                "Order demand exceeds available stock"
            );
            return Err(ServiceError::InsufficientStock(shortfalls));
        }

        Ok(())
    }

    /// Applies the approved per-ingredient decrements on the caller's
    /// transaction. Each decrement is guarded by `current_stock >= required`
    /// at the storage layer; a zero-row update means a concurrent order won
    /// the race, and the resulting error aborts the whole transaction.
    #[instrument(skip(self, conn, demand), fields(ingredient_count = demand.per_ingredient.len()))]
    pub async fn apply_decrements<C: ConnectionTrait>(
        &self,
        conn: &C,
        demand: &OrderDemand,
    ) -> Result<(), ServiceError> {
        let now = Utc::now();

        // BTreeMap iteration keeps row updates in ingredient-id order
        for (ingredient_id, required) in &demand.per_ingredient {
            let result = IngredientEntity::update_many()
                .col_expr(
                    ingredient::Column::CurrentStock,
                    Expr::col(ingredient::Column::CurrentStock).sub(*required),
                )
                .col_expr(ingredient::Column::UpdatedAt, Expr::value(now))
                .filter(ingredient::Column::Id.eq(*ingredient_id))
                .filter(ingredient::Column::CurrentStock.gte(*required))
                .exec(conn)
                .await?;

            if result.rows_affected == 0 {
                let row = IngredientEntity::find_by_id(*ingredient_id)
                    .one(conn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Ingredient {} not found", ingredient_id))
                    })?;

                warn!(
                    ingredient_id = %ingredient_id,
                    required = %required,
                    available = %row.current_stock,
                    "Guarded stock decrement rejected"
                );
                return Err(ServiceError::InsufficientStock(vec![StockShortfall {
                    ingredient_id: row.id,
                    ingredient_name: row.name,
                    required: *required,
                    available: row.current_stock,
                }]));
            }
        }

        Ok(())
    }

    /// Emits a low-stock event for every given ingredient that sits at or
    /// below its reorder level. Best-effort: called after commit, failures
    /// are logged and swallowed.
    pub async fn notify_low_stock(&self, ingredient_ids: Vec<Uuid>) {
        if ingredient_ids.is_empty() {
            return;
        }

        let db = &*self.db_pool;
        let rows = match IngredientEntity::find()
            .filter(ingredient::Column::Id.is_in(ingredient_ids))
            .filter(
                Expr::col(ingredient::Column::CurrentStock)
                    .lte(Expr::col(ingredient::Column::ReorderLevel)),
            )
            .all(db)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Failed to read stock levels for low-stock alerting");
                return;
            }
        };

        for row in rows {
            if let Err(e) = self
                .event_sender
                .send(Event::IngredientStockLow {
                    ingredient_id: row.id,
                    name: row.name.clone(),
                    current_stock: row.current_stock,
                    reorder_level: row.reorder_level,
                })
                .await
            {
                warn!(error = %e, ingredient_id = %row.id, "Failed to send low-stock event");
            }
        }
    }

    /// Increments an ingredient's stock (the receiving side of the ledger).
    #[instrument(skip(self, command), fields(ingredient_id = %ingredient_id, quantity = %command.quantity))]
    pub async fn restock(
        &self,
        ingredient_id: Uuid,
        command: RestockCommand,
    ) -> Result<ingredient::Model, ServiceError> {
        if command.quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Restock quantity must be positive".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now();

        let result = IngredientEntity::update_many()
            .col_expr(
                ingredient::Column::CurrentStock,
                Expr::col(ingredient::Column::CurrentStock).add(command.quantity),
            )
            .col_expr(ingredient::Column::UpdatedAt, Expr::value(now))
            .filter(ingredient::Column::Id.eq(ingredient_id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Ingredient {} not found",
                ingredient_id
            )));
        }

        let row = IngredientEntity::find_by_id(ingredient_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Ingredient {} not found", ingredient_id))
            })?;

        info!(
            ingredient_id = %ingredient_id,
            new_stock = %row.current_stock,
            reason = ?command.reason,
            "Ingredient restocked"
        );

        if let Err(e) = self
            .event_sender
            .send(Event::IngredientRestocked {
                ingredient_id,
                quantity: command.quantity,
                new_stock: row.current_stock,
            })
            .await
        {
            warn!(error = %e, ingredient_id = %ingredient_id, "Failed to send restock event");
        }

        Ok(row)
    }

    /// Gets an ingredient by id.
    #[instrument(skip(self))]
    pub async fn get_ingredient(
        &self,
        ingredient_id: Uuid,
    ) -> Result<ingredient::Model, ServiceError> {
        let db = &*self.db_pool;

        IngredientEntity::find_by_id(ingredient_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Ingredient {} not found", ingredient_id))
            })
    }

    /// Lists ingredients with pagination.
    #[instrument(skip(self))]
    pub async fn list_ingredients(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ingredient::Model>, u64), ServiceError> {
        if page == 0 {
            return Err(ServiceError::ValidationError(
                "Page number must be greater than 0".to_string(),
            ));
        }
        if limit == 0 || limit > 1000 {
            return Err(ServiceError::ValidationError(
                "Limit must be between 1 and 1000".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let paginator = IngredientEntity::find()
            .order_by_asc(ingredient::Column::Name)
            .paginate(db, limit);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count ingredients");
            ServiceError::DatabaseError(e)
        })?;

        let items = paginator.fetch_page(page - 1).await.map_err(|e| {
            error!(page = %page, limit = %limit, error = %e, "Failed to fetch ingredients page");
            ServiceError::DatabaseError(e)
        })?;

        Ok((items, total))
    }

    /// Lists ingredients at or below their reorder level.
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<ingredient::Model>, ServiceError> {
        let db = &*self.db_pool;

        let rows = IngredientEntity::find()
            .filter(
                Expr::col(ingredient::Column::CurrentStock)
                    .lte(Expr::col(ingredient::Column::ReorderLevel)),
            )
            .order_by_asc(ingredient::Column::Name)
            .all(db)
            .await?;

        Ok(rows)
    }
}
