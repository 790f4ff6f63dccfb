use crate::{
    db::DbPool,
    entities::{
        customer,
        order::{self, Entity as OrderEntity, OrderStatus},
        order_item::{self, Entity as OrderItemEntity},
        payment, staff,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        catalog::CatalogService,
        customers::{CustomerDetails, CustomerService},
        demand::{self, PricedLine},
        inventory::InventoryService,
    },
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Request/Response types for the order service
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderLineRequest {
    pub food_item_id: Uuid,
    pub portion_id: Uuid,
    pub quantity: i32,
    pub special_request: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentDetails {
    pub received_amount: Decimal,
    #[validate(length(min = 1, message = "Payment mode is required"))]
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub table_number: Option<i32>,
    pub staff_id: Uuid,
    /// Display name used when the profile permits synthesizing a staff row.
    pub staff_name: Option<String>,
    pub lines: Vec<OrderLineRequest>,
    pub notes: Option<String>,
    pub customer: Option<CustomerDetails>,
    pub payment: Option<PaymentDetails>,
}

/// Parameterizes the shared placement core per calling context, so the
/// waiter, cashier and quick-bill entry points run one code path instead
/// of three near-identical ones.
#[derive(Debug, Clone, Copy)]
pub struct PlacementProfile {
    pub initial_status: OrderStatus,
    pub requires_table_number: bool,
    pub requires_customer: bool,
    pub allow_staff_synthesis: bool,
    pub issues_bill_number: bool,
}

impl PlacementProfile {
    /// Table-service order; starts PENDING and moves through the kitchen
    /// lifecycle.
    pub const WAITER: Self = Self {
        initial_status: OrderStatus::Pending,
        requires_table_number: true,
        requires_customer: false,
        allow_staff_synthesis: false,
        issues_bill_number: false,
    };

    /// Counter sale; created directly COMPLETED with a bill number.
    pub const CASHIER: Self = Self {
        initial_status: OrderStatus::Completed,
        requires_table_number: false,
        requires_customer: true,
        allow_staff_synthesis: false,
        issues_bill_number: true,
    };

    /// Admin-created bill with no table or customer; the staff row may be
    /// synthesized to keep order attribution intact.
    pub const QUICK_BILL: Self = Self {
        initial_status: OrderStatus::Completed,
        requires_table_number: false,
        requires_customer: false,
        allow_staff_synthesis: true,
        issues_bill_number: true,
    };
}

/// Fully materialized order graph returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: order::Model,
    pub items: Vec<order_item::Model>,
    pub staff: staff::Model,
    pub customer: Option<customer::Model>,
    pub payments: Vec<payment::Model>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<order::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service owning order placement and the order lifecycle.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    catalog: Arc<CatalogService>,
    inventory: Arc<InventoryService>,
    customers: Arc<CustomerService>,
}

impl OrderService {
    /// Creates a new order service instance
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        catalog: Arc<CatalogService>,
        inventory: Arc<InventoryService>,
        customers: Arc<CustomerService>,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            catalog,
            inventory,
            customers,
        }
    }

    /// Places a waiter (table service) order.
    pub async fn place_waiter_order(
        &self,
        request: PlaceOrderRequest,
    ) -> Result<OrderDetails, ServiceError> {
        self.place_order(request, PlacementProfile::WAITER).await
    }

    /// Places a cashier (counter sale) order.
    pub async fn place_cashier_order(
        &self,
        request: PlaceOrderRequest,
    ) -> Result<OrderDetails, ServiceError> {
        self.place_order(request, PlacementProfile::CASHIER).await
    }

    /// Places a quick bill.
    pub async fn place_quick_bill(
        &self,
        request: PlaceOrderRequest,
    ) -> Result<OrderDetails, ServiceError> {
        self.place_order(request, PlacementProfile::QUICK_BILL).await
    }

    /// The shared placement core: validate, resolve, aggregate, check
    /// availability, decrement stock and persist the order graph — all
    /// inside one transaction. Any failure rolls back everything; no
    /// partial order or partial stock decrement is ever visible.
    #[instrument(skip(self, request), fields(staff_id = %request.staff_id, line_count = request.lines.len()))]
    pub async fn place_order(
        &self,
        request: PlaceOrderRequest,
        profile: PlacementProfile,
    ) -> Result<OrderDetails, ServiceError> {
        self.validate_request(&request, &profile)?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order placement");
            ServiceError::DatabaseError(e)
        })?;

        let staff = self.resolve_staff(&txn, &request, &profile).await?;

        let customer = match &request.customer {
            Some(details) => Some(
                self.customers
                    .find_or_create_by_phone(&txn, details)
                    .await?,
            ),
            None => None,
        };

        // Resolve every line against the catalog on this transaction so the
        // availability check below sees the same snapshot.
        let mut priced_lines = Vec::with_capacity(request.lines.len());
        let mut recipes = Vec::with_capacity(request.lines.len());
        for line in &request.lines {
            let recipe = self
                .catalog
                .lookup_recipe(&txn, line.food_item_id, line.portion_id)
                .await?;

            if !recipe.food_item_active {
                return Err(ServiceError::DisabledEntity(format!(
                    "Food item {} is disabled",
                    recipe.food_item_name
                )));
            }
            if !recipe.portion_active {
                return Err(ServiceError::DisabledEntity(format!(
                    "Portion {} is disabled",
                    recipe.portion_name
                )));
            }

            priced_lines.push(PricedLine {
                quantity: line.quantity,
                unit_price: recipe.price,
                ingredients: recipe
                    .ingredients
                    .iter()
                    .map(|r| (r.ingredient_id, r.quantity_per_unit))
                    .collect(),
            });
            recipes.push(recipe);
        }

        let order_demand = demand::aggregate(&priced_lines);

        self.inventory.check_availability(&txn, &order_demand).await?;
        self.inventory.apply_decrements(&txn, &order_demand).await?;

        let order_active = order::ActiveModel {
            id: Set(order_id),
            order_number: Set(format!(
                "ORD-{}",
                order_id.to_string()[..8].to_uppercase()
            )),
            bill_number: Set(profile.issues_bill_number.then(|| {
                format!("BILL-{}", order_id.to_string()[..8].to_uppercase())
            })),
            table_number: Set(request.table_number),
            staff_id: Set(staff.id),
            customer_id: Set(customer.as_ref().map(|(model, _)| model.id)),
            status: Set(profile.initial_status.as_str().to_string()),
            total_amount: Set(order_demand.total_amount),
            notes: Set(request.notes.clone()),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let order_model = order_active.insert(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to create order in database");
            ServiceError::DatabaseError(e)
        })?;

        let mut items = Vec::with_capacity(request.lines.len());
        for (line, recipe) in request.lines.iter().zip(recipes.iter()) {
            let line_total = recipe.price * Decimal::from(line.quantity);
            let item = order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                food_item_id: Set(line.food_item_id),
                portion_id: Set(line.portion_id),
                food_item_name: Set(recipe.food_item_name.clone()),
                portion_name: Set(recipe.portion_name.clone()),
                quantity: Set(line.quantity),
                unit_price: Set(recipe.price),
                total_price: Set(line_total),
                special_request: Set(line.special_request.clone()),
                created_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to create order item");
                ServiceError::DatabaseError(e)
            })?;
            items.push(item);
        }

        let mut payments = Vec::new();
        if let Some(details) = &request.payment {
            let payment_model = payment::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                amount: Set(order_demand.total_amount),
                received_amount: Set(details.received_amount),
                balance_amount: Set(details.received_amount - order_demand.total_amount),
                mode: Set(details.mode.clone()),
                created_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to create payment record");
                ServiceError::DatabaseError(e)
            })?;
            payments.push(payment_model);
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order placement transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            order_id = %order_id,
            staff_id = %staff.id,
            total_amount = %order_model.total_amount,
            status = %order_model.status,
            "Order placed successfully"
        );

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::OrderPlaced {
                    order_id,
                    staff_id: staff.id,
                    total_amount: order_model.total_amount,
                    placed_at: now,
                })
                .await
            {
                warn!(error = %e, order_id = %order_id, "Failed to send order placed event");
            }

            if let Some((customer_model, true)) = &customer {
                if let Err(e) = event_sender
                    .send(Event::CustomerCreated(customer_model.id))
                    .await
                {
                    warn!(error = %e, customer_id = %customer_model.id, "Failed to send customer created event");
                }
            }
        }

        // Reorder-level alerting reads committed state, off the critical path
        self.inventory
            .notify_low_stock(order_demand.per_ingredient.keys().copied().collect())
            .await;

        Ok(OrderDetails {
            order: order_model,
            items,
            staff,
            customer: customer.map(|(model, _)| model),
            payments,
        })
    }

    /// Retrieves the full order graph by id.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderDetails, ServiceError> {
        let db = &*self.db_pool;

        let order_model = OrderEntity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(db)
            .await?;

        let staff_model = staff::Entity::find_by_id(order_model.staff_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Staff member {} not found", order_model.staff_id))
            })?;

        let customer_model = match order_model.customer_id {
            Some(customer_id) => customer::Entity::find_by_id(customer_id).one(db).await?,
            None => None,
        };

        let payments = payment::Entity::find()
            .filter(payment::Column::OrderId.eq(order_id))
            .all(db)
            .await?;

        Ok(OrderDetails {
            order: order_model,
            items,
            staff: staff_model,
            customer: customer_model,
            payments,
        })
    }

    /// Lists orders with pagination, newest first.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<OrderListResponse, ServiceError> {
        if page == 0 {
            return Err(ServiceError::ValidationError(
                "Page number must be greater than 0".to_string(),
            ));
        }
        if per_page == 0 || per_page > 1000 {
            return Err(ServiceError::ValidationError(
                "Limit must be between 1 and 1000".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let paginator = OrderEntity::find()
            .order_by_desc(order::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count orders");
            ServiceError::DatabaseError(e)
        })?;

        let orders = paginator.fetch_page(page - 1).await.map_err(|e| {
            error!(error = %e, page = page, per_page = per_page, "Failed to fetch orders page");
            ServiceError::DatabaseError(e)
        })?;

        Ok(OrderListResponse {
            orders,
            total,
            page,
            per_page,
        })
    }

    /// Moves an order along its lifecycle, enforcing allowed transitions.
    #[instrument(skip(self), fields(order_id = %order_id, new_status = %new_status.as_str()))]
    pub async fn update_order_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
        notes: Option<String>,
    ) -> Result<order::Model, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to start transaction for status update");
            ServiceError::DatabaseError(e)
        })?;

        let order_model = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                warn!(order_id = %order_id, "Order not found for status update");
                ServiceError::NotFound(format!("Order {} not found", order_id))
            })?;

        let current = OrderStatus::from_str(&order_model.status).ok_or_else(|| {
            ServiceError::InvalidStatus(format!(
                "Order {} has unrecognized status {}",
                order_id, order_model.status
            ))
        })?;

        if !current.can_transition_to(new_status) {
            return Err(ServiceError::InvalidStatus(format!(
                "Cannot move order from {} to {}",
                current.as_str(),
                new_status.as_str()
            )));
        }

        let old_status = order_model.status.clone();

        let mut order_active: order::ActiveModel = order_model.into();
        order_active.status = Set(new_status.as_str().to_string());
        order_active.updated_at = Set(Some(now));
        if let Some(notes) = notes {
            order_active.notes = Set(Some(notes));
        }

        let updated_order = order_active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to update order status");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit status update transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            order_id = %order_id,
            old_status = %old_status,
            new_status = %new_status.as_str(),
            "Order status updated"
        );

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::OrderStatusChanged {
                    order_id,
                    old_status,
                    new_status: new_status.as_str().to_string(),
                })
                .await
            {
                warn!(error = %e, order_id = %order_id, "Failed to send status changed event");
            }
        }

        Ok(updated_order)
    }

    /// Cancels an order. Only reachable from PREPARING; consumed
    /// ingredients are NOT returned to stock, since preparation has
    /// already physically used them.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel_order(
        &self,
        order_id: Uuid,
        reason: Option<String>,
    ) -> Result<order::Model, ServiceError> {
        let updated = self
            .update_order_status(order_id, OrderStatus::Cancelled, reason.clone())
            .await?;

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::OrderCancelled { order_id, reason })
                .await
            {
                warn!(error = %e, order_id = %order_id, "Failed to send order cancelled event");
            }
        }

        Ok(updated)
    }

    /// Rejects malformed requests before any store access.
    fn validate_request(
        &self,
        request: &PlaceOrderRequest,
        profile: &PlacementProfile,
    ) -> Result<(), ServiceError> {
        if request.lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "Order must contain at least one line".to_string(),
            ));
        }

        for line in &request.lines {
            if line.quantity < 1 {
                return Err(ServiceError::ValidationError(format!(
                    "Line quantity must be at least 1 (got {})",
                    line.quantity
                )));
            }
        }

        if profile.requires_table_number && request.table_number.is_none() {
            return Err(ServiceError::ValidationError(
                "Table number is required for this order type".to_string(),
            ));
        }

        if profile.requires_customer && request.customer.is_none() {
            return Err(ServiceError::ValidationError(
                "Customer details are required for this order type".to_string(),
            ));
        }

        if let Some(details) = &request.customer {
            details
                .validate()
                .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        }

        if let Some(payment) = &request.payment {
            payment
                .validate()
                .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
            if payment.received_amount < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Received amount must not be negative".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Resolves the staff member an order is attributed to, synthesizing a
    /// row for admin-created bills when the profile allows it.
    async fn resolve_staff<C: ConnectionTrait>(
        &self,
        conn: &C,
        request: &PlaceOrderRequest,
        profile: &PlacementProfile,
    ) -> Result<staff::Model, ServiceError> {
        if let Some(existing) = staff::Entity::find_by_id(request.staff_id).one(conn).await? {
            if !existing.is_active {
                return Err(ServiceError::DisabledEntity(format!(
                    "Staff member {} is disabled",
                    existing.name
                )));
            }
            return Ok(existing);
        }

        if profile.allow_staff_synthesis {
            let name = request.staff_name.clone().ok_or_else(|| {
                ServiceError::ValidationError(
                    "Staff name is required to bill for an unregistered staff member".to_string(),
                )
            })?;

            let now = Utc::now();
            let model = staff::ActiveModel {
                id: Set(request.staff_id),
                name: Set(name),
                role: Set("admin".to_string()),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(Some(now)),
            }
            .insert(conn)
            .await?;

            info!(staff_id = %model.id, "Synthesized staff record for admin-created bill");
            return Ok(model);
        }

        Err(ServiceError::NotFound(format!(
            "Staff member {} not found",
            request.staff_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DatabaseConnection;
    use tokio::sync::mpsc;

    fn test_service() -> OrderService {
        let db = Arc::new(DatabaseConnection::Disconnected);
        let (tx, _rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);
        OrderService::new(
            db.clone(),
            None,
            Arc::new(CatalogService::new(db.clone())),
            Arc::new(InventoryService::new(db.clone(), sender)),
            Arc::new(CustomerService::new(db)),
        )
    }

    fn valid_line() -> OrderLineRequest {
        OrderLineRequest {
            food_item_id: Uuid::new_v4(),
            portion_id: Uuid::new_v4(),
            quantity: 2,
            special_request: None,
        }
    }

    fn base_request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            table_number: Some(4),
            staff_id: Uuid::new_v4(),
            staff_name: None,
            lines: vec![valid_line()],
            notes: None,
            customer: None,
            payment: None,
        }
    }

    #[test]
    fn rejects_empty_line_list() {
        let service = test_service();
        let mut request = base_request();
        request.lines.clear();

        let result = service.validate_request(&request, &PlacementProfile::WAITER);
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let service = test_service();

        for bad_quantity in [0, -3] {
            let mut request = base_request();
            request.lines[0].quantity = bad_quantity;
            let result = service.validate_request(&request, &PlacementProfile::WAITER);
            assert!(matches!(result, Err(ServiceError::ValidationError(_))));
        }
    }

    #[test]
    fn waiter_profile_requires_table_number() {
        let service = test_service();
        let mut request = base_request();
        request.table_number = None;

        let result = service.validate_request(&request, &PlacementProfile::WAITER);
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));

        // Same request is fine for a quick bill
        let result = service.validate_request(&request, &PlacementProfile::QUICK_BILL);
        assert!(result.is_ok());
    }

    #[test]
    fn cashier_profile_requires_customer() {
        let service = test_service();
        let request = base_request();

        let result = service.validate_request(&request, &PlacementProfile::CASHIER);
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[test]
    fn rejects_negative_received_amount() {
        let service = test_service();
        let mut request = base_request();
        request.payment = Some(PaymentDetails {
            received_amount: Decimal::from(-5),
            mode: "cash".to_string(),
        });

        let result = service.validate_request(&request, &PlacementProfile::WAITER);
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[test]
    fn placement_profiles_match_calling_contexts() {
        assert_eq!(PlacementProfile::WAITER.initial_status, OrderStatus::Pending);
        assert!(!PlacementProfile::WAITER.issues_bill_number);

        assert_eq!(
            PlacementProfile::CASHIER.initial_status,
            OrderStatus::Completed
        );
        assert!(PlacementProfile::CASHIER.issues_bill_number);

        assert_eq!(
            PlacementProfile::QUICK_BILL.initial_status,
            OrderStatus::Completed
        );
        assert!(PlacementProfile::QUICK_BILL.allow_staff_synthesis);
    }
}
