use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::entities::order::{self, OrderStatus};
use crate::services::customers::CustomerDetails;
use crate::services::orders::{
    OrderDetails, OrderLineRequest, PaymentDetails, PlaceOrderRequest,
};
use crate::{errors::ServiceError, ApiResponse, AppState, ListQuery, PaginatedResponse};

// Order DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct OrderLineBody {
    pub food_item_id: Uuid,
    pub portion_id: Uuid,
    pub quantity: i32,
    pub special_request: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CustomerBody {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PaymentBody {
    pub received_amount: Decimal,
    pub mode: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PlaceOrderBody {
    pub table_number: Option<i32>,
    pub staff_id: Uuid,
    pub staff_name: Option<String>,
    #[validate(length(min = 1, message = "Order must contain at least one line"))]
    pub lines: Vec<OrderLineBody>,
    pub notes: Option<String>,
    pub customer: Option<CustomerBody>,
    pub payment: Option<PaymentBody>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderStatusBody {
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CancelOrderBody {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StaffResponse {
    pub id: Uuid,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub food_item_id: Uuid,
    pub portion_id: Uuid,
    pub food_item_name: String,
    pub portion_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub special_request: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub amount: Decimal,
    pub received_amount: Decimal,
    pub balance_amount: Decimal,
    pub mode: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub bill_number: Option<String>,
    pub table_number: Option<i32>,
    pub status: String,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub staff: StaffResponse,
    pub customer: Option<CustomerResponse>,
    pub items: Vec<OrderItemResponse>,
    pub payments: Vec<PaymentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderSummaryResponse {
    pub id: Uuid,
    pub order_number: String,
    pub bill_number: Option<String>,
    pub table_number: Option<i32>,
    pub status: String,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

fn map_body(body: PlaceOrderBody) -> PlaceOrderRequest {
    PlaceOrderRequest {
        table_number: body.table_number,
        staff_id: body.staff_id,
        staff_name: body.staff_name,
        lines: body
            .lines
            .into_iter()
            .map(|line| OrderLineRequest {
                food_item_id: line.food_item_id,
                portion_id: line.portion_id,
                quantity: line.quantity,
                special_request: line.special_request,
            })
            .collect(),
        notes: body.notes,
        customer: body.customer.map(|c| CustomerDetails {
            name: c.name,
            phone: c.phone,
            email: c.email,
        }),
        payment: body.payment.map(|p| PaymentDetails {
            received_amount: p.received_amount,
            mode: p.mode,
        }),
    }
}

fn map_details(details: OrderDetails) -> OrderResponse {
    OrderResponse {
        id: details.order.id,
        order_number: details.order.order_number,
        bill_number: details.order.bill_number,
        table_number: details.order.table_number,
        status: details.order.status,
        total_amount: details.order.total_amount,
        notes: details.order.notes,
        staff: StaffResponse {
            id: details.staff.id,
            name: details.staff.name,
            role: details.staff.role,
        },
        customer: details.customer.map(|c| CustomerResponse {
            id: c.id,
            name: c.name,
            phone: c.phone,
            email: c.email,
        }),
        items: details
            .items
            .into_iter()
            .map(|item| OrderItemResponse {
                id: item.id,
                food_item_id: item.food_item_id,
                portion_id: item.portion_id,
                food_item_name: item.food_item_name,
                portion_name: item.portion_name,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
                special_request: item.special_request,
            })
            .collect(),
        payments: details
            .payments
            .into_iter()
            .map(|p| PaymentResponse {
                id: p.id,
                amount: p.amount,
                received_amount: p.received_amount,
                balance_amount: p.balance_amount,
                mode: p.mode,
            })
            .collect(),
        created_at: details.order.created_at,
        updated_at: details.order.updated_at,
    }
}

fn map_summary(model: order::Model) -> OrderSummaryResponse {
    OrderSummaryResponse {
        id: model.id,
        order_number: model.order_number,
        bill_number: model.bill_number,
        table_number: model.table_number,
        status: model.status,
        total_amount: model.total_amount,
        created_at: model.created_at,
    }
}

/// Place a waiter (table service) order
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = PlaceOrderBody,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown item, portion or staff", body = crate::errors::ErrorResponse),
        (status = 422, description = "Disabled entity or insufficient stock", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderBody>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponse>>), ServiceError> {
    let details = state
        .services
        .orders
        .place_waiter_order(map_body(body))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(map_details(details))),
    ))
}

/// Place a cashier (counter sale) order
#[utoipa::path(
    post,
    path = "/api/v1/orders/cashier",
    request_body = PlaceOrderBody,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 422, description = "Disabled entity or insufficient stock", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn place_cashier_order(
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderBody>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponse>>), ServiceError> {
    let details = state
        .services
        .orders
        .place_cashier_order(map_body(body))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(map_details(details))),
    ))
}

/// Place a quick bill
#[utoipa::path(
    post,
    path = "/api/v1/orders/quick-bill",
    request_body = PlaceOrderBody,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 422, description = "Disabled entity or insufficient stock", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn place_quick_bill(
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderBody>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponse>>), ServiceError> {
    let details = state
        .services
        .orders
        .place_quick_bill(map_body(body))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(map_details(details))),
    ))
}

/// List orders with pagination
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
    ),
    responses(
        (status = 200, description = "Orders retrieved", body = ApiResponse<PaginatedResponse<OrderSummaryResponse>>),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<OrderSummaryResponse>>>, ServiceError> {
    let result = state
        .services
        .orders
        .list_orders(query.page, query.limit)
        .await?;

    let total_pages = result.total.div_ceil(query.limit);
    let items = result.orders.into_iter().map(map_summary).collect();

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total: result.total,
        page: result.page,
        limit: result.per_page,
        total_pages,
    })))
}

/// Get an order with its full graph
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order retrieved", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let details = state.services.orders.get_order(id).await?;
    Ok(Json(ApiResponse::success(map_details(details))))
}

/// Update an order's lifecycle status
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusBody,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<OrderSummaryResponse>),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateOrderStatusBody>,
) -> Result<Json<ApiResponse<OrderSummaryResponse>>, ServiceError> {
    let status = OrderStatus::from_str(&body.status).ok_or_else(|| {
        ServiceError::InvalidStatus(format!("Unknown order status: {}", body.status))
    })?;

    let updated = state
        .services
        .orders
        .update_order_status(id, status, body.notes)
        .await?;

    Ok(Json(ApiResponse::success(map_summary(updated))))
}

/// Cancel an order (only permitted while preparing)
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = CancelOrderBody,
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<OrderSummaryResponse>),
        (status = 400, description = "Order is not cancellable", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CancelOrderBody>,
) -> Result<Json<ApiResponse<OrderSummaryResponse>>, ServiceError> {
    let updated = state.services.orders.cancel_order(id, body.reason).await?;
    Ok(Json(ApiResponse::success(map_summary(updated))))
}
