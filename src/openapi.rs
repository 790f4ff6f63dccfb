use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::{ErrorResponse, StockShortfall};
use crate::handlers::{inventory, menu, orders};

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::place_order,
        orders::place_cashier_order,
        orders::place_quick_bill,
        orders::list_orders,
        orders::get_order,
        orders::update_order_status,
        orders::cancel_order,
        inventory::list_ingredients,
        inventory::low_stock,
        inventory::get_ingredient,
        inventory::restock_ingredient,
        menu::get_menu,
        menu::get_recipe,
    ),
    components(schemas(
        ErrorResponse,
        StockShortfall,
        orders::PlaceOrderBody,
        orders::OrderLineBody,
        orders::CustomerBody,
        orders::PaymentBody,
        orders::UpdateOrderStatusBody,
        orders::CancelOrderBody,
        orders::OrderResponse,
        orders::OrderSummaryResponse,
        orders::OrderItemResponse,
        orders::PaymentResponse,
        orders::StaffResponse,
        orders::CustomerResponse,
        inventory::IngredientResponse,
        inventory::RestockBody,
        menu::MenuEntryResponse,
        menu::MenuPortionResponse,
        menu::RecipeResponse,
        menu::IngredientRequirementResponse,
    )),
    tags(
        (name = "orders", description = "Order placement and lifecycle"),
        (name = "inventory", description = "Ingredient stock"),
        (name = "menu", description = "Menu and recipes"),
    ),
    info(
        title = "Comanda API",
        description = "Order placement and ingredient-inventory reservation engine",
    )
)]
pub struct ApiDoc;

/// Swagger UI router serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
