mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

struct LifecycleFixture {
    flour_id: Uuid,
    order_id: String,
}

/// Places a pending waiter order for 2 pizzas (2 x 150g flour of 500g).
async fn seed_pending_order(app: &TestApp) -> LifecycleFixture {
    let staff = app.seed_staff("Avery").await;
    let category = app.seed_category("Mains").await;
    let flour = app
        .seed_ingredient("Flour", "g", dec!(500), dec!(100))
        .await;
    let item = app.seed_food_item("Margherita Pizza", category.id).await;
    let portion = app.seed_portion("Regular").await;
    app.seed_recipe(item.id, portion.id, dec!(12.50), &[(flour.id, dec!(150))])
        .await;

    let body = json!({
        "table_number": 4,
        "staff_id": staff.id,
        "lines": [{
            "food_item_id": item.id,
            "portion_id": portion.id,
            "quantity": 2,
        }],
    });

    let response = app.request(Method::POST, "/api/v1/orders", Some(body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = body_json(response).await;
    let order_id = payload["data"]["id"].as_str().unwrap().to_string();

    LifecycleFixture {
        flour_id: flour.id,
        order_id,
    }
}

async fn put_status(app: &TestApp, order_id: &str, status: &str) -> (StatusCode, Value) {
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({ "status": status })),
        )
        .await;
    let status_code = response.status();
    (status_code, body_json(response).await)
}

#[tokio::test]
async fn normal_path_walks_pending_to_served() {
    let app = TestApp::new("comanda_lifecycle_normal.db").await;
    let fixture = seed_pending_order(&app).await;

    for (next, expected) in [
        ("preparing", StatusCode::OK),
        ("ready", StatusCode::OK),
        ("served", StatusCode::OK),
    ] {
        let (code, payload) = put_status(&app, &fixture.order_id, next).await;
        assert_eq!(code, expected, "moving to {next}: {payload:?}");
        assert_eq!(payload["data"]["status"], next);
    }
}

#[tokio::test]
async fn skipping_lifecycle_steps_is_rejected() {
    let app = TestApp::new("comanda_lifecycle_skip.db").await;
    let fixture = seed_pending_order(&app).await;

    let (code, _) = put_status(&app, &fixture.order_id, "served").await;
    assert_eq!(code, StatusCode::BAD_REQUEST);

    let (code, _) = put_status(&app, &fixture.order_id, "ready").await;
    assert_eq!(code, StatusCode::BAD_REQUEST);

    // Still pending after the rejected moves
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/orders/{}", fixture.order_id),
            None,
        )
        .await;
    let payload = body_json(response).await;
    assert_eq!(payload["data"]["status"], "pending");
}

#[tokio::test]
async fn unknown_status_is_rejected() {
    let app = TestApp::new("comanda_lifecycle_unknown_status.db").await;
    let fixture = seed_pending_order(&app).await;

    let (code, _) = put_status(&app, &fixture.order_id, "vaporized").await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_update_for_missing_order_is_not_found() {
    let app = TestApp::new("comanda_lifecycle_missing_order.db").await;
    seed_pending_order(&app).await;

    let (code, _) = put_status(&app, &Uuid::new_v4().to_string(), "preparing").await;
    assert_eq!(code, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancel_is_only_permitted_while_preparing() {
    let app = TestApp::new("comanda_lifecycle_cancel_pending.db").await;
    let fixture = seed_pending_order(&app).await;

    // Pending orders cannot be cancelled
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/orders/{}/cancel", fixture.order_id),
            Some(json!({ "reason": "changed mind" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Move to preparing, then cancellation is allowed
    let (code, _) = put_status(&app, &fixture.order_id, "preparing").await;
    assert_eq!(code, StatusCode::OK);

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/orders/{}/cancel", fixture.order_id),
            Some(json!({ "reason": "customer left" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = body_json(response).await;
    assert_eq!(payload["data"]["status"], "cancelled");
}

#[tokio::test]
async fn cancellation_does_not_restock_consumed_ingredients() {
    let app = TestApp::new("comanda_lifecycle_cancel_stock.db").await;
    let fixture = seed_pending_order(&app).await;

    // Placement consumed 300g of the 500g pool
    assert_eq!(app.read_stock(fixture.flour_id).await, dec!(200));

    let (code, _) = put_status(&app, &fixture.order_id, "preparing").await;
    assert_eq!(code, StatusCode::OK);

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/orders/{}/cancel", fixture.order_id),
            Some(json!({ "reason": "burnt" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Consumed stock stays consumed
    assert_eq!(app.read_stock(fixture.flour_id).await, dec!(200));
}

#[tokio::test]
async fn served_orders_are_terminal() {
    let app = TestApp::new("comanda_lifecycle_terminal.db").await;
    let fixture = seed_pending_order(&app).await;

    for next in ["preparing", "ready", "served"] {
        let (code, _) = put_status(&app, &fixture.order_id, next).await;
        assert_eq!(code, StatusCode::OK);
    }

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/orders/{}/cancel", fixture.order_id),
            Some(json!({})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (code, _) = put_status(&app, &fixture.order_id, "pending").await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
}
