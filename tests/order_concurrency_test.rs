mod common;

use assert_matches::assert_matches;
use common::TestApp;
use comanda_api::errors::ServiceError;
use comanda_api::services::orders::{OrderLineRequest, PlaceOrderRequest};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn order_for(staff_id: Uuid, food_item_id: Uuid, portion_id: Uuid) -> PlaceOrderRequest {
    PlaceOrderRequest {
        table_number: Some(1),
        staff_id,
        staff_name: None,
        lines: vec![OrderLineRequest {
            food_item_id,
            portion_id,
            quantity: 1,
            special_request: None,
        }],
        notes: None,
        customer: None,
        payment: None,
    }
}

// Two concurrent orders each demand 300g of a 500g pool: exactly one may
// win, and the loser must see a structured insufficient-stock rejection.
#[tokio::test]
async fn concurrent_orders_cannot_oversell() {
    let app = TestApp::new("comanda_concurrency.db").await;

    let staff = app.seed_staff("Avery").await;
    let category = app.seed_category("Mains").await;
    let flour = app
        .seed_ingredient("Flour", "g", dec!(500), dec!(100))
        .await;
    let item = app.seed_food_item("Calzone", category.id).await;
    let portion = app.seed_portion("Regular").await;
    app.seed_recipe(item.id, portion.id, dec!(9), &[(flour.id, dec!(300))])
        .await;

    let svc_a = app.state.services.orders.clone();
    let svc_b = app.state.services.orders.clone();
    let request_a = order_for(staff.id, item.id, portion.id);
    let request_b = order_for(staff.id, item.id, portion.id);

    let (result_a, result_b) = tokio::join!(
        tokio::spawn(async move { svc_a.place_waiter_order(request_a).await }),
        tokio::spawn(async move { svc_b.place_waiter_order(request_b).await }),
    );

    let results = [result_a.unwrap(), result_b.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(
        successes, 1,
        "exactly one of the two concurrent orders may succeed"
    );

    let failure = results
        .iter()
        .find_map(|r| r.as_ref().err())
        .expect("one order must have been rejected");
    assert_matches!(failure, ServiceError::InsufficientStock(shortfalls) => {
        assert_eq!(shortfalls.len(), 1);
        assert_eq!(shortfalls[0].ingredient_name, "Flour");
        assert_eq!(shortfalls[0].required, dec!(300));
        assert_eq!(shortfalls[0].available, dec!(200));
    });

    // 500g - 300g, never negative, never double-debited
    assert_eq!(app.read_stock(flour.id).await, dec!(200));
    assert_eq!(app.count_orders().await, 1);
}

// Twenty concurrent single-unit orders against stock for ten: the pool is
// never overdrawn and every decrement is accounted for.
#[tokio::test]
async fn burst_of_orders_never_overdraws_the_pool() {
    let app = TestApp::new("comanda_concurrency_burst.db").await;

    let staff = app.seed_staff("Avery").await;
    let category = app.seed_category("Mains").await;
    let dough = app.seed_ingredient("Dough", "g", dec!(100), dec!(10)).await;
    let item = app.seed_food_item("Flatbread", category.id).await;
    let portion = app.seed_portion("Single").await;
    app.seed_recipe(item.id, portion.id, dec!(3), &[(dough.id, dec!(10))])
        .await;

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let svc = app.state.services.orders.clone();
        let request = order_for(staff.id, item.id, portion.id);
        tasks.push(tokio::spawn(
            async move { svc.place_waiter_order(request).await },
        ));
    }

    let mut successes = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(
        successes, 10,
        "exactly ten single-unit orders fit in 100g of dough"
    );
    assert_eq!(app.read_stock(dough.id).await, dec!(0));
    assert_eq!(app.count_orders().await, 10);
}
