#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    Router,
};
use chrono::Utc;
use comanda_api::{
    config::AppConfig,
    db,
    entities::{category, food_item, food_item_portion, ingredient, portion, portion_ingredient, staff},
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up an application state backed by a
/// file-based SQLite database. Each test passes its own database file name
/// so tests never share state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new(db_file: &str) -> Self {
        let _ = std::fs::remove_file(db_file);

        let mut cfg = AppConfig::new(
            format!("sqlite://{db_file}?mode=rwc"),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", comanda_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    // Seed helpers

    pub async fn seed_staff(&self, name: &str) -> staff::Model {
        let now = Utc::now();
        staff::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            role: Set("waiter".to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed staff")
    }

    pub async fn seed_category(&self, name: &str) -> category::Model {
        let now = Utc::now();
        category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed category")
    }

    pub async fn seed_ingredient(
        &self,
        name: &str,
        unit: &str,
        stock: Decimal,
        reorder_level: Decimal,
    ) -> ingredient::Model {
        let now = Utc::now();
        ingredient::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            unit_of_measurement: Set(unit.to_string()),
            current_stock: Set(stock),
            reorder_level: Set(reorder_level),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed ingredient")
    }

    pub async fn seed_portion(&self, name: &str) -> portion::Model {
        let now = Utc::now();
        portion::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed portion")
    }

    pub async fn seed_food_item(&self, name: &str, category_id: Uuid) -> food_item::Model {
        let now = Utc::now();
        food_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            category_id: Set(category_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed food item")
    }

    /// Creates the priced (food item, portion) combination plus its
    /// per-unit ingredient requirements.
    pub async fn seed_recipe(
        &self,
        food_item_id: Uuid,
        portion_id: Uuid,
        price: Decimal,
        ingredients: &[(Uuid, Decimal)],
    ) -> food_item_portion::Model {
        let now = Utc::now();
        let combo = food_item_portion::ActiveModel {
            id: Set(Uuid::new_v4()),
            food_item_id: Set(food_item_id),
            portion_id: Set(portion_id),
            price: Set(price),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed food item portion");

        for (ingredient_id, quantity) in ingredients {
            portion_ingredient::ActiveModel {
                id: Set(Uuid::new_v4()),
                food_item_portion_id: Set(combo.id),
                ingredient_id: Set(*ingredient_id),
                quantity: Set(*quantity),
            }
            .insert(&*self.state.db)
            .await
            .expect("seed portion ingredient");
        }

        combo
    }

    // State inspection helpers

    pub async fn read_stock(&self, ingredient_id: Uuid) -> Decimal {
        ingredient::Entity::find_by_id(ingredient_id)
            .one(&*self.state.db)
            .await
            .expect("read ingredient")
            .expect("ingredient exists")
            .current_stock
    }

    pub async fn count_orders(&self) -> usize {
        comanda_api::entities::order::Entity::find()
            .all(&*self.state.db)
            .await
            .expect("count orders")
            .len()
    }

    pub async fn count_order_items(&self) -> usize {
        comanda_api::entities::order_item::Entity::find()
            .all(&*self.state.db)
            .await
            .expect("count order items")
            .len()
    }

    pub async fn set_food_item_active(&self, food_item_id: Uuid, active: bool) {
        let model = food_item::Entity::find_by_id(food_item_id)
            .one(&*self.state.db)
            .await
            .expect("find food item")
            .expect("food item exists");
        let mut active_model: food_item::ActiveModel = model.into();
        active_model.is_active = Set(active);
        active_model
            .update(&*self.state.db)
            .await
            .expect("update food item");
    }

    pub async fn set_portion_active(&self, portion_id: Uuid, active: bool) {
        let model = portion::Entity::find_by_id(portion_id)
            .one(&*self.state.db)
            .await
            .expect("find portion")
            .expect("portion exists");
        let mut active_model: portion::ActiveModel = model.into();
        active_model.is_active = Set(active);
        active_model
            .update(&*self.state.db)
            .await
            .expect("update portion");
    }

    pub async fn set_recipe_price(&self, combo_id: Uuid, price: Decimal) {
        let model = food_item_portion::Entity::find_by_id(combo_id)
            .one(&*self.state.db)
            .await
            .expect("find food item portion")
            .expect("food item portion exists");
        let mut active_model: food_item_portion::ActiveModel = model.into();
        active_model.price = Set(price);
        active_model
            .update(&*self.state.db)
            .await
            .expect("update food item portion");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Deserialize a response body into JSON.
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is valid json")
}

/// Parse a JSON value (string or number form) into a Decimal.
pub fn as_decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("not a numeric value: {other:?}"),
    }
}
