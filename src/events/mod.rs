use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Order events
    OrderPlaced {
        order_id: Uuid,
        staff_id: Uuid,
        total_amount: Decimal,
        placed_at: DateTime<Utc>,
    },
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },
    OrderCancelled {
        order_id: Uuid,
        reason: Option<String>,
    },

    // Inventory events
    IngredientRestocked {
        ingredient_id: Uuid,
        quantity: Decimal,
        new_stock: Decimal,
    },
    IngredientStockLow {
        ingredient_id: Uuid,
        name: String,
        current_stock: Decimal,
        reorder_level: Decimal,
    },

    // Customer events
    CustomerCreated(Uuid),
}

/// Consumes events from the channel until every sender is dropped.
/// Event handling is best-effort and never sits on an order's critical path.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    info!("Event processing loop started");

    while let Some(event) = receiver.recv().await {
        match event {
            Event::OrderPlaced {
                order_id,
                staff_id,
                total_amount,
                ..
            } => {
                info!(
                    order_id = %order_id,
                    staff_id = %staff_id,
                    total_amount = %total_amount,
                    "Order placed"
                );
            }
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => {
                info!(
                    order_id = %order_id,
                    old_status = %old_status,
                    new_status = %new_status,
                    "Order status changed"
                );
            }
            Event::OrderCancelled { order_id, reason } => {
                info!(order_id = %order_id, reason = ?reason, "Order cancelled");
            }
            Event::IngredientRestocked {
                ingredient_id,
                quantity,
                new_stock,
            } => {
                info!(
                    ingredient_id = %ingredient_id,
                    quantity = %quantity,
                    new_stock = %new_stock,
                    "Ingredient restocked"
                );
            }
            Event::IngredientStockLow {
                ingredient_id,
                name,
                current_stock,
                reorder_level,
            } => {
                // Operational alert: stock fell to or below the reorder level.
                warn!(
                    ingredient_id = %ingredient_id,
                    name = %name,
                    current_stock = %current_stock,
                    reorder_level = %reorder_level,
                    "Low ingredient stock"
                );
            }
            Event::CustomerCreated(customer_id) => {
                info!(customer_id = %customer_id, "Customer created");
            }
        }
    }

    warn!("Event processing loop has ended");
}
