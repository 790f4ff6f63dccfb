pub mod health;
pub mod inventory;
pub mod menu;
pub mod orders;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<crate::services::catalog::CatalogService>,
    pub inventory: Arc<crate::services::inventory::InventoryService>,
    pub customers: Arc<crate::services::customers::CustomerService>,
    pub orders: Arc<crate::services::orders::OrderService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let catalog = Arc::new(crate::services::catalog::CatalogService::new(db_pool.clone()));
        let inventory = Arc::new(crate::services::inventory::InventoryService::new(
            db_pool.clone(),
            (*event_sender).clone(),
        ));
        let customers = Arc::new(crate::services::customers::CustomerService::new(
            db_pool.clone(),
        ));
        let orders = Arc::new(crate::services::orders::OrderService::new(
            db_pool,
            Some(event_sender),
            catalog.clone(),
            inventory.clone(),
            customers.clone(),
        ));

        Self {
            catalog,
            inventory,
            customers,
            orders,
        }
    }
}
