use crate::{
    db::DbPool,
    entities::customer::{self, Entity as CustomerEntity},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Customer data supplied with an order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerDetails {
    #[validate(length(min = 1, max = 100, message = "Customer name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 4, max = 20, message = "Customer phone must be 4-20 characters"))]
    pub phone: String,
    #[validate(email(message = "Customer email must be valid"))]
    pub email: Option<String>,
}

/// Customer store: phone-keyed find-or-create used during placement.
#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Resolves customer details to a row, creating one when the phone
    /// number is unknown. Runs on the caller's connection so placement can
    /// keep the create inside its transaction. The boolean reports whether
    /// a row was created, letting the caller emit events after commit.
    #[instrument(skip(self, conn, details), fields(phone = %details.phone))]
    pub async fn find_or_create_by_phone<C: ConnectionTrait>(
        &self,
        conn: &C,
        details: &CustomerDetails,
    ) -> Result<(customer::Model, bool), ServiceError> {
        if let Some(existing) = CustomerEntity::find()
            .filter(customer::Column::Phone.eq(&details.phone))
            .one(conn)
            .await?
        {
            return Ok((existing, false));
        }

        let now = Utc::now();
        let model = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(details.name.clone()),
            phone: Set(details.phone.clone()),
            email: Set(details.email.clone()),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(conn)
        .await?;

        info!(customer_id = %model.id, "Created customer from order details");

        Ok((model, true))
    }

    /// Gets a customer by id.
    #[instrument(skip(self))]
    pub async fn get_customer(&self, customer_id: Uuid) -> Result<customer::Model, ServiceError> {
        let db = &*self.db_pool;

        CustomerEntity::find_by_id(customer_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer {} not found", customer_id)))
    }
}
