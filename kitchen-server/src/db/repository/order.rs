//! Outward Order Repository
//!
//! The kitchen core's window onto the outward order store: lookup by
//! reference for the item count, plus the status side effects the state
//! machine pushes (PREPARING / READY / CANCELLED).

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "customer_order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create an outward order (seeding/testing surface)
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        if self.find_by_ref(&order.order_ref).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Order '{}' already exists",
                order.order_ref
            )));
        }
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find by the stable external reference
    pub async fn find_by_ref(&self, order_ref: &str) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM customer_order WHERE order_ref = $order_ref LIMIT 1")
            .bind(("order_ref", order_ref.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Push the kitchen's outward status side effect
    pub async fn update_status(&self, order_ref: &str, status: OrderStatus) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE customer_order SET status = $status \
                 WHERE order_ref = $order_ref RETURN AFTER",
            )
            .bind(("status", status))
            .bind(("order_ref", order_ref.to_string()))
            .await?;
        let rows: Vec<Order> = result.take(0)?;
        Ok(!rows.is_empty())
    }
}
