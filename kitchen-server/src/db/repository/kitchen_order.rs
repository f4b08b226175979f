//! Kitchen Order Repository

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::KitchenOrder;
use shared::KitchenStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "kitchen_order";

/// Statuses that count against kitchen capacity
const ACTIVE_STATUSES: [KitchenStatus; 4] = [
    KitchenStatus::Preparing,
    KitchenStatus::Cooking,
    KitchenStatus::Plating,
    KitchenStatus::Paused,
];

#[derive(Clone)]
pub struct KitchenOrderRepository {
    base: BaseRepository,
}

impl KitchenOrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new kitchen order record
    pub async fn create(&self, order: KitchenOrder) -> RepoResult<KitchenOrder> {
        // One kitchen record per outward order
        if self.find_by_order_id(&order.order_id).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Kitchen order for '{}' already exists",
                order.order_id
            )));
        }
        let created: Option<KitchenOrder> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create kitchen order".to_string()))
    }

    /// Replace an existing record (full content update)
    pub async fn update(&self, order: &KitchenOrder) -> RepoResult<KitchenOrder> {
        let id = order
            .id
            .as_ref()
            .ok_or_else(|| RepoError::Validation("Kitchen order has no id".to_string()))?;
        let key = record_key(id).to_string();
        let mut content = order.clone();
        content.id = None;
        let updated: Option<KitchenOrder> =
            self.base.db().update((TABLE, key)).content(content).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Kitchen order {} not found", id)))
    }

    /// Find by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<KitchenOrder>> {
        let order: Option<KitchenOrder> =
            self.base.db().select((TABLE, record_key(id))).await?;
        Ok(order)
    }

    /// Find the kitchen record tracking an outward order
    pub async fn find_by_order_id(&self, order_id: &str) -> RepoResult<Option<KitchenOrder>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM kitchen_order WHERE order_id = $order_id LIMIT 1")
            .bind(("order_id", order_id.to_string()))
            .await?;
        let orders: Vec<KitchenOrder> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// All records in one status
    pub async fn find_by_status(&self, status: KitchenStatus) -> RepoResult<Vec<KitchenOrder>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM kitchen_order WHERE status = $status ORDER BY created_at ASC")
            .bind(("status", status))
            .await?;
        Ok(result.take(0)?)
    }

    /// The waiting queue: highest priority first, FIFO within a priority
    pub async fn find_queue(&self) -> RepoResult<Vec<KitchenOrder>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM kitchen_order WHERE status = $status \
                 ORDER BY priority DESC, created_at ASC",
            )
            .bind(("status", KitchenStatus::Queued))
            .await?;
        Ok(result.take(0)?)
    }

    /// Orders currently being worked (PREPARING/COOKING/PLATING/PAUSED)
    pub async fn find_active(&self) -> RepoResult<Vec<KitchenOrder>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM kitchen_order WHERE status IN $statuses \
                 ORDER BY created_at ASC",
            )
            .bind(("statuses", ACTIVE_STATUSES.to_vec()))
            .await?;
        Ok(result.take(0)?)
    }

    /// Active orders whose estimated completion is already behind `now`
    pub async fn find_overdue(&self, now: i64) -> RepoResult<Vec<KitchenOrder>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM kitchen_order WHERE status IN $statuses \
                 AND estimated_completion_time != NONE \
                 AND estimated_completion_time < $now \
                 ORDER BY estimated_completion_time ASC",
            )
            .bind(("statuses", ACTIVE_STATUSES.to_vec()))
            .bind(("now", now))
            .await?;
        Ok(result.take(0)?)
    }

    /// Count of active orders, for capacity
    pub async fn count_active(&self) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS count FROM kitchen_order WHERE status IN $statuses GROUP ALL",
            )
            .bind(("statuses", ACTIVE_STATUSES.to_vec()))
            .await?;
        let rows: Vec<super::CountRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
    }

    /// Count of queued orders, for capacity
    pub async fn count_queued(&self) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS count FROM kitchen_order WHERE status = $status GROUP ALL")
            .bind(("status", KitchenStatus::Queued))
            .await?;
        let rows: Vec<super::CountRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
    }
}
