//! QueueOrder action
//!
//! Accepts an outward order into the kitchen: creates the QUEUED kitchen
//! record with an estimate derived from the item count.

use async_trait::async_trait;

use crate::db::models::KitchenOrder;
use crate::kitchen::actions::{ActionContext, ActionHandler};
use shared::{KitchenError, KitchenEvent, KitchenEventPayload, KitchenEventType, KitchenResult};

/// QueueOrder action
#[derive(Debug, Clone)]
pub struct QueueOrderAction {
    pub order_id: String,
}

#[async_trait]
impl ActionHandler for QueueOrderAction {
    async fn execute(&self, ctx: &ActionContext<'_>) -> KitchenResult<Vec<KitchenEvent>> {
        // 1. The outward order must exist - it supplies the item count
        let order = ctx
            .orders
            .find_by_ref(&self.order_id)
            .await?
            .ok_or_else(|| KitchenError::NotFound(format!("Order {} not found", self.order_id)))?;

        // 2. One kitchen record per order
        if ctx
            .kitchen_orders
            .find_by_order_id(&self.order_id)
            .await?
            .is_some()
        {
            return Err(KitchenError::Validation(format!(
                "Order {} is already in the kitchen",
                self.order_id
            )));
        }

        // 3. Create QUEUED with the derived estimate
        let estimate = KitchenOrder::estimate_for_items(order.item_count);
        let record = KitchenOrder::queued(&self.order_id, estimate, ctx.now);
        let created = ctx.kitchen_orders.create(record).await?;

        tracing::info!(
            order_id = %self.order_id,
            estimated_minutes = estimate,
            "Order queued for kitchen"
        );

        Ok(vec![KitchenEvent::new(
            Some(self.order_id.clone()),
            None,
            ctx.now,
            KitchenEventType::OrderQueued,
            KitchenEventPayload::OrderQueued {
                priority: created.priority,
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitchen::actions::test_support::{T0, env_with_order};
    use shared::KitchenStatus;

    #[tokio::test]
    async fn queues_with_item_derived_estimate() {
        let env = env_with_order().await;
        let action = QueueOrderAction {
            order_id: "order-1".into(),
        };
        let events = action.execute(&env.ctx(T0)).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, KitchenEventType::OrderQueued);

        let record = env
            .kitchen_orders
            .find_by_order_id("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, KitchenStatus::Queued);
        // base 15 + 5 × 3 items
        assert_eq!(record.estimated_cooking_minutes, 30);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let env = env_with_order().await;
        let action = QueueOrderAction {
            order_id: "order-9".into(),
        };
        let err = action.execute(&env.ctx(T0)).await.unwrap_err();
        assert!(matches!(err, KitchenError::NotFound(_)));
    }

    #[tokio::test]
    async fn double_queue_is_rejected() {
        let env = env_with_order().await;
        let action = QueueOrderAction {
            order_id: "order-1".into(),
        };
        action.execute(&env.ctx(T0)).await.unwrap();
        let err = action.execute(&env.ctx(T0 + 1000)).await.unwrap_err();
        assert!(matches!(err, KitchenError::Validation(_)));
    }
}
