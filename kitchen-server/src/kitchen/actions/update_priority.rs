//! UpdatePriority action
//!
//! Clamps the requested priority into [1, 10] and stores it. The event
//! carries the stored value; the dispatcher escalates priorities ≥ 8 into
//! a kitchen-department broadcast.

use async_trait::async_trait;

use crate::kitchen::actions::{ActionContext, ActionHandler};
use shared::{KitchenError, KitchenEvent, KitchenEventPayload, KitchenEventType, KitchenResult};

/// UpdatePriority action
#[derive(Debug, Clone)]
pub struct UpdatePriorityAction {
    pub order_id: String,
    /// Raw requested priority - any integer, clamped on apply
    pub priority: i32,
}

#[async_trait]
impl ActionHandler for UpdatePriorityAction {
    async fn execute(&self, ctx: &ActionContext<'_>) -> KitchenResult<Vec<KitchenEvent>> {
        let mut record = ctx
            .kitchen_orders
            .find_by_order_id(&self.order_id)
            .await?
            .ok_or_else(|| {
                KitchenError::NotFound(format!("Kitchen order {} not found", self.order_id))
            })?;

        let stored = record.set_priority(self.priority, ctx.now)?;
        ctx.kitchen_orders.update(&record).await?;

        tracing::info!(
            order_id = %self.order_id,
            requested = self.priority,
            stored = stored,
            "Priority updated"
        );

        Ok(vec![KitchenEvent::new(
            Some(self.order_id.clone()),
            None,
            ctx.now,
            KitchenEventType::PriorityChanged,
            KitchenEventPayload::PriorityChanged { priority: stored },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitchen::actions::test_support::{T0, env_with_order};
    use crate::kitchen::actions::QueueOrderAction;

    async fn queued_env() -> crate::kitchen::actions::test_support::TestEnv {
        let env = env_with_order().await;
        QueueOrderAction {
            order_id: "order-1".into(),
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap();
        env
    }

    #[tokio::test]
    async fn priority_is_clamped_into_bounds() {
        let env = queued_env().await;

        for (input, expected) in [(15, 10), (-3, 1), (0, 1), (7, 7)] {
            let events = UpdatePriorityAction {
                order_id: "order-1".into(),
                priority: input,
            }
            .execute(&env.ctx(T0 + 1000))
            .await
            .unwrap();

            match &events[0].payload {
                KitchenEventPayload::PriorityChanged { priority } => {
                    assert_eq!(*priority, expected)
                }
                other => panic!("unexpected payload: {:?}", other),
            }

            let record = env
                .kitchen_orders
                .find_by_order_id("order-1")
                .await
                .unwrap()
                .unwrap();
            assert_eq!(record.priority, expected);
        }
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let env = env_with_order().await;
        let err = UpdatePriorityAction {
            order_id: "order-9".into(),
            priority: 5,
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap_err();
        assert!(matches!(err, KitchenError::NotFound(_)));
    }
}
