//! CancelOrder action
//!
//! Any non-terminal state → CANCELLED. The reason lands in the structured
//! note log, the timer is cancelled with the same accounting as complete,
//! and the outward order is marked CANCELLED.

use async_trait::async_trait;

use crate::db::models::OrderStatus;
use crate::kitchen::actions::{ActionContext, ActionHandler};
use shared::{KitchenError, KitchenEvent, KitchenEventPayload, KitchenEventType, KitchenResult};

/// CancelOrder action
#[derive(Debug, Clone)]
pub struct CancelOrderAction {
    pub order_id: String,
    pub reason: String,
    /// Staff member who pulled the order, when known
    pub staff_id: Option<String>,
}

#[async_trait]
impl ActionHandler for CancelOrderAction {
    async fn execute(&self, ctx: &ActionContext<'_>) -> KitchenResult<Vec<KitchenEvent>> {
        // 1. Coarse transition, reason recorded
        let mut record = ctx
            .kitchen_orders
            .find_by_order_id(&self.order_id)
            .await?
            .ok_or_else(|| {
                KitchenError::NotFound(format!("Kitchen order {} not found", self.order_id))
            })?;
        record.cancel(&self.reason, ctx.now)?;
        ctx.kitchen_orders.update(&record).await?;

        // 2. Cancel the timer with the same duration accounting
        match ctx.timer_engine.cancel(&self.order_id, &self.reason, ctx.now).await {
            Ok(_) | Err(KitchenError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        // 3. Outward status side effect
        if !ctx
            .orders
            .update_status(&self.order_id, OrderStatus::Cancelled)
            .await?
        {
            tracing::warn!(order_id = %self.order_id, "Outward order missing, status not pushed");
        }

        tracing::warn!(order_id = %self.order_id, reason = %self.reason, "Kitchen order cancelled");

        Ok(vec![KitchenEvent::new(
            Some(self.order_id.clone()),
            self.staff_id.clone(),
            ctx.now,
            KitchenEventType::OrderCancelled,
            KitchenEventPayload::OrderCancelled {
                reason: self.reason.clone(),
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitchen::actions::test_support::{T0, env_with_order};
    use crate::kitchen::actions::StartCookingAction;
    use shared::{CookingStatus, KitchenStatus, NoteKind};

    const SEC: i64 = 1000;

    #[tokio::test]
    async fn cancel_running_order_records_reason_everywhere() {
        let env = env_with_order().await;
        StartCookingAction {
            order_id: "order-1".into(),
            staff_id: "staff-1".into(),
            workstation_id: None,
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap();
        let timer_id = env
            .timers
            .find_active_by_order("order-1")
            .await
            .unwrap()
            .unwrap()
            .id
            .unwrap();

        CancelOrderAction {
            order_id: "order-1".into(),
            reason: "ingredient shortage".into(),
            staff_id: Some("staff-1".into()),
        }
        .execute(&env.ctx(T0 + 500 * SEC))
        .await
        .unwrap();

        let record = env
            .kitchen_orders
            .find_by_order_id("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, KitchenStatus::Cancelled);
        let note = record.notes.iter().find(|n| n.kind == NoteKind::Cancel).unwrap();
        assert_eq!(note.render(), "取消: ingredient shortage");

        let timer = env.timers.find_by_id(&timer_id).await.unwrap().unwrap();
        assert_eq!(timer.status, CookingStatus::Cancelled);
        assert_eq!(timer.actual_duration_secs, Some(500));

        let order = env.orders.find_by_ref("order-1").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancel_queued_order_works_without_timer() {
        let env = env_with_order().await;
        crate::kitchen::actions::QueueOrderAction {
            order_id: "order-1".into(),
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap();

        CancelOrderAction {
            order_id: "order-1".into(),
            reason: "guest left".into(),
            staff_id: None,
        }
        .execute(&env.ctx(T0 + SEC))
        .await
        .unwrap();

        let record = env
            .kitchen_orders
            .find_by_order_id("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, KitchenStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancelling_twice_is_rejected() {
        let env = env_with_order().await;
        crate::kitchen::actions::QueueOrderAction {
            order_id: "order-1".into(),
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap();

        let action = CancelOrderAction {
            order_id: "order-1".into(),
            reason: "x".into(),
            staff_id: None,
        };
        action.execute(&env.ctx(T0 + SEC)).await.unwrap();
        let err = action.execute(&env.ctx(T0 + 2 * SEC)).await.unwrap_err();
        assert!(matches!(err, KitchenError::InvalidTransition { .. }));
    }
}
