//! CompleteCooking action
//!
//! COOKING/PLATING/PREPARING/PAUSED → READY. Stamps the actual cooking
//! minutes, evaluates the overtime flag, completes the timer, and pushes
//! the outward status to READY.

use async_trait::async_trait;

use crate::db::models::OrderStatus;
use crate::kitchen::actions::{ActionContext, ActionHandler};
use shared::{KitchenError, KitchenEvent, KitchenEventPayload, KitchenEventType, KitchenResult};

/// CompleteCooking action
#[derive(Debug, Clone)]
pub struct CompleteCookingAction {
    pub order_id: String,
    pub staff_id: String,
}

#[async_trait]
impl ActionHandler for CompleteCookingAction {
    async fn execute(&self, ctx: &ActionContext<'_>) -> KitchenResult<Vec<KitchenEvent>> {
        // 1. Load the kitchen record
        let mut record = ctx
            .kitchen_orders
            .find_by_order_id(&self.order_id)
            .await?
            .ok_or_else(|| {
                KitchenError::NotFound(format!("Kitchen order {} not found", self.order_id))
            })?;
        let from = record.status;

        // 2. Transition to READY (validates the source state)
        record.complete(ctx.now)?;
        ctx.kitchen_orders.update(&record).await?;

        // 3. Close the timer. A missing timer is fine (coarse-only order);
        //    a timer in a state that cannot complete is logged, not fatal -
        //    the dish is done regardless of what the timer thinks.
        match ctx.timer_engine.complete(&self.order_id, ctx.now).await {
            Ok(_) | Err(KitchenError::NotFound(_)) => {}
            Err(KitchenError::InvalidTransition { from, .. }) => {
                tracing::warn!(
                    order_id = %self.order_id,
                    timer_status = %from,
                    "Timer could not be completed alongside the order"
                );
            }
            Err(e) => return Err(e),
        }

        // 4. Outward status side effect
        if !ctx
            .orders
            .update_status(&self.order_id, OrderStatus::Ready)
            .await?
        {
            tracing::warn!(order_id = %self.order_id, "Outward order missing, status not pushed");
        }

        tracing::info!(
            order_id = %self.order_id,
            staff_id = %self.staff_id,
            actual_minutes = record.actual_cooking_minutes,
            overtime = record.overtime,
            "Cooking completed"
        );

        Ok(vec![KitchenEvent::new(
            Some(self.order_id.clone()),
            Some(self.staff_id.clone()),
            ctx.now,
            KitchenEventType::StatusChanged,
            KitchenEventPayload::StatusChanged {
                from,
                to: record.status,
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitchen::actions::test_support::{T0, env_with_order};
    use crate::kitchen::actions::StartCookingAction;
    use shared::{CookingStatus, KitchenStatus};

    const MINUTE: i64 = 60_000;

    async fn started_env() -> crate::kitchen::actions::test_support::TestEnv {
        let env = env_with_order().await;
        StartCookingAction {
            order_id: "order-1".into(),
            staff_id: "staff-1".into(),
            workstation_id: None,
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap();
        env
    }

    #[tokio::test]
    async fn completes_order_and_timer() {
        let env = started_env().await;
        let action = CompleteCookingAction {
            order_id: "order-1".into(),
            staff_id: "staff-1".into(),
        };
        // estimate is 30 min; finish at 32 min - inside the 5-min buffer
        let events = action.execute(&env.ctx(T0 + 32 * MINUTE)).await.unwrap();
        assert_eq!(events[0].event_type, KitchenEventType::StatusChanged);

        let record = env
            .kitchen_orders
            .find_by_order_id("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, KitchenStatus::Ready);
        assert_eq!(record.actual_cooking_minutes, Some(32));
        assert!(!record.overtime);

        // timer closed: no more active timer for the order
        assert!(
            env.timers
                .find_active_by_order("order-1")
                .await
                .unwrap()
                .is_none()
        );

        let order = env.orders.find_by_ref("order-1").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
    }

    #[tokio::test]
    async fn overtime_flag_set_past_the_buffer() {
        let env = started_env().await;
        CompleteCookingAction {
            order_id: "order-1".into(),
            staff_id: "staff-1".into(),
        }
        .execute(&env.ctx(T0 + 36 * MINUTE))
        .await
        .unwrap();

        let record = env
            .kitchen_orders
            .find_by_order_id("order-1")
            .await
            .unwrap()
            .unwrap();
        assert!(record.overtime);
    }

    #[tokio::test]
    async fn completing_a_queued_order_is_rejected() {
        let env = env_with_order().await;
        crate::kitchen::actions::QueueOrderAction {
            order_id: "order-1".into(),
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap();

        let err = CompleteCookingAction {
            order_id: "order-1".into(),
            staff_id: "staff-1".into(),
        }
        .execute(&env.ctx(T0 + MINUTE))
        .await
        .unwrap_err();
        assert!(matches!(err, KitchenError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn completing_twice_is_rejected_and_timer_stays_closed() {
        let env = started_env().await;
        let action = CompleteCookingAction {
            order_id: "order-1".into(),
            staff_id: "staff-1".into(),
        };
        action.execute(&env.ctx(T0 + 10 * MINUTE)).await.unwrap();
        let err = action.execute(&env.ctx(T0 + 11 * MINUTE)).await.unwrap_err();
        assert!(matches!(err, KitchenError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn paused_order_can_complete() {
        let env = started_env().await;
        let timer_id = env
            .timers
            .find_active_by_order("order-1")
            .await
            .unwrap()
            .unwrap()
            .id
            .unwrap();

        crate::kitchen::actions::PauseCookingAction {
            order_id: "order-1".into(),
            reason: "hold".into(),
        }
        .execute(&env.ctx(T0 + 5 * MINUTE))
        .await
        .unwrap();

        CompleteCookingAction {
            order_id: "order-1".into(),
            staff_id: "staff-1".into(),
        }
        .execute(&env.ctx(T0 + 8 * MINUTE))
        .await
        .unwrap();

        let record = env
            .kitchen_orders
            .find_by_order_id("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, KitchenStatus::Ready);
        assert_eq!(record.actual_cooking_minutes, Some(8));

        // the timer folded the 3 paused minutes out of its actual duration
        let timer = env.timers.find_by_id(&timer_id).await.unwrap().unwrap();
        assert_eq!(timer.status, CookingStatus::Completed);
        assert_eq!(timer.actual_duration_secs, Some(5 * 60));
    }
}
