//! PauseCooking / ResumeCooking actions
//!
//! Coarse PAUSED ⇄ COOKING toggle. The time accounting happens on the
//! timer: pausing freezes elapsed, resuming pushes the estimated end back
//! by the paused interval.

use async_trait::async_trait;

use crate::kitchen::actions::{ActionContext, ActionHandler};
use shared::{KitchenError, KitchenEvent, KitchenEventPayload, KitchenEventType, KitchenResult};

/// PauseCooking action
#[derive(Debug, Clone)]
pub struct PauseCookingAction {
    pub order_id: String,
    pub reason: String,
}

#[async_trait]
impl ActionHandler for PauseCookingAction {
    async fn execute(&self, ctx: &ActionContext<'_>) -> KitchenResult<Vec<KitchenEvent>> {
        // 1. Coarse transition
        let mut record = ctx
            .kitchen_orders
            .find_by_order_id(&self.order_id)
            .await?
            .ok_or_else(|| {
                KitchenError::NotFound(format!("Kitchen order {} not found", self.order_id))
            })?;
        record.pause(&self.reason, ctx.now)?;
        ctx.kitchen_orders.update(&record).await?;

        // 2. Timer pause does the accounting; coarse-only orders have none
        match ctx.timer_engine.pause(&self.order_id, &self.reason, ctx.now).await {
            Ok(_) | Err(KitchenError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        tracing::info!(order_id = %self.order_id, reason = %self.reason, "Cooking paused");

        Ok(vec![KitchenEvent::new(
            Some(self.order_id.clone()),
            None,
            ctx.now,
            KitchenEventType::CookingPaused,
            KitchenEventPayload::CookingPaused {
                reason: self.reason.clone(),
            },
        )])
    }
}

/// ResumeCooking action
#[derive(Debug, Clone)]
pub struct ResumeCookingAction {
    pub order_id: String,
}

#[async_trait]
impl ActionHandler for ResumeCookingAction {
    async fn execute(&self, ctx: &ActionContext<'_>) -> KitchenResult<Vec<KitchenEvent>> {
        // 1. Coarse transition
        let mut record = ctx
            .kitchen_orders
            .find_by_order_id(&self.order_id)
            .await?
            .ok_or_else(|| {
                KitchenError::NotFound(format!("Kitchen order {} not found", self.order_id))
            })?;
        record.resume(ctx.now)?;
        ctx.kitchen_orders.update(&record).await?;

        // 2. Resume the timer; the paused interval extends its estimate
        match ctx.timer_engine.resume(&self.order_id, ctx.now).await {
            Ok(_) | Err(KitchenError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        tracing::info!(order_id = %self.order_id, "Cooking resumed");

        Ok(vec![KitchenEvent::new(
            Some(self.order_id.clone()),
            None,
            ctx.now,
            KitchenEventType::CookingResumed,
            KitchenEventPayload::CookingResumed,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitchen::actions::test_support::{T0, env_with_order};
    use crate::kitchen::actions::StartCookingAction;
    use shared::{CookingStatus, KitchenStatus};

    const SEC: i64 = 1000;

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
    async fn pause_then_resume_extends_the_timer_estimate() {
        let env = started_env().await;

        PauseCookingAction {
            order_id: "order-1".into(),
            reason: "plancha occupied".into(),
        }
        .execute(&env.ctx(T0 + 300 * SEC))
        .await
        .unwrap();

        let record = env
            .kitchen_orders
            .find_by_order_id("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, KitchenStatus::Paused);

        let timer = env
            .timers
            .find_active_by_order("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(timer.status, CookingStatus::Paused);

        ResumeCookingAction {
            order_id: "order-1".into(),
        }
        .execute(&env.ctx(T0 + 360 * SEC))
        .await
        .unwrap();

        let record = env
            .kitchen_orders
            .find_by_order_id("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, KitchenStatus::Cooking);

        let timer = env
            .timers
            .find_active_by_order("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(timer.status, CookingStatus::Running);
        assert_eq!(timer.paused_duration_secs, 60);
        // 30-minute estimate pushed back by the 60s pause
        assert_eq!(timer.estimated_end_time, Some(T0 + (30 * 60 + 60) * SEC));
    }

    #[tokio::test]
    async fn pausing_a_queued_order_is_rejected() {
        let env = env_with_order().await;
        crate::kitchen::actions::QueueOrderAction {
            order_id: "order-1".into(),
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap();

        let err = PauseCookingAction {
            order_id: "order-1".into(),
            reason: "x".into(),
        }
        .execute(&env.ctx(T0 + SEC))
        .await
        .unwrap_err();
        assert!(matches!(err, KitchenError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn resuming_a_running_order_is_rejected() {
        let env = started_env().await;
        let err = ResumeCookingAction {
            order_id: "order-1".into(),
        }
        .execute(&env.ctx(T0 + SEC))
        .await
        .unwrap_err();
        assert!(matches!(err, KitchenError::InvalidTransition { .. }));
    }
}
