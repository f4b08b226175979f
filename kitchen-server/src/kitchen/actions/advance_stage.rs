//! AdvanceStage action
//!
//! Walks the timer's PREP → COOKING → PLATING → READY ladder and keeps
//! the coarse status in step (PREPARING → COOKING → PLATING). The coarse
//! record never reaches READY here - that is complete's job.

use async_trait::async_trait;

use crate::kitchen::actions::{ActionContext, ActionHandler};
use shared::{
    KitchenError, KitchenEvent, KitchenEventPayload, KitchenEventType, KitchenResult, KitchenStatus,
};

/// AdvanceStage action
#[derive(Debug, Clone)]
pub struct AdvanceStageAction {
    pub order_id: String,
}

#[async_trait]
impl ActionHandler for AdvanceStageAction {
    async fn execute(&self, ctx: &ActionContext<'_>) -> KitchenResult<Vec<KitchenEvent>> {
        // 1. Load the coarse record; stage moves only while work is active
        let mut record = ctx
            .kitchen_orders
            .find_by_order_id(&self.order_id)
            .await?
            .ok_or_else(|| {
                KitchenError::NotFound(format!("Kitchen order {} not found", self.order_id))
            })?;
        if !matches!(
            record.status,
            KitchenStatus::Preparing | KitchenStatus::Cooking | KitchenStatus::Plating
        ) {
            return Err(KitchenError::invalid_transition(record.status, "advance stage"));
        }
        let from = record.status;

        // 2. Advance the timer stage when a timer exists
        let stage = match ctx.timer_engine.advance_stage(&self.order_id, ctx.now).await {
            Ok(stage) => Some(stage),
            Err(KitchenError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        // 3. Keep the coarse phase in step (saturates at PLATING)
        if record.status != KitchenStatus::Plating {
            record.advance_phase(ctx.now)?;
            ctx.kitchen_orders.update(&record).await?;
        }

        tracing::debug!(
            order_id = %self.order_id,
            stage = ?stage,
            status = %record.status,
            "Stage advanced"
        );

        if from == record.status {
            return Ok(Vec::new());
        }
        Ok(vec![KitchenEvent::new(
            Some(self.order_id.clone()),
            None,
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
    use shared::CookingStage;

    #[tokio::test]
    async fn stage_and_phase_advance_in_step() {
        let env = env_with_order().await;
        StartCookingAction {
            order_id: "order-1".into(),
            staff_id: "staff-1".into(),
            workstation_id: None,
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap();

        let action = AdvanceStageAction {
            order_id: "order-1".into(),
        };

        // PREP→COOKING / PREPARING→COOKING
        action.execute(&env.ctx(T0 + 1000)).await.unwrap();
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
        assert_eq!(timer.stage, CookingStage::Cooking);

        // COOKING→PLATING, then the ladder saturates
        action.execute(&env.ctx(T0 + 2000)).await.unwrap();
        action.execute(&env.ctx(T0 + 3000)).await.unwrap();
        let record = env
            .kitchen_orders
            .find_by_order_id("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, KitchenStatus::Plating);
        let timer = env
            .timers
            .find_active_by_order("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(timer.stage, CookingStage::Ready);
    }

    #[tokio::test]
    async fn advancing_a_queued_order_is_rejected() {
        let env = env_with_order().await;
        crate::kitchen::actions::QueueOrderAction {
            order_id: "order-1".into(),
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap();

        let err = AdvanceStageAction {
            order_id: "order-1".into(),
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap_err();
        assert!(matches!(err, KitchenError::InvalidTransition { .. }));
    }
}
