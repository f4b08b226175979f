//! StartCooking action
//!
//! QUEUED → PREPARING. Starts the cooking timer and pushes the outward
//! status to PREPARING. If no kitchen record exists yet (order accepted
//! but never queued), one is created on the fly.

use async_trait::async_trait;

use crate::db::models::{KitchenOrder, OrderStatus};
use crate::kitchen::actions::{ActionContext, ActionHandler};
use shared::{KitchenError, KitchenEvent, KitchenEventPayload, KitchenEventType, KitchenResult};

/// StartCooking action
#[derive(Debug, Clone)]
pub struct StartCookingAction {
    pub order_id: String,
    pub staff_id: String,
    /// Station the dish is cooked at, when known up front
    pub workstation_id: Option<String>,
}

#[async_trait]
impl ActionHandler for StartCookingAction {
    async fn execute(&self, ctx: &ActionContext<'_>) -> KitchenResult<Vec<KitchenEvent>> {
        // 1. Load or lazily create the kitchen record
        let mut record = match ctx.kitchen_orders.find_by_order_id(&self.order_id).await? {
            Some(record) => record,
            None => {
                let order = ctx.orders.find_by_ref(&self.order_id).await?.ok_or_else(|| {
                    KitchenError::NotFound(format!("Order {} not found", self.order_id))
                })?;
                let estimate = KitchenOrder::estimate_for_items(order.item_count);
                ctx.kitchen_orders
                    .create(KitchenOrder::queued(&self.order_id, estimate, ctx.now))
                    .await?
            }
        };

        // 2. QUEUED → PREPARING
        record.start(&self.staff_id, ctx.now)?;
        ctx.kitchen_orders.update(&record).await?;

        // 3. Start the fine-grained timer alongside
        ctx.timer_engine
            .start_for_order(
                &self.order_id,
                Some(self.staff_id.clone()),
                self.workstation_id.clone(),
                record.estimated_cooking_minutes * 60,
                ctx.now,
            )
            .await?;

        // 4. Outward status side effect; a missing outward record is logged,
        //    never fails the kitchen transition
        if !ctx
            .orders
            .update_status(&self.order_id, OrderStatus::Preparing)
            .await?
        {
            tracing::warn!(order_id = %self.order_id, "Outward order missing, status not pushed");
        }

        tracing::info!(
            order_id = %self.order_id,
            staff_id = %self.staff_id,
            estimated_minutes = record.estimated_cooking_minutes,
            "Cooking started"
        );

        Ok(vec![KitchenEvent::new(
            Some(self.order_id.clone()),
            Some(self.staff_id.clone()),
            ctx.now,
            KitchenEventType::CookingStarted,
            KitchenEventPayload::CookingStarted {
                estimated_minutes: record.estimated_cooking_minutes,
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitchen::actions::test_support::{T0, env_with_order};
    use shared::{CookingStatus, KitchenStatus};

    fn action() -> StartCookingAction {
        StartCookingAction {
            order_id: "order-1".into(),
            staff_id: "staff-1".into(),
            workstation_id: None,
        }
    }

    #[tokio::test]
    async fn creates_record_on_the_fly_and_starts_timer() {
        let env = env_with_order().await;
        let events = action().execute(&env.ctx(T0)).await.unwrap();
        assert_eq!(events[0].event_type, KitchenEventType::CookingStarted);

        let record = env
            .kitchen_orders
            .find_by_order_id("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, KitchenStatus::Preparing);
        assert_eq!(record.start_time, Some(T0));
        // estimate: 15 + 5×3 = 30 min
        assert_eq!(record.estimated_completion_time, Some(T0 + 30 * 60_000));

        let timer = env
            .timers
            .find_active_by_order("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(timer.status, CookingStatus::Running);
        assert_eq!(timer.estimated_duration_secs, 30 * 60);

        let order = env.orders.find_by_ref("order-1").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn starting_twice_is_an_invalid_transition() {
        let env = env_with_order().await;
        action().execute(&env.ctx(T0)).await.unwrap();
        let err = action().execute(&env.ctx(T0 + 1000)).await.unwrap_err();
        assert!(matches!(err, KitchenError::InvalidTransition { .. }));
    }
}
