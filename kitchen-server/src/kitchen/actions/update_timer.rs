//! UpdateTimer action
//!
//! Re-estimates the remaining cooking time: the timer's estimated end
//! becomes `now + minutes`, and the coarse record's estimated completion
//! is synced so both layers agree on when the dish should be done.

use async_trait::async_trait;

use crate::kitchen::actions::{ActionContext, ActionHandler};
use shared::{KitchenError, KitchenEvent, KitchenEventPayload, KitchenEventType, KitchenResult};

/// UpdateTimer action
#[derive(Debug, Clone)]
pub struct UpdateTimerAction {
    pub order_id: String,
    pub estimated_minutes_remaining: i64,
    pub note: Option<String>,
}

#[async_trait]
impl ActionHandler for UpdateTimerAction {
    async fn execute(&self, ctx: &ActionContext<'_>) -> KitchenResult<Vec<KitchenEvent>> {
        if self.estimated_minutes_remaining <= 0 {
            return Err(KitchenError::Validation(
                "estimated_minutes_remaining must be positive".into(),
            ));
        }

        // 1. Re-estimate the timer (requires an active one)
        ctx.timer_engine
            .reestimate(
                &self.order_id,
                self.estimated_minutes_remaining,
                self.note.clone(),
                ctx.now,
            )
            .await?;

        // 2. Sync the coarse estimate so order-level overdue agrees
        let mut record = ctx
            .kitchen_orders
            .find_by_order_id(&self.order_id)
            .await?
            .ok_or_else(|| {
                KitchenError::NotFound(format!("Kitchen order {} not found", self.order_id))
            })?;
        record.estimated_completion_time =
            Some(ctx.now + self.estimated_minutes_remaining * 60_000);
        if let Some(start) = record.start_time {
            record.estimated_cooking_minutes =
                (ctx.now - start) / 60_000 + self.estimated_minutes_remaining;
        }
        record.updated_at = ctx.now;
        ctx.kitchen_orders.update(&record).await?;

        tracing::info!(
            order_id = %self.order_id,
            minutes_remaining = self.estimated_minutes_remaining,
            "Cooking estimate updated"
        );

        Ok(vec![KitchenEvent::new(
            Some(self.order_id.clone()),
            None,
            ctx.now,
            KitchenEventType::TimerReestimated,
            KitchenEventPayload::TimerReestimated {
                estimated_minutes_remaining: self.estimated_minutes_remaining,
            },
        )])
    }
}
