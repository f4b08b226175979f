//! ServeOrder action
//!
//! READY → SERVED: the pickup handoff, the one mutation allowed on a
//! READY record. Pushes the outward status to SERVED.

use async_trait::async_trait;

use crate::db::models::OrderStatus;
use crate::kitchen::actions::{ActionContext, ActionHandler};
use shared::{
    KitchenError, KitchenEvent, KitchenEventPayload, KitchenEventType, KitchenResult, KitchenStatus,
};

/// ServeOrder action
#[derive(Debug, Clone)]
pub struct ServeOrderAction {
    pub order_id: String,
    pub staff_id: String,
}

#[async_trait]
impl ActionHandler for ServeOrderAction {
    async fn execute(&self, ctx: &ActionContext<'_>) -> KitchenResult<Vec<KitchenEvent>> {
        let mut record = ctx
            .kitchen_orders
            .find_by_order_id(&self.order_id)
            .await?
            .ok_or_else(|| {
                KitchenError::NotFound(format!("Kitchen order {} not found", self.order_id))
            })?;
        record.serve(ctx.now)?;
        ctx.kitchen_orders.update(&record).await?;

        if !ctx
            .orders
            .update_status(&self.order_id, OrderStatus::Served)
            .await?
        {
            tracing::warn!(order_id = %self.order_id, "Outward order missing, status not pushed");
        }

        tracing::info!(order_id = %self.order_id, staff_id = %self.staff_id, "Order served");

        Ok(vec![KitchenEvent::new(
            Some(self.order_id.clone()),
            Some(self.staff_id.clone()),
            ctx.now,
            KitchenEventType::StatusChanged,
            KitchenEventPayload::StatusChanged {
                from: KitchenStatus::Ready,
                to: KitchenStatus::Served,
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitchen::actions::test_support::{T0, env_with_order};
    use crate::kitchen::actions::{CompleteCookingAction, StartCookingAction};

    const MINUTE: i64 = 60_000;

    #[tokio::test]
    async fn serve_after_complete() {
        let env = env_with_order().await;
        StartCookingAction {
            order_id: "order-1".into(),
            staff_id: "staff-1".into(),
            workstation_id: None,
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap();
        CompleteCookingAction {
            order_id: "order-1".into(),
            staff_id: "staff-1".into(),
        }
        .execute(&env.ctx(T0 + 20 * MINUTE))
        .await
        .unwrap();

        ServeOrderAction {
            order_id: "order-1".into(),
            staff_id: "staff-2".into(),
        }
        .execute(&env.ctx(T0 + 22 * MINUTE))
        .await
        .unwrap();

        let record = env
            .kitchen_orders
            .find_by_order_id("order-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, KitchenStatus::Served);

        let order = env.orders.find_by_ref("order-1").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Served);
    }

    #[tokio::test]
    async fn serving_an_unfinished_order_is_rejected() {
        let env = env_with_order().await;
        StartCookingAction {
            order_id: "order-1".into(),
            staff_id: "staff-1".into(),
            workstation_id: None,
        }
        .execute(&env.ctx(T0))
        .await
        .unwrap();

        let err = ServeOrderAction {
            order_id: "order-1".into(),
            staff_id: "staff-2".into(),
        }
        .execute(&env.ctx(T0 + MINUTE))
        .await
        .unwrap_err();
        assert!(matches!(err, KitchenError::InvalidTransition { .. }));
    }
}
