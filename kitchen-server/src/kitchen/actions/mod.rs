//! Kitchen action implementations
//!
//! Each action implements the [`ActionHandler`] trait and handles one
//! state-machine operation: validate the current state, persist the
//! mutation, return the events to broadcast. Actions never dispatch
//! notifications themselves - that is the listener's job downstream.

use async_trait::async_trait;

use crate::db::repository::{CookingTimerRepository, KitchenOrderRepository, OrderRepository};
use crate::kitchen::timer::TimerEngine;
use shared::{KitchenEvent, KitchenResult};

mod advance_stage;
mod cancel_order;
mod complete_cooking;
mod pause_cooking;
mod queue_order;
mod serve_order;
mod start_cooking;
mod update_priority;
mod update_timer;

pub use advance_stage::AdvanceStageAction;
pub use cancel_order::CancelOrderAction;
pub use complete_cooking::CompleteCookingAction;
pub use pause_cooking::{PauseCookingAction, ResumeCookingAction};
pub use queue_order::QueueOrderAction;
pub use serve_order::ServeOrderAction;
pub use start_cooking::StartCookingAction;
pub use update_priority::UpdatePriorityAction;
pub use update_timer::UpdateTimerAction;

/// Everything an action needs to run: repositories, the timer engine,
/// and the instant the operation is evaluated against
pub struct ActionContext<'a> {
    pub kitchen_orders: &'a KitchenOrderRepository,
    pub timers: &'a CookingTimerRepository,
    pub orders: &'a OrderRepository,
    pub timer_engine: &'a TimerEngine,
    /// Unix millis; one instant per operation
    pub now: i64,
}

/// One state-machine operation
#[async_trait]
pub trait ActionHandler {
    async fn execute(&self, ctx: &ActionContext<'_>) -> KitchenResult<Vec<KitchenEvent>>;
}

/// KitchenAction enum - dispatches to concrete action implementations
pub enum KitchenAction {
    Queue(QueueOrderAction),
    Start(StartCookingAction),
    Complete(CompleteCookingAction),
    Pause(PauseCookingAction),
    Resume(ResumeCookingAction),
    Cancel(CancelOrderAction),
    UpdatePriority(UpdatePriorityAction),
    UpdateTimer(UpdateTimerAction),
    AdvanceStage(AdvanceStageAction),
    Serve(ServeOrderAction),
}

#[async_trait]
impl ActionHandler for KitchenAction {
    async fn execute(&self, ctx: &ActionContext<'_>) -> KitchenResult<Vec<KitchenEvent>> {
        match self {
            KitchenAction::Queue(action) => action.execute(ctx).await,
            KitchenAction::Start(action) => action.execute(ctx).await,
            KitchenAction::Complete(action) => action.execute(ctx).await,
            KitchenAction::Pause(action) => action.execute(ctx).await,
            KitchenAction::Resume(action) => action.execute(ctx).await,
            KitchenAction::Cancel(action) => action.execute(ctx).await,
            KitchenAction::UpdatePriority(action) => action.execute(ctx).await,
            KitchenAction::UpdateTimer(action) => action.execute(ctx).await,
            KitchenAction::AdvanceStage(action) => action.execute(ctx).await,
            KitchenAction::Serve(action) => action.execute(ctx).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixtures for action tests: in-memory database + repos

    use super::*;
    use crate::db::models::Order;
    use surrealdb::Surreal;
    use surrealdb::engine::local::{Db, Mem};

    pub const T0: i64 = 1_700_000_000_000;

    pub struct TestEnv {
        pub kitchen_orders: KitchenOrderRepository,
        pub timers: CookingTimerRepository,
        pub orders: OrderRepository,
        pub timer_engine: TimerEngine,
    }

    impl TestEnv {
        pub fn ctx(&self, now: i64) -> ActionContext<'_> {
            ActionContext {
                kitchen_orders: &self.kitchen_orders,
                timers: &self.timers,
                orders: &self.orders,
                timer_engine: &self.timer_engine,
                now,
            }
        }
    }

    pub async fn mem_db() -> Surreal<Db> {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        db
    }

    /// Fresh env with one outward order ("order-1", 3 items) seeded
    pub async fn env_with_order() -> TestEnv {
        let db = mem_db().await;
        let orders = OrderRepository::new(db.clone());
        orders.create(Order::new("order-1", 3, T0)).await.unwrap();
        TestEnv {
            kitchen_orders: KitchenOrderRepository::new(db.clone()),
            timers: CookingTimerRepository::new(db.clone()),
            timer_engine: TimerEngine::new(CookingTimerRepository::new(db.clone())),
            orders,
        }
    }
}
