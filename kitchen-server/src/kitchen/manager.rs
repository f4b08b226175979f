//! KitchenManager - facade over the kitchen core
//!
//! This module handles:
//! - Facade operations for the controller layer
//! - Per-order serialization (concurrent pause+complete on one order is
//!   the race to prevent)
//! - Event broadcasting after persisted mutations
//! - The overdue watchdog and capacity threshold checks
//!
//! # Operation Flow
//!
//! ```text
//! facade call
//!     ├─ 1. Acquire the per-order async lock
//!     ├─ 2. Build ActionContext (repos + one `now` from the clock)
//!     ├─ 3. Execute the action (validate → mutate → persist)
//!     ├─ 4. Broadcast the returned events
//!     └─ 5. Return to caller
//! ```

use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::{Mutex, broadcast};

use crate::db::models::{CookingTimer, KitchenOrder};
use crate::db::repository::{
    CookingTimerRepository, KitchenOrderRepository, OrderRepository, WorkstationRepository,
};
use crate::kitchen::actions::{
    ActionContext, ActionHandler, AdvanceStageAction, CancelOrderAction, CompleteCookingAction,
    KitchenAction, PauseCookingAction, QueueOrderAction, ResumeCookingAction, ServeOrderAction,
    StartCookingAction, UpdatePriorityAction, UpdateTimerAction,
};
use crate::kitchen::capacity::CapacityEngine;
use crate::kitchen::timer::TimerEngine;
use crate::utils::Clock;
use shared::{
    CapacityAlertLevel, CapacitySnapshot, CookingStatus, KitchenEvent, KitchenEventPayload,
    KitchenEventType, KitchenResult,
};

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// KitchenManager for kitchen operations
pub struct KitchenManager {
    kitchen_orders: KitchenOrderRepository,
    timers: CookingTimerRepository,
    orders: OrderRepository,
    timer_engine: TimerEngine,
    capacity: CapacityEngine,
    event_tx: broadcast::Sender<KitchenEvent>,
    /// Per-order mutation locks
    order_locks: DashMap<String, Arc<Mutex<()>>>,
    /// Orders already alerted for the current overdue episode
    overdue_alerted: DashSet<String>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for KitchenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KitchenManager")
            .field("event_tx", &"<broadcast::Sender>")
            .field("order_locks", &self.order_locks.len())
            .finish()
    }
}

impl KitchenManager {
    /// Create a manager over an opened database
    pub fn new(db: Surreal<Db>, clock: Arc<dyn Clock>, max_kitchen_capacity: usize) -> Self {
        let kitchen_orders = KitchenOrderRepository::new(db.clone());
        let timers = CookingTimerRepository::new(db.clone());
        let capacity = CapacityEngine::new(
            kitchen_orders.clone(),
            timers.clone(),
            WorkstationRepository::new(db.clone()),
            max_kitchen_capacity,
        );
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            kitchen_orders,
            timers: timers.clone(),
            orders: OrderRepository::new(db),
            timer_engine: TimerEngine::new(timers),
            capacity,
            event_tx,
            order_locks: DashMap::new(),
            overdue_alerted: DashSet::new(),
            clock,
        }
    }

    /// Subscribe to the kitchen event stream
    pub fn subscribe(&self) -> broadcast::Receiver<KitchenEvent> {
        self.event_tx.subscribe()
    }

    pub fn capacity_engine(&self) -> &CapacityEngine {
        &self.capacity
    }

    /// Run one action under the order's lock, then broadcast its events
    async fn run_for_order(&self, order_id: &str, action: KitchenAction) -> KitchenResult<()> {
        let lock = self
            .order_locks
            .entry(order_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let ctx = ActionContext {
            kitchen_orders: &self.kitchen_orders,
            timers: &self.timers,
            orders: &self.orders,
            timer_engine: &self.timer_engine,
            now: self.clock.now_millis(),
        };
        let events = action.execute(&ctx).await?;
        for event in events {
            self.broadcast(event);
        }
        Ok(())
    }

    /// Fire-and-forget: a send error only means nobody is listening
    fn broadcast(&self, event: KitchenEvent) {
        let _ = self.event_tx.send(event);
    }

    // ========================================================================
    // Facade operations
    // ========================================================================

    /// Accept an order into the kitchen queue
    pub async fn queue_order(&self, order_id: &str) -> KitchenResult<()> {
        // Admission hint only - the queue is never hard-bounded
        if !self.capacity.can_accept_new_order().await? {
            tracing::warn!(order_id = %order_id, "Kitchen at critical load, queueing anyway");
        }
        self.run_for_order(
            order_id,
            KitchenAction::Queue(QueueOrderAction {
                order_id: order_id.to_string(),
            }),
        )
        .await
    }

    /// Start cooking an order (creates the kitchen record if missing)
    pub async fn start_preparing_order(
        &self,
        order_id: &str,
        staff_id: &str,
        workstation_id: Option<String>,
    ) -> KitchenResult<()> {
        self.run_for_order(
            order_id,
            KitchenAction::Start(StartCookingAction {
                order_id: order_id.to_string(),
                staff_id: staff_id.to_string(),
                workstation_id,
            }),
        )
        .await
    }

    /// Mark an order's cooking finished (READY)
    pub async fn complete_order(&self, order_id: &str, staff_id: &str) -> KitchenResult<()> {
        self.run_for_order(
            order_id,
            KitchenAction::Complete(CompleteCookingAction {
                order_id: order_id.to_string(),
                staff_id: staff_id.to_string(),
            }),
        )
        .await?;
        self.overdue_alerted.remove(order_id);
        Ok(())
    }

    /// Hand a READY order to the front of house
    pub async fn serve_order(&self, order_id: &str, staff_id: &str) -> KitchenResult<()> {
        self.run_for_order(
            order_id,
            KitchenAction::Serve(ServeOrderAction {
                order_id: order_id.to_string(),
                staff_id: staff_id.to_string(),
            }),
        )
        .await
    }

    /// Pause cooking with a reason
    pub async fn pause_cooking(&self, order_id: &str, reason: &str) -> KitchenResult<()> {
        self.run_for_order(
            order_id,
            KitchenAction::Pause(PauseCookingAction {
                order_id: order_id.to_string(),
                reason: reason.to_string(),
            }),
        )
        .await
    }

    /// Resume paused cooking
    pub async fn resume_cooking(&self, order_id: &str) -> KitchenResult<()> {
        self.run_for_order(
            order_id,
            KitchenAction::Resume(ResumeCookingAction {
                order_id: order_id.to_string(),
            }),
        )
        .await
    }

    /// Cancel an order anywhere short of terminal
    pub async fn cancel_kitchen_order(
        &self,
        order_id: &str,
        reason: &str,
        staff_id: Option<String>,
    ) -> KitchenResult<()> {
        self.run_for_order(
            order_id,
            KitchenAction::Cancel(CancelOrderAction {
                order_id: order_id.to_string(),
                reason: reason.to_string(),
                staff_id,
            }),
        )
        .await?;
        self.overdue_alerted.remove(order_id);
        Ok(())
    }

    /// Update an order's priority (clamped to [1, 10])
    pub async fn update_order_priority(&self, order_id: &str, priority: i32) -> KitchenResult<()> {
        self.run_for_order(
            order_id,
            KitchenAction::UpdatePriority(UpdatePriorityAction {
                order_id: order_id.to_string(),
                priority,
            }),
        )
        .await
    }

    /// Re-estimate the remaining cooking time
    pub async fn update_cooking_timer(
        &self,
        order_id: &str,
        estimated_minutes_remaining: i64,
        note: Option<String>,
    ) -> KitchenResult<()> {
        self.run_for_order(
            order_id,
            KitchenAction::UpdateTimer(UpdateTimerAction {
                order_id: order_id.to_string(),
                estimated_minutes_remaining,
                note,
            }),
        )
        .await
    }

    /// Advance the stage ladder
    pub async fn advance_stage(&self, order_id: &str) -> KitchenResult<()> {
        self.run_for_order(
            order_id,
            KitchenAction::AdvanceStage(AdvanceStageAction {
                order_id: order_id.to_string(),
            }),
        )
        .await
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Waiting orders, highest priority first
    pub async fn get_kitchen_queue(&self) -> KitchenResult<Vec<KitchenOrder>> {
        Ok(self.kitchen_orders.find_queue().await?)
    }

    /// Orders being worked right now
    pub async fn get_active_kitchen_orders(&self) -> KitchenResult<Vec<KitchenOrder>> {
        Ok(self.kitchen_orders.find_active().await?)
    }

    /// Active orders past their estimate
    pub async fn get_overdue_orders(&self) -> KitchenResult<Vec<KitchenOrder>> {
        Ok(self
            .kitchen_orders
            .find_overdue(self.clock.now_millis())
            .await?)
    }

    /// One order with its timer, for the detail view
    pub async fn get_order_detail(
        &self,
        order_id: &str,
    ) -> KitchenResult<Option<(KitchenOrder, Option<CookingTimer>)>> {
        let Some(record) = self.kitchen_orders.find_by_order_id(order_id).await? else {
            return Ok(None);
        };
        let timer = self.timers.find_active_by_order(order_id).await?;
        Ok(Some((record, timer)))
    }

    /// Current instant, for read-time derived values in the API layer
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    // ========================================================================
    // Watchdog entry points (invoked on a schedule)
    // ========================================================================

    /// Scan for overdue work: persist RUNNING → OVERDUE on timers, emit
    /// one OrderOverdue event per overdue episode. Returns how many orders
    /// were newly alerted.
    pub async fn check_for_overdue_orders(&self) -> KitchenResult<usize> {
        let now = self.clock.now_millis();
        let mut alerted = 0usize;

        // Persist the timer reclassification first; conflicts are fine -
        // a concurrent writer means the timer is being worked anyway
        for timer in self.timers.find_overdue(now).await? {
            if timer.status == CookingStatus::Running && timer.alerts_sent == 0 {
                if let Err(e) = self.timer_engine.mark_overdue(&timer, now).await {
                    tracing::warn!(order_id = %timer.order_id, error = %e, "Overdue mark failed");
                }
            }
        }

        for order in self.kitchen_orders.find_overdue(now).await? {
            if !self.overdue_alerted.insert(order.order_id.clone()) {
                continue;
            }
            let overdue_minutes = order.overdue_minutes(now);
            tracing::warn!(
                order_id = %order.order_id,
                overdue_minutes = overdue_minutes,
                "Order overdue"
            );
            self.broadcast(KitchenEvent::new(
                Some(order.order_id.clone()),
                None,
                now,
                KitchenEventType::OrderOverdue,
                KitchenEventPayload::OrderOverdue { overdue_minutes },
            ));
            alerted += 1;
        }
        Ok(alerted)
    }

    /// Threshold check with band dedup; broadcasts a CapacityAlert event
    /// on escalation
    pub async fn check_capacity_thresholds(
        &self,
    ) -> KitchenResult<Option<(CapacityAlertLevel, CapacitySnapshot)>> {
        let alert = self.capacity.alert_on_band_change().await?;
        if let Some((level, snapshot)) = &alert {
            tracing::warn!(
                level = ?level,
                percentage = snapshot.capacity_percentage,
                active = snapshot.active_count,
                "Kitchen capacity threshold crossed"
            );
            self.broadcast(KitchenEvent::new(
                None,
                None,
                self.clock.now_millis(),
                KitchenEventType::CapacityAlert,
                KitchenEventPayload::CapacityAlert {
                    level: *level,
                    snapshot: snapshot.clone(),
                },
            ));
        }
        Ok(alert)
    }
}
