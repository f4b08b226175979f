//! Timer Engine
//!
//! Persists cooking-timer transitions through the version-checked
//! repository update. Every mutation is a read-modify-CAS loop: a stale
//! version means another writer got there first, so the entity is
//! re-read and the transition re-validated before retrying.
//!
//! The arithmetic itself (elapsed/remaining/progress) lives on
//! [`CookingTimer`]; this engine only sequences transitions.

use crate::db::models::CookingTimer;
use crate::db::repository::CookingTimerRepository;
use shared::{CookingStage, KitchenError, KitchenResult};

/// CAS attempts before surfacing the conflict to the caller
const MAX_CAS_RETRIES: usize = 3;

#[derive(Clone)]
pub struct TimerEngine {
    timers: CookingTimerRepository,
}

impl TimerEngine {
    pub fn new(timers: CookingTimerRepository) -> Self {
        Self { timers }
    }

    /// Create and start the one timer for an order
    ///
    /// Rejected if the order already has an open timer.
    pub async fn start_for_order(
        &self,
        order_id: &str,
        staff_id: Option<String>,
        workstation_id: Option<String>,
        estimated_duration_secs: i64,
        now: i64,
    ) -> KitchenResult<CookingTimer> {
        if self.timers.find_active_by_order(order_id).await?.is_some() {
            return Err(KitchenError::Validation(format!(
                "Order {} already has an active timer",
                order_id
            )));
        }
        let mut timer = CookingTimer::idle(order_id, estimated_duration_secs, now);
        timer.workstation_id = workstation_id;
        timer.start(staff_id, now)?;
        Ok(self.timers.create(timer).await?)
    }

    /// Read-modify-CAS loop over the order's active timer
    async fn mutate<F>(&self, order_id: &str, mut apply: F) -> KitchenResult<CookingTimer>
    where
        F: FnMut(&mut CookingTimer) -> KitchenResult<()>,
    {
        for attempt in 0..MAX_CAS_RETRIES {
            let mut timer = self
                .timers
                .find_active_by_order(order_id)
                .await?
                .ok_or_else(|| {
                    KitchenError::NotFound(format!("No active timer for order {}", order_id))
                })?;

            apply(&mut timer)?;

            match self.timers.update_versioned(&timer).await? {
                Some(stored) => return Ok(stored),
                None => {
                    tracing::warn!(
                        order_id = %order_id,
                        attempt = attempt + 1,
                        "Timer version conflict, re-reading"
                    );
                }
            }
        }
        Err(KitchenError::VersionConflict(format!(
            "Timer for order {} kept changing under us",
            order_id
        )))
    }

    /// RUNNING → PAUSED
    pub async fn pause(&self, order_id: &str, reason: &str, now: i64) -> KitchenResult<CookingTimer> {
        self.mutate(order_id, |t| t.pause(reason, now)).await
    }

    /// PAUSED → RUNNING, paused interval accounted
    pub async fn resume(&self, order_id: &str, now: i64) -> KitchenResult<CookingTimer> {
        self.mutate(order_id, |t| t.resume(now)).await
    }

    /// RUNNING/PAUSED → COMPLETED
    pub async fn complete(&self, order_id: &str, now: i64) -> KitchenResult<CookingTimer> {
        self.mutate(order_id, |t| t.complete(now)).await
    }

    /// Any non-terminal → CANCELLED
    pub async fn cancel(&self, order_id: &str, reason: &str, now: i64) -> KitchenResult<CookingTimer> {
        self.mutate(order_id, |t| t.cancel(reason, now)).await
    }

    /// Advance the PREP → COOKING → PLATING → READY ladder
    pub async fn advance_stage(&self, order_id: &str, now: i64) -> KitchenResult<CookingStage> {
        let timer = self
            .mutate(order_id, |t| t.advance_stage(now).map(|_| ()))
            .await?;
        Ok(timer.stage)
    }

    /// Replace the remaining estimate
    pub async fn reestimate(
        &self,
        order_id: &str,
        minutes_remaining: i64,
        note: Option<String>,
        now: i64,
    ) -> KitchenResult<CookingTimer> {
        self.mutate(order_id, |t| t.reestimate(minutes_remaining, note.clone(), now))
            .await
    }

    /// Watchdog: persist the OVERDUE reclassification and count the alert.
    /// Returns the stored timer, or None when another writer already moved
    /// the timer on (conflict is fine here - alerts are advisory).
    pub async fn mark_overdue(&self, timer: &CookingTimer, now: i64) -> KitchenResult<Option<CookingTimer>> {
        let mut next = timer.clone();
        if next.status == shared::CookingStatus::Running {
            next.mark_overdue(now)?;
        }
        next.record_alert(now);
        Ok(self.timers.update_versioned(&next).await?)
    }
}
