//! Cooking Timer Model
//!
//! Fine-grained timer for one order/assignment with pause accounting.
//! Elapsed time always excludes paused intervals; the estimated end is
//! pushed back by exactly the paused interval on every resume.
//!
//! Derived values take `now` (Unix millis) as a parameter - nothing here
//! reads the wall clock, so everything is testable with fixed instants.
//!
//! 并发控制：`version` 乐观锁，由 repository 的 CAS 更新校验。

use serde::{Deserialize, Serialize};
use shared::{CookingStage, CookingStatus, KitchenError, KitchenResult, NoteEntry, NoteKind};

use super::serde_helpers;

/// Cooking timer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookingTimer {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::opt_record_id"
    )]
    pub id: Option<String>,
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    /// Workstation this timer is bound to, for station capacity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workstation_id: Option<String>,
    /// Set on start (Unix millis); None while IDLE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// Set while PAUSED, cleared on resume
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_time: Option<i64>,
    /// Set on complete/cancel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    /// Re-extended by the paused interval on every resume
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_end_time: Option<i64>,
    pub estimated_duration_secs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_duration_secs: Option<i64>,
    /// Cumulative paused time in seconds; only ever increases
    #[serde(default)]
    pub paused_duration_secs: i64,
    pub status: CookingStatus,
    pub stage: CookingStage,
    /// Overdue alerts already sent for this timer
    #[serde(default)]
    pub alerts_sent: i32,
    #[serde(default)]
    pub notes: Vec<NoteEntry>,
    /// Target temperature for the dish, when the station tracks one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_target: Option<f64>,
    /// Post-completion quality score (1-10), set by expediting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<i32>,
    /// Optimistic concurrency counter, bumped by every persisted update
    #[serde(default)]
    pub version: u64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CookingTimer {
    /// Create an IDLE timer for an order
    pub fn idle(order_id: impl Into<String>, estimated_duration_secs: i64, now: i64) -> Self {
        Self {
            id: None,
            order_id: order_id.into(),
            staff_id: None,
            workstation_id: None,
            start_time: None,
            pause_time: None,
            end_time: None,
            estimated_end_time: None,
            estimated_duration_secs,
            actual_duration_secs: None,
            paused_duration_secs: 0,
            status: CookingStatus::Idle,
            stage: CookingStage::Prep,
            alerts_sent: 0,
            notes: Vec::new(),
            temperature_target: None,
            quality_score: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// OVERDUE is stored-RUNNING that went past its estimate; both accept
    /// the running-only operations
    fn is_running(&self) -> bool {
        matches!(self.status, CookingStatus::Running | CookingStatus::Overdue)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// IDLE → RUNNING
    pub fn start(&mut self, staff_id: Option<String>, now: i64) -> KitchenResult<()> {
        if self.status != CookingStatus::Idle {
            return Err(KitchenError::invalid_transition(self.status, "start timer"));
        }
        self.status = CookingStatus::Running;
        self.staff_id = staff_id;
        self.start_time = Some(now);
        self.estimated_end_time = Some(now + self.estimated_duration_secs * 1000);
        self.updated_at = now;
        Ok(())
    }

    /// RUNNING → PAUSED, reason recorded
    pub fn pause(&mut self, reason: impl Into<String>, now: i64) -> KitchenResult<()> {
        if !self.is_running() {
            return Err(KitchenError::invalid_transition(self.status, "pause timer"));
        }
        self.status = CookingStatus::Paused;
        self.pause_time = Some(now);
        self.notes.push(NoteEntry::new(now, NoteKind::Pause, reason));
        self.updated_at = now;
        Ok(())
    }

    /// PAUSED → RUNNING
    ///
    /// Adds the paused interval to the cumulative counter and pushes the
    /// estimated end back by the same interval.
    pub fn resume(&mut self, now: i64) -> KitchenResult<()> {
        if self.status != CookingStatus::Paused {
            return Err(KitchenError::invalid_transition(self.status, "resume timer"));
        }
        let paused_at = self
            .pause_time
            .ok_or_else(|| KitchenError::Validation("paused timer has no pause time".into()))?;
        let interval_millis = (now - paused_at).max(0);
        self.paused_duration_secs += interval_millis / 1000;
        self.estimated_end_time = self.estimated_end_time.map(|t| t + interval_millis);
        self.pause_time = None;
        self.status = CookingStatus::Running;
        self.notes.push(NoteEntry::new(now, NoteKind::Resume, "resumed"));
        self.updated_at = now;
        Ok(())
    }

    /// RUNNING/PAUSED → COMPLETED
    pub fn complete(&mut self, now: i64) -> KitchenResult<()> {
        if !self.is_running() && self.status != CookingStatus::Paused {
            return Err(KitchenError::invalid_transition(self.status, "complete timer"));
        }
        self.close(CookingStatus::Completed, now);
        Ok(())
    }

    /// Any non-terminal state → CANCELLED, reason recorded
    pub fn cancel(&mut self, reason: impl Into<String>, now: i64) -> KitchenResult<()> {
        if self.status.is_terminal() {
            return Err(KitchenError::invalid_transition(self.status, "cancel timer"));
        }
        self.notes.push(NoteEntry::new(now, NoteKind::Cancel, reason));
        self.close(CookingStatus::Cancelled, now);
        Ok(())
    }

    /// Shared terminal accounting: close an open pause, stamp the end,
    /// compute actual duration excluding every paused interval
    fn close(&mut self, terminal: CookingStatus, now: i64) {
        if let Some(paused_at) = self.pause_time.take() {
            self.paused_duration_secs += (now - paused_at).max(0) / 1000;
        }
        self.status = terminal;
        self.end_time = Some(now);
        if let Some(start) = self.start_time {
            self.actual_duration_secs = Some((now - start) / 1000 - self.paused_duration_secs);
        }
        self.updated_at = now;
    }

    /// PREP → COOKING → PLATING → READY; no-op once READY
    pub fn advance_stage(&mut self, now: i64) -> KitchenResult<CookingStage> {
        if self.status.is_terminal() {
            return Err(KitchenError::invalid_transition(self.status, "advance stage"));
        }
        self.stage = self.stage.next();
        self.updated_at = now;
        Ok(self.stage)
    }

    /// Replace the remaining estimate: the new estimated end is `now +
    /// minutes`, the total estimated duration becomes elapsed-so-far +
    /// minutes. A stored-OVERDUE timer goes back to RUNNING.
    pub fn reestimate(
        &mut self,
        minutes_remaining: i64,
        note: Option<String>,
        now: i64,
    ) -> KitchenResult<()> {
        if !self.is_running() && self.status != CookingStatus::Paused {
            return Err(KitchenError::invalid_transition(self.status, "reestimate"));
        }
        self.estimated_end_time = Some(now + minutes_remaining * 60_000);
        self.estimated_duration_secs = self.elapsed_seconds(now) + minutes_remaining * 60;
        if self.status == CookingStatus::Overdue {
            self.status = CookingStatus::Running;
        }
        if let Some(text) = note {
            self.notes.push(NoteEntry::new(now, NoteKind::Reestimate, text));
        }
        self.updated_at = now;
        Ok(())
    }

    /// Persist the read-time OVERDUE reclassification (watchdog)
    pub fn mark_overdue(&mut self, now: i64) -> KitchenResult<()> {
        if self.status != CookingStatus::Running {
            return Err(KitchenError::invalid_transition(self.status, "mark overdue"));
        }
        self.status = CookingStatus::Overdue;
        self.updated_at = now;
        Ok(())
    }

    /// Count one dispatched overdue alert
    pub fn record_alert(&mut self, now: i64) {
        self.alerts_sent += 1;
        self.updated_at = now;
    }

    // ========================================================================
    // Derived values (pure functions of `now`)
    // ========================================================================

    /// Seconds of actual cooking: (reference − start) − paused, where the
    /// reference is the pause instant while PAUSED and the end instant
    /// once terminal
    pub fn elapsed_seconds(&self, now: i64) -> i64 {
        let Some(start) = self.start_time else {
            return 0;
        };
        let reference = if self.status.is_terminal() {
            self.end_time.unwrap_or(now)
        } else if self.status == CookingStatus::Paused {
            self.pause_time.unwrap_or(now)
        } else {
            now
        };
        ((reference - start) / 1000 - self.paused_duration_secs).max(0)
    }

    /// Seconds until the estimated duration is used up; negative when past
    pub fn remaining_seconds(&self, now: i64) -> i64 {
        self.estimated_duration_secs - self.elapsed_seconds(now)
    }

    /// Elapsed over estimate, clamped to [0, 100]
    pub fn progress_percentage(&self, now: i64) -> f64 {
        if self.estimated_duration_secs <= 0 {
            return 100.0;
        }
        let pct = self.elapsed_seconds(now) as f64 / self.estimated_duration_secs as f64 * 100.0;
        pct.clamp(0.0, 100.0)
    }

    /// True iff now is past the estimated end and the timer is not yet
    /// COMPLETED or CANCELLED (a PAUSED timer can be overdue)
    pub fn is_overdue(&self, now: i64) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        match self.estimated_end_time {
            Some(estimate) => now > estimate,
            None => false,
        }
    }

    /// Seconds past the estimated end; 0 when not overdue
    pub fn overdue_seconds(&self, now: i64) -> i64 {
        if !self.is_overdue(now) {
            return 0;
        }
        (now - self.estimated_end_time.unwrap_or(now)) / 1000
    }

    /// Status as seen by readers: stored RUNNING is reported OVERDUE once
    /// past the estimate
    pub fn effective_status(&self, now: i64) -> CookingStatus {
        if self.status == CookingStatus::Running && self.is_overdue(now) {
            CookingStatus::Overdue
        } else {
            self.status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000_000;
    const SEC: i64 = 1000;

    fn running_timer() -> CookingTimer {
        let mut timer = CookingTimer::idle("order-1", 1200, T0);
        timer.start(Some("staff-1".into()), T0).unwrap();
        timer
    }

    #[test]
    fn fresh_timer_is_idle_with_zero_elapsed() {
        let timer = CookingTimer::idle("order-1", 1200, T0);
        assert_eq!(timer.status, CookingStatus::Idle);
        assert_eq!(timer.elapsed_seconds(T0 + 600 * SEC), 0);
        assert_eq!(timer.progress_percentage(T0 + 600 * SEC), 0.0);
        assert!(!timer.is_overdue(T0 + 2000 * SEC));
    }

    #[test]
    fn halfway_without_pause() {
        // estimated 1200s, read at T0+600s
        let timer = running_timer();
        let now = T0 + 600 * SEC;
        assert_eq!(timer.elapsed_seconds(now), 600);
        assert_eq!(timer.remaining_seconds(now), 600);
        assert_eq!(timer.progress_percentage(now), 50.0);
    }

    #[test]
    fn pause_resume_excludes_paused_interval() {
        // pause at +300s, resume at +360s (60s paused), read at +660s
        let mut timer = running_timer();
        timer.pause("plancha occupied", T0 + 300 * SEC).unwrap();
        assert_eq!(timer.status, CookingStatus::Paused);

        // while paused the reference freezes at the pause instant
        assert_eq!(timer.elapsed_seconds(T0 + 350 * SEC), 300);

        timer.resume(T0 + 360 * SEC).unwrap();
        assert_eq!(timer.paused_duration_secs, 60);
        // estimated end shifted from T0+1200s to T0+1260s
        assert_eq!(timer.estimated_end_time, Some(T0 + 1260 * SEC));

        let now = T0 + 660 * SEC;
        assert_eq!(timer.elapsed_seconds(now), 600);
        assert_eq!(timer.remaining_seconds(now), 600);
    }

    #[test]
    fn paused_duration_only_increases() {
        let mut timer = running_timer();
        timer.pause("first", T0 + 100 * SEC).unwrap();
        timer.resume(T0 + 130 * SEC).unwrap();
        assert_eq!(timer.paused_duration_secs, 30);

        timer.pause("second", T0 + 200 * SEC).unwrap();
        timer.resume(T0 + 250 * SEC).unwrap();
        assert_eq!(timer.paused_duration_secs, 80);
        assert_eq!(timer.estimated_end_time, Some(T0 + 1280 * SEC));
    }

    #[test]
    fn progress_stays_in_bounds_after_completion() {
        let mut timer = running_timer();
        // run way past the estimate before completing
        let late = T0 + 3000 * SEC;
        timer.complete(late).unwrap();
        assert_eq!(timer.progress_percentage(late + 500 * SEC), 100.0);
        assert_eq!(timer.elapsed_seconds(late + 500 * SEC), 3000);
        assert_eq!(timer.actual_duration_secs, Some(3000));
    }

    #[test]
    fn overdue_detection_and_seconds() {
        let timer = running_timer();
        let estimate = T0 + 1200 * SEC;
        assert!(!timer.is_overdue(estimate));
        assert!(timer.is_overdue(estimate + SEC));
        assert_eq!(timer.overdue_seconds(estimate + 125 * SEC), 125);
        assert_eq!(timer.effective_status(estimate + SEC), CookingStatus::Overdue);
        assert_eq!(timer.effective_status(estimate - SEC), CookingStatus::Running);
    }

    #[test]
    fn completed_timer_is_never_overdue() {
        let mut timer = running_timer();
        timer.complete(T0 + 600 * SEC).unwrap();
        assert!(!timer.is_overdue(T0 + 5000 * SEC));
        assert_eq!(timer.overdue_seconds(T0 + 5000 * SEC), 0);
        assert_eq!(timer.effective_status(T0 + 5000 * SEC), CookingStatus::Completed);
    }

    #[test]
    fn complete_from_pause_closes_the_open_interval() {
        let mut timer = running_timer();
        timer.pause("hold", T0 + 300 * SEC).unwrap();
        timer.complete(T0 + 400 * SEC).unwrap();
        // 100s of open pause folded in: actual = 400 - 100 = 300
        assert_eq!(timer.paused_duration_secs, 100);
        assert_eq!(timer.actual_duration_secs, Some(300));
    }

    #[test]
    fn cancel_records_reason_and_excludes_paused_time() {
        let mut timer = running_timer();
        timer.pause("hold", T0 + 200 * SEC).unwrap();
        timer.resume(T0 + 260 * SEC).unwrap();
        timer.cancel("ingredient shortage", T0 + 500 * SEC).unwrap();

        assert_eq!(timer.status, CookingStatus::Cancelled);
        assert_eq!(timer.actual_duration_secs, Some(440));
        let note = timer.notes.iter().find(|n| n.kind == NoteKind::Cancel).unwrap();
        assert_eq!(note.render(), "取消: ingredient shortage");

        // terminal: no further transitions
        assert!(timer.pause("x", T0 + 600 * SEC).is_err());
        assert!(timer.cancel("x", T0 + 600 * SEC).is_err());
    }

    #[test]
    fn stage_ladder_advances_and_saturates() {
        let mut timer = running_timer();
        assert_eq!(timer.advance_stage(T0).unwrap(), CookingStage::Cooking);
        assert_eq!(timer.advance_stage(T0).unwrap(), CookingStage::Plating);
        assert_eq!(timer.advance_stage(T0).unwrap(), CookingStage::Ready);
        // no-op once READY
        assert_eq!(timer.advance_stage(T0).unwrap(), CookingStage::Ready);
    }

    #[test]
    fn reestimate_moves_the_goalposts() {
        let mut timer = running_timer();
        let now = T0 + 600 * SEC;
        timer.reestimate(5, Some("sauce split, restarting".into()), now).unwrap();
        assert_eq!(timer.estimated_end_time, Some(now + 300 * SEC));
        assert_eq!(timer.estimated_duration_secs, 600 + 300);
        assert!(!timer.is_overdue(now + 299 * SEC));
    }

    #[test]
    fn double_pause_is_rejected() {
        let mut timer = running_timer();
        timer.pause("once", T0 + 100 * SEC).unwrap();
        let err = timer.pause("twice", T0 + 200 * SEC).unwrap_err();
        assert!(matches!(err, KitchenError::InvalidTransition { .. }));
    }
}
