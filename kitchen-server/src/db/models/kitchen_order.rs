//! Kitchen Order Model
//!
//! One record per accepted order while it is inside the kitchen. Carries
//! the coarse lifecycle ([`KitchenStatus`]); the optional fine-grained
//! timing lives on [`super::CookingTimer`].
//!
//! All timestamps are Unix milliseconds; derived values (overdue,
//! remaining) are pure functions of a caller-supplied `now` so they can be
//! tested against a fixed clock.

use serde::{Deserialize, Serialize};
use shared::{KitchenError, KitchenResult, KitchenStatus, NoteEntry, NoteKind};

use super::serde_helpers;

/// 完成缓冲：实际用时超出预估 5 分钟以上才算超时
pub const OVERTIME_BUFFER_MINUTES: i64 = 5;

/// 预估制作时长：基础 15 分钟 + 每道菜 5 分钟
pub const BASE_COOKING_MINUTES: i64 = 15;
pub const PER_ITEM_MINUTES: i64 = 5;

/// Priority bounds (1 = lowest, 10 = highest)
pub const MIN_PRIORITY: i32 = 1;
pub const MAX_PRIORITY: i32 = 10;

/// Kitchen order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenOrder {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::opt_record_id"
    )]
    pub id: Option<String>,
    /// Outward order this record tracks
    pub order_id: String,
    /// Staff member currently responsible, set on start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_staff_id: Option<String>,
    /// Set when cooking starts (Unix millis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// start_time + estimated_cooking_minutes, set when cooking starts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_completion_time: Option<i64>,
    pub estimated_cooking_minutes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_cooking_minutes: Option<i64>,
    /// Set true at completion only, iff actual > estimated + buffer
    #[serde(default)]
    pub overtime: bool,
    /// Clamped to [1, 10]
    pub priority: i32,
    pub status: KitchenStatus,
    /// Append-only structured note log
    #[serde(default)]
    pub notes: Vec<NoteEntry>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl KitchenOrder {
    /// Create a queued record for an order just accepted into the kitchen
    pub fn queued(order_id: impl Into<String>, estimated_cooking_minutes: i64, now: i64) -> Self {
        Self {
            id: None,
            order_id: order_id.into(),
            assigned_staff_id: None,
            start_time: None,
            estimated_completion_time: None,
            actual_completion_time: None,
            estimated_cooking_minutes,
            actual_cooking_minutes: None,
            overtime: false,
            priority: 5,
            status: KitchenStatus::Queued,
            notes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Estimated cooking minutes derived from the item count
    pub fn estimate_for_items(item_count: i64) -> i64 {
        BASE_COOKING_MINUTES + PER_ITEM_MINUTES * item_count.max(0)
    }

    /// Clamp an arbitrary priority input into [1, 10]
    pub fn clamp_priority(priority: i32) -> i32 {
        priority.clamp(MIN_PRIORITY, MAX_PRIORITY)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// QUEUED → PREPARING: cooking starts now
    pub fn start(&mut self, staff_id: impl Into<String>, now: i64) -> KitchenResult<()> {
        if self.status != KitchenStatus::Queued {
            return Err(KitchenError::invalid_transition(self.status, "start cooking"));
        }
        self.status = KitchenStatus::Preparing;
        self.assigned_staff_id = Some(staff_id.into());
        self.start_time = Some(now);
        self.estimated_completion_time = Some(now + self.estimated_cooking_minutes * 60_000);
        self.updated_at = now;
        Ok(())
    }

    /// PREPARING/COOKING/PLATING/PAUSED → READY: dish is done
    ///
    /// Computes actual minutes and the overtime flag; this is the only
    /// place the overtime flag is ever set.
    pub fn complete(&mut self, now: i64) -> KitchenResult<()> {
        if !matches!(
            self.status,
            KitchenStatus::Preparing
                | KitchenStatus::Cooking
                | KitchenStatus::Plating
                | KitchenStatus::Paused
        ) {
            return Err(KitchenError::invalid_transition(self.status, "complete"));
        }
        let start = self
            .start_time
            .ok_or_else(|| KitchenError::Validation("order has no start time".into()))?;
        let actual_minutes = (now - start) / 60_000;
        self.status = KitchenStatus::Ready;
        self.actual_completion_time = Some(now);
        self.actual_cooking_minutes = Some(actual_minutes);
        self.overtime = actual_minutes > self.estimated_cooking_minutes + OVERTIME_BUFFER_MINUTES;
        self.updated_at = now;
        Ok(())
    }

    /// READY → SERVED: picked up by front of house
    pub fn serve(&mut self, now: i64) -> KitchenResult<()> {
        if self.status != KitchenStatus::Ready {
            return Err(KitchenError::invalid_transition(self.status, "serve"));
        }
        self.status = KitchenStatus::Served;
        self.updated_at = now;
        Ok(())
    }

    /// PREPARING/COOKING/PLATING → PAUSED
    pub fn pause(&mut self, reason: impl Into<String>, now: i64) -> KitchenResult<()> {
        if !matches!(
            self.status,
            KitchenStatus::Preparing | KitchenStatus::Cooking | KitchenStatus::Plating
        ) {
            return Err(KitchenError::invalid_transition(self.status, "pause"));
        }
        self.status = KitchenStatus::Paused;
        self.notes.push(NoteEntry::new(now, NoteKind::Pause, reason));
        self.updated_at = now;
        Ok(())
    }

    /// PAUSED → COOKING
    pub fn resume(&mut self, now: i64) -> KitchenResult<()> {
        if self.status != KitchenStatus::Paused {
            return Err(KitchenError::invalid_transition(self.status, "resume"));
        }
        self.status = KitchenStatus::Cooking;
        self.notes.push(NoteEntry::new(now, NoteKind::Resume, "resumed"));
        self.updated_at = now;
        Ok(())
    }

    /// Any non-terminal state → CANCELLED, reason recorded
    pub fn cancel(&mut self, reason: impl Into<String>, now: i64) -> KitchenResult<()> {
        if self.status.is_terminal() {
            return Err(KitchenError::invalid_transition(self.status, "cancel"));
        }
        self.status = KitchenStatus::Cancelled;
        self.notes.push(NoteEntry::new(now, NoteKind::Cancel, reason));
        self.updated_at = now;
        Ok(())
    }

    /// Sync the coarse phase with the timer stage ladder
    /// (PREPARING → COOKING → PLATING); rejected in terminal states.
    pub fn advance_phase(&mut self, now: i64) -> KitchenResult<()> {
        let next = match self.status {
            KitchenStatus::Preparing => KitchenStatus::Cooking,
            KitchenStatus::Cooking => KitchenStatus::Plating,
            // Plating stays until complete() moves it to READY
            KitchenStatus::Plating => KitchenStatus::Plating,
            _ => return Err(KitchenError::invalid_transition(self.status, "advance phase")),
        };
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Update the priority, clamping to [1, 10]; terminal records are
    /// immutable. Returns the stored value.
    pub fn set_priority(&mut self, priority: i32, now: i64) -> KitchenResult<i32> {
        if self.status.is_terminal() {
            return Err(KitchenError::invalid_transition(self.status, "update priority"));
        }
        self.priority = Self::clamp_priority(priority);
        self.updated_at = now;
        Ok(self.priority)
    }

    // ========================================================================
    // Derived values (pure functions of `now`)
    // ========================================================================

    /// True iff now is past the estimated completion while the order is
    /// still in flight
    pub fn is_overdue(&self, now: i64) -> bool {
        if self.status.is_terminal() || self.status == KitchenStatus::Queued {
            return false;
        }
        match self.estimated_completion_time {
            Some(estimate) => now > estimate,
            None => false,
        }
    }

    /// Whole minutes past the estimate; 0 when not overdue
    pub fn overdue_minutes(&self, now: i64) -> i64 {
        if !self.is_overdue(now) {
            return 0;
        }
        (now - self.estimated_completion_time.unwrap_or(now)) / 60_000
    }

    /// Whole minutes until the estimate; 0 once overdue or terminal
    pub fn remaining_minutes(&self, now: i64) -> i64 {
        if self.status.is_terminal() {
            return 0;
        }
        match self.estimated_completion_time {
            Some(estimate) if estimate > now => (estimate - now) / 60_000,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000_000;
    const MINUTE: i64 = 60_000;

    fn started_order() -> KitchenOrder {
        let mut order = KitchenOrder::queued("order-1", 20, T0);
        order.start("staff-1", T0).unwrap();
        order
    }

    #[test]
    fn estimate_derived_from_item_count() {
        assert_eq!(KitchenOrder::estimate_for_items(0), 15);
        assert_eq!(KitchenOrder::estimate_for_items(3), 30);
        assert_eq!(KitchenOrder::estimate_for_items(-2), 15);
    }

    #[test]
    fn priority_clamps_to_bounds() {
        assert_eq!(KitchenOrder::clamp_priority(15), 10);
        assert_eq!(KitchenOrder::clamp_priority(0), 1);
        assert_eq!(KitchenOrder::clamp_priority(-3), 1);
        assert_eq!(KitchenOrder::clamp_priority(7), 7);
    }

    #[test]
    fn start_sets_estimated_completion() {
        let order = started_order();
        assert_eq!(order.status, KitchenStatus::Preparing);
        assert_eq!(order.start_time, Some(T0));
        assert_eq!(order.estimated_completion_time, Some(T0 + 20 * MINUTE));
        assert_eq!(order.assigned_staff_id.as_deref(), Some("staff-1"));
    }

    #[test]
    fn start_rejected_unless_queued() {
        let mut order = started_order();
        let err = order.start("staff-2", T0 + MINUTE).unwrap_err();
        assert!(matches!(err, KitchenError::InvalidTransition { .. }));
    }

    #[test]
    fn complete_within_buffer_is_not_overtime() {
        let mut order = started_order();
        // 24 minutes actual vs 20 estimated: inside the 5-minute buffer
        order.complete(T0 + 24 * MINUTE).unwrap();
        assert_eq!(order.status, KitchenStatus::Ready);
        assert_eq!(order.actual_cooking_minutes, Some(24));
        assert!(!order.overtime);
    }

    #[test]
    fn complete_past_buffer_sets_overtime() {
        let mut order = started_order();
        order.complete(T0 + 26 * MINUTE).unwrap();
        assert_eq!(order.actual_cooking_minutes, Some(26));
        assert!(order.overtime);
    }

    #[test]
    fn complete_from_queued_is_rejected() {
        let mut order = KitchenOrder::queued("order-1", 20, T0);
        assert!(order.complete(T0 + MINUTE).is_err());
    }

    #[test]
    fn pause_resume_toggle() {
        let mut order = started_order();
        order.pause("waiting on grill", T0 + MINUTE).unwrap();
        assert_eq!(order.status, KitchenStatus::Paused);
        assert_eq!(order.notes.last().unwrap().render(), "暂停: waiting on grill");

        order.resume(T0 + 2 * MINUTE).unwrap();
        assert_eq!(order.status, KitchenStatus::Cooking);

        // double resume rejected
        assert!(order.resume(T0 + 3 * MINUTE).is_err());
    }

    #[test]
    fn cancel_records_reason_and_blocks_terminal() {
        let mut order = started_order();
        order.cancel("ingredient shortage", T0 + MINUTE).unwrap();
        assert_eq!(order.status, KitchenStatus::Cancelled);
        assert_eq!(order.notes.last().unwrap().render(), "取消: ingredient shortage");

        // terminal records are immutable
        assert!(order.cancel("again", T0 + 2 * MINUTE).is_err());
        assert!(order.set_priority(9, T0 + 2 * MINUTE).is_err());
    }

    #[test]
    fn serve_only_from_ready() {
        let mut order = started_order();
        assert!(order.serve(T0).is_err());
        order.complete(T0 + 10 * MINUTE).unwrap();
        order.serve(T0 + 12 * MINUTE).unwrap();
        assert_eq!(order.status, KitchenStatus::Served);
    }

    #[test]
    fn overdue_arithmetic() {
        let order = started_order();
        let estimate = T0 + 20 * MINUTE;
        assert!(!order.is_overdue(estimate));
        assert_eq!(order.remaining_minutes(T0 + 5 * MINUTE), 15);

        assert!(order.is_overdue(estimate + 1));
        assert_eq!(order.overdue_minutes(estimate + 7 * MINUTE), 7);
        assert_eq!(order.remaining_minutes(estimate + 7 * MINUTE), 0);
    }

    #[test]
    fn terminal_orders_are_never_overdue() {
        let mut order = started_order();
        let way_past = T0 + 120 * MINUTE;
        order.complete(way_past).unwrap();
        assert!(!order.is_overdue(way_past + MINUTE));
        assert_eq!(order.overdue_minutes(way_past + MINUTE), 0);
        assert_eq!(order.remaining_minutes(way_past + MINUTE), 0);
    }

    #[test]
    fn queued_orders_are_never_overdue() {
        let order = KitchenOrder::queued("order-1", 20, T0);
        assert!(!order.is_overdue(T0 + 500 * MINUTE));
    }
}
