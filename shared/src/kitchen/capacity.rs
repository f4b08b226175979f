//! Derived kitchen capacity types
//!
//! A [`CapacitySnapshot`] is recomputed from live order counts on every
//! read; it is never persisted and never cached across calls.

use serde::{Deserialize, Serialize};

/// Capacity band thresholds (percentage of max capacity)
pub const BUSY_THRESHOLD: f64 = 50.0;
pub const WARNING_THRESHOLD: f64 = 70.0;
pub const CRITICAL_THRESHOLD: f64 = 90.0;

/// 产能状态标签
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityStatus {
    Normal,
    Busy,
    Critical,
    Full,
}

impl CapacityStatus {
    /// Band mapping: <50 NORMAL, <70 BUSY, <90 CRITICAL, else FULL
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < BUSY_THRESHOLD {
            Self::Normal
        } else if percentage < WARNING_THRESHOLD {
            Self::Busy
        } else if percentage < CRITICAL_THRESHOLD {
            Self::Critical
        } else {
            Self::Full
        }
    }
}

impl std::fmt::Display for CapacityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Normal => "NORMAL",
            Self::Busy => "BUSY",
            Self::Critical => "CRITICAL",
            Self::Full => "FULL",
        };
        write!(f, "{}", s)
    }
}

/// 产能告警级别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityAlertLevel {
    /// ≥70% - 接近上限
    Warning,
    /// ≥90% - 停止接单建议
    Critical,
}

/// Kitchen-wide (or per-station) capacity snapshot, derived on read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CapacitySnapshot {
    /// active / max × 100
    pub capacity_percentage: f64,
    /// Orders currently being worked (PREPARING/COOKING/PLATING/PAUSED)
    pub active_count: usize,
    /// Orders waiting in the queue
    pub queued_count: usize,
    /// Configured maximum concurrent orders
    pub max_capacity: usize,
    /// Step-function wait estimate for a newly accepted order
    pub estimated_wait_minutes: i64,
    /// Band label
    pub status: CapacityStatus,
}

impl CapacitySnapshot {
    /// Build a snapshot from raw counts
    pub fn from_counts(active_count: usize, queued_count: usize, max_capacity: usize) -> Self {
        let capacity_percentage = if max_capacity == 0 {
            100.0
        } else {
            active_count as f64 / max_capacity as f64 * 100.0
        };
        Self {
            capacity_percentage,
            active_count,
            queued_count,
            max_capacity,
            estimated_wait_minutes: estimated_wait_minutes(capacity_percentage),
            status: CapacityStatus::from_percentage(capacity_percentage),
        }
    }

    /// Threshold check: Some(level) when the kitchen should be alerted
    pub fn alert_level(&self) -> Option<CapacityAlertLevel> {
        if self.capacity_percentage >= CRITICAL_THRESHOLD {
            Some(CapacityAlertLevel::Critical)
        } else if self.capacity_percentage >= WARNING_THRESHOLD {
            Some(CapacityAlertLevel::Warning)
        } else {
            None
        }
    }

    /// Admission hint: below the CRITICAL threshold there is room to queue
    /// more work. Advisory only - not a reservation.
    pub fn can_accept_new_order(&self) -> bool {
        self.capacity_percentage < CRITICAL_THRESHOLD
    }
}

/// Wait estimate step function of the load percentage
fn estimated_wait_minutes(percentage: f64) -> i64 {
    if percentage < 50.0 {
        10
    } else if percentage < 70.0 {
        15
    } else if percentage < 90.0 {
        25
    } else {
        40
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_exact() {
        let snap = CapacitySnapshot::from_counts(15, 3, 20);
        assert_eq!(snap.capacity_percentage, 75.0);
        assert_eq!(snap.active_count, 15);
        assert_eq!(snap.queued_count, 3);
    }

    #[test]
    fn band_boundaries_match_documented_thresholds() {
        assert_eq!(CapacityStatus::from_percentage(0.0), CapacityStatus::Normal);
        assert_eq!(CapacityStatus::from_percentage(49.9), CapacityStatus::Normal);
        assert_eq!(CapacityStatus::from_percentage(50.0), CapacityStatus::Busy);
        assert_eq!(CapacityStatus::from_percentage(69.9), CapacityStatus::Busy);
        assert_eq!(CapacityStatus::from_percentage(70.0), CapacityStatus::Critical);
        assert_eq!(CapacityStatus::from_percentage(89.9), CapacityStatus::Critical);
        assert_eq!(CapacityStatus::from_percentage(90.0), CapacityStatus::Full);
        assert_eq!(CapacityStatus::from_percentage(120.0), CapacityStatus::Full);
    }

    #[test]
    fn wait_estimate_steps() {
        assert_eq!(CapacitySnapshot::from_counts(0, 0, 20).estimated_wait_minutes, 10);
        assert_eq!(CapacitySnapshot::from_counts(10, 0, 20).estimated_wait_minutes, 15);
        assert_eq!(CapacitySnapshot::from_counts(15, 0, 20).estimated_wait_minutes, 25);
        assert_eq!(CapacitySnapshot::from_counts(18, 0, 20).estimated_wait_minutes, 40);
    }

    #[test]
    fn alerts_fire_at_70_and_90() {
        // 15/20 = 75% - inside the warning band, not critical
        let warning = CapacitySnapshot::from_counts(15, 0, 20);
        assert_eq!(warning.alert_level(), Some(CapacityAlertLevel::Warning));
        assert!(warning.can_accept_new_order());

        let critical = CapacitySnapshot::from_counts(18, 0, 20);
        assert_eq!(critical.alert_level(), Some(CapacityAlertLevel::Critical));
        assert!(!critical.can_accept_new_order());

        let calm = CapacitySnapshot::from_counts(5, 0, 20);
        assert_eq!(calm.alert_level(), None);
    }

    #[test]
    fn zero_max_capacity_is_saturated() {
        let snap = CapacitySnapshot::from_counts(0, 0, 0);
        assert_eq!(snap.capacity_percentage, 100.0);
        assert_eq!(snap.status, CapacityStatus::Full);
        assert!(!snap.can_accept_new_order());
    }
}
