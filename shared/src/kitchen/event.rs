//! Kitchen events - immutable facts broadcast after a kitchen mutation
//!
//! Events flow one way: the kitchen manager emits them on a broadcast
//! channel after the state change is persisted; the notification
//! dispatcher and other listeners consume them. Listeners never mutate
//! order or timer state.

use super::capacity::{CapacityAlertLevel, CapacitySnapshot};
use super::types::KitchenStatus;
use serde::{Deserialize, Serialize};

/// Kitchen event envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenEvent {
    /// Event unique ID
    pub event_id: String,
    /// Order this event concerns (None for kitchen-wide events)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Staff member who triggered the event, when attributable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Event type
    pub event_type: KitchenEventType,
    /// Event payload
    pub payload: KitchenEventPayload,
}

impl KitchenEvent {
    pub fn new(
        order_id: Option<String>,
        staff_id: Option<String>,
        timestamp: i64,
        event_type: KitchenEventType,
        payload: KitchenEventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            order_id,
            staff_id,
            timestamp,
            event_type,
            payload,
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitchenEventType {
    // Lifecycle
    OrderQueued,
    CookingStarted,
    StatusChanged,
    CookingPaused,
    CookingResumed,
    OrderCancelled,

    // Attributes
    PriorityChanged,
    TimerReestimated,

    // Watchdog
    OrderOverdue,
    CapacityAlert,
}

impl std::fmt::Display for KitchenEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::OrderQueued => "ORDER_QUEUED",
            Self::CookingStarted => "COOKING_STARTED",
            Self::StatusChanged => "STATUS_CHANGED",
            Self::CookingPaused => "COOKING_PAUSED",
            Self::CookingResumed => "COOKING_RESUMED",
            Self::OrderCancelled => "ORDER_CANCELLED",
            Self::PriorityChanged => "PRIORITY_CHANGED",
            Self::TimerReestimated => "TIMER_REESTIMATED",
            Self::OrderOverdue => "ORDER_OVERDUE",
            Self::CapacityAlert => "CAPACITY_ALERT",
        };
        write!(f, "{}", s)
    }
}

/// Event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitchenEventPayload {
    OrderQueued {
        priority: i32,
    },
    CookingStarted {
        estimated_minutes: i64,
    },
    StatusChanged {
        from: KitchenStatus,
        to: KitchenStatus,
    },
    CookingPaused {
        reason: String,
    },
    CookingResumed,
    OrderCancelled {
        reason: String,
    },
    PriorityChanged {
        priority: i32,
    },
    TimerReestimated {
        estimated_minutes_remaining: i64,
    },
    OrderOverdue {
        overdue_minutes: i64,
    },
    CapacityAlert {
        level: CapacityAlertLevel,
        snapshot: CapacitySnapshot,
    },
}
