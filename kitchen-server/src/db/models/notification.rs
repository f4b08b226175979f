//! Notification Model
//!
//! One record per recipient per event. Type decides priority and expiry:
//! EMERGENCY never expires, everything else gets `sent_at + type hours`.
//! Mutated only by mark-read; removed by the periodic cleanup sweep.

use serde::{Deserialize, Serialize};
use shared::{CapacityAlertLevel, CapacitySnapshot, KitchenStatus, NotificationPriority, NotificationType};

use super::serde_helpers;

/// Notification entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::opt_record_id"
    )]
    pub id: Option<String>,
    pub recipient_staff_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_staff_id: Option<String>,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_order_id: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub sent_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<i64>,
    /// None = never expires (EMERGENCY only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl Notification {
    /// Base constructor: type decides default priority and expiry
    fn new(
        recipient_staff_id: impl Into<String>,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        now: i64,
    ) -> Self {
        Self {
            id: None,
            recipient_staff_id: recipient_staff_id.into(),
            sender_staff_id: None,
            notification_type,
            priority: notification_type.default_priority(),
            title: title.into(),
            message: message.into(),
            related_order_id: None,
            read: false,
            sent_at: now,
            read_at: None,
            expires_at: notification_type
                .expiry_hours()
                .map(|hours| now + hours * 3_600_000),
            action_url: None,
        }
    }

    fn for_order(mut self, order_id: impl Into<String>) -> Self {
        let order_id = order_id.into();
        self.action_url = Some(format!("/kitchen/orders/{}", order_id));
        self.related_order_id = Some(order_id);
        self
    }

    // ========================================================================
    // Factories, one per domain event
    // ========================================================================

    /// 新订单进入队列
    pub fn new_order(recipient: impl Into<String>, order_id: &str, priority: i32, now: i64) -> Self {
        Self::new(
            recipient,
            NotificationType::NewOrder,
            "新订单",
            format!("订单 {} 进入厨房队列 (优先级 {})", order_id, priority),
            now,
        )
        .for_order(order_id)
    }

    /// 订单状态变化
    pub fn status_change(
        recipient: impl Into<String>,
        order_id: &str,
        from: KitchenStatus,
        to: KitchenStatus,
        now: i64,
    ) -> Self {
        Self::new(
            recipient,
            NotificationType::OrderStatusChange,
            "订单状态变化",
            format!("订单 {}: {} → {}", order_id, from, to),
            now,
        )
        .for_order(order_id)
    }

    /// 订单超时
    pub fn overtime(
        recipient: impl Into<String>,
        order_id: &str,
        overdue_minutes: i64,
        now: i64,
    ) -> Self {
        Self::new(
            recipient,
            NotificationType::OrderOvertime,
            "订单超时",
            format!("订单 {} 已超时 {} 分钟", order_id, overdue_minutes),
            now,
        )
        .for_order(order_id)
    }

    /// 紧急事件 (取消等)
    pub fn emergency(
        recipient: impl Into<String>,
        sender: Option<String>,
        order_id: &str,
        reason: &str,
        now: i64,
    ) -> Self {
        let mut n = Self::new(
            recipient,
            NotificationType::Emergency,
            "紧急",
            format!("订单 {} 已取消: {}", order_id, reason),
            now,
        )
        .for_order(order_id);
        n.sender_staff_id = sender;
        n
    }

    /// 高优先级订单插队
    pub fn priority_raised(
        recipient: impl Into<String>,
        order_id: &str,
        priority: i32,
        now: i64,
    ) -> Self {
        let mut n = Self::new(
            recipient,
            NotificationType::System,
            "优先处理",
            format!("订单 {} 优先级调整为 {}", order_id, priority),
            now,
        )
        .for_order(order_id);
        // priority escalation broadcasts at HIGH regardless of the SYSTEM default
        n.priority = NotificationPriority::High;
        n
    }

    /// 产能告警
    pub fn capacity_alert(
        recipient: impl Into<String>,
        level: CapacityAlertLevel,
        snapshot: &CapacitySnapshot,
        now: i64,
    ) -> Self {
        let mut n = Self::new(
            recipient,
            NotificationType::CapacityAlert,
            match level {
                CapacityAlertLevel::Warning => "厨房接近满载",
                CapacityAlertLevel::Critical => "厨房满载",
            },
            format!(
                "负载 {:.1}% ({}/{} 活跃, {} 排队), 预计等待 {} 分钟",
                snapshot.capacity_percentage,
                snapshot.active_count,
                snapshot.max_capacity,
                snapshot.queued_count,
                snapshot.estimated_wait_minutes
            ),
            now,
        );
        if level == CapacityAlertLevel::Critical {
            n.priority = NotificationPriority::Emergency;
        }
        n
    }

    // ========================================================================
    // State
    // ========================================================================

    /// Expired notifications are eligible for the cleanup sweep
    pub fn is_expired(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }

    pub fn mark_read(&mut self, now: i64) {
        if !self.read {
            self.read = true;
            self.read_at = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000_000;
    const HOUR: i64 = 3_600_000;

    #[test]
    fn expiry_follows_the_type_matrix() {
        let n = Notification::new_order("staff-1", "order-1", 5, T0);
        assert_eq!(n.priority, NotificationPriority::High);
        assert_eq!(n.expires_at, Some(T0 + 2 * HOUR));

        let n = Notification::status_change(
            "staff-1",
            "order-1",
            KitchenStatus::Cooking,
            KitchenStatus::Ready,
            T0,
        );
        assert_eq!(n.priority, NotificationPriority::Normal);
        assert_eq!(n.expires_at, Some(T0 + 4 * HOUR));

        let n = Notification::overtime("staff-1", "order-1", 7, T0);
        assert_eq!(n.priority, NotificationPriority::High);
        assert_eq!(n.expires_at, Some(T0 + HOUR));
    }

    #[test]
    fn emergency_never_expires() {
        let n = Notification::emergency("staff-1", None, "order-1", "gas leak", T0);
        assert_eq!(n.priority, NotificationPriority::Emergency);
        assert_eq!(n.expires_at, None);
        assert!(!n.is_expired(T0 + 1000 * HOUR));
    }

    #[test]
    fn expiry_check_uses_now() {
        let n = Notification::overtime("staff-1", "order-1", 3, T0);
        assert!(!n.is_expired(T0 + HOUR));
        assert!(n.is_expired(T0 + HOUR + 1));
    }

    #[test]
    fn critical_capacity_alert_escalates_priority() {
        let snapshot = CapacitySnapshot::from_counts(19, 4, 20);
        let n = Notification::capacity_alert(
            "staff-1",
            CapacityAlertLevel::Critical,
            &snapshot,
            T0,
        );
        assert_eq!(n.priority, NotificationPriority::Emergency);
        assert_eq!(n.notification_type, NotificationType::CapacityAlert);
        assert_eq!(n.expires_at, Some(T0 + HOUR));
    }

    #[test]
    fn mark_read_is_idempotent() {
        let mut n = Notification::new_order("staff-1", "order-1", 5, T0);
        n.mark_read(T0 + 100);
        n.mark_read(T0 + 200);
        assert!(n.read);
        assert_eq!(n.read_at, Some(T0 + 100));
    }

    #[test]
    fn related_order_and_action_url_are_linked() {
        let n = Notification::new_order("staff-1", "order-9", 5, T0);
        assert_eq!(n.related_order_id.as_deref(), Some("order-9"));
        assert_eq!(n.action_url.as_deref(), Some("/kitchen/orders/order-9"));
    }
}
