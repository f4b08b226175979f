//! Shared types for the kitchen lifecycle
//!
//! Two deliberately distinct state vocabularies coexist here:
//!
//! - [`KitchenStatus`] is the coarse lifecycle of an order inside the
//!   kitchen, visible to the rest of the house.
//! - [`CookingStatus`] / [`CookingStage`] are the fine-grained states of
//!   the optional per-order cooking timer.
//!
//! The kitchen manager drives both in lockstep; the mapping is documented
//! on the `kitchen` module of the server crate.

use serde::{Deserialize, Serialize};

// ============================================================================
// Kitchen Order Status (coarse lifecycle)
// ============================================================================

/// 厨房订单状态 - 粗粒度生命周期
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitchenStatus {
    /// 排队中 - 已接单，未开始制作
    #[default]
    Queued,
    /// 备餐中
    Preparing,
    /// 烹饪中
    Cooking,
    /// 摆盘中
    Plating,
    /// 已完成，待取餐
    Ready,
    /// 已出餐
    Served,
    /// 已暂停
    Paused,
    /// 已取消
    Cancelled,
}

impl KitchenStatus {
    /// Terminal states are immutable thereafter
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Served | Self::Cancelled)
    }

    /// States that count against kitchen capacity
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Preparing | Self::Cooking | Self::Plating | Self::Paused
        )
    }
}

impl std::fmt::Display for KitchenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Queued => "QUEUED",
            Self::Preparing => "PREPARING",
            Self::Cooking => "COOKING",
            Self::Plating => "PLATING",
            Self::Ready => "READY",
            Self::Served => "SERVED",
            Self::Paused => "PAUSED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Cooking Timer Status (fine-grained)
// ============================================================================

/// 计时器状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CookingStatus {
    /// 已创建，未启动
    #[default]
    Idle,
    /// 计时中
    Running,
    /// 已暂停 (时间停止累计)
    Paused,
    /// 正常完成
    Completed,
    /// 已取消
    Cancelled,
    /// 超时 - RUNNING 读取时自动重分类
    Overdue,
}

impl CookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for CookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Overdue => "OVERDUE",
        };
        write!(f, "{}", s)
    }
}

/// 制作阶段
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CookingStage {
    /// 备料
    #[default]
    Prep,
    /// 烹饪
    Cooking,
    /// 摆盘
    Plating,
    /// 待出餐
    Ready,
}

impl CookingStage {
    /// Next stage in the ladder; `Ready` is the end, advancing is a no-op
    pub fn next(&self) -> CookingStage {
        match self {
            Self::Prep => Self::Cooking,
            Self::Cooking => Self::Plating,
            Self::Plating => Self::Ready,
            Self::Ready => Self::Ready,
        }
    }
}

impl std::fmt::Display for CookingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Prep => "PREP",
            Self::Cooking => "COOKING",
            Self::Plating => "PLATING",
            Self::Ready => "READY",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Staff Departments
// ============================================================================

/// 员工部门 - 通知广播的目标范围
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    /// 后厨
    Kitchen,
    /// 前厅
    Service,
    /// 管理
    Management,
}

// ============================================================================
// Notification Types
// ============================================================================

/// 通知类型 - 决定默认优先级和过期时间
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// 新订单进入厨房队列
    NewOrder,
    /// 订单状态变化 (完成/出餐)
    OrderStatusChange,
    /// 订单超时
    OrderOvertime,
    /// 产能告警
    CapacityAlert,
    /// 紧急事件 (取消等)
    Emergency,
    /// 系统消息
    System,
}

impl NotificationType {
    /// Type-specific expiry in hours; `None` never expires
    pub fn expiry_hours(&self) -> Option<i64> {
        match self {
            Self::NewOrder => Some(2),
            Self::OrderStatusChange => Some(4),
            Self::OrderOvertime => Some(1),
            Self::CapacityAlert => Some(1),
            Self::Emergency => None,
            Self::System => Some(24),
        }
    }

    /// Default priority for this type
    pub fn default_priority(&self) -> NotificationPriority {
        match self {
            Self::NewOrder => NotificationPriority::High,
            Self::OrderStatusChange => NotificationPriority::Normal,
            Self::OrderOvertime => NotificationPriority::High,
            Self::CapacityAlert => NotificationPriority::High,
            Self::Emergency => NotificationPriority::Emergency,
            Self::System => NotificationPriority::Normal,
        }
    }
}

/// 通知优先级
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
    Emergency,
}

// ============================================================================
// Structured Notes
// ============================================================================

/// 备注类别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteKind {
    /// 一般备注
    Info,
    /// 暂停原因
    Pause,
    /// 恢复
    Resume,
    /// 取消原因
    Cancel,
    /// 重新估时
    Reestimate,
}

impl NoteKind {
    /// Label rendered in front of the note text (厨房显示用)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "备注",
            Self::Pause => "暂停",
            Self::Resume => "恢复",
            Self::Cancel => "取消",
            Self::Reestimate => "重估",
        }
    }
}

/// Append-only structured note attached to orders and timers
///
/// Replaces free-text concatenation: each entry keeps its own timestamp
/// and kind so the history stays testable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteEntry {
    /// Unix millis when the note was recorded
    pub timestamp: i64,
    /// Note category
    pub kind: NoteKind,
    /// Free text
    pub text: String,
}

impl NoteEntry {
    pub fn new(timestamp: i64, kind: NoteKind, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            kind,
            text: text.into(),
        }
    }

    /// Render as "标签: 内容" for display surfaces
    pub fn render(&self) -> String {
        format!("{}: {}", self.kind.label(), self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_kitchen_statuses() {
        assert!(KitchenStatus::Ready.is_terminal());
        assert!(KitchenStatus::Served.is_terminal());
        assert!(KitchenStatus::Cancelled.is_terminal());
        assert!(!KitchenStatus::Paused.is_terminal());
        assert!(!KitchenStatus::Queued.is_terminal());
    }

    #[test]
    fn active_statuses_count_against_capacity() {
        assert!(KitchenStatus::Preparing.is_active());
        assert!(KitchenStatus::Paused.is_active());
        assert!(!KitchenStatus::Queued.is_active());
        assert!(!KitchenStatus::Ready.is_active());
    }

    #[test]
    fn stage_ladder_stops_at_ready() {
        assert_eq!(CookingStage::Prep.next(), CookingStage::Cooking);
        assert_eq!(CookingStage::Cooking.next(), CookingStage::Plating);
        assert_eq!(CookingStage::Plating.next(), CookingStage::Ready);
        assert_eq!(CookingStage::Ready.next(), CookingStage::Ready);
    }

    #[test]
    fn emergency_notifications_never_expire() {
        assert_eq!(NotificationType::Emergency.expiry_hours(), None);
        assert_eq!(NotificationType::NewOrder.expiry_hours(), Some(2));
        assert_eq!(NotificationType::OrderStatusChange.expiry_hours(), Some(4));
        assert_eq!(NotificationType::OrderOvertime.expiry_hours(), Some(1));
        assert_eq!(NotificationType::System.expiry_hours(), Some(24));
    }

    #[test]
    fn cancel_note_renders_with_label() {
        let note = NoteEntry::new(0, NoteKind::Cancel, "ingredient shortage");
        assert_eq!(note.render(), "取消: ingredient shortage");
    }
}
