//! Outward Order Model
//!
//! Minimal view of the outward order the kitchen core collaborates with:
//! enough to derive the cooking estimate (item count) and to push the
//! kitchen's status side effects. Full order management (items, payments,
//! tables) is a different service.

use serde::{Deserialize, Serialize};

use super::serde_helpers;

/// 对外订单状态 - 厨房只写 PREPARING/READY/CANCELLED
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// 已接单，待厨房处理
    #[default]
    Pending,
    /// 厨房制作中
    Preparing,
    /// 制作完成，待出餐
    Ready,
    /// 已出餐
    Served,
    /// 已取消
    Cancelled,
}

/// Outward order entity (minimal)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::opt_record_id"
    )]
    pub id: Option<String>,
    /// Stable external reference used by the kitchen
    pub order_ref: String,
    /// Number of dishes on the ticket, drives the cooking estimate
    pub item_count: i64,
    pub status: OrderStatus,
    pub created_at: i64,
}

impl Order {
    pub fn new(order_ref: impl Into<String>, item_count: i64, now: i64) -> Self {
        Self {
            id: None,
            order_ref: order_ref.into(),
            item_count,
            status: OrderStatus::Pending,
            created_at: now,
        }
    }
}
