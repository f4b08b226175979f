//! Kitchen API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{CookingTimer, KitchenOrder};
use crate::utils::{AppError, AppResult};
use shared::{CapacitySnapshot, CookingStatus};

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct StartRequest {
    #[validate(length(min = 1))]
    pub staff_id: String,
    pub workstation_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StaffRequest {
    #[validate(length(min = 1))]
    pub staff_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReasonRequest {
    #[validate(length(min = 1, max = 200))]
    pub reason: String,
    pub staff_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PriorityRequest {
    /// Any integer - clamped into [1, 10] on apply
    pub priority: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TimerRequest {
    #[validate(range(min = 1, max = 480))]
    pub estimated_minutes_remaining: i64,
    #[validate(length(max = 200))]
    pub note: Option<String>,
}

// ============================================================================
// Views
// ============================================================================

/// Timer with its read-time derived values
#[derive(Debug, Serialize)]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: CookingTimer,
    /// RUNNING reported as OVERDUE once past the estimate
    pub effective_status: CookingStatus,
    pub elapsed_seconds: i64,
    pub remaining_seconds: i64,
    pub progress_percentage: f64,
    pub overdue_seconds: i64,
}

impl TimerView {
    fn build(timer: CookingTimer, now: i64) -> Self {
        Self {
            effective_status: timer.effective_status(now),
            elapsed_seconds: timer.elapsed_seconds(now),
            remaining_seconds: timer.remaining_seconds(now),
            progress_percentage: timer.progress_percentage(now),
            overdue_seconds: timer.overdue_seconds(now),
            timer,
        }
    }
}

/// Kitchen order with timer and derived overdue arithmetic
#[derive(Debug, Serialize)]
pub struct KitchenOrderDetail {
    #[serde(flatten)]
    pub order: KitchenOrder,
    pub timer: Option<TimerView>,
    pub is_overdue: bool,
    pub remaining_minutes: i64,
    pub overdue_minutes: i64,
}

// ============================================================================
// Views: queue / active / overdue / capacity
// ============================================================================

/// GET /api/kitchen/queue
pub async fn queue(State(state): State<ServerState>) -> AppResult<Json<Vec<KitchenOrder>>> {
    Ok(Json(state.manager.get_kitchen_queue().await?))
}

/// GET /api/kitchen/active
pub async fn active(State(state): State<ServerState>) -> AppResult<Json<Vec<KitchenOrder>>> {
    Ok(Json(state.manager.get_active_kitchen_orders().await?))
}

/// GET /api/kitchen/overdue
pub async fn overdue(State(state): State<ServerState>) -> AppResult<Json<Vec<KitchenOrder>>> {
    Ok(Json(state.manager.get_overdue_orders().await?))
}

/// GET /api/kitchen/capacity
pub async fn capacity(State(state): State<ServerState>) -> AppResult<Json<CapacitySnapshot>> {
    Ok(Json(
        state
            .manager
            .capacity_engine()
            .calculate_current_capacity()
            .await?,
    ))
}

/// GET /api/kitchen/capacity/can-accept
pub async fn can_accept(State(state): State<ServerState>) -> AppResult<Json<bool>> {
    Ok(Json(
        state.manager.capacity_engine().can_accept_new_order().await?,
    ))
}

/// GET /api/kitchen/orders/:order_id
pub async fn detail(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<KitchenOrderDetail>> {
    let (order, timer) = state
        .manager
        .get_order_detail(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Kitchen order {} not found", order_id)))?;
    let now = state.manager.now_millis();
    Ok(Json(KitchenOrderDetail {
        is_overdue: order.is_overdue(now),
        remaining_minutes: order.remaining_minutes(now),
        overdue_minutes: order.overdue_minutes(now),
        timer: timer.map(|t| TimerView::build(t, now)),
        order,
    }))
}

// ============================================================================
// Lifecycle operations
// ============================================================================

/// POST /api/kitchen/orders/:order_id/queue
pub async fn queue_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<bool>> {
    state.manager.queue_order(&order_id).await?;
    Ok(Json(true))
}

/// POST /api/kitchen/orders/:order_id/start
pub async fn start(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<StartRequest>,
) -> AppResult<Json<bool>> {
    payload.validate()?;
    state
        .manager
        .start_preparing_order(&order_id, &payload.staff_id, payload.workstation_id)
        .await?;
    Ok(Json(true))
}

/// POST /api/kitchen/orders/:order_id/complete
pub async fn complete(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<StaffRequest>,
) -> AppResult<Json<bool>> {
    payload.validate()?;
    state
        .manager
        .complete_order(&order_id, &payload.staff_id)
        .await?;
    Ok(Json(true))
}

/// POST /api/kitchen/orders/:order_id/serve
pub async fn serve(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<StaffRequest>,
) -> AppResult<Json<bool>> {
    payload.validate()?;
    state
        .manager
        .serve_order(&order_id, &payload.staff_id)
        .await?;
    Ok(Json(true))
}

/// POST /api/kitchen/orders/:order_id/pause
pub async fn pause(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<ReasonRequest>,
) -> AppResult<Json<bool>> {
    payload.validate()?;
    state.manager.pause_cooking(&order_id, &payload.reason).await?;
    Ok(Json(true))
}

/// POST /api/kitchen/orders/:order_id/resume
pub async fn resume(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<bool>> {
    state.manager.resume_cooking(&order_id).await?;
    Ok(Json(true))
}

/// POST /api/kitchen/orders/:order_id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<ReasonRequest>,
) -> AppResult<Json<bool>> {
    payload.validate()?;
    state
        .manager
        .cancel_kitchen_order(&order_id, &payload.reason, payload.staff_id)
        .await?;
    Ok(Json(true))
}

/// POST /api/kitchen/orders/:order_id/advance-stage
pub async fn advance_stage(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<bool>> {
    state.manager.advance_stage(&order_id).await?;
    Ok(Json(true))
}

/// PUT /api/kitchen/orders/:order_id/priority
pub async fn priority(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<PriorityRequest>,
) -> AppResult<Json<bool>> {
    state
        .manager
        .update_order_priority(&order_id, payload.priority)
        .await?;
    Ok(Json(true))
}

/// PUT /api/kitchen/orders/:order_id/timer
pub async fn timer(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    Json(payload): Json<TimerRequest>,
) -> AppResult<Json<bool>> {
    payload.validate()?;
    state
        .manager
        .update_cooking_timer(&order_id, payload.estimated_minutes_remaining, payload.note)
        .await?;
    Ok(Json(true))
}
