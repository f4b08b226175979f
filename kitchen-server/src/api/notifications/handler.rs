//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::Notification;
use crate::utils::AppResult;

/// GET /api/notifications/staff/:staff_id - 员工全部通知
pub async fn list_for_staff(
    State(state): State<ServerState>,
    Path(staff_id): Path<String>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state.notifications().find_by_staff(&staff_id).await?;
    Ok(Json(notifications))
}

/// GET /api/notifications/staff/:staff_id/unread - 未读通知
pub async fn unread_for_staff(
    State(state): State<ServerState>,
    Path(staff_id): Path<String>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state.notifications().find_unread_by_staff(&staff_id).await?;
    Ok(Json(notifications))
}

/// GET /api/notifications/staff/:staff_id/unread/count - 未读数量
pub async fn unread_count(
    State(state): State<ServerState>,
    Path(staff_id): Path<String>,
) -> AppResult<Json<usize>> {
    let count = state.notifications().count_unread(&staff_id).await?;
    Ok(Json(count))
}

/// POST /api/notifications/:id/read - 标记已读
pub async fn mark_read(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Notification>> {
    let now = state.manager.now_millis();
    let notification = state.notifications().mark_as_read(&id, now).await?;
    Ok(Json(notification))
}

/// POST /api/notifications/staff/:staff_id/read-all - 全部标记已读
pub async fn mark_all_read(
    State(state): State<ServerState>,
    Path(staff_id): Path<String>,
) -> AppResult<Json<usize>> {
    let now = state.manager.now_millis();
    let count = state.notifications().mark_all_as_read(&staff_id, now).await?;
    Ok(Json(count))
}
