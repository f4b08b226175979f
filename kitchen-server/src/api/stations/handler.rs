//! Workstation API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Workstation, WorkstationCreate, WorkstationUpdate};
use crate::utils::{AppError, AppResult};
use shared::CapacitySnapshot;

/// GET /api/stations - 获取所有工位
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Workstation>>> {
    let stations = state.workstations().find_all().await?;
    Ok(Json(stations))
}

/// GET /api/stations/:id - 获取单个工位
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Workstation>> {
    let station = state
        .workstations()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Workstation {} not found", id)))?;
    Ok(Json(station))
}

/// POST /api/stations - 创建工位
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<WorkstationCreate>,
) -> AppResult<Json<Workstation>> {
    if payload.max_capacity == 0 {
        return Err(AppError::validation("max_capacity must be positive"));
    }
    let station = state.workstations().create(payload).await?;
    Ok(Json(station))
}

/// PUT /api/stations/:id - 更新工位
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<WorkstationUpdate>,
) -> AppResult<Json<Workstation>> {
    if payload.max_capacity == Some(0) {
        return Err(AppError::validation("max_capacity must be positive"));
    }
    let station = state.workstations().update(&id, payload).await?;
    Ok(Json(station))
}

/// DELETE /api/stations/:id - 删除工位 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let deleted = state.workstations().delete(&id).await?;
    Ok(Json(deleted))
}

/// GET /api/stations/:id/capacity - 工位产能
pub async fn capacity(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CapacitySnapshot>> {
    let snapshot = state
        .manager
        .capacity_engine()
        .calculate_station_capacity(&id)
        .await?;
    Ok(Json(snapshot))
}
