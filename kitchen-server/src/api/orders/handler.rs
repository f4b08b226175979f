//! Outward Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 64))]
    pub order_ref: String,
    #[validate(range(min = 1, max = 200))]
    pub item_count: i64,
}

/// POST /api/orders - 登记对外订单
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<Order>> {
    payload.validate()?;
    let repo = OrderRepository::new(state.db.clone());
    let now = state.manager.now_millis();
    let order = repo
        .create(Order::new(payload.order_ref, payload.item_count, now))
        .await?;
    Ok(Json(order))
}

/// GET /api/orders/:order_ref - 查询对外订单
pub async fn get_by_ref(
    State(state): State<ServerState>,
    Path(order_ref): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_ref(&order_ref)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_ref)))?;
    Ok(Json(order))
}
