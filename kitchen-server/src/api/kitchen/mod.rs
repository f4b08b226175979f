//! Kitchen API Module
//!
//! Kitchen order lifecycle operations, queue/active/overdue views, and
//! kitchen-wide capacity.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/kitchen", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Views
        .route("/queue", get(handler::queue))
        .route("/active", get(handler::active))
        .route("/overdue", get(handler::overdue))
        .route("/capacity", get(handler::capacity))
        .route("/capacity/can-accept", get(handler::can_accept))
        // Order lifecycle
        .route("/orders/{order_id}", get(handler::detail))
        .route("/orders/{order_id}/queue", post(handler::queue_order))
        .route("/orders/{order_id}/start", post(handler::start))
        .route("/orders/{order_id}/complete", post(handler::complete))
        .route("/orders/{order_id}/serve", post(handler::serve))
        .route("/orders/{order_id}/pause", post(handler::pause))
        .route("/orders/{order_id}/resume", post(handler::resume))
        .route("/orders/{order_id}/cancel", post(handler::cancel))
        .route("/orders/{order_id}/advance-stage", post(handler::advance_stage))
        .route("/orders/{order_id}/priority", put(handler::priority))
        .route("/orders/{order_id}/timer", put(handler::timer))
}
