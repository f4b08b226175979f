//! Notification API Module
//!
//! Per-staff inbox: list, unread, counts, mark read.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/staff/{staff_id}", get(handler::list_for_staff))
        .route("/staff/{staff_id}/unread", get(handler::unread_for_staff))
        .route("/staff/{staff_id}/unread/count", get(handler::unread_count))
        .route("/staff/{staff_id}/read-all", post(handler::mark_all_read))
        .route("/{id}/read", post(handler::mark_read))
}
