//! Outward Order API Module
//!
//! Minimal surface over the outward order store the kitchen collaborates
//! with: create (POS integration / seeding) and lookup.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", axum::routing::post(handler::create))
        .route("/{order_ref}", get(handler::get_by_ref))
}
