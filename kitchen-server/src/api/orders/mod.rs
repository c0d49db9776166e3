//! Order API Module
//!
//! Checkout, live tracking and kitchen-side status overrides.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::place))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", post(handler::advance_status))
        .route("/{id}/complete", post(handler::complete))
}
