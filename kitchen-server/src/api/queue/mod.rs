//! Queue API 模块 - 等待时间预览与队列统计

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/queue", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/preview", post(handler::preview))
        .route("/stats", get(handler::stats))
}
