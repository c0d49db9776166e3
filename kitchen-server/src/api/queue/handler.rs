//! Queue API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::models::CartLine;

use crate::core::ServerState;
use crate::orders::{QueueStats, WaitEstimate};

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

/// POST /api/queue/preview - 预览购物车等待时间 (不入队)
pub async fn preview(
    State(state): State<ServerState>,
    Json(payload): Json<PreviewRequest>,
) -> Json<WaitEstimate> {
    Json(state.orders.preview_breakdown(&payload.lines))
}

/// GET /api/queue/stats - 队列统计
pub async fn stats(State(state): State<ServerState>) -> Json<QueueStats> {
    Json(state.orders.queue_stats())
}
