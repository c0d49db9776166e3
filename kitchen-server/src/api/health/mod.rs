//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 存活检查 + 队列概况 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "epoch": "7f0c...",
//!   "uptimeSeconds": 42,
//!   "activeOrders": 3,
//!   "pendingSchedules": 2
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

/// 健康检查响应
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// 服务实例 epoch (重启后变化)
    epoch: String,
    uptime_seconds: u64,
    active_orders: usize,
    /// 仍有待执行步骤的订单数
    pending_schedules: usize,
}

/// GET /health - 存活检查
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        epoch: state.orders.epoch().to_string(),
        uptime_seconds: state.uptime_seconds(),
        active_orders: state.orders.queue_stats().active_orders,
        pending_schedules: state.orders.pending_schedules(),
    })
}
