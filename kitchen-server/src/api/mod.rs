//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`queue`] - 等待时间预览、队列统计
//! - [`orders`] - 下单、跟踪、状态推进、完成
//! - [`notifications`] - 订单通知
//! - [`catalog`] - 制作目录管理

use axum::Router;

use crate::core::ServerState;

pub mod catalog;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod queue;

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(queue::router())
        .merge(orders::router())
        .merge(notifications::router())
        .merge(catalog::router())
}
