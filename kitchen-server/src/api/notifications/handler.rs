//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{Notification, OrderId};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    pub order_id: Option<OrderId>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: usize,
}

/// GET /api/notifications - 通知列表 (可按 orderId 过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<NotificationQuery>,
) -> Json<Vec<Notification>> {
    Json(state.orders.list_notifications(query.order_id))
}

/// GET /api/notifications/unread-count - 未读数量
pub async fn unread_count(State(state): State<ServerState>) -> Json<UnreadCount> {
    Json(UnreadCount {
        count: state.orders.unread_count(),
    })
}

/// POST /api/notifications/{id}/read - 标记已读
pub async fn mark_read(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.orders.mark_notification_read(id)?;
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /api/notifications/{id} - 关闭通知
pub async fn dismiss(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Notification>> {
    Ok(Json(state.orders.dismiss_notification(id)?))
}
