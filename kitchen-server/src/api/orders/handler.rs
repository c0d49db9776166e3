//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{CartLine, OrderId, OrderStatus, QueuedOrder};
use shared::util::now_millis;

use crate::core::ServerState;
use crate::utils::AppResult;

/// Order record plus tracking numbers computed at response time
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: QueuedOrder,
    pub minutes_remaining: u32,
    pub progress_percent: u8,
}

impl From<QueuedOrder> for OrderView {
    fn from(order: QueuedOrder) -> Self {
        let now = now_millis();
        Self {
            minutes_remaining: order.minutes_remaining(now),
            progress_percent: order.progress_percent(now),
            order,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub customer_info: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResponse {
    pub order_id: OrderId,
    /// false when the order had already been completed
    pub completed: bool,
}

/// GET /api/orders - 获取所有进行中的订单 (按下单顺序)
pub async fn list(State(state): State<ServerState>) -> Json<Vec<OrderView>> {
    Json(
        state
            .orders
            .list_active_orders()
            .into_iter()
            .map(OrderView::from)
            .collect(),
    )
}

/// POST /api/orders - 下单入队
pub async fn place(
    State(state): State<ServerState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<OrderView>> {
    let order = state
        .orders
        .place_order(payload.lines, payload.customer_info)?;
    Ok(Json(order.into()))
}

/// GET /api/orders/{id} - 获取单个订单状态
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<OrderId>,
) -> AppResult<Json<OrderView>> {
    Ok(Json(state.orders.get_order(id)?.into()))
}

/// POST /api/orders/{id}/status - 手动推进状态 (只能向前)
pub async fn advance_status(
    State(state): State<ServerState>,
    Path(id): Path<OrderId>,
    Json(payload): Json<AdvanceStatusRequest>,
) -> AppResult<Json<OrderView>> {
    Ok(Json(state.orders.advance_status(id, payload.status)?.into()))
}

/// POST /api/orders/{id}/complete - 取餐完成 (幂等)
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<OrderId>,
) -> AppResult<Json<CompleteResponse>> {
    let completed = state.orders.complete_order(id)?;
    Ok(Json(CompleteResponse {
        order_id: id,
        completed,
    }))
}
