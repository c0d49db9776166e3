//! Catalog API Handlers

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use http::header;
use serde::Serialize;
use shared::models::{CatalogSummary, PrepProfile, PrepProfileInput};

use crate::core::ServerState;
use crate::services::CatalogService;
use crate::utils::{AppResult, QueueError, QueueResult};

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub items: Vec<PrepProfile>,
    pub summary: CatalogSummary,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub count: usize,
}

/// GET /api/catalog - 获取全部制作参数
pub async fn list(State(state): State<ServerState>) -> Json<CatalogResponse> {
    let catalog = state.catalog();
    Json(CatalogResponse {
        items: catalog.list_all(),
        summary: catalog.summary(),
    })
}

/// GET /api/catalog/export - 导出为 JSON 文件
pub async fn export(State(state): State<ServerState>) -> AppResult<impl IntoResponse> {
    let json = state.catalog().export_json()?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"prep-times.json\"",
            ),
        ],
        json,
    ))
}

/// PUT /api/catalog/{id} - 新增或更新制作参数
pub async fn upsert(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PrepProfileInput>,
) -> AppResult<Json<PrepProfile>> {
    let profile = with_catalog(&state, move |catalog| catalog.upsert(&id, payload)).await?;
    Ok(Json(profile))
}

/// DELETE /api/catalog/{id} - 删除制作参数
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PrepProfile>> {
    let removed = with_catalog(&state, move |catalog| catalog.remove(&id)).await?;
    Ok(Json(removed))
}

/// POST /api/catalog/reset - 恢复默认制作参数
pub async fn reset(State(state): State<ServerState>) -> AppResult<Json<ResetResponse>> {
    let count = with_catalog(&state, CatalogService::reset_to_defaults).await?;
    Ok(Json(ResetResponse { count }))
}

/// 目录写操作会同步写文件，放到阻塞线程池执行
async fn with_catalog<T, F>(state: &ServerState, f: F) -> QueueResult<T>
where
    T: Send + 'static,
    F: FnOnce(&CatalogService) -> QueueResult<T> + Send + 'static,
{
    let catalog = state.catalog().clone();
    tokio::task::spawn_blocking(move || f(&catalog))
        .await
        .map_err(|e| {
            tracing::error!("spawn_blocking join error: {e}");
            QueueError::Internal(format!("catalog task failed: {e}"))
        })?
}
