//! Catalog API 模块 - 制作目录管理
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/catalog | GET | 全部制作参数 + 统计 |
//! | /api/catalog/export | GET | 导出 JSON 文件 |
//! | /api/catalog/reset | POST | 恢复默认 |
//! | /api/catalog/{id} | PUT | 新增/更新 |
//! | /api/catalog/{id} | DELETE | 删除 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/catalog", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/export", get(handler::export))
        .route("/reset", post(handler::reset))
        .route("/{id}", put(handler::upsert).delete(handler::delete))
}
