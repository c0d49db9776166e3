use thiserror::Error;

use crate::utils::error::QueueError;

/// 服务器启动/运行错误 (处理器错误见 [`crate::utils::AppError`])
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("监听端口失败: {0}")]
    Bind(#[source] std::io::Error),

    #[error("排队核心初始化失败: {0}")]
    Queue(#[from] QueueError),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// 服务器 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
