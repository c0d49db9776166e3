//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`QueueError`] - 排队核心错误 (转换为 [`AppError`])
//! - [`AppError`] / [`ApiResponse`] - 应用错误与响应 (from shared::error)
//! - 日志、输入校验

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use error::{QueueError, QueueResult};
