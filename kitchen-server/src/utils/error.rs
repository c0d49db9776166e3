//! 队列错误类型
//!
//! [`QueueError`] 是队列核心 (目录、排队、调度、通知) 的领域错误，
//! 在 API 边界转换为 [`AppError`]:
//!
//! | 变体 | 分类 | 错误码 |
//! |------|------|--------|
//! | Validation / InvalidPrepProfile / EmptyOrder / InvalidLine | 校验错误 | 0002 / 6002 / 4007 / 4008 |
//! | OrderNotFound / FoodNotFound / NotificationNotFound | 未找到 | 4001 / 6001 / 7001 |
//! | OrderRetired / InvalidTransition | 状态错误 | 4003 / 4010 |
//! | RuntimeUnavailable / Persistence / Internal | 系统错误 | 9004 / 9002 / 9001 |

use shared::models::{OrderId, OrderStatus};
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
use thiserror::Error;

/// Queue core errors
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Order has no items")]
    EmptyOrder,

    #[error("Invalid order line: {0}")]
    InvalidLine(String),

    #[error("Invalid preparation profile: {0}")]
    InvalidPrepProfile(String),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("Food not found in preparation catalog: {0}")]
    FoodNotFound(String),

    #[error("Notification not found: {0}")]
    NotificationNotFound(u64),

    #[error("Order already completed: {0}")]
    OrderRetired(OrderId),

    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("No async runtime available to schedule order tracking")]
    RuntimeUnavailable,

    #[error("Catalog storage error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueueError {
    /// Error code reported to clients
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::EmptyOrder => ErrorCode::OrderEmpty,
            Self::InvalidLine(_) => ErrorCode::OrderLineInvalid,
            Self::InvalidPrepProfile(_) => ErrorCode::InvalidPrepProfile,
            Self::OrderNotFound(_) => ErrorCode::OrderNotFound,
            Self::FoodNotFound(_) => ErrorCode::FoodNotFound,
            Self::NotificationNotFound(_) => ErrorCode::NotificationNotFound,
            Self::OrderRetired(_) => ErrorCode::OrderAlreadyCompleted,
            Self::InvalidTransition { .. } => ErrorCode::InvalidStatusTransition,
            Self::RuntimeUnavailable => ErrorCode::RuntimeUnavailable,
            Self::Persistence(_) => ErrorCode::StorageError,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Validation errors never leave partial state behind
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::EmptyOrder | Self::InvalidLine(_) | Self::InvalidPrepProfile(_)
        )
    }
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        let code = err.code();
        let app = AppError::with_message(code, err.to_string());
        match err {
            QueueError::OrderNotFound(id) | QueueError::OrderRetired(id) => {
                app.with_detail("orderId", id)
            }
            QueueError::FoodNotFound(food_id) => app.with_detail("foodId", food_id),
            QueueError::NotificationNotFound(id) => app.with_detail("notificationId", id),
            QueueError::InvalidTransition { from, to, .. } => app
                .with_detail("from", from.to_string())
                .with_detail("to", to.to_string()),
            _ => app,
        }
    }
}

pub type QueueResult<T> = Result<T, QueueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_codes() {
        assert_eq!(QueueError::EmptyOrder.code(), ErrorCode::OrderEmpty);
        assert_eq!(QueueError::OrderNotFound(1).code(), ErrorCode::OrderNotFound);
        assert_eq!(QueueError::OrderRetired(1).code(), ErrorCode::OrderAlreadyCompleted);
        assert!(QueueError::InvalidPrepProfile("x".into()).is_validation());
        assert!(!QueueError::FoodNotFound("x".into()).is_validation());
    }

    #[test]
    fn test_into_app_error_keeps_details() {
        let err: AppError = QueueError::InvalidTransition {
            order_id: 9,
            from: OrderStatus::Ready,
            to: OrderStatus::Cooking,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        assert_eq!(err.message, "Order 9 cannot move from ready to cooking");
        let details = err.details.unwrap();
        assert_eq!(details["from"], "ready");
        assert_eq!(details["to"], "cooking");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: AppError = QueueError::FoodNotFound("dosa".into()).into();
        assert_eq!(err.http_status(), shared::http::StatusCode::NOT_FOUND);
    }
}
