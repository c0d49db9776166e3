//! Order Notification Model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::order::OrderId;

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// 普通信息
    Info,
    /// 警告 (即将完成)
    Warning,
    /// 成功 (可取餐)
    Success,
    /// 错误
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// 订单通知 (服务端 -> 顾客)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    pub order_id: OrderId,
    pub message: String,
    pub severity: NotificationLevel,
    /// Unix millis
    pub created_at: i64,
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_wire_format() {
        let n = Notification {
            id: 7,
            order_id: 42,
            message: "Your order is ready for pickup!".to_string(),
            severity: NotificationLevel::Success,
            created_at: 1_700_000_000_000,
            read: false,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["orderId"], 42);
        assert_eq!(json["severity"], "success");
        assert_eq!(json["read"], false);
    }
}
