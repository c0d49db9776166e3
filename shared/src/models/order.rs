//! Queued Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::prep_profile::FoodId;

/// Order identifier (snowflake, creation-time ordered)
pub type OrderId = i64;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// One cart line handed over at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub food_id: FoodId,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: f64,
}

impl CartLine {
    pub fn new(food_id: impl Into<FoodId>, quantity: u32, unit_price: f64) -> Self {
        Self {
            food_id: food_id.into(),
            quantity,
            unit_price,
        }
    }
}

/// 订单制作状态
///
/// 只能向前推进: Queued → Cooking → Ready
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// 排队中
    Queued,
    /// 制作中
    Cooking,
    /// 可取餐
    Ready,
}

impl OrderStatus {
    /// Whether `next` is strictly later in the lifecycle
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        next > self
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Cooking => write!(f, "cooking"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// An admitted order as tracked by the queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedOrder {
    pub order_id: OrderId,
    pub lines: Vec<CartLine>,
    /// Opaque to the queue (name, phone, table...)
    #[serde(default)]
    pub customer_info: serde_json::Value,
    /// Quoted wait in minutes
    pub waiting_time: u32,
    /// Unix millis, `order_time + waiting_time`
    pub estimated_ready_time: i64,
    pub status: OrderStatus,
    /// Unix millis of admission
    pub order_time: i64,
}

impl QueuedOrder {
    /// Total units of one food across all lines
    pub fn quantity_of(&self, food_id: &str) -> u32 {
        self.lines
            .iter()
            .filter(|l| l.food_id == food_id)
            .map(|l| l.quantity)
            .sum()
    }

    /// Whole minutes left until the estimated ready time (rounded up)
    pub fn minutes_remaining(&self, now_millis: i64) -> u32 {
        if self.status == OrderStatus::Ready {
            return 0;
        }
        let remaining = (self.estimated_ready_time - now_millis).max(0);
        let minutes = (remaining + MILLIS_PER_MINUTE - 1) / MILLIS_PER_MINUTE;
        u32::try_from(minutes).unwrap_or(u32::MAX)
    }

    /// Tracking progress in percent (0..=100)
    pub fn progress_percent(&self, now_millis: i64) -> u8 {
        if self.status == OrderStatus::Ready || self.waiting_time == 0 {
            return 100;
        }
        let remaining = f64::from(self.minutes_remaining(now_millis));
        let pct = 100.0 - remaining / f64::from(self.waiting_time) * 100.0;
        pct.clamp(0.0, 100.0).round() as u8
    }
}
