//! Wait-time estimator
//!
//! Pure batch-packing arithmetic. Units of one food are packed into
//! fixed-size batches in strict FIFO order; the order waits for its
//! slowest food.
//!
//! ```text
//! ahead = units of this food in non-Ready orders
//! batch_index = ceil((ahead + 1) / batch_size)        (1-based)
//! BatchStart:      wait = (batch_index - 1) * base_time
//! BatchCompletion: wait = ceil((ahead + q) / batch_size) * base_time
//! ```

use serde::{Deserialize, Serialize};
use shared::models::{CartLine, FoodId, PrepProfile};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Which instant of the customer's batch is quoted as the wait
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitBasis {
    /// Minutes until the batch holding the first requested unit starts
    #[default]
    BatchStart,
    /// Minutes until the batch holding the last requested unit is done
    BatchCompletion,
}

impl fmt::Display for WaitBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatchStart => write!(f, "batch_start"),
            Self::BatchCompletion => write!(f, "batch_completion"),
        }
    }
}

impl FromStr for WaitBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch_start" | "start" => Ok(Self::BatchStart),
            "batch_completion" | "completion" => Ok(Self::BatchCompletion),
            other => Err(format!("unknown wait basis: {other}")),
        }
    }
}

/// Queue position of one food in a candidate order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemWait {
    pub food_id: FoodId,
    /// Units of this food already queued ahead (non-Ready orders)
    pub items_ahead: u32,
    /// Units requested by the candidate order (duplicate lines summed)
    pub quantity: u32,
    /// 1-based batch receiving the first requested unit
    pub batch_index: u32,
    /// Full batches strictly ahead (`batch_index - 1`)
    pub batches_ahead: u32,
    pub wait_minutes: u32,
}

/// Estimator result for a candidate order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitEstimate {
    /// Max over `items[].wait_minutes`, 0 for an empty cart
    pub waiting_time: u32,
    /// One entry per known food, in first-appearance order
    pub items: Vec<ItemWait>,
    /// Foods missing from the catalog (contribute 0)
    pub unknown_food_ids: Vec<FoodId>,
}

/// Sum quantities per food id keeping first-appearance order
pub fn requested_units(lines: &[CartLine]) -> Vec<(FoodId, u32)> {
    let mut totals: Vec<(FoodId, u32)> = Vec::new();
    for line in lines {
        match totals.iter_mut().find(|(id, _)| *id == line.food_id) {
            Some((_, qty)) => *qty = qty.saturating_add(line.quantity),
            None => totals.push((line.food_id.clone(), line.quantity)),
        }
    }
    totals
}

/// Compute the wait for `lines` given the units already queued ahead
///
/// `units_ahead` maps food id to the units held by non-Ready orders.
pub fn estimate(
    units_ahead: &HashMap<FoodId, u32>,
    profiles: &BTreeMap<FoodId, PrepProfile>,
    lines: &[CartLine],
    basis: WaitBasis,
) -> WaitEstimate {
    let mut result = WaitEstimate::default();

    for (food_id, quantity) in requested_units(lines) {
        let Some(profile) = profiles.get(&food_id) else {
            result.unknown_food_ids.push(food_id);
            continue;
        };
        let ahead = units_ahead.get(&food_id).copied().unwrap_or(0);
        let item = item_wait(food_id, ahead, quantity, profile, basis);
        result.waiting_time = result.waiting_time.max(item.wait_minutes);
        result.items.push(item);
    }

    result
}

fn item_wait(
    food_id: FoodId,
    ahead: u32,
    quantity: u32,
    profile: &PrepProfile,
    basis: WaitBasis,
) -> ItemWait {
    // Catalog rejects zero; guard anyway so the estimator never divides by zero
    let batch_size = u64::from(profile.batch_size.max(1));
    let base_time = u64::from(profile.base_time);
    let ahead64 = u64::from(ahead);

    let batch_index = (ahead64 + 1).div_ceil(batch_size);
    let wait = match basis {
        WaitBasis::BatchStart => (batch_index - 1) * base_time,
        WaitBasis::BatchCompletion => {
            (ahead64 + u64::from(quantity)).div_ceil(batch_size) * base_time
        }
    };

    ItemWait {
        food_id,
        items_ahead: ahead,
        quantity,
        batch_index: saturate(batch_index),
        batches_ahead: saturate(batch_index - 1),
        wait_minutes: saturate(wait),
    }
}

fn saturate(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}
