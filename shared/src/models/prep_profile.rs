//! Preparation Profile Model

use serde::{Deserialize, Serialize};

/// Food identifier (catalog key, also referenced by cart lines)
pub type FoodId = String;

/// How one food item is cooked: `batch_size` units every `base_time` minutes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepProfile {
    pub id: FoodId,
    pub name: String,
    /// Minutes to cook one batch
    pub base_time: u32,
    /// Units cooked together in one batch (>= 1)
    pub batch_size: u32,
}

impl PrepProfile {
    pub fn new(
        id: impl Into<FoodId>,
        name: impl Into<String>,
        base_time: u32,
        batch_size: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_time,
            batch_size,
        }
    }
}

/// Upsert payload for a preparation profile
///
/// Numbers are accepted as signed integers so that zero and negative
/// values reach validation instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepProfileInput {
    #[serde(default)]
    pub name: Option<String>,
    pub base_time: i64,
    pub batch_size: i64,
}

/// Catalog dashboard numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub item_count: usize,
    /// Mean `base_time` over all profiles, 0 for an empty catalog
    pub average_base_time: f64,
}

/// (id, name, base_time, batch_size)
const SEED_PROFILES: &[(&str, &str, u32, u32)] = &[
    ("1", "Margherita Pizza", 15, 2),
    ("2", "Chicken Burger", 10, 4),
    ("3", "Vegetable Fried Rice", 12, 3),
    ("4", "Masala Dosa", 5, 5),
    ("5", "Chicken Biryani", 25, 2),
    ("6", "Paneer Tikka", 20, 3),
    ("7", "Fish Curry", 18, 2),
    ("8", "Veg Thali", 15, 4),
    ("9", "Chicken Tikka", 22, 3),
    ("10", "Mutton Curry", 35, 2),
    ("11", "Prawn Fry", 15, 3),
    ("12", "Veg Biryani", 20, 3),
    ("13", "Chicken Curry", 25, 2),
    ("14", "Fish Fry", 12, 4),
    ("15", "Mutton Biryani", 40, 2),
    ("16", "Veg Curry", 15, 4),
    ("17", "Chicken Fried Rice", 14, 3),
    ("18", "Egg Curry", 10, 4),
    ("19", "Dal Tadka", 8, 6),
    ("20", "Roti/Chapati", 2, 10),
    ("21", "Naan", 3, 8),
    ("22", "Samosa", 8, 6),
    ("23", "Idli", 4, 8),
    ("24", "Vada", 6, 6),
    ("25", "Upma", 10, 4),
    ("26", "Poha", 8, 5),
    ("27", "Aloo Paratha", 12, 4),
    ("28", "Chole Bhature", 15, 3),
    ("29", "Pav Bhaji", 12, 4),
    ("30", "Misal Pav", 10, 4),
];

/// Storefront seed menu
///
/// Handed to the catalog service at startup; the queue itself never
/// reads it.
pub fn default_prep_profiles() -> Vec<PrepProfile> {
    SEED_PROFILES
        .iter()
        .map(|&(id, name, base_time, batch_size)| PrepProfile::new(id, name, base_time, batch_size))
        .collect()
}
