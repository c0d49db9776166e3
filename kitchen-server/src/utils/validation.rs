//! Input validation helpers
//!
//! Centralized limits and validation functions for catalog edits and
//! checkout input. All checks run before any state is touched.

use shared::models::CartLine;

use super::error::QueueError;

// ── Limits ──────────────────────────────────────────────────────────

/// Food display names
pub const MAX_NAME_LEN: usize = 200;

/// Food identifiers
pub const MAX_FOOD_ID_LEN: usize = 64;

/// One batch never takes longer than a day
pub const MAX_BASE_TIME_MINUTES: i64 = 24 * 60;

/// Largest batch a kitchen station can cook at once
pub const MAX_BATCH_SIZE: i64 = 1000;

/// Lines per order
pub const MAX_ORDER_LINES: usize = 200;

// ── Catalog ─────────────────────────────────────────────────────────

/// Validate a food identifier (non-empty, bounded)
pub fn validate_food_id(food_id: &str) -> Result<(), QueueError> {
    if food_id.trim().is_empty() {
        return Err(QueueError::InvalidPrepProfile(
            "food id must not be empty".to_string(),
        ));
    }
    if food_id.len() > MAX_FOOD_ID_LEN {
        return Err(QueueError::InvalidPrepProfile(format!(
            "food id is too long ({} chars, max {MAX_FOOD_ID_LEN})",
            food_id.len()
        )));
    }
    Ok(())
}

/// Validate an optional display name
pub fn validate_optional_name(name: &Option<String>) -> Result<(), QueueError> {
    if let Some(n) = name {
        if n.trim().is_empty() {
            return Err(QueueError::InvalidPrepProfile(
                "name must not be blank".to_string(),
            ));
        }
        if n.len() > MAX_NAME_LEN {
            return Err(QueueError::InvalidPrepProfile(format!(
                "name is too long ({} chars, max {MAX_NAME_LEN})",
                n.len()
            )));
        }
    }
    Ok(())
}

/// Coerce raw catalog numbers into `(base_time, batch_size)`
///
/// Both must be positive and within the station limits.
pub fn validate_prep_values(base_time: i64, batch_size: i64) -> Result<(u32, u32), QueueError> {
    if base_time <= 0 {
        return Err(QueueError::InvalidPrepProfile(format!(
            "baseTime must be positive (got {base_time})"
        )));
    }
    if batch_size <= 0 {
        return Err(QueueError::InvalidPrepProfile(format!(
            "batchSize must be positive (got {batch_size})"
        )));
    }
    if base_time > MAX_BASE_TIME_MINUTES {
        return Err(QueueError::InvalidPrepProfile(format!(
            "baseTime is too large ({base_time}, max {MAX_BASE_TIME_MINUTES})"
        )));
    }
    if batch_size > MAX_BATCH_SIZE {
        return Err(QueueError::InvalidPrepProfile(format!(
            "batchSize is too large ({batch_size}, max {MAX_BATCH_SIZE})"
        )));
    }
    // Bounds above keep both values well inside u32
    Ok((base_time as u32, batch_size as u32))
}

// ── Checkout ────────────────────────────────────────────────────────

/// Validate cart lines for admission
pub fn validate_cart_lines(lines: &[CartLine]) -> Result<(), QueueError> {
    if lines.is_empty() {
        return Err(QueueError::EmptyOrder);
    }
    if lines.len() > MAX_ORDER_LINES {
        return Err(QueueError::Validation(format!(
            "too many lines ({}, max {MAX_ORDER_LINES})",
            lines.len()
        )));
    }
    for (idx, line) in lines.iter().enumerate() {
        if line.food_id.trim().is_empty() {
            return Err(QueueError::InvalidLine(format!("line {idx}: empty food id")));
        }
        if line.quantity == 0 {
            return Err(QueueError::InvalidLine(format!(
                "line {idx} ({}): quantity must be positive",
                line.food_id
            )));
        }
        if !line.unit_price.is_finite() || line.unit_price < 0.0 {
            return Err(QueueError::InvalidLine(format!(
                "line {idx} ({}): invalid unit price",
                line.food_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prep_values_reject_non_positive() {
        assert!(matches!(
            validate_prep_values(0, 5),
            Err(QueueError::InvalidPrepProfile(_))
        ));
        assert!(matches!(
            validate_prep_values(5, 0),
            Err(QueueError::InvalidPrepProfile(_))
        ));
        assert!(validate_prep_values(-1, 5).is_err());
        assert_eq!(validate_prep_values(5, 5).unwrap(), (5, 5));
    }

    #[test]
    fn test_prep_values_upper_bounds() {
        assert!(validate_prep_values(MAX_BASE_TIME_MINUTES + 1, 1).is_err());
        assert!(validate_prep_values(1, MAX_BATCH_SIZE + 1).is_err());
        assert!(validate_prep_values(MAX_BASE_TIME_MINUTES, MAX_BATCH_SIZE).is_ok());
    }

    #[test]
    fn test_food_id_and_name() {
        assert!(validate_food_id("  ").is_err());
        assert!(validate_food_id(&"x".repeat(MAX_FOOD_ID_LEN + 1)).is_err());
        assert!(validate_food_id("dosa").is_ok());
        assert!(validate_optional_name(&None).is_ok());
        assert!(validate_optional_name(&Some(" ".into())).is_err());
    }

    #[test]
    fn test_cart_lines() {
        assert!(matches!(validate_cart_lines(&[]), Err(QueueError::EmptyOrder)));
        assert!(matches!(
            validate_cart_lines(&[CartLine::new("4", 0, 1.0)]),
            Err(QueueError::InvalidLine(_))
        ));
        assert!(matches!(
            validate_cart_lines(&[CartLine::new("", 1, 1.0)]),
            Err(QueueError::InvalidLine(_))
        ));
        assert!(validate_cart_lines(&[CartLine::new("4", 1, f64::NAN)]).is_err());
        assert!(validate_cart_lines(&[CartLine::new("4", 2, 40.0)]).is_ok());
    }
}
