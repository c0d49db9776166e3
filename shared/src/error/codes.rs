//! Unified error codes for the kitchen queue
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order / queue errors
//! - 6xxx: Preparation catalog errors
//! - 7xxx: Notification errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been completed (removed from the queue)
    OrderAlreadyCompleted = 4003,
    /// Order has no lines
    OrderEmpty = 4007,
    /// Order line is invalid (zero quantity, empty food id)
    OrderLineInvalid = 4008,
    /// Status transition not allowed (backwards or repeated)
    InvalidStatusTransition = 4010,

    // ==================== 6xxx: Catalog ====================
    /// Food has no preparation profile
    FoodNotFound = 6001,
    /// Preparation profile values are invalid
    InvalidPrepProfile = 6002,

    // ==================== 7xxx: Notification ====================
    /// Notification not found (dismissed or expired)
    NotificationNotFound = 7001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Catalog storage failed
    StorageError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// No async runtime available to schedule work
    RuntimeUnavailable = 9004,
}

impl ErrorCode {
    /// Numeric value of this code
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default English message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::ValueOutOfRange => "Value out of range",

            Self::OrderNotFound => "Order not found",
            Self::OrderAlreadyCompleted => "Order already completed",
            Self::OrderEmpty => "Order has no items",
            Self::OrderLineInvalid => "Order line is invalid",
            Self::InvalidStatusTransition => "Order status transition not allowed",

            Self::FoodNotFound => "Food item not found in preparation catalog",
            Self::InvalidPrepProfile => "Invalid preparation profile",

            Self::NotificationNotFound => "Notification not found",

            Self::InternalError => "Internal server error",
            Self::StorageError => "Storage error",
            Self::ConfigError => "Configuration error",
            Self::RuntimeUnavailable => "Async runtime unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Error for u16 values that do not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            8 => Self::ValueOutOfRange,
            4001 => Self::OrderNotFound,
            4003 => Self::OrderAlreadyCompleted,
            4007 => Self::OrderEmpty,
            4008 => Self::OrderLineInvalid,
            4010 => Self::InvalidStatusTransition,
            6001 => Self::FoodNotFound,
            6002 => Self::InvalidPrepProfile,
            7001 => Self::NotificationNotFound,
            9001 => Self::InternalError,
            9002 => Self::StorageError,
            9003 => Self::ConfigError,
            9004 => Self::RuntimeUnavailable,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
