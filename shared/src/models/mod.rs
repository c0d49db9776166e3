//! Data models
//!
//! Shared between kitchen-server and frontend (via API).
//! Wire names are camelCase to match the storefront.

pub mod notification;
pub mod order;
pub mod prep_profile;

// Re-exports
pub use notification::*;
pub use order::*;
pub use prep_profile::*;
