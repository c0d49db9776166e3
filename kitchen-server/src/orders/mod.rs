//! Order Queue Module
//!
//! Batch-capacity queue simulation for the kitchen:
//!
//! - **estimator**: pure wait-time arithmetic over units queued ahead
//! - **ledger**: authoritative table of active orders (also the status store)
//! - **scheduler**: per-order step plan and cancellable deferred tasks
//! - **events**: broadcast payloads
//! - **manager**: OrdersManager tying admission, steps and notifications together
//!
//! # Architecture
//!
//! ```text
//! Cart → preview ──────────────► Estimator (read-only)
//! Cart → place_order ─► lock ─► Estimator ─► Ledger insert ─► arm steps
//!                                                              │
//!        Steps (tokio) ─► lock ─► Notification push + status ◄─┘
//!                                   │
//!                                Broadcast
//! ```

pub mod estimator;
pub mod events;
pub mod ledger;
pub mod manager;
pub mod scheduler;

// Re-exports
pub use estimator::{ItemWait, WaitBasis, WaitEstimate};
pub use events::QueueEvent;
pub use ledger::OrderLedger;
pub use manager::{OrdersManager, QueueStats};
pub use scheduler::{DeferredTasks, ScheduledStep, StepKind, plan_steps};
