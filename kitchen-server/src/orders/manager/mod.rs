//! OrdersManager - admission, scheduled transitions and tracking
//!
//! This module handles:
//! - Wait-time previews against the live ledger
//! - Admission as a single critical section (estimate, insert, arm)
//! - Deferred status transitions and their notifications
//! - Completion with cancellation of pending steps
//! - Event broadcasting after each committed change
//!
//! # Admission Flow
//!
//! ```text
//! place_order(lines)
//!     ├─ 1. Validate lines (nothing touched on failure)
//!     ├─ 2. Require a tokio runtime for the step chain
//!     ├─ 3. Lock queue state
//!     ├─ 4. Estimate against units ahead (non-Ready orders)
//!     ├─ 5. Assign a unique order id, insert into the ledger
//!     ├─ 6. Arm the step chain (cooking, warnings, ready)
//!     ├─ 7. Unlock
//!     └─ 8. Broadcast OrderPlaced
//! ```
//!
//! Every step takes the same lock, pushes its notification and then
//! flips the status, so readers see both or neither.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared::models::{CartLine, FoodId, Notification, OrderId, OrderStatus, QueuedOrder};
use shared::util::{now_millis, snowflake_id};
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::sync::broadcast;

use super::estimator::{self, WaitEstimate};
use super::events::QueueEvent;
use super::ledger::{OrderLedger, Retirement};
use super::scheduler::{plan_steps, DeferredTasks, StepKind};
use crate::core::QueueConfig;
use crate::notifications::NotificationCenter;
use crate::services::CatalogService;
use crate::utils::error::{QueueError, QueueResult};
use crate::utils::validation::validate_cart_lines;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Live queue numbers for the kitchen dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub active_orders: usize,
    /// Units per food still waiting for a batch (non-Ready orders)
    pub queued_units_by_food: BTreeMap<FoodId, u32>,
}

/// Tables guarded by the queue lock
#[derive(Debug, Default)]
struct QueueState {
    ledger: OrderLedger,
    notifications: NotificationCenter,
}

/// Shared by the manager and every deferred step
struct QueueCore {
    state: Mutex<QueueState>,
    tasks: DeferredTasks,
    event_tx: broadcast::Sender<QueueEvent>,
    config: QueueConfig,
}

/// OrdersManager for the kitchen queue
///
/// The `epoch` field is a unique identifier generated on each startup.
/// Clients use it to detect server restarts and drop stale order ids.
pub struct OrdersManager {
    core: Arc<QueueCore>,
    catalog: CatalogService,
    /// Server instance epoch - unique ID generated on startup
    epoch: String,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("catalog", &self.catalog)
            .field("tasks", &self.core.tasks)
            .field("event_tx", &"<broadcast::Sender>")
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl OrdersManager {
    /// Create a manager over an injected catalog
    pub fn new(catalog: CatalogService, config: QueueConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity.max(1));
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(
            epoch = %epoch,
            wait_basis = %config.wait_basis,
            "OrdersManager started with new epoch"
        );
        Self {
            core: Arc::new(QueueCore {
                state: Mutex::new(QueueState::default()),
                tasks: DeferredTasks::new(),
                event_tx,
                config,
            }),
            catalog,
            epoch,
        }
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.core.event_tx.subscribe()
    }

    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn config(&self) -> &QueueConfig {
        &self.core.config
    }

    /// Orders whose step chain has not finished
    pub fn pending_schedules(&self) -> usize {
        self.core.tasks.pending_count()
    }

    // ========================================================================
    // Estimation
    // ========================================================================

    /// Minutes a cart would wait if placed now (read-only)
    pub fn preview_wait_time(&self, lines: &[CartLine]) -> u32 {
        self.preview_breakdown(lines).waiting_time
    }

    /// Per-food queue position for a cart (read-only)
    pub fn preview_breakdown(&self, lines: &[CartLine]) -> WaitEstimate {
        let state = self.core.state.lock();
        self.estimate_locked(&state, lines)
    }

    fn estimate_locked(&self, state: &QueueState, lines: &[CartLine]) -> WaitEstimate {
        let units_ahead = state.ledger.units_ahead();
        self.catalog.read(|profiles| {
            estimator::estimate(&units_ahead, profiles, lines, self.core.config.wait_basis)
        })
    }

    // ========================================================================
    // Admission
    // ========================================================================

    /// Admit an order and arm its schedule
    pub fn place_order(
        &self,
        lines: Vec<CartLine>,
        customer_info: serde_json::Value,
    ) -> QueueResult<QueuedOrder> {
        validate_cart_lines(&lines)?;
        let handle = DeferredTasks::runtime()?;
        if self.core.tasks.is_shut_down() {
            return Err(QueueError::RuntimeUnavailable);
        }

        let order = {
            let mut state = self.core.state.lock();

            let estimate = self.estimate_locked(&state, &lines);
            if !estimate.unknown_food_ids.is_empty() {
                tracing::warn!(
                    unknown = ?estimate.unknown_food_ids,
                    "Order references foods missing from the catalog, counted as zero wait"
                );
            }

            let mut order_id = snowflake_id();
            while state.ledger.is_known(order_id) {
                order_id = snowflake_id();
            }

            let order_time = now_millis();
            let start = tokio::time::Instant::now();
            let waiting_time = estimate.waiting_time;
            let order = QueuedOrder {
                order_id,
                lines,
                customer_info,
                waiting_time,
                estimated_ready_time: order_time + i64::from(waiting_time) * MILLIS_PER_MINUTE,
                status: OrderStatus::Queued,
                order_time,
            };
            if !state.ledger.insert(order.clone()) {
                return Err(QueueError::Internal(format!(
                    "order id collision: {order_id}"
                )));
            }

            let steps = plan_steps(waiting_time, &self.core.config);
            let weak = Arc::downgrade(&self.core);
            self.core
                .tasks
                .arm_order(&handle, order_id, start, steps, move |kind| {
                    QueueCore::fire(&weak, order_id, kind)
                });

            order
        };

        tracing::info!(
            order_id = order.order_id,
            waiting_time = order.waiting_time,
            lines = order.lines.len(),
            "Order admitted"
        );
        self.core.publish(vec![QueueEvent::OrderPlaced {
            order: order.clone(),
        }]);
        Ok(order)
    }

    // ========================================================================
    // Tracking
    // ========================================================================

    /// Current record of an active order
    pub fn get_order(&self, order_id: OrderId) -> QueueResult<QueuedOrder> {
        self.core
            .state
            .lock()
            .ledger
            .get(order_id)
            .cloned()
            .ok_or(QueueError::OrderNotFound(order_id))
    }

    /// Active orders in admission order
    pub fn list_active_orders(&self) -> Vec<QueuedOrder> {
        self.core.state.lock().ledger.active().cloned().collect()
    }

    pub fn queue_stats(&self) -> QueueStats {
        let state = self.core.state.lock();
        QueueStats {
            active_orders: state.ledger.len(),
            queued_units_by_food: state.ledger.units_ahead().into_iter().collect(),
        }
    }

    /// Move an order forward by hand, emitting the matching notification
    ///
    /// Jumping from Queued to Ready also emits the Cooking notification
    /// first. Reaching Ready cancels the rest of the order's schedule.
    pub fn advance_status(&self, order_id: OrderId, to: OrderStatus) -> QueueResult<QueuedOrder> {
        let handle = DeferredTasks::runtime()?;
        let Some(kind) = StepKind::for_status(to) else {
            let from = self.get_order(order_id)?.status;
            return Err(QueueError::InvalidTransition { order_id, from, to });
        };

        let (order, _) = self.core.commit_step(&handle, order_id, kind)?;
        if order.status == OrderStatus::Ready {
            self.core.tasks.cancel_order(order_id);
        }
        tracing::info!(order_id, status = %order.status, "Order status advanced manually");
        Ok(order)
    }

    /// Remove an order from active tracking
    ///
    /// Returns `Ok(false)` when the order was already completed (among the
    /// last [`MAX_RETIRED_IDS`] completions). Pending steps are cancelled;
    /// notifications stay until they expire.
    ///
    /// [`MAX_RETIRED_IDS`]: crate::orders::ledger::MAX_RETIRED_IDS
    pub fn complete_order(&self, order_id: OrderId) -> QueueResult<bool> {
        let retirement = {
            let mut state = self.core.state.lock();
            let retirement = state.ledger.retire(order_id);
            if matches!(retirement, Retirement::Removed(_)) {
                self.core.tasks.cancel_order(order_id);
            }
            retirement
        };

        match retirement {
            Retirement::Removed(order) => {
                tracing::info!(order_id, status = %order.status, "Order completed");
                self.core
                    .publish(vec![QueueEvent::OrderCompleted { order_id }]);
                Ok(true)
            }
            Retirement::AlreadyRetired => {
                tracing::debug!(order_id, "Order already completed, nothing to do");
                Ok(false)
            }
            Retirement::Unknown => Err(QueueError::OrderNotFound(order_id)),
        }
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Notifications oldest first, optionally for one order
    pub fn list_notifications(&self, order_id: Option<OrderId>) -> Vec<Notification> {
        self.core.state.lock().notifications.list(order_id)
    }

    pub fn mark_notification_read(&self, id: u64) -> QueueResult<()> {
        if self.core.state.lock().notifications.mark_read(id) {
            Ok(())
        } else {
            Err(QueueError::NotificationNotFound(id))
        }
    }

    pub fn dismiss_notification(&self, id: u64) -> QueueResult<Notification> {
        self.core
            .state
            .lock()
            .notifications
            .remove(id)
            .ok_or(QueueError::NotificationNotFound(id))
    }

    pub fn unread_count(&self) -> usize {
        self.core.state.lock().notifications.unread_count()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Cancel all pending steps and expiries
    pub fn shutdown(&self) {
        let pending = self.core.tasks.pending_count();
        self.core.tasks.shutdown();
        tracing::info!(pending, "Order schedules cancelled");
    }
}

impl QueueCore {
    /// Entry point for a fired step; failures are no-ops
    fn fire(weak: &Weak<Self>, order_id: OrderId, kind: StepKind) {
        let Some(core) = weak.upgrade() else {
            return;
        };
        let handle = match DeferredTasks::runtime() {
            Ok(h) => h,
            Err(_) => return,
        };
        match core.commit_step(&handle, order_id, kind) {
            Ok((order, notifications)) => {
                tracing::debug!(
                    order_id,
                    step = ?kind,
                    status = %order.status,
                    notifications = notifications.len(),
                    "Scheduled step applied"
                );
            }
            Err(e) => {
                tracing::debug!(order_id, step = ?kind, error = %e, "Scheduled step skipped");
            }
        }
    }

    /// Apply one step under the lock: notification first, then status
    ///
    /// Ready reached straight from Queued passes through Cooking, so the
    /// Cooking notification always precedes the Ready one.
    fn commit_step(
        self: &Arc<Self>,
        handle: &Handle,
        order_id: OrderId,
        kind: StepKind,
    ) -> QueueResult<(QueuedOrder, Vec<Notification>)> {
        let (order, notifications, events) = {
            let mut state = self.state.lock();
            let from = match state.ledger.get(order_id) {
                Some(order) => order.status,
                None if state.ledger.is_retired(order_id) => {
                    return Err(QueueError::OrderRetired(order_id));
                }
                None => return Err(QueueError::OrderNotFound(order_id)),
            };

            match kind.target_status() {
                Some(to) if !from.can_advance_to(to) => {
                    return Err(QueueError::InvalidTransition { order_id, from, to });
                }
                // Warnings after Ready are stale
                None if from == OrderStatus::Ready => {
                    return Err(QueueError::InvalidTransition {
                        order_id,
                        from,
                        to: from,
                    });
                }
                _ => {}
            }

            let mut steps = Vec::with_capacity(2);
            if kind == StepKind::MarkReady && from == OrderStatus::Queued {
                steps.push(StepKind::StartCooking);
            }
            steps.push(kind);

            let mut status = from;
            let mut notifications = Vec::with_capacity(steps.len());
            let mut events = Vec::with_capacity(steps.len() * 2);
            for step in steps {
                let notification =
                    state
                        .notifications
                        .push(order_id, step.message(), step.severity(), now_millis());
                events.push(QueueEvent::NotificationEmitted {
                    notification: notification.clone(),
                });
                notifications.push(notification);
                if let Some(to) = step.target_status() {
                    events.push(QueueEvent::StatusChanged {
                        order_id,
                        from: status,
                        to,
                    });
                    status = to;
                }
            }

            let order = match state.ledger.get_mut(order_id) {
                Some(order) => {
                    order.status = status;
                    order.clone()
                }
                None => return Err(QueueError::OrderNotFound(order_id)),
            };
            (order, notifications, events)
        };

        for notification in &notifications {
            self.schedule_expiry(handle, notification.id);
        }
        self.publish(events);
        Ok((order, notifications))
    }

    fn schedule_expiry(self: &Arc<Self>, handle: &Handle, notification_id: u64) {
        let weak = Arc::downgrade(self);
        self.tasks
            .defer(handle, self.config.notification_expiry, move || {
                if let Some(core) = weak.upgrade()
                    && core.state.lock().notifications.remove(notification_id).is_some()
                {
                    tracing::debug!(notification_id, "Notification expired");
                }
            });
    }

    /// Broadcast events after commit
    fn publish(&self, events: Vec<QueueEvent>) {
        for event in events {
            if self.event_tx.send(event).is_err() {
                tracing::trace!("Event broadcast skipped: no active receivers");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests;
