//! 订单调度器
//!
//! 每个订单在准入时生成一组延迟步骤 (开始制作、即将完成提醒、可取餐)，
//! 由一个 tokio 任务按时间顺序执行。每个订单持有一个子
//! [`CancellationToken`]，完成订单时整组取消；关闭时取消根令牌。
//!
//! ```text
//! admit ──► plan_steps(wait) ──► arm_order(order_id, start, steps)
//!                                   │
//!                                   ├─ +cooking_delay   StartCooking
//!                                   ├─ wait - 5 min     ReadyWarning(5)
//!                                   ├─ wait - 2 min     ReadyWarning(2)
//!                                   └─ max(wait, delay) MarkReady
//! ```

use dashmap::DashMap;
use futures::FutureExt;
use shared::models::{NotificationLevel, OrderId, OrderStatus};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::core::QueueConfig;
use crate::utils::error::{QueueError, QueueResult};

const SECS_PER_MINUTE: u64 = 60;

// ============================================================================
// Plan
// ============================================================================

/// One deferred action for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Queued → Cooking
    StartCooking,
    /// Heads-up `minutes` before the estimated ready time
    ReadyWarning { minutes: u32 },
    /// Cooking → Ready
    MarkReady,
}

impl StepKind {
    /// Status applied by this step, if any
    pub fn target_status(&self) -> Option<OrderStatus> {
        match self {
            Self::StartCooking => Some(OrderStatus::Cooking),
            Self::ReadyWarning { .. } => None,
            Self::MarkReady => Some(OrderStatus::Ready),
        }
    }

    pub fn severity(&self) -> NotificationLevel {
        match self {
            Self::StartCooking => NotificationLevel::Info,
            Self::ReadyWarning { .. } => NotificationLevel::Warning,
            Self::MarkReady => NotificationLevel::Success,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::StartCooking => "Your order is being prepared!".to_string(),
            Self::ReadyWarning { minutes } => {
                format!("Your order will be ready in {minutes} minutes!")
            }
            Self::MarkReady => "Your order is ready for pickup!".to_string(),
        }
    }

    /// Tie-break for steps due at the same instant
    fn rank(&self) -> u8 {
        match self {
            Self::StartCooking => 0,
            Self::ReadyWarning { .. } => 1,
            Self::MarkReady => 2,
        }
    }

    /// The step a manual status change stands in for
    pub fn for_status(status: OrderStatus) -> Option<Self> {
        match status {
            OrderStatus::Queued => None,
            OrderStatus::Cooking => Some(Self::StartCooking),
            OrderStatus::Ready => Some(Self::MarkReady),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStep {
    /// Offset from admission
    pub at: Duration,
    pub kind: StepKind,
}

/// Build the step list for an order quoted at `waiting_time` minutes
///
/// Ready never fires before the cooking start, so a zero-minute order
/// still goes Queued → Cooking → Ready.
pub fn plan_steps(waiting_time: u32, config: &QueueConfig) -> Vec<ScheduledStep> {
    let wait = minutes(waiting_time);
    let mut steps = vec![ScheduledStep {
        at: config.cooking_start_delay,
        kind: StepKind::StartCooking,
    }];

    let mut warnings = config.ready_warnings.clone();
    warnings.sort_unstable();
    warnings.dedup();
    for m in warnings {
        if waiting_time > m {
            steps.push(ScheduledStep {
                at: wait - minutes(m),
                kind: StepKind::ReadyWarning { minutes: m },
            });
        }
    }

    steps.push(ScheduledStep {
        at: wait.max(config.cooking_start_delay),
        kind: StepKind::MarkReady,
    });

    steps.sort_by_key(|s| (s.at, s.kind.rank()));
    steps
}

fn minutes(m: u32) -> Duration {
    Duration::from_secs(u64::from(m) * SECS_PER_MINUTE)
}

// ============================================================================
// DeferredTasks
// ============================================================================

/// Cancellable delayed actions grouped by order
#[derive(Clone)]
pub struct DeferredTasks {
    /// Armed orders: order_id -> group token (child of `root`)
    groups: Arc<DashMap<OrderId, CancellationToken>>,
    /// Cancelled on shutdown
    root: CancellationToken,
}

impl std::fmt::Debug for DeferredTasks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredTasks")
            .field("armed_orders", &self.groups.len())
            .field("shut_down", &self.root.is_cancelled())
            .finish()
    }
}

impl DeferredTasks {
    pub fn new() -> Self {
        Self {
            groups: Arc::new(DashMap::new()),
            root: CancellationToken::new(),
        }
    }

    /// Runtime handle used to spawn deferred work
    pub fn runtime() -> QueueResult<Handle> {
        Handle::try_current().map_err(|_| QueueError::RuntimeUnavailable)
    }

    /// Spawn the step chain for one order
    ///
    /// Steps run in list order, each at `start + step.at`. `apply` is
    /// called once per fired step; a panic inside it is logged and ends
    /// only this order's chain.
    pub fn arm_order<F>(
        &self,
        handle: &Handle,
        order_id: OrderId,
        start: Instant,
        steps: Vec<ScheduledStep>,
        apply: F,
    ) where
        F: Fn(StepKind) + Send + Sync + 'static,
    {
        let token = self.root.child_token();
        self.groups.insert(order_id, token.clone());
        let groups = self.groups.clone();

        let chain = async move {
            for step in steps {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        tracing::debug!(order_id, "Order schedule cancelled");
                        return;
                    }
                    _ = tokio::time::sleep_until(start + step.at) => {
                        apply(step.kind);
                    }
                }
            }
        };

        handle.spawn(async move {
            if let Err(panic_info) = AssertUnwindSafe(chain).catch_unwind().await {
                tracing::error!(
                    order_id,
                    panic = %panic_message(panic_info.as_ref()),
                    "Order schedule panicked"
                );
            }
            groups.remove(&order_id);
        });
    }

    /// Run `f` once after `delay` unless shut down first
    pub fn defer<F>(&self, handle: &Handle, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let root = self.root.clone();
        handle.spawn(async move {
            tokio::select! {
                biased;
                _ = root.cancelled() => {}
                _ = tokio::time::sleep(delay) => f(),
            }
        });
    }

    /// Cancel every pending step of one order
    ///
    /// Returns false if nothing was armed for it.
    pub fn cancel_order(&self, order_id: OrderId) -> bool {
        match self.groups.remove(&order_id) {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Orders with steps still pending
    pub fn pending_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Cancel everything (orders and deferred expiries)
    pub fn shutdown(&self) {
        self.root.cancel();
        self.groups.clear();
    }
}

impl Default for DeferredTasks {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
