//! Queue ledger
//!
//! Single authoritative table of admitted orders keyed by order id.
//! Admission order is kept alongside so "what is ahead of me" and the
//! tracking list read the same records. The most recent completed ids
//! are remembered so a second completion is recognisable as a no-op;
//! past [`MAX_RETIRED_IDS`] the oldest are forgotten and read as unknown.

use shared::models::{FoodId, OrderId, OrderStatus, QueuedOrder};
use std::collections::{HashMap, HashSet, VecDeque};

/// Completed ids kept for idempotent completion
pub const MAX_RETIRED_IDS: usize = 10_000;

/// Result of removing an order from the ledger
#[derive(Debug, Clone, PartialEq)]
pub enum Retirement {
    Removed(QueuedOrder),
    AlreadyRetired,
    Unknown,
}

#[derive(Debug)]
pub struct OrderLedger {
    orders: HashMap<OrderId, QueuedOrder>,
    /// Admission order of active ids
    sequence: Vec<OrderId>,
    retired: HashSet<OrderId>,
    /// Retirement order, oldest first
    retired_fifo: VecDeque<OrderId>,
    retired_capacity: usize,
}

impl Default for OrderLedger {
    fn default() -> Self {
        Self::with_retired_capacity(MAX_RETIRED_IDS)
    }
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger remembering at most `capacity` completed ids
    pub fn with_retired_capacity(capacity: usize) -> Self {
        Self {
            orders: HashMap::new(),
            sequence: Vec::new(),
            retired: HashSet::new(),
            retired_fifo: VecDeque::new(),
            retired_capacity: capacity,
        }
    }

    pub fn retired_len(&self) -> usize {
        self.retired.len()
    }

    /// Whether `order_id` was ever used (active or retired)
    pub fn is_known(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id) || self.retired.contains(&order_id)
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    pub fn is_retired(&self, order_id: OrderId) -> bool {
        self.retired.contains(&order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Append a freshly admitted order
    ///
    /// Returns false (and leaves the ledger unchanged) if the id is taken.
    pub fn insert(&mut self, order: QueuedOrder) -> bool {
        if self.is_known(order.order_id) {
            return false;
        }
        self.sequence.push(order.order_id);
        self.orders.insert(order.order_id, order);
        true
    }

    pub fn get(&self, order_id: OrderId) -> Option<&QueuedOrder> {
        self.orders.get(&order_id)
    }

    pub fn get_mut(&mut self, order_id: OrderId) -> Option<&mut QueuedOrder> {
        self.orders.get_mut(&order_id)
    }

    /// Active orders in admission order
    pub fn active(&self) -> impl Iterator<Item = &QueuedOrder> {
        self.sequence.iter().filter_map(|id| self.orders.get(id))
    }

    /// Units per food held by orders that have not reached Ready
    pub fn units_ahead(&self) -> HashMap<FoodId, u32> {
        let mut units: HashMap<FoodId, u32> = HashMap::new();
        for order in self.orders.values() {
            if order.status == OrderStatus::Ready {
                continue;
            }
            for line in &order.lines {
                let entry = units.entry(line.food_id.clone()).or_default();
                *entry = entry.saturating_add(line.quantity);
            }
        }
        units
    }

    /// Remove an order from active tracking
    pub fn retire(&mut self, order_id: OrderId) -> Retirement {
        match self.orders.remove(&order_id) {
            Some(order) => {
                self.sequence.retain(|id| *id != order_id);
                self.remember_retired(order_id);
                Retirement::Removed(order)
            }
            None if self.retired.contains(&order_id) => Retirement::AlreadyRetired,
            None => Retirement::Unknown,
        }
    }

    fn remember_retired(&mut self, order_id: OrderId) {
        if self.retired_capacity == 0 {
            return;
        }
        while self.retired_fifo.len() >= self.retired_capacity {
            if let Some(oldest) = self.retired_fifo.pop_front() {
                self.retired.remove(&oldest);
            }
        }
        self.retired.insert(order_id);
        self.retired_fifo.push_back(order_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::CartLine;

    fn order(id: OrderId, lines: Vec<CartLine>, status: OrderStatus) -> QueuedOrder {
        QueuedOrder {
            order_id: id,
            lines,
            customer_info: serde_json::Value::Null,
            waiting_time: 0,
            estimated_ready_time: 0,
            status,
            order_time: 0,
        }
    }

    #[test]
    fn test_insert_keeps_admission_order() {
        let mut ledger = OrderLedger::new();
        assert!(ledger.insert(order(30, vec![], OrderStatus::Queued)));
        assert!(ledger.insert(order(10, vec![], OrderStatus::Queued)));
        assert!(ledger.insert(order(20, vec![], OrderStatus::Queued)));
        let ids: Vec<_> = ledger.active().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut ledger = OrderLedger::new();
        assert!(ledger.insert(order(1, vec![], OrderStatus::Queued)));
        assert!(!ledger.insert(order(1, vec![], OrderStatus::Cooking)));
        assert_eq!(ledger.get(1).unwrap().status, OrderStatus::Queued);

        ledger.retire(1);
        assert!(!ledger.insert(order(1, vec![], OrderStatus::Queued)));
    }

    #[test]
    fn test_units_ahead_excludes_ready() {
        let mut ledger = OrderLedger::new();
        ledger.insert(order(
            1,
            vec![CartLine::new("dosa", 5, 0.0)],
            OrderStatus::Ready,
        ));
        ledger.insert(order(
            2,
            vec![CartLine::new("dosa", 2, 0.0), CartLine::new("tea", 1, 0.0)],
            OrderStatus::Cooking,
        ));
        ledger.insert(order(
            3,
            vec![CartLine::new("dosa", 3, 0.0)],
            OrderStatus::Queued,
        ));
        let units = ledger.units_ahead();
        assert_eq!(units["dosa"], 5);
        assert_eq!(units["tea"], 1);
    }

    #[test]
    fn test_retire_is_distinguishable() {
        let mut ledger = OrderLedger::new();
        ledger.insert(order(1, vec![], OrderStatus::Queued));
        ledger.insert(order(2, vec![], OrderStatus::Queued));

        assert!(matches!(ledger.retire(1), Retirement::Removed(_)));
        assert_eq!(ledger.retire(1), Retirement::AlreadyRetired);
        assert_eq!(ledger.retire(99), Retirement::Unknown);
        assert!(ledger.is_retired(1));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.active().map(|o| o.order_id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_retired_ids_are_bounded() {
        let mut ledger = OrderLedger::with_retired_capacity(3);
        for id in 1..=5 {
            ledger.insert(order(id, vec![], OrderStatus::Queued));
            ledger.retire(id);
        }

        assert_eq!(ledger.retired_len(), 3);
        // Oldest completions are forgotten first
        assert_eq!(ledger.retire(1), Retirement::Unknown);
        assert_eq!(ledger.retire(2), Retirement::Unknown);
        assert_eq!(ledger.retire(3), Retirement::AlreadyRetired);
        assert_eq!(ledger.retire(5), Retirement::AlreadyRetired);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_default_capacity() {
        let mut ledger = OrderLedger::new();
        for id in 0..(MAX_RETIRED_IDS as OrderId + 10) {
            ledger.insert(order(id, vec![], OrderStatus::Queued));
            ledger.retire(id);
        }
        assert_eq!(ledger.retired_len(), MAX_RETIRED_IDS);
        assert_eq!(ledger.retire(0), Retirement::Unknown);
    }
}
