//! Notification Emitter
//!
//! Append-only list of order notifications with read flags. Expiry is
//! driven from outside (the manager defers a [`NotificationCenter::remove`]
//! per notification), so this type stays a plain synchronous table that
//! lives under the queue lock.

use shared::models::{Notification, NotificationLevel, OrderId};

#[derive(Debug)]
pub struct NotificationCenter {
    /// Creation order (ids are increasing)
    items: Vec<Notification>,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a notification and return the stored record
    pub fn push(
        &mut self,
        order_id: OrderId,
        message: impl Into<String>,
        severity: NotificationLevel,
        created_at: i64,
    ) -> Notification {
        let notification = Notification {
            id: self.next_id,
            order_id,
            message: message.into(),
            severity,
            created_at,
            read: false,
        };
        self.next_id += 1;
        self.items.push(notification.clone());
        notification
    }

    fn position(&self, id: u64) -> Option<usize> {
        // Ids are pushed in increasing order
        self.items.binary_search_by_key(&id, |n| n.id).ok()
    }

    /// Flip `read`; returns false if the id is gone
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.items[idx].read = true;
                true
            }
            None => false,
        }
    }

    /// Remove one notification (dismiss or expiry)
    pub fn remove(&mut self, id: u64) -> Option<Notification> {
        self.position(id).map(|idx| self.items.remove(idx))
    }

    /// Notifications oldest first, optionally for one order
    pub fn list(&self, order_id: Option<OrderId>) -> Vec<Notification> {
        self.items
            .iter()
            .filter(|n| order_id.is_none_or(|id| n.order_id == id))
            .cloned()
            .collect()
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_increasing_ids() {
        let mut center = NotificationCenter::new();
        let a = center.push(1, "a", NotificationLevel::Info, 10);
        let b = center.push(2, "b", NotificationLevel::Warning, 20);
        assert!(b.id > a.id);
        assert!(!a.read);
        assert_eq!(center.len(), 2);
    }

    #[test]
    fn test_filter_by_order() {
        let mut center = NotificationCenter::new();
        center.push(1, "cooking", NotificationLevel::Info, 10);
        center.push(2, "cooking", NotificationLevel::Info, 11);
        center.push(1, "ready", NotificationLevel::Success, 12);

        let mine = center.list(Some(1));
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].message, "cooking");
        assert_eq!(mine[1].message, "ready");
        assert_eq!(center.list(None).len(), 3);
        assert!(center.list(Some(99)).is_empty());
    }

    #[test]
    fn test_read_and_remove() {
        let mut center = NotificationCenter::new();
        let a = center.push(1, "a", NotificationLevel::Info, 10);
        let b = center.push(1, "b", NotificationLevel::Info, 11);
        assert_eq!(center.unread_count(), 2);

        assert!(center.mark_read(a.id));
        assert_eq!(center.unread_count(), 1);

        assert_eq!(center.remove(b.id).map(|n| n.id), Some(b.id));
        assert!(center.remove(b.id).is_none());
        assert!(!center.mark_read(b.id));
        assert_eq!(center.unread_count(), 0);
        assert_eq!(center.len(), 1);
    }
}
