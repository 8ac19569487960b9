// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change events and their subscribers.
//!
//! Every successful mutation of an [`Inventory`](crate::Inventory) emits its
//! events synchronously, before the mutating call returns. Positions are
//! display positions, valid at the moment the event is delivered:
//!
//! - [`InventoryEvent::Inserted`] carries the position the new item now has.
//! - [`InventoryEvent::Deleted`] carries the position the item had.
//! - [`InventoryEvent::Reordered`] carries `new_order[new_position] == old_position`,
//!   the same convention list models such as GTK's `GtkTreeModel` use.
//!
//! Subscribers must not mutate the inventory that notifies them.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

/// A change to an inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InventoryEvent {
    /// An item was inserted at this display position.
    Inserted(usize),
    /// The item at this display position was deleted.
    Deleted(usize),
    /// The item at this display position changed.
    Updated(usize),
    /// Items were reordered; `new_order[new_position] == old_position`.
    Reordered(Vec<usize>),
    /// The default item name changed, or an item of that name appeared or disappeared.
    DefaultChanged,
}

/// Handle returned by [`Inventory::subscribe`](crate::Inventory::subscribe).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&InventoryEvent)>;

/// Fan-out of events to subscribers, in subscription order.
#[derive(Default)]
pub(crate) struct ChangeNotifier {
    subscribers: SmallVec<[(SubscriptionId, Subscriber); 2]>,
    next_id: u64,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl ChangeNotifier {
    pub(crate) fn subscribe(&mut self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(i) = self.subscribers.iter().position(|(s, _)| *s == id) else {
            return false;
        };
        drop(self.subscribers.remove(i));
        true
    }

    pub(crate) fn emit(&mut self, event: InventoryEvent) {
        tracing::trace!(?event, "inventory event");
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[test]
    fn delivers_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::default();
        for tag in 0..3 {
            let log = log.clone();
            notifier.subscribe(Box::new(move |event: &InventoryEvent| {
                log.borrow_mut().push((tag, event.clone()));
            }));
        }
        notifier.emit(InventoryEvent::Inserted(4));
        assert_eq!(
            *log.borrow(),
            vec![
                (0, InventoryEvent::Inserted(4)),
                (1, InventoryEvent::Inserted(4)),
                (2, InventoryEvent::Inserted(4)),
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut notifier = ChangeNotifier::default();
        let c = count.clone();
        let id = notifier.subscribe(Box::new(move |_: &InventoryEvent| *c.borrow_mut() += 1));
        notifier.emit(InventoryEvent::DefaultChanged);
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.emit(InventoryEvent::DefaultChanged);
        assert_eq!(*count.borrow(), 1);
    }
}
