// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Watchable items: items that announce their own changes.
//!
//! An item type opts in by providing a [`Watch`] in its [`ItemType`](crate::ItemType).
//! A shared inventory (see [`Inventory::into_shared`](crate::Inventory::into_shared))
//! connects a [`WatchCallback`] to every item it holds, and turns each call into an
//! [`InventoryEvent::Updated`](crate::InventoryEvent::Updated) for that item.
//!
//! Items whose state changes through interior mutability typically embed an
//! [`ItemSignal`] and call [`ItemSignal::emit`] after each change.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

/// Callback an item calls with its current name whenever it changes.
pub type WatchCallback = Rc<dyn Fn(&str)>;

/// Identifies one connection made through [`Watch::connect`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// Connects and disconnects change callbacks on individual items.
pub struct Watch<T> {
    /// Attach a callback to an item; the item must call it after each change.
    pub connect: fn(&T, WatchCallback) -> WatchId,
    /// Detach a callback previously attached with `connect`.
    pub disconnect: fn(&T, WatchId),
}

impl<T> Clone for Watch<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Watch<T> {}

impl<T> fmt::Debug for Watch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watch").finish_non_exhaustive()
    }
}

/// A single-threaded change signal for embedding in item types.
///
/// Cloning an `ItemSignal` yields a signal without connections, so copies of
/// an item are not watched until they are inserted somewhere themselves.
#[derive(Default)]
pub struct ItemSignal {
    handlers: RefCell<SmallVec<[(WatchId, WatchCallback); 1]>>,
    next_id: Cell<u64>,
}

impl ItemSignal {
    /// Create a signal with no connections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a callback.
    pub fn connect(&self, callback: WatchCallback) -> WatchId {
        let id = WatchId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, callback));
        id
    }

    /// Detach a callback. Returns `false` if `id` was not connected.
    pub fn disconnect(&self, id: WatchId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let Some(i) = handlers.iter().position(|(h, _)| *h == id) else {
            return false;
        };
        handlers.remove(i);
        true
    }

    /// Number of attached callbacks.
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Call every attached callback with the item's current name.
    ///
    /// Callbacks may connect or disconnect while the signal is emitted; the
    /// set of callbacks called is the one attached when `emit` started.
    pub fn emit(&self, name: &str) {
        let callbacks: SmallVec<[WatchCallback; 1]> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback(name);
        }
    }
}

impl Clone for ItemSignal {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for ItemSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemSignal")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
