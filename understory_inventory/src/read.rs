// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only access shared by owned inventories and borrowed views.

use crate::default::DefaultTracker;
use crate::item::ItemType;

/// Read-only inventory operations.
///
/// Implemented by [`Inventory`](crate::Inventory) and
/// [`InventoryView`](crate::InventoryView). Positions are display positions.
pub trait InventoryRead<T> {
    /// The item descriptor.
    fn item_type(&self) -> &ItemType<T>;

    /// Number of items.
    fn len(&self) -> usize;

    /// The item called `name`.
    fn get(&self, name: &str) -> Option<&T>;

    /// The item at display position `n`.
    fn get_nth(&self, n: usize) -> Option<&T>;

    /// The default item name tracker.
    fn default_tracker(&self) -> &DefaultTracker;

    /// Returns `true` if there are no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an item called `name` exists.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether [`Inventory::new_item`](crate::Inventory::new_item) is available.
    fn can_make_copies(&self) -> bool {
        self.item_type().can_make_copies()
    }

    /// The default item name, whether or not such an item exists.
    fn default_item_name(&self) -> Option<&str> {
        self.default_tracker().name()
    }

    /// The default item, if a default is set and present.
    fn default_item(&self) -> Option<&T> {
        self.default_item_name().and_then(|name| self.get(name))
    }

    /// Look up an item, falling back to the default item and then to the first item.
    ///
    /// Returns `None` only for an empty inventory.
    fn get_or_default(&self, name: Option<&str>) -> Option<&T> {
        name.and_then(|name| self.get(name))
            .or_else(|| self.default_item())
            .or_else(|| self.get_nth(0))
    }

    /// Items with their display positions, in display order.
    fn iter<'a>(&'a self) -> impl Iterator<Item = (usize, &'a T)>
    where
        T: 'a,
    {
        (0..self.len()).filter_map(|n| self.get_nth(n).map(|item| (n, item)))
    }

    /// Call `f` with every item and its display position, in display order.
    ///
    /// `f` must not modify the inventory.
    fn foreach(&self, mut f: impl FnMut(usize, &T)) {
        for (n, item) in self.iter() {
            f(n, item);
        }
    }

    /// The first item, in display order, for which `predicate` holds.
    fn find(&self, mut predicate: impl FnMut(usize, &T) -> bool) -> Option<&T> {
        self.iter()
            .find(|&(n, item)| predicate(n, item))
            .map(|(_, item)| item)
    }
}
