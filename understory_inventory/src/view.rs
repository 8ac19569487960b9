// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Borrowed, read-only inventories over caller-owned arrays.

use crate::default::DefaultTracker;
use crate::item::ItemType;
use crate::names::NameIndex;
use crate::read::InventoryRead;

/// A read-only inventory adaptor over a borrowed slice.
///
/// Items are shown in slice order; the view is never sorted and has no
/// mutation operations. Name lookups are indexed like in
/// [`Inventory`](crate::Inventory).
///
/// ```rust
/// use understory_inventory::{InventoryRead, InventoryView, ItemType};
///
/// struct Unit {
///     name: &'static str,
///     factor: f64,
/// }
///
/// fn unit_name(unit: &Unit) -> &str {
///     unit.name
/// }
///
/// static UNITS: [Unit; 2] = [
///     Unit { name: "nm", factor: 1e-9 },
///     Unit { name: "µm", factor: 1e-6 },
/// ];
///
/// let view = InventoryView::new(ItemType::new(unit_name), &UNITS);
/// assert_eq!(view.len(), 2);
/// assert_eq!(view.get("µm").map(|u| u.factor), Some(1e-6));
/// assert_eq!(view.position("nm"), Some(0));
/// ```
#[derive(Debug)]
pub struct InventoryView<'a, T> {
    item_type: ItemType<T>,
    items: &'a [T],
    names: NameIndex,
    default: DefaultTracker,
}

impl<'a, T> InventoryView<'a, T> {
    /// Create a view over `items`.
    ///
    /// Names must be unique within `items`; for duplicates, lookups find the last one.
    pub fn new(item_type: ItemType<T>, items: &'a [T]) -> Self {
        Self {
            item_type,
            items,
            names: NameIndex::new(),
            default: DefaultTracker::default(),
        }
    }

    /// Set or clear the default item name.
    ///
    /// Returns whether the default changed.
    pub fn set_default_item_name(&mut self, name: Option<&str>) -> bool {
        self.default.set(name)
    }

    /// Position of the item called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        let get_name = |item: &'a T| self.item_type.name(item);
        self.names.lookup(name, || self.items.iter().map(get_name))
    }

    /// The underlying slice.
    pub fn as_slice(&self) -> &'a [T] {
        self.items
    }
}

impl<T> InventoryRead<T> for InventoryView<'_, T> {
    fn item_type(&self) -> &ItemType<T> {
        &self.item_type
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, name: &str) -> Option<&T> {
        self.position(name).map(|pos| &self.items[pos])
    }

    fn get_nth(&self, n: usize) -> Option<&T> {
        self.items.get(n)
    }

    fn default_tracker(&self) -> &DefaultTracker {
        &self.default
    }
}
