// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owned, mutable inventory.

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::cmp::Ordering;
use core::fmt;

use crate::default::DefaultTracker;
use crate::error::{Capability, InsertError, InventoryError};
use crate::event::{ChangeNotifier, InventoryEvent, SubscriptionId};
use crate::invent::invent_name;
use crate::item::ItemType;
use crate::names::NameIndex;
use crate::order::PositionIndex;
use crate::read::InventoryRead;
use crate::watch::{WatchCallback, WatchId};

/// An inventory shared between its owner and the change callbacks of its items.
///
/// See [`Inventory::into_shared`].
pub type SharedInventory<T> = Rc<RefCell<Inventory<T>>>;

struct Slot<T> {
    item: T,
    watch: Option<WatchId>,
}

/// A uniform collection of named items with a display order.
///
/// Items are stored in a vector whose order is an implementation detail:
/// deleting an item moves the last stored item into its place. What callers
/// see is the *display order*, which is either sorted by the item type's
/// `compare` function or follows insertion, and every position taken or
/// reported by this type is a display position.
///
/// Name lookups go through a hash index built on the first lookup. The map
/// from storage to display positions is rebuilt lazily after mutations that
/// shift display positions; methods that need it take `&mut self`.
///
/// Each successful mutation notifies subscribers, see [`InventoryEvent`].
///
/// ## Example
///
/// ```rust
/// use understory_inventory::{Inventory, InventoryEvent, InventoryRead, ItemType};
///
/// #[derive(Clone, Debug)]
/// struct Palette {
///     name: String,
/// }
///
/// fn palette_name(p: &Palette) -> &str {
///     &p.name
/// }
///
/// let item_type = ItemType::new(palette_name).with_compare(|a, b| a.name.cmp(&b.name));
/// let mut palettes = Inventory::new(item_type);
///
/// let events = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
/// let sink = events.clone();
/// palettes.subscribe(move |event| sink.borrow_mut().push(event.clone()));
///
/// for name in ["Rainbow", "Gray", "Spectral"] {
///     palettes.insert(Palette { name: name.into() }).unwrap();
/// }
///
/// let names: Vec<_> = palettes.iter().map(|(_, p)| p.name.as_str()).collect();
/// assert_eq!(names, ["Gray", "Rainbow", "Spectral"]);
/// assert_eq!(palettes.position("Rainbow"), Some(1));
/// assert_eq!(
///     *events.borrow(),
///     [
///         InventoryEvent::Inserted(0),
///         InventoryEvent::Inserted(0),
///         InventoryEvent::Inserted(2),
///     ]
/// );
/// ```
pub struct Inventory<T> {
    item_type: ItemType<T>,
    slots: Vec<Slot<T>>,
    names: NameIndex,
    order: PositionIndex,
    is_sorted: bool,
    default: DefaultTracker,
    notifier: ChangeNotifier,
    watcher: Option<WatchCallback>,
}

impl<T> fmt::Debug for Inventory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inventory")
            .field("item_type", &self.item_type)
            .field("items", &self.slots.len())
            .field("is_sorted", &self.is_sorted)
            .field("default", &self.default.name())
            .field("notifier", &self.notifier)
            .field("watched", &self.watcher.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> Inventory<T> {
    /// Create an empty inventory.
    ///
    /// It is sorted if the item type has a `compare` function.
    pub fn new(item_type: ItemType<T>) -> Self {
        Self {
            is_sorted: item_type.compare_fn().is_some(),
            item_type,
            slots: Vec::new(),
            names: NameIndex::new(),
            order: PositionIndex::default(),
            default: DefaultTracker::default(),
            notifier: ChangeNotifier::default(),
            watcher: None,
        }
    }

    /// Create an inventory holding `items`, shown in the given order.
    ///
    /// The inventory is sorted if the item type has a `compare` function and
    /// `items` are strictly increasing under it. Fails on the first item whose
    /// name is already taken by an earlier one; that item is handed back and
    /// the rest are dropped.
    pub fn new_filled(
        item_type: ItemType<T>,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Self, InsertError<T>> {
        let mut inventory = Self::new(item_type);
        for item in items {
            let name = item_type.name(&item);
            if inventory.lookup(name).is_some() {
                tracing::warn!(name, "duplicate item in initial contents");
                let error = InventoryError::Duplicate(name.to_owned());
                return Err(InsertError { error, item });
            }
            let storage = inventory.slots.len();
            inventory.names.insert(name, storage);
            inventory.order.append();
            inventory.slots.push(Slot { item, watch: None });
        }
        inventory.is_sorted =
            item_type.is_strictly_sorted(inventory.slots.iter().map(|slot| &slot.item));
        Ok(inventory)
    }

    /// Whether the display order currently follows `compare`.
    pub fn is_sorted(&self) -> bool {
        self.is_sorted
    }

    /// Display position of the item called `name`.
    pub fn position(&mut self, name: &str) -> Option<usize> {
        let storage = self.lookup(name)?;
        Some(self.order.display_of(storage))
    }

    /// Register a callback for every change event.
    ///
    /// The callback runs synchronously inside the mutating call and must not
    /// access this inventory.
    pub fn subscribe(&mut self, callback: impl FnMut(&InventoryEvent) + 'static) -> SubscriptionId {
        self.notifier.subscribe(Box::new(callback))
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Set or clear the default item name.
    ///
    /// Emits [`InventoryEvent::DefaultChanged`] if the name changed. The name
    /// need not belong to an existing item.
    pub fn set_default_item_name(&mut self, name: Option<&str>) {
        if self.default.set(name) {
            self.notifier.emit(InventoryEvent::DefaultChanged);
        }
    }

    /// Announce that the item called `name` changed.
    pub fn item_updated(&mut self, name: &str) -> Result<(), InventoryError> {
        let storage = self.lookup(name).ok_or_else(|| not_found(name))?;
        self.emit_updated(storage);
        Ok(())
    }

    /// Announce that the item at display position `n` changed.
    pub fn nth_item_updated(&mut self, n: usize) -> Result<(), InventoryError> {
        if n >= self.slots.len() {
            return Err(self.out_of_range(n));
        }
        self.notifier.emit(InventoryEvent::Updated(n));
        Ok(())
    }

    /// Modify the item called `name` in place and announce the change.
    ///
    /// `f` must not change the name of the item; use [`Inventory::rename`] for that.
    /// The display order is left as is even if `f` changes how the item sorts.
    pub fn update_with(&mut self, name: &str, f: impl FnOnce(&mut T)) -> Result<(), InventoryError> {
        let storage = self.lookup(name).ok_or_else(|| not_found(name))?;
        f(&mut self.slots[storage].item);
        debug_assert_eq!(
            self.item_type.name(&self.slots[storage].item),
            name,
            "update_with must not rename items"
        );
        self.emit_updated(storage);
        Ok(())
    }

    /// Sort the display order with `compare` if it is not sorted already.
    ///
    /// Emits a single [`InventoryEvent::Reordered`]. Does nothing if the item
    /// type has no `compare` function.
    pub fn restore_order(&mut self) {
        if self.is_sorted {
            return;
        }
        let Some(compare) = self.item_type.compare_fn() else {
            return;
        };
        let slots = &self.slots;
        let new_order = self
            .order
            .sort_by(|a, b| compare(&slots[a].item, &slots[b].item));
        self.is_sorted = true;
        self.notifier.emit(InventoryEvent::Reordered(new_order));
    }

    /// Stop keeping the display order sorted.
    ///
    /// Nothing moves; subsequent insertions append.
    pub fn forget_order(&mut self) {
        self.is_sorted = false;
    }

    /// Insert an item, at its sorted position or at the end.
    ///
    /// Returns its display position. Fails if an item of the same name exists;
    /// the item is handed back in the error.
    pub fn insert(&mut self, item: T) -> Result<usize, InsertError<T>> {
        self.insert_real(item, None).map(|(_, display)| display)
    }

    /// Insert an item at display position `n` (at most [`len`](InventoryRead::len)).
    ///
    /// If the item does not sort between its new neighbors, the inventory
    /// stops being sorted.
    pub fn insert_nth(&mut self, item: T, n: usize) -> Result<usize, InsertError<T>> {
        if n > self.slots.len() {
            let error = self.out_of_range(n);
            return Err(InsertError { error, item });
        }
        self.insert_real(item, Some(n)).map(|(_, display)| display)
    }

    /// Remove the item called `name` and return it.
    pub fn delete(&mut self, name: &str) -> Result<T, InventoryError> {
        let storage = self.lookup(name).ok_or_else(|| not_found(name))?;
        self.delete_real(storage)
    }

    /// Remove the item at display position `n` and return it.
    pub fn delete_nth(&mut self, n: usize) -> Result<T, InventoryError> {
        let storage = self
            .order
            .storage_at(n)
            .ok_or_else(|| self.out_of_range(n))?;
        self.delete_real(storage)
    }

    /// Rename the item called `name` to `new_name`.
    ///
    /// Renaming an item to its own name does nothing. A rename that moves the
    /// item out of sort order re-sorts the inventory, emitting
    /// [`InventoryEvent::Reordered`] before [`InventoryEvent::Updated`].
    pub fn rename(&mut self, name: &str, new_name: &str) -> Result<&T, InventoryError> {
        let Some(rename) = self.item_type.rename_fn() else {
            return Err(InventoryError::MissingCapability(Capability::Rename));
        };
        let storage = self.lookup(name).ok_or_else(|| not_found(name))?;
        if self.item_type.is_fixed(&self.slots[storage].item) {
            tracing::warn!(name, "cannot rename fixed item");
            return Err(InventoryError::Fixed {
                name: name.to_owned(),
                action: "rename",
            });
        }
        if name == new_name {
            return Ok(&self.slots[storage].item);
        }
        if self.lookup(new_name).is_some() {
            tracing::warn!(name = new_name, "item already exists");
            return Err(InventoryError::Duplicate(new_name.to_owned()));
        }

        rename(&mut self.slots[storage].item, new_name);
        debug_assert_eq!(
            self.item_type.name(&self.slots[storage].item),
            new_name,
            "rename function did not apply the new name"
        );
        self.names.reassign(name, new_name, storage);

        if self.is_sorted && !self.is_in_order(storage) {
            self.is_sorted = false;
            self.restore_order();
        }
        self.emit_updated(storage);
        if self.default.is_default(name) || self.default.is_default(new_name) {
            self.notifier.emit(InventoryEvent::DefaultChanged);
        }
        Ok(&self.slots[storage].item)
    }

    /// Insert a copy of an existing item under a new name.
    ///
    /// The copy is based on the item called `base`, or else the default item,
    /// or else the first item. It is called `new_name` if that is free;
    /// otherwise a free name is invented from `new_name` or, when absent,
    /// from the base item's name (see [`invent_name`]).
    ///
    /// Requires the item type to have both `copy` and `rename` functions.
    pub fn new_item(&mut self, base: Option<&str>, new_name: Option<&str>) -> Result<&T, InventoryError> {
        let Some(rename) = self.item_type.rename_fn() else {
            return Err(InventoryError::MissingCapability(Capability::Rename));
        };
        let Some(copy) = self.item_type.copy_fn() else {
            return Err(InventoryError::MissingCapability(Capability::Copy));
        };
        let Some(base) = base
            .and_then(|name| self.lookup(name))
            .or_else(|| self.default.name().and_then(|name| self.lookup(name)))
            .or_else(|| self.order.storage_at(0))
        else {
            tracing::warn!("no item to base a new item on");
            return Err(InventoryError::NoBaseItem);
        };

        let base_item = &self.slots[base].item;
        let taken = |candidate: &str| self.lookup(candidate).is_some();
        let name = match new_name {
            Some(name) if !taken(name) => name.to_owned(),
            Some(name) => invent_name(Some(name), taken)?,
            None => invent_name(Some(self.item_type.name(base_item)), taken)?,
        };
        let mut item = copy(base_item);
        rename(&mut item, &name);

        let (storage, _) = self.insert_real(item, None)?;
        Ok(&self.slots[storage].item)
    }

    /// Share the inventory so that watchable items can report their own changes.
    ///
    /// Every item, and every item inserted later, is connected through the
    /// item type's [`Watch`](crate::Watch); when an item calls its callback the
    /// inventory emits [`InventoryEvent::Updated`] for it. Items are
    /// disconnected when deleted and when the inventory is dropped.
    ///
    /// An item reporting a change while the inventory is borrowed (for example
    /// from inside [`Inventory::update_with`]) is ignored with a warning.
    pub fn into_shared(mut self) -> SharedInventory<T>
    where
        T: 'static,
    {
        Rc::new_cyclic(|weak: &Weak<RefCell<Self>>| {
            if self.item_type.watch().is_some() {
                let weak = weak.clone();
                self.watcher = Some(Rc::new(move |name: &str| {
                    let Some(shared) = weak.upgrade() else {
                        return;
                    };
                    let Ok(mut inventory) = shared.try_borrow_mut() else {
                        tracing::warn!(name, "item changed while its inventory is in use");
                        return;
                    };
                    // A failed lookup is already logged.
                    let _ = inventory.item_updated(name);
                }));
                for slot in &mut self.slots {
                    if slot.watch.is_none() {
                        slot.watch = Self::connect(&self.item_type, self.watcher.as_ref(), &slot.item);
                    }
                }
            }
            RefCell::new(self)
        })
    }

    fn lookup(&self, name: &str) -> Option<usize> {
        let item_type = &self.item_type;
        self.names
            .lookup(name, || self.slots.iter().map(|slot| item_type.name(&slot.item)))
    }

    fn insert_real(&mut self, item: T, at: Option<usize>) -> Result<(usize, usize), InsertError<T>> {
        let name = self.item_type.name(&item);
        if self.lookup(name).is_some() {
            tracing::warn!(name, "item already exists");
            let error = InventoryError::Duplicate(name.to_owned());
            return Err(InsertError { error, item });
        }

        let storage = self.slots.len();
        let compare = self.item_type.compare_fn().filter(|_| self.is_sorted);
        let position = match (at, compare) {
            (Some(n), _) => {
                self.order.insert_at(n);
                n
            }
            (None, Some(compare)) => {
                let slots = &self.slots;
                let n = self
                    .order
                    .sorted_insertion_point(|s| compare(&item, &slots[s].item));
                self.order.insert_at(n);
                n
            }
            (None, None) => self.order.append(),
        };
        self.names.insert(name, storage);
        let is_default = self.default.is_default(name);
        let watch = Self::connect(&self.item_type, self.watcher.as_ref(), &item);
        self.slots.push(Slot { item, watch });

        if at.is_some() && self.is_sorted && !self.is_in_order(storage) {
            self.is_sorted = false;
        }
        tracing::debug!(storage, position, "inserted item");
        self.notifier.emit(InventoryEvent::Inserted(position));
        if is_default {
            self.notifier.emit(InventoryEvent::DefaultChanged);
        }
        Ok((storage, position))
    }

    fn delete_real(&mut self, storage: usize) -> Result<T, InventoryError> {
        let name = self.item_type.name(&self.slots[storage].item);
        if self.item_type.is_fixed(&self.slots[storage].item) {
            tracing::warn!(name, "cannot delete fixed item");
            return Err(InventoryError::Fixed {
                name: name.to_owned(),
                action: "delete",
            });
        }
        let was_default = self.default.is_default(name);
        self.names.remove(name);

        let slot = &mut self.slots[storage];
        if let (Some(watch), Some(id)) = (self.item_type.watch(), slot.watch.take()) {
            (watch.disconnect)(&slot.item, id);
        }
        if let Some(dismantle) = self.item_type.dismantle_fn() {
            dismantle(&mut slot.item);
        }

        let position = self.order.swap_remove(storage);
        let removed = self.slots.swap_remove(storage);
        if let Some(moved) = self.slots.get(storage) {
            self.names
                .reassign_position(self.item_type.name(&moved.item), storage);
        }

        tracing::debug!(storage, position, "deleted item");
        self.notifier.emit(InventoryEvent::Deleted(position));
        if was_default {
            self.notifier.emit(InventoryEvent::DefaultChanged);
        }
        Ok(removed.item)
    }

    /// Whether the item at `storage` sorts between its display neighbors.
    fn is_in_order(&mut self, storage: usize) -> bool {
        let Some(compare) = self.item_type.compare_fn() else {
            return true;
        };
        let display = self.order.display_of(storage);
        let item = &self.slots[storage].item;
        let before = display
            .checked_sub(1)
            .and_then(|d| self.order.storage_at(d));
        let after = self.order.storage_at(display + 1);
        !(before.is_some_and(|s| compare(item, &self.slots[s].item) == Ordering::Less)
            || after.is_some_and(|s| compare(item, &self.slots[s].item) == Ordering::Greater))
    }

    fn emit_updated(&mut self, storage: usize) {
        let display = self.order.display_of(storage);
        self.notifier.emit(InventoryEvent::Updated(display));
    }

    fn connect(item_type: &ItemType<T>, watcher: Option<&WatchCallback>, item: &T) -> Option<WatchId> {
        let watch = item_type.watch()?;
        let callback = watcher?.clone();
        Some((watch.connect)(item, callback))
    }

    fn out_of_range(&self, position: usize) -> InventoryError {
        tracing::warn!(position, len = self.slots.len(), "position out of range");
        InventoryError::OutOfRange {
            position,
            len: self.slots.len(),
        }
    }

    /// Check the cross-index invariants.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&mut self) {
        assert_eq!(self.order.len(), self.slots.len());
        assert!(self.order.is_consistent(), "idx and ridx are not inverse");
        for storage in 0..self.slots.len() {
            let name = self.item_type.name(&self.slots[storage].item);
            assert_eq!(self.lookup(name), Some(storage), "name index is stale for `{name}`");
        }
        if self.is_sorted {
            let compare = self.item_type.compare_fn().unwrap();
            let shown: Vec<&T> = self.iter().map(|(_, item)| item).collect();
            assert!(
                shown.windows(2).all(|w| compare(w[0], w[1]) != Ordering::Greater),
                "sorted inventory is out of order"
            );
        }
    }
}

impl<T> InventoryRead<T> for Inventory<T> {
    fn item_type(&self) -> &ItemType<T> {
        &self.item_type
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, name: &str) -> Option<&T> {
        self.lookup(name).map(|storage| &self.slots[storage].item)
    }

    fn get_nth(&self, n: usize) -> Option<&T> {
        self.order
            .storage_at(n)
            .map(|storage| &self.slots[storage].item)
    }

    fn default_tracker(&self) -> &DefaultTracker {
        &self.default
    }
}

impl<T> Drop for Inventory<T> {
    fn drop(&mut self) {
        let Some(watch) = self.item_type.watch() else {
            return;
        };
        for slot in &mut self.slots {
            if let Some(id) = slot.watch.take() {
                (watch.disconnect)(&slot.item, id);
            }
        }
    }
}

fn not_found(name: &str) -> InventoryError {
    tracing::warn!(name, "item does not exist");
    InventoryError::NotFound(name.to_owned())
}
