// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item descriptors: how an inventory names, orders, copies, and inspects its items.

use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;

use crate::watch::Watch;

bitflags::bitflags! {
    /// Summary of the optional functions an [`ItemType`] provides.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Items can be ordered; inventories start out sorted.
        const COMPARE   = 0b0000_0001;
        /// Items can be renamed in place.
        const RENAME    = 0b0000_0010;
        /// Items can be duplicated.
        const COPY      = 0b0000_0100;
        /// Items are torn down before removal.
        const DISMANTLE = 0b0000_1000;
        /// Some items may be marked fixed (not removable, not renamable).
        const FIXED     = 0b0001_0000;
        /// Items announce their own changes.
        const WATCH     = 0b0010_0000;
        /// Items expose named trait values for generic introspection.
        const TRAITS    = 0b0100_0000;
    }
}

/// Kind of value a trait field holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TraitKind {
    /// A boolean flag.
    Bool,
    /// A signed integer.
    Int,
    /// A floating-point number.
    Float,
    /// A string.
    Str,
}

/// Value of a single trait field of an item.
#[derive(Clone, Debug, PartialEq)]
pub enum TraitValue {
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Str(String),
}

impl TraitValue {
    /// The kind of this value.
    pub const fn kind(&self) -> TraitKind {
        match self {
            Self::Bool(_) => TraitKind::Bool,
            Self::Int(_) => TraitKind::Int,
            Self::Float(_) => TraitKind::Float,
            Self::Str(_) => TraitKind::Str,
        }
    }
}

/// A named, typed column of item data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TraitField {
    /// Field name, e.g. for a list view column header.
    pub name: &'static str,
    /// Kind of the values [`ItemTraits::value`] returns for this field.
    pub kind: TraitKind,
}

/// Generic introspection of items, field by field.
pub struct ItemTraits<T> {
    /// The fields, in column order.
    pub fields: &'static [TraitField],
    /// Returns the value of field `i` of an item.
    ///
    /// Only called with `i < fields.len()`, and must return a value of kind `fields[i].kind`.
    pub value: fn(&T, usize) -> TraitValue,
}

impl<T> Clone for ItemTraits<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ItemTraits<T> {}

impl<T> fmt::Debug for ItemTraits<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemTraits")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Describes how an inventory treats items of type `T`.
///
/// Only the name accessor is mandatory. Every other function is optional and
/// enables the corresponding inventory behavior:
///
/// - `compare`: inventories keep items sorted, see [`Inventory::restore_order`].
/// - `rename`: [`Inventory::rename`].
/// - `copy` (together with `rename`): [`Inventory::new_item`].
/// - `dismantle`: called on an item right before it is removed.
/// - `is_fixed`: fixed items cannot be deleted or renamed.
/// - `watch`: items announce their own changes, see [`Watch`].
/// - `traits`: field-wise introspection, see [`ItemTraits`].
///
/// The name of an item must only change through [`Inventory::rename`]; the
/// inventory indexes items by name.
///
/// [`Inventory::restore_order`]: crate::Inventory::restore_order
/// [`Inventory::rename`]: crate::Inventory::rename
/// [`Inventory::new_item`]: crate::Inventory::new_item
pub struct ItemType<T> {
    get_name: fn(&T) -> &str,
    compare: Option<fn(&T, &T) -> Ordering>,
    rename: Option<fn(&mut T, &str)>,
    copy: Option<fn(&T) -> T>,
    dismantle: Option<fn(&mut T)>,
    is_fixed: Option<fn(&T) -> bool>,
    watch: Option<Watch<T>>,
    traits: Option<ItemTraits<T>>,
}

impl<T> Clone for ItemType<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ItemType<T> {}

impl<T> fmt::Debug for ItemType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemType")
            .field("capabilities", &self.capabilities())
            .field("traits", &self.traits)
            .finish_non_exhaustive()
    }
}

impl<T> ItemType<T> {
    /// Create a descriptor with only a name accessor.
    pub const fn new(get_name: fn(&T) -> &str) -> Self {
        Self {
            get_name,
            compare: None,
            rename: None,
            copy: None,
            dismantle: None,
            is_fixed: None,
            watch: None,
            traits: None,
        }
    }

    /// Set the ordering function.
    pub fn with_compare(mut self, compare: fn(&T, &T) -> Ordering) -> Self {
        self.compare = Some(compare);
        self
    }

    /// Set the in-place rename function.
    pub fn with_rename(mut self, rename: fn(&mut T, &str)) -> Self {
        self.rename = Some(rename);
        self
    }

    /// Set the copy function.
    pub fn with_copy(mut self, copy: fn(&T) -> T) -> Self {
        self.copy = Some(copy);
        self
    }

    /// Set the function run on an item right before it is removed.
    pub fn with_dismantle(mut self, dismantle: fn(&mut T)) -> Self {
        self.dismantle = Some(dismantle);
        self
    }

    /// Set the predicate marking items that cannot be deleted or renamed.
    pub fn with_is_fixed(mut self, is_fixed: fn(&T) -> bool) -> Self {
        self.is_fixed = Some(is_fixed);
        self
    }

    /// Make items watchable.
    ///
    /// Only shared inventories connect to their items, see
    /// [`Inventory::into_shared`](crate::Inventory::into_shared). A plain
    /// [`Inventory`](crate::Inventory) ignores the watch and relies on
    /// [`Inventory::item_updated`](crate::Inventory::item_updated).
    pub fn with_watch(mut self, watch: Watch<T>) -> Self {
        self.watch = Some(watch);
        self
    }

    /// Set the introspection table.
    pub fn with_traits(mut self, traits: ItemTraits<T>) -> Self {
        self.traits = Some(traits);
        self
    }

    /// The optional functions this descriptor provides.
    pub fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::COMPARE, self.compare.is_some());
        caps.set(Capabilities::RENAME, self.rename.is_some());
        caps.set(Capabilities::COPY, self.copy.is_some());
        caps.set(Capabilities::DISMANTLE, self.dismantle.is_some());
        caps.set(Capabilities::FIXED, self.is_fixed.is_some());
        caps.set(Capabilities::WATCH, self.watch.is_some());
        caps.set(Capabilities::TRAITS, self.traits.is_some());
        caps
    }

    /// Whether new items can be made by copying existing ones.
    pub fn can_make_copies(&self) -> bool {
        self.capabilities()
            .contains(Capabilities::RENAME | Capabilities::COPY)
    }

    /// The name of an item.
    #[inline]
    pub fn name<'a>(&self, item: &'a T) -> &'a str {
        (self.get_name)(item)
    }

    /// Compare two items, if the type is ordered.
    #[inline]
    pub fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        self.compare.map(|compare| compare(a, b))
    }

    /// Whether an item is fixed. Items are never fixed without an `is_fixed` function.
    #[inline]
    pub fn is_fixed(&self, item: &T) -> bool {
        self.is_fixed.is_some_and(|is_fixed| is_fixed(item))
    }

    /// Number of introspection fields (zero without a trait table).
    pub fn trait_count(&self) -> usize {
        self.traits.map_or(0, |traits| traits.fields.len())
    }

    /// Name of introspection field `i`.
    pub fn trait_name(&self, i: usize) -> Option<&'static str> {
        self.trait_field(i).map(|field| field.name)
    }

    /// Kind of introspection field `i`.
    pub fn trait_kind(&self, i: usize) -> Option<TraitKind> {
        self.trait_field(i).map(|field| field.kind)
    }

    /// Value of introspection field `i` of `item`.
    pub fn trait_value(&self, item: &T, i: usize) -> Option<TraitValue> {
        let traits = self.traits?;
        let field = traits.fields.get(i)?;
        let value = (traits.value)(item, i);
        debug_assert_eq!(
            value.kind(),
            field.kind,
            "trait `{}` returned a value of the wrong kind",
            field.name
        );
        Some(value)
    }

    fn trait_field(&self, i: usize) -> Option<&'static TraitField> {
        self.traits.and_then(|traits| traits.fields.get(i))
    }

    pub(crate) fn compare_fn(&self) -> Option<fn(&T, &T) -> Ordering> {
        self.compare
    }

    pub(crate) fn rename_fn(&self) -> Option<fn(&mut T, &str)> {
        self.rename
    }

    pub(crate) fn copy_fn(&self) -> Option<fn(&T) -> T> {
        self.copy
    }

    pub(crate) fn dismantle_fn(&self) -> Option<fn(&mut T)> {
        self.dismantle
    }

    pub(crate) fn watch(&self) -> Option<Watch<T>> {
        self.watch
    }

    /// Whether `items` is strictly increasing under `compare`.
    ///
    /// Types without `compare` are never sorted.
    pub(crate) fn is_strictly_sorted<'a>(&self, mut items: impl Iterator<Item = &'a T>) -> bool
    where
        T: 'a,
    {
        let Some(compare) = self.compare else {
            return false;
        };
        let Some(mut prev) = items.next() else {
            return true;
        };
        for item in items {
            if compare(prev, item) != Ordering::Less {
                return false;
            }
            prev = item;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[derive(Clone, Debug)]
    struct Pen {
        name: String,
        width: i64,
    }

    const PEN_FIELDS: &[TraitField] = &[
        TraitField {
            name: "name",
            kind: TraitKind::Str,
        },
        TraitField {
            name: "width",
            kind: TraitKind::Int,
        },
    ];

    fn pen_trait(pen: &Pen, i: usize) -> TraitValue {
        match i {
            0 => TraitValue::Str(pen.name.clone()),
            _ => TraitValue::Int(pen.width),
        }
    }

    fn pen_name(pen: &Pen) -> &str {
        &pen.name
    }

    fn pen(name: &str, width: i64) -> Pen {
        Pen {
            name: name.to_string(),
            width,
        }
    }

    #[test]
    fn capabilities_follow_builder() {
        let plain = ItemType::new(pen_name);
        assert_eq!(plain.capabilities(), Capabilities::empty());
        assert!(!plain.can_make_copies());

        let full = plain
            .with_compare(|a, b| a.name.cmp(&b.name))
            .with_rename(|p, n| p.name = n.to_string())
            .with_copy(Clone::clone);
        assert!(full.capabilities().contains(Capabilities::COMPARE));
        assert!(!full.capabilities().contains(Capabilities::WATCH));
        assert!(full.can_make_copies());
    }

    #[test]
    fn fixed_defaults_to_false() {
        let ty = ItemType::new(pen_name);
        assert!(!ty.is_fixed(&pen("a", 1)));
        let ty = ty.with_is_fixed(|p| p.width == 0);
        assert!(ty.is_fixed(&pen("a", 0)));
        assert!(!ty.is_fixed(&pen("a", 1)));
    }

    #[test]
    fn trait_introspection() {
        let ty = ItemType::new(pen_name).with_traits(ItemTraits {
            fields: PEN_FIELDS,
            value: pen_trait,
        });
        assert_eq!(ty.trait_count(), 2);
        assert_eq!(ty.trait_name(1), Some("width"));
        assert_eq!(ty.trait_kind(0), Some(TraitKind::Str));
        assert_eq!(ty.trait_value(&pen("a", 3), 1), Some(TraitValue::Int(3)));
        assert_eq!(ty.trait_value(&pen("a", 3), 2), None);

        let bare = ItemType::new(pen_name);
        assert_eq!(bare.trait_count(), 0);
        assert_eq!(bare.trait_name(0), None);
    }

    #[test]
    fn strict_sortedness_probe() {
        let ty = ItemType::new(pen_name).with_compare(|a, b| a.name.cmp(&b.name));
        let sorted = [pen("a", 0), pen("b", 0), pen("c", 0)];
        let dup = [pen("a", 0), pen("a", 0)];
        let unsorted = [pen("b", 0), pen("a", 0)];
        assert!(ty.is_strictly_sorted(sorted.iter()));
        assert!(ty.is_strictly_sorted([].iter()));
        assert!(!ty.is_strictly_sorted(dup.iter()));
        assert!(!ty.is_strictly_sorted(unsorted.iter()));

        let unordered = ItemType::new(pen_name);
        assert!(!unordered.is_strictly_sorted(sorted.iter()));
    }
}
