// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_inventory --heading-base-level=0

//! Understory Inventory: a named, ordered registry of uniform items.
//!
//! An inventory holds items of one type (gradients, colour maps, presets, units)
//! and indexes them two ways at once:
//!
//! - by **name**, through a hash index built on first lookup;
//! - by **display position**, through a permutation kept separate from storage,
//!   so that a sorted presentation survives constant-time deletion.
//!
//! What an inventory can do with its items is described by an [`ItemType`]: a
//! table of plain functions supplying the name, and optionally ordering,
//! renaming, copying, teardown, a "fixed" predicate, change watching, and a
//! list of typed introspectable fields. [`ItemType::capabilities`] summarizes
//! which of these are present.
//!
//! - [`Inventory`] owns its items, keeps them sorted when the type can compare
//!   them, and reports every change as an [`InventoryEvent`] to subscribers.
//! - [`InventoryView`] is a read-only adaptor over a borrowed slice.
//! - Both implement [`InventoryRead`] for lookups, iteration, and default-item fallback.
//! - [`Inventory::new_item`] copies an existing item under a fresh name from [`invent_name`].
//!
//! Positions passed to or reported by this crate are display positions. Storage
//! order is never exposed.
//!
//! ## Features
//!
//! - `std` *(default)*: enables `std` support in `thiserror` and `tracing`. The crate
//!   itself is `no_std` and needs only `alloc`.
//!
//! # Example
//!
//! ```rust
//! use understory_inventory::{Inventory, InventoryRead, ItemType};
//!
//! #[derive(Clone, Debug)]
//! struct Gradient {
//!     name: String,
//!     stops: Vec<f32>,
//! }
//!
//! fn gradient_name(g: &Gradient) -> &str {
//!     &g.name
//! }
//!
//! let item_type = ItemType::new(gradient_name)
//!     .with_compare(|a, b| a.name.cmp(&b.name))
//!     .with_rename(|g, name| g.name = name.to_string())
//!     .with_copy(Gradient::clone);
//!
//! let mut gradients = Inventory::new(item_type);
//! gradients
//!     .insert(Gradient { name: "Gray".into(), stops: vec![0.0, 1.0] })
//!     .unwrap();
//! gradients.set_default_item_name(Some("Gray"));
//!
//! // Copy the default item under an invented name.
//! let copy = gradients.new_item(None, None).unwrap();
//! assert_eq!(copy.name, "Gray 1");
//!
//! gradients.rename("Gray 1", "Alpha").unwrap();
//! assert_eq!(gradients.get_nth(0).map(|g| g.name.as_str()), Some("Alpha"));
//! assert_eq!(gradients.get_or_default(Some("Missing")).unwrap().name, "Gray");
//! ```

#![no_std]

extern crate alloc;

// Test assertion macros expand to `format!`.
#[cfg(test)]
#[macro_use]
extern crate std;

mod default;
mod error;
mod event;
mod invent;
mod inventory;
mod item;
mod names;
mod order;
mod read;
mod view;
mod watch;

#[cfg(test)]
mod proptests;

pub use default::DefaultTracker;
pub use error::{Capability, InsertError, InventoryError};
pub use event::{InventoryEvent, SubscriptionId};
pub use invent::{MAX_SUFFIX, UNTITLED, invent_name};
pub use inventory::{Inventory, SharedInventory};
pub use item::{Capabilities, ItemTraits, ItemType, TraitField, TraitKind, TraitValue};
pub use read::InventoryRead;
pub use view::InventoryView;
pub use watch::{ItemSignal, Watch, WatchCallback, WatchId};
