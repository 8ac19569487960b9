// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for inventory operations.

use alloc::string::String;
use core::fmt;

/// An optional capability of an [`ItemType`](crate::ItemType).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Ordering of items (`compare`).
    Compare,
    /// Changing the name of an item in place (`rename`).
    Rename,
    /// Duplicating an item (`copy`).
    Copy,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compare => "compare",
            Self::Rename => "rename",
            Self::Copy => "copy",
        })
    }
}

/// Reasons an inventory operation can fail.
///
/// A failed operation never modifies the inventory.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    /// An item with this name is already present.
    #[error("item `{0}` already exists")]
    Duplicate(String),
    /// No item with this name is present.
    #[error("item `{0}` does not exist")]
    NotFound(String),
    /// A display position past the end of the inventory.
    #[error("position {position} is out of range for {len} items")]
    OutOfRange {
        /// The requested position.
        position: usize,
        /// Number of items at the time of the request.
        len: usize,
    },
    /// The item is marked fixed and cannot be removed or renamed.
    #[error("cannot {action} fixed item `{name}`")]
    Fixed {
        /// Name of the fixed item.
        name: String,
        /// What was attempted, `"delete"` or `"rename"`.
        action: &'static str,
    },
    /// The item type does not provide a capability the operation needs.
    #[error("item type has no {0} function")]
    MissingCapability(Capability),
    /// A new item was requested but there is nothing to copy it from.
    #[error("no item to base a new item on")]
    NoBaseItem,
    /// Every numbered variant of a name is already taken.
    #[error("cannot invent a free name with prefix `{0}`")]
    NamesExhausted(String),
}

/// Error returned when an item cannot be inserted.
///
/// The rejected item is handed back so the caller can retry, for example
/// under a different name.
#[derive(Debug)]
pub struct InsertError<T> {
    /// Why the insertion failed.
    pub error: InventoryError,
    /// The item that was not inserted.
    pub item: T,
}

impl<T> InsertError<T> {
    /// Consumes the error, returning the rejected item.
    pub fn into_item(self) -> T {
        self.item
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<T: fmt::Debug> core::error::Error for InsertError<T> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<InsertError<T>> for InventoryError {
    fn from(err: InsertError<T>) -> Self {
        err.error
    }
}
