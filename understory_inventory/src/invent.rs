// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inventing free item names.

use alloc::format;
use alloc::string::String;

use crate::error::InventoryError;

/// Prefix used when there is no name to base a new one on.
pub const UNTITLED: &str = "Untitled";

/// Highest numeric suffix tried by [`invent_name`].
pub const MAX_SUFFIX: u32 = 9999;

/// Find a name for which `taken` returns `false`.
///
/// `base` itself (or [`UNTITLED`] when absent) is returned if free. Otherwise
/// a trailing numeric suffix separated by whitespace is dropped, and
/// `"<prefix> 1"`, `"<prefix> 2"`, … up to [`MAX_SUFFIX`] are tried in turn.
/// A digit run not separated from the rest by whitespace is part of the prefix,
/// so `"Film2"` continues as `"Film2 1"`.
///
/// ```
/// use understory_inventory::invent_name;
///
/// let taken = ["Gray", "Gray 1", "Gray 3"];
/// let free = invent_name(Some("Gray 3"), |n| taken.contains(&n)).unwrap();
/// assert_eq!(free, "Gray 2");
/// ```
pub fn invent_name(
    base: Option<&str>,
    mut taken: impl FnMut(&str) -> bool,
) -> Result<String, InventoryError> {
    let base = base.unwrap_or(UNTITLED);
    if !taken(base) {
        return Ok(base.into());
    }

    let prefix = strip_number_suffix(base);
    for i in 1..=MAX_SUFFIX {
        let candidate = format!("{prefix} {i}");
        if !taken(&candidate) {
            return Ok(candidate);
        }
    }
    tracing::error!(prefix, "no free numbered name left");
    Err(InventoryError::NamesExhausted(prefix.into()))
}

/// `"name 12"` and `"name  12"` become `"name"`; anything else is kept whole.
fn strip_number_suffix(name: &str) -> &str {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.len() == name.len() || !stem.ends_with(|c: char| c.is_ascii_whitespace()) {
        return name;
    }
    stem.trim_end_matches(|c: char| c.is_ascii_whitespace())
}
