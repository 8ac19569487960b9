// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Name index: item name to storage position.

use alloc::borrow::ToOwned;
use alloc::string::String;
use core::cell::OnceCell;

use hashbrown::HashMap;

/// Map from item name to storage position.
///
/// The map is built on the first lookup, in one pass over the stored names,
/// and maintained incrementally afterwards. Maintenance calls made before the
/// first lookup are ignored; the eventual build sees the current names anyway.
#[derive(Debug, Default)]
pub(crate) struct NameIndex {
    map: OnceCell<HashMap<String, usize>>,
}

impl NameIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Storage position of `name`.
    ///
    /// `names` yields the stored names in storage order; it is only consulted
    /// when the index has not been built yet.
    pub(crate) fn lookup<'a, I>(&self, name: &str, names: impl FnOnce() -> I) -> Option<usize>
    where
        I: Iterator<Item = &'a str>,
    {
        self.map
            .get_or_init(|| {
                let map: HashMap<String, usize> = names()
                    .enumerate()
                    .map(|(pos, name)| (name.to_owned(), pos))
                    .collect();
                tracing::debug!(items = map.len(), "built name index");
                map
            })
            .get(name)
            .copied()
    }

    pub(crate) fn insert(&mut self, name: &str, pos: usize) {
        if let Some(map) = self.map.get_mut() {
            let prev = map.insert(name.to_owned(), pos);
            debug_assert!(prev.is_none(), "name `{name}` indexed twice");
        }
    }

    pub(crate) fn remove(&mut self, name: &str) {
        if let Some(map) = self.map.get_mut() {
            map.remove(name);
        }
    }

    /// Re-key the entry of a renamed item.
    pub(crate) fn reassign(&mut self, old_name: &str, new_name: &str, pos: usize) {
        self.remove(old_name);
        self.insert(new_name, pos);
    }

    /// Point an existing name at a new storage position.
    pub(crate) fn reassign_position(&mut self, name: &str, pos: usize) {
        if let Some(entry) = self.map.get_mut().and_then(|map| map.get_mut(name)) {
            *entry = pos;
        }
    }

    #[cfg(test)]
    pub(crate) fn is_built(&self) -> bool {
        self.map.get().is_some()
    }
}
