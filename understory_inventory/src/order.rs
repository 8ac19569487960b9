// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position index: the permutation between storage order and display order.

use alloc::vec::Vec;
use core::cmp::Ordering;

/// A pair of inverse permutations between storage and display positions.
///
/// `ridx[display] == storage` is authoritative and always up to date. The
/// inverse `idx[storage] == display` is rebuilt from `ridx` lazily: mutations
/// that shift display positions only mark it stale, and every read of `idx`
/// goes through [`PositionIndex::ensure_reindexed`].
#[derive(Clone, Debug, Default)]
pub(crate) struct PositionIndex {
    idx: Vec<usize>,
    ridx: Vec<usize>,
    needs_reindex: bool,
}

impl PositionIndex {
    /// Identity permutation over `len` items.
    #[cfg(test)]
    pub(crate) fn identity(len: usize) -> Self {
        let idx: Vec<usize> = (0..len).collect();
        Self {
            ridx: idx.clone(),
            idx,
            needs_reindex: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.ridx.len()
    }

    /// Storage position shown at `display`.
    #[inline]
    pub(crate) fn storage_at(&self, display: usize) -> Option<usize> {
        self.ridx.get(display).copied()
    }

    /// Storage positions in display order.
    #[cfg(test)]
    pub(crate) fn display_order(&self) -> &[usize] {
        &self.ridx
    }

    /// Rebuild `idx` from `ridx` if a mutation left it stale.
    pub(crate) fn ensure_reindexed(&mut self) {
        if !self.needs_reindex {
            return;
        }
        tracing::debug!(items = self.ridx.len(), "rebuilding display index");
        for (display, &storage) in self.ridx.iter().enumerate() {
            self.idx[storage] = display;
        }
        self.needs_reindex = false;
    }

    /// Display position of the item stored at `storage`.
    pub(crate) fn display_of(&mut self, storage: usize) -> usize {
        self.ensure_reindexed();
        self.idx[storage]
    }

    /// Register a new item stored at the end of storage and shown last.
    ///
    /// Returns its display position.
    pub(crate) fn append(&mut self) -> usize {
        let pos = self.ridx.len();
        self.ridx.push(pos);
        self.idx.push(pos);
        pos
    }

    /// Register a new item stored at the end of storage and shown at `display`.
    pub(crate) fn insert_at(&mut self, display: usize) {
        debug_assert!(display <= self.ridx.len(), "display position out of range");
        let storage = self.ridx.len();
        self.ridx.insert(display, storage);
        // Fixed up by the next reindex; only the length matters here.
        self.idx.push(display);
        self.needs_reindex = true;
    }

    /// Display position a new item would take in a sorted inventory.
    ///
    /// `cmp_new(storage)` orders the new item against the item stored at
    /// `storage`. The new item goes after all items that compare equal to it.
    pub(crate) fn sorted_insertion_point(&self, mut cmp_new: impl FnMut(usize) -> Ordering) -> usize {
        self.ridx
            .partition_point(|&storage| cmp_new(storage) != Ordering::Less)
    }

    /// Forget the item stored at `storage`, mirroring `Vec::swap_remove` on storage:
    /// the last stored item takes its storage position.
    ///
    /// Returns the display position the removed item had.
    pub(crate) fn swap_remove(&mut self, storage: usize) -> usize {
        self.ensure_reindexed();
        let display = self.idx[storage];
        let last = self.ridx.len() - 1;
        if storage < last {
            self.ridx[self.idx[last]] = storage;
        }
        self.ridx.remove(display);
        self.idx.pop();
        self.needs_reindex = true;
        display
    }

    /// Stable-sort display order by comparing stored items.
    ///
    /// Returns the permutation `new_order[new_display] == old_display`.
    pub(crate) fn sort_by(&mut self, mut cmp: impl FnMut(usize, usize) -> Ordering) -> Vec<usize> {
        // `idx` must describe the old order while we compute the permutation.
        self.ensure_reindexed();
        self.ridx.sort_by(|&a, &b| cmp(a, b));
        let new_order = self.ridx.iter().map(|&storage| self.idx[storage]).collect();
        self.needs_reindex = true;
        new_order
    }

    /// Whether `idx` and `ridx` are exact inverses.
    #[cfg(test)]
    pub(crate) fn is_consistent(&mut self) -> bool {
        self.ensure_reindexed();
        self.idx.len() == self.ridx.len()
            && self.ridx.iter().enumerate().all(|(d, &s)| self.idx[s] == d)
            && self.idx.iter().enumerate().all(|(s, &d)| self.ridx[d] == s)
    }
}
