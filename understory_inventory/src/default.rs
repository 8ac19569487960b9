// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracking of the distinguished default item.

use alloc::borrow::ToOwned;
use alloc::string::String;

/// The name of the default item, if one is set.
///
/// Whether a default is set and whether an item of that name exists are
/// independent: a default can name an item that was never inserted or has
/// since been deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefaultTracker {
    name: Option<String>,
}

impl DefaultTracker {
    /// The default name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether a default is set.
    pub fn has_default(&self) -> bool {
        self.name.is_some()
    }

    /// Whether `name` is the default name.
    pub fn is_default(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    /// Set or clear the default name. Returns whether anything changed.
    pub fn set(&mut self, name: Option<&str>) -> bool {
        if self.name.as_deref() == name {
            return false;
        }
        self.name = name.map(ToOwned::to_owned);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_reports_changes_only() {
        let mut tracker = DefaultTracker::default();
        assert!(!tracker.has_default());
        assert!(!tracker.set(None));
        assert!(tracker.set(Some("a")));
        assert!(!tracker.set(Some("a")));
        assert!(tracker.is_default("a"));
        assert!(tracker.set(Some("b")));
        assert!(!tracker.is_default("a"));
        assert!(tracker.set(None));
        assert_eq!(tracker.name(), None);
    }
}
