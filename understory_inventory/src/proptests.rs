// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests: random operation sequences against a plain `Vec` model.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use proptest::collection::{hash_set, vec};
use proptest::prelude::*;
use proptest::sample::Index;

use crate::{Inventory, InventoryEvent, InventoryRead, ItemType, invent_name};

#[derive(Clone, Debug)]
struct Entry {
    name: String,
}

fn entry_name(entry: &Entry) -> &str {
    &entry.name
}

fn entry(name: &str) -> Entry {
    Entry {
        name: name.to_string(),
    }
}

fn entry_type() -> ItemType<Entry> {
    ItemType::new(entry_name)
        .with_compare(|a: &Entry, b: &Entry| a.name.cmp(&b.name))
        .with_rename(|e: &mut Entry, name: &str| e.name = name.to_string())
        .with_copy(Entry::clone)
}

fn shown(inventory: &Inventory<Entry>) -> Vec<String> {
    inventory.iter().map(|(_, e)| e.name.clone()).collect()
}

#[derive(Clone, Debug)]
enum Op {
    Insert(String),
    InsertNth(String, usize),
    Delete(String),
    DeleteNth(usize),
    Rename(String, String),
    NewItem(Option<String>),
    Restore,
    Forget,
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => arb_name().prop_map(Op::Insert),
        1 => (arb_name(), 0..8_usize).prop_map(|(name, n)| Op::InsertNth(name, n)),
        2 => arb_name().prop_map(Op::Delete),
        1 => (0..8_usize).prop_map(Op::DeleteNth),
        2 => (arb_name(), arb_name()).prop_map(|(a, b)| Op::Rename(a, b)),
        1 => proptest::option::of(arb_name()).prop_map(Op::NewItem),
        1 => Just(Op::Restore),
        1 => Just(Op::Forget),
    ]
}

/// Names in display order, maintained the obvious way.
#[derive(Debug)]
struct Model {
    shown: Vec<String>,
    sorted: bool,
}

impl Model {
    fn contains(&self, name: &str) -> bool {
        self.shown.iter().any(|s| s == name)
    }

    fn in_order(&self, n: usize) -> bool {
        let name = &self.shown[n];
        (n == 0 || self.shown[n - 1] <= *name)
            && self.shown.get(n + 1).is_none_or(|next| name <= next)
    }

    fn insert(&mut self, name: &str, at: Option<usize>) -> bool {
        if at.is_some_and(|n| n > self.shown.len()) || self.contains(name) {
            return false;
        }
        match at {
            Some(n) => {
                self.shown.insert(n, name.to_string());
                if self.sorted && !self.in_order(n) {
                    self.sorted = false;
                }
            }
            None if self.sorted => {
                let n = self.shown.partition_point(|s| s.as_str() < name);
                self.shown.insert(n, name.to_string());
            }
            None => self.shown.push(name.to_string()),
        }
        true
    }

    fn delete_nth(&mut self, n: usize) -> bool {
        if n >= self.shown.len() {
            return false;
        }
        self.shown.remove(n);
        true
    }

    fn rename(&mut self, old: &str, new: &str) -> bool {
        let Some(n) = self.shown.iter().position(|s| s == old) else {
            return false;
        };
        if old == new {
            return true;
        }
        if self.contains(new) {
            return false;
        }
        self.shown[n] = new.to_string();
        if self.sorted && !self.in_order(n) {
            self.shown.sort();
        }
        true
    }

    fn new_item(&mut self, new_name: Option<&str>) -> bool {
        let Some(base) = self.shown.first().cloned() else {
            return false;
        };
        let name = match new_name {
            Some(name) if !self.contains(name) => name.to_string(),
            other => match invent_name(Some(other.unwrap_or(&base)), |n| self.contains(n)) {
                Ok(name) => name,
                Err(_) => return false,
            },
        };
        self.insert(&name, None)
    }

    fn restore(&mut self) {
        if !self.sorted {
            self.shown.sort();
            self.sorted = true;
        }
    }
}

/// Replays events on a list of names; entries touched by an event are
/// refreshed from the inventory afterwards.
fn replay(mirror: &mut Vec<Option<String>>, events: Vec<InventoryEvent>) {
    for event in events {
        match event {
            InventoryEvent::Inserted(n) => mirror.insert(n, None),
            InventoryEvent::Deleted(n) => {
                mirror.remove(n);
            }
            InventoryEvent::Updated(n) => mirror[n] = None,
            InventoryEvent::Reordered(new_order) => {
                *mirror = new_order.iter().map(|&old| mirror[old].clone()).collect();
            }
            InventoryEvent::DefaultChanged => {}
        }
    }
}

proptest! {
    #[test]
    fn operations_match_model(ops in vec(arb_op(), 0..48)) {
        let mut inventory = Inventory::new(entry_type());
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        inventory.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let mut model = Model { shown: Vec::new(), sorted: true };
        let mut mirror: Vec<Option<String>> = Vec::new();

        for op in ops {
            let (applied, expected) = match &op {
                Op::Insert(name) => (
                    inventory.insert(entry(name)).is_ok(),
                    model.insert(name, None),
                ),
                Op::InsertNth(name, n) => (
                    inventory.insert_nth(entry(name), *n).is_ok(),
                    model.insert(name, Some(*n)),
                ),
                Op::Delete(name) => {
                    let expected = model.shown.iter().position(|s| s == name);
                    (
                        inventory.delete(name).is_ok(),
                        expected.is_some_and(|n| model.delete_nth(n)),
                    )
                }
                Op::DeleteNth(n) => (inventory.delete_nth(*n).is_ok(), model.delete_nth(*n)),
                Op::Rename(old, new) => (
                    inventory.rename(old, new).is_ok(),
                    model.rename(old, new),
                ),
                Op::NewItem(name) => (
                    inventory.new_item(None, name.as_deref()).is_ok(),
                    model.new_item(name.as_deref()),
                ),
                Op::Restore => {
                    inventory.restore_order();
                    model.restore();
                    (true, true)
                }
                Op::Forget => {
                    inventory.forget_order();
                    model.sorted = false;
                    (true, true)
                }
            };
            prop_assert_eq!(applied, expected, "{:?}", op);

            replay(&mut mirror, core::mem::take(&mut *events.borrow_mut()));
            for (n, slot) in mirror.iter_mut().enumerate() {
                if slot.is_none() {
                    *slot = inventory.get_nth(n).map(|e| e.name.clone());
                }
            }

            let names = shown(&inventory);
            prop_assert_eq!(&names, &model.shown, "{:?}", op);
            prop_assert_eq!(inventory.is_sorted(), model.sorted, "{:?}", op);
            let mirrored: Vec<String> = mirror.iter().flatten().cloned().collect();
            prop_assert_eq!(mirror.len(), names.len());
            prop_assert_eq!(mirrored, names, "events disagree after {:?}", op);
            inventory.assert_consistent();
        }
    }

    #[test]
    fn sorted_insertion_matches_sorted_fill(names in hash_set(arb_name(), 0..16)) {
        let mut sorted: Vec<String> = names.iter().cloned().collect();
        sorted.sort();

        let mut forward = Inventory::new(entry_type());
        let mut backward = Inventory::new(entry_type());
        for name in &names {
            forward.insert(entry(name)).unwrap();
        }
        for name in sorted.iter().rev() {
            backward.insert(entry(name)).unwrap();
        }
        let filled =
            Inventory::new_filled(entry_type(), sorted.iter().map(|n| entry(n))).unwrap();

        prop_assert!(filled.is_sorted());
        prop_assert_eq!(shown(&forward), sorted.clone());
        prop_assert_eq!(shown(&backward), sorted.clone());
        prop_assert_eq!(shown(&filled), sorted);
    }

    #[test]
    fn swap_delete_keeps_lookups(
        names in hash_set(arb_name(), 1..16),
        victims in vec(any::<Index>(), 0..16),
    ) {
        let mut expected: Vec<String> = names.into_iter().collect();
        let mut inventory =
            Inventory::new_filled(ItemType::new(entry_name), expected.iter().map(|n| entry(n)))
                .unwrap();

        for victim in victims {
            if expected.is_empty() {
                break;
            }
            let n = victim.index(expected.len());
            let name = expected.remove(n);
            prop_assert_eq!(inventory.delete_nth(n).unwrap().name, name);
            for (n, name) in expected.iter().enumerate() {
                prop_assert_eq!(inventory.position(name), Some(n));
                prop_assert_eq!(inventory.get_nth(n).map(|e| e.name.as_str()), Some(name.as_str()));
            }
        }
        inventory.assert_consistent();
    }

    #[test]
    fn rename_round_trip_restores_inventory(
        names in hash_set(arb_name(), 1..16),
        pick in any::<Index>(),
        new_name in "[f-h]{1,3}",
    ) {
        let mut sorted: Vec<String> = names.into_iter().collect();
        sorted.sort();
        let mut inventory =
            Inventory::new_filled(entry_type(), sorted.iter().map(|n| entry(n))).unwrap();
        let target = sorted[pick.index(sorted.len())].clone();

        inventory.rename(&target, &new_name).unwrap();
        prop_assert!(inventory.get(&target).is_none());
        prop_assert!(inventory.is_sorted());
        inventory.rename(&new_name, &target).unwrap();

        prop_assert_eq!(shown(&inventory), sorted);
        inventory.assert_consistent();
    }
}
