// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registered descriptors, in registration order, addressed by generational keys.

use alloc::vec::Vec;

use crate::types::{Beacon, BeaconId};

/// Identity of one registered descriptor.
///
/// This is a small, copyable handle made of a slot index and a generation counter, like
/// `understory_document::ElementId`.
///
/// ## Semantics
///
/// - Every registered descriptor gets its own key, even when its [`BeaconId`] equals another's.
/// - On removal the key becomes stale. When the slot is reused its generation is incremented, so
///   a stale key never addresses a later descriptor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BeaconKey(u32, u32);

impl BeaconKey {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub(crate) struct BeaconList<E> {
    slots: Vec<Option<Beacon<E>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    order: Vec<BeaconKey>,
}

impl<E> BeaconList<E> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            order: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, beacon: Beacon<E>) -> BeaconKey {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(beacon);
            (idx, generation)
        } else {
            self.slots.push(Some(beacon));
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "BeaconKey uses 32-bit indices by design."
        )]
        let key = BeaconKey(idx as u32, generation);
        self.order.push(key);
        key
    }

    pub(crate) fn remove(&mut self, key: BeaconKey) -> Option<Beacon<E>> {
        if !self.contains(key) {
            return None;
        }
        self.order.retain(|k| *k != key);
        self.free_list.push(key.idx());
        self.slots[key.idx()].take()
    }

    pub(crate) fn contains(&self, key: BeaconKey) -> bool {
        self.get(key).is_some()
    }

    pub(crate) fn get(&self, key: BeaconKey) -> Option<&Beacon<E>> {
        let slot = self.slots.get(key.idx())?.as_ref()?;
        (self.generations[key.idx()] == key.1).then_some(slot)
    }

    /// First key, in registration order, whose descriptor has `id`.
    pub(crate) fn find(&self, id: &BeaconId) -> Option<BeaconKey> {
        self.order
            .iter()
            .copied()
            .find(|k| self.get(*k).is_some_and(|b| b.id == *id))
    }

    /// Keys in registration order, copied so callers may mutate the list while walking it.
    pub(crate) fn keys(&self) -> Vec<BeaconKey> {
        self.order.clone()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (BeaconKey, &Beacon<E>)> + '_ {
        self.order
            .iter()
            .filter_map(|k| self.get(*k).map(|b| (*k, b)))
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}
