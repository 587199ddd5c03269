// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marker cache: descriptor identity → live marker node, plus the installed viewport listener.
//!
//! Each [`Beacons`](crate::Beacons) instance owns its cache, so instances never see each other's
//! markers.

use alloc::collections::BTreeMap;

use crate::list::BeaconKey;

/// Live marker nodes keyed by descriptor identity.
///
/// Markers are indexed both ways, so finding the descriptor behind a clicked marker does not scan.
#[derive(Clone, Debug)]
pub struct MarkerCache<E, L> {
    markers: BTreeMap<BeaconKey, E>,
    owners: BTreeMap<E, BeaconKey>,
    viewport_listener: Option<L>,
}

impl<E: Copy + Ord, L: Copy> MarkerCache<E, L> {
    /// An empty cache.
    pub fn new() -> Self {
        Self {
            markers: BTreeMap::new(),
            owners: BTreeMap::new(),
            viewport_listener: None,
        }
    }

    /// Marker registered for `key`.
    pub fn get(&self, key: BeaconKey) -> Option<E> {
        self.markers.get(&key).copied()
    }

    /// Record `marker` for `key`, returning the marker it replaces.
    pub fn insert(&mut self, key: BeaconKey, marker: E) -> Option<E> {
        let replaced = self.markers.insert(key, marker);
        if let Some(old) = replaced {
            self.owners.remove(&old);
        }
        self.owners.insert(marker, key);
        replaced
    }

    /// Drop the entry for `key`, returning its marker.
    pub fn remove(&mut self, key: BeaconKey) -> Option<E> {
        let marker = self.markers.remove(&key)?;
        self.owners.remove(&marker);
        Some(marker)
    }

    /// Key whose marker is `marker`.
    pub fn key_of(&self, marker: E) -> Option<BeaconKey> {
        self.owners.get(&marker).copied()
    }

    /// Number of cached markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns true if no marker is cached.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// The installed viewport listener.
    pub fn viewport_listener(&self) -> Option<L> {
        self.viewport_listener
    }

    /// Record the installed viewport listener.
    pub fn set_viewport_listener(&mut self, listener: L) {
        self.viewport_listener = Some(listener);
    }

    /// Forget the installed viewport listener, returning it.
    pub fn take_viewport_listener(&mut self) -> Option<L> {
        self.viewport_listener.take()
    }
}

impl<E: Copy + Ord, L: Copy> Default for MarkerCache<E, L> {
    fn default() -> Self {
        Self::new()
    }
}
