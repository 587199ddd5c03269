// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.
//!
//! [`BeaconOptions`] is a plain structure; merge caller values over the defaults with struct update
//! syntax:
//!
//! ```
//! use understory_beacon::{BeaconOptions, Boundary};
//! let options: BeaconOptions<u32> = BeaconOptions {
//!     boundary: Boundary::Outer,
//!     ..Default::default()
//! };
//! assert_eq!(options.data_prefix, "data-beacon");
//! ```

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use crate::types::{Beacon, Boundary, ClickEvent, ClickHandler, Position};

/// Attribute prefix used by [`BeaconOptions::default`].
pub const DEFAULT_DATA_PREFIX: &str = "data-beacon";

/// Class names applied to marker nodes. These are the integration points for external styling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassNames {
    /// Always present on a marker.
    pub beacon: String,
    /// Present when the target sits in a fixed positioning context.
    pub fixed: String,
    /// Present while the marker is hidden.
    pub hidden: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            beacon: "gc-beacon".into(),
            fixed: "gc-beacon-fixed".into(),
            hidden: "gc-beacon-hidden".into(),
        }
    }
}

/// Named click handlers that declarative `onclick` fields refer to.
pub struct CallbackRegistry<E> {
    handlers: BTreeMap<String, ClickHandler<E>>,
}

impl<E> CallbackRegistry<E> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Register `handler` under `name`, replacing any previous handler with that name.
    pub fn register(
        &mut self,
        name: &str,
        handler: impl Fn(&ClickEvent, &Beacon<E>) + 'static,
    ) -> &mut Self {
        self.handlers.insert(name.into(), Rc::new(handler));
        self
    }

    /// Handler registered under `name`.
    pub fn get(&self, name: &str) -> Option<ClickHandler<E>> {
        self.handlers.get(name).cloned()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Default for CallbackRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for CallbackRegistry<E> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<E> fmt::Debug for CallbackRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

/// Options for a [`Beacons`](crate::Beacons) instance.
#[derive(Clone, Debug)]
pub struct BeaconOptions<E> {
    /// Anchor position for descriptors that do not set one.
    pub position: Position,
    /// Boundary mode for descriptors that do not set one.
    pub boundary: Boundary,
    /// Declaration attribute; per-field attributes are `<prefix>-<field>` and `<prefix>-<id>-<field>`.
    pub data_prefix: String,
    /// Marker class names.
    pub classes: ClassNames,
    /// Handlers for declarative `onclick` fields.
    pub callbacks: CallbackRegistry<E>,
}

impl<E> Default for BeaconOptions<E> {
    fn default() -> Self {
        Self {
            position: Position::Center,
            boundary: Boundary::Inner,
            data_prefix: DEFAULT_DATA_PREFIX.into(),
            classes: ClassNames::default(),
            callbacks: CallbackRegistry::new(),
        }
    }
}

impl<E> BeaconOptions<E> {
    /// Marker attribute recording the applied position.
    pub fn position_attribute(&self) -> String {
        alloc::format!("{}-position", self.data_prefix)
    }

    /// Marker attribute recording the applied boundary.
    pub fn boundary_attribute(&self) -> String {
        alloc::format!("{}-boundary", self.data_prefix)
    }
}
