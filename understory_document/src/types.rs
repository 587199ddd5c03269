// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: element identifiers, flags, and notifications.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect};

/// Identifier for an element in the document.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - On removal, the slot is freed; any existing `ElementId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ElementId`.
///
/// ### Liveness
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether an `ElementId` still refers
/// to a live element. Stale ids never alias a different live element because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a registered viewport resize listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ListenerId(pub(crate) u32);

bitflags::bitflags! {
    /// Element flags describing computed style that matters to overlays.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element's computed `position` is `fixed`.
        const FIXED = 0b0000_0001;
        /// Element is absolutely positioned by its style offset (overlay nodes).
        const ABSOLUTE = 0b0000_0010;
    }
}

/// Layout notification queued by the document for the embedder to deliver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DocumentEvent {
    /// The viewport changed size; one notification per installed listener.
    ViewportResized(ListenerId),
    /// An observed element's border box changed size.
    ElementResized(ElementId),
}

/// Creation data for an element.
///
/// Bounds are the element's offset box: relative to its offset parent, in whole pixels.
#[derive(Clone, Debug, Default)]
pub struct ElementData {
    /// Tag name, lowercase.
    pub tag: String,
    /// Attributes in declaration order. `class` is kept separately in [`ElementData::classes`].
    pub attributes: Vec<(String, String)>,
    /// Class list in insertion order.
    pub classes: Vec<String>,
    /// Offset box relative to the offset parent.
    pub bounds: Rect,
    /// Computed-style flags.
    pub flags: ElementFlags,
    /// Style offset (`left`/`top`) applied to absolutely positioned elements.
    pub style_offset: Option<Point>,
}

impl ElementData {
    /// Element with the given tag and no attributes.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder: add a class.
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Builder: set the offset box.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Builder: mark the element as `position: fixed`.
    pub fn fixed(mut self) -> Self {
        self.flags |= ElementFlags::FIXED;
        self
    }
}
