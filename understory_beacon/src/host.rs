// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the engine and a document.
//!
//! ## Overview
//!
//! [`Beacons`](crate::Beacons) never touches a concrete document. It reads and mutates elements
//! through [`Host`], walks ancestry through [`ElementTree`], and observes per-element resizes
//! through an optional [`ResizeObserver`].
//!
//! Layout changes flow back in as [`LayoutEvent`]s: the embedder collects them from its
//! environment and hands them to [`Beacons::handle_layout_event`](crate::Beacons::handle_layout_event).
//!
//! The `adapters` module (feature `document_adapter`) provides a ready-made host over
//! `understory_document`.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect, Size};

/// Read-only ancestry: the part of a document the fixed-context walk needs.
pub trait ElementTree {
    /// Element handle. Handles compare equal when they denote the same element; the ordering only
    /// needs to be total, so markers can be looked up by handle.
    type Element: Copy + Ord + core::fmt::Debug;

    /// Parent of `el`, or `None` for the root and detached elements.
    fn parent_of(&self, el: Self::Element) -> Option<Self::Element>;

    /// Returns true if `el` is the document root (`html`).
    fn is_document_root(&self, el: Self::Element) -> bool;

    /// Returns true if `el`'s computed `position` is `fixed`.
    fn is_fixed(&self, el: Self::Element) -> bool;
}

/// Per-element size observation.
///
/// A host that cannot observe element sizes returns `None` from [`Host::resize_observer`].
pub trait ResizeObserver<E> {
    /// Start reporting border-box size changes of `el`.
    fn observe(&mut self, el: E);
    /// Stop reporting size changes of `el`.
    fn unobserve(&mut self, el: E);
    /// Stop reporting size changes of every element.
    fn disconnect(&mut self);
}

/// Everything else the engine needs from a document.
pub trait Host: ElementTree {
    /// Handle of an installed viewport resize listener.
    type Listener: Copy + Eq + core::fmt::Debug;

    // --- lookup ---

    /// Returns true if `el` still denotes a live element.
    fn contains(&self, el: Self::Element) -> bool;

    /// First connected element matching `selector`; `None` for no match or an invalid selector.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// Connected elements carrying attribute `name`, in document order.
    fn elements_with_attribute(&self, name: &str) -> Vec<Self::Element>;

    /// Value of attribute `name` on `el`.
    fn attribute(&self, el: Self::Element, name: &str) -> Option<String>;

    /// Every attribute of `el` as `(name, value)`, in declaration order.
    fn attributes(&self, el: Self::Element) -> Vec<(String, String)>;

    /// The document body.
    fn body(&self) -> Self::Element;

    // --- layout ---

    /// Offset box of `el`: position relative to its offset parent, and size, in whole pixels.
    fn offset_box(&self, el: Self::Element) -> Rect;

    /// Computed width and height of `el`.
    fn computed_size(&self, el: Self::Element) -> Size;

    // --- mutation ---

    /// Create a detached marker node.
    fn create_marker(&mut self) -> Self::Element;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: Self::Element, child: Self::Element);

    /// Detach and destroy `el`.
    fn remove_element(&mut self, el: Self::Element);

    /// Add a class to `el`.
    fn add_class(&mut self, el: Self::Element, class: &str);

    /// Remove a class from `el`.
    fn remove_class(&mut self, el: Self::Element, class: &str);

    /// Returns true if `el` carries `class`.
    fn has_class(&self, el: Self::Element, class: &str) -> bool;

    /// Set attribute `name` on `el`.
    fn set_attribute(&mut self, el: Self::Element, name: &str, value: &str);

    /// Remove attribute `name` from `el`.
    fn remove_attribute(&mut self, el: Self::Element, name: &str);

    /// Place `el` absolutely at `offset` in its offset parent's coordinate space.
    fn set_offset(&mut self, el: Self::Element, offset: Point);

    // --- change sources ---

    /// Install a viewport resize listener.
    fn add_viewport_listener(&mut self) -> Self::Listener;

    /// Uninstall a viewport resize listener.
    fn remove_viewport_listener(&mut self, listener: Self::Listener);

    /// Per-element resize observation, if the host offers it.
    fn resize_observer(&mut self) -> Option<&mut dyn ResizeObserver<Self::Element>>;
}

/// A layout change reported by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutEvent<E, L> {
    /// The viewport resized; delivered to the listener that was installed for it.
    ViewportResized(L),
    /// An observed element changed size.
    ElementResized(E),
}
