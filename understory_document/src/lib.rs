// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_document --heading-base-level=0

//! Understory Document: a Kurbo-native retained element tree.
//!
//! Understory Document models the parts of a rendered document that overlay engines care about,
//! without a browser:
//!
//! - A hierarchy of elements in document order, with attributes and class lists.
//! - Offset boxes (position and size relative to the offset parent) and a `position: fixed` flag.
//! - Computed sizes driven by simple per-class size rules, standing in for a stylesheet.
//! - Viewport resize listeners and optional per-element resize observation, both reported as
//!   queued [`DocumentEvent`]s that the embedder drains and delivers.
//! - A small [`Selector`] engine for locating elements.
//!
//! ## Not a layout engine
//!
//! This crate does not measure or arrange anything. Callers set offset boxes
//! directly with [`Document::set_bounds`]; the document only records them and reports size changes
//! of observed elements.
//!
//! ## Example
//!
//! ```
//! use understory_document::{Document, DocumentEvent, ElementData};
//! use kurbo::{Rect, Size};
//!
//! let mut doc = Document::new();
//! let card = doc.insert(
//!     Some(doc.body()),
//!     ElementData::new("div")
//!         .with_attribute("id", "card")
//!         .with_bounds(Rect::new(10.0, 10.0, 110.0, 60.0)),
//! );
//! assert_eq!(doc.query_selector("#card"), Some(card));
//!
//! // Observed elements report size changes.
//! doc.observe(card);
//! doc.set_bounds(card, Rect::new(10.0, 10.0, 210.0, 60.0));
//! assert_eq!(doc.drain_events(), vec![DocumentEvent::ElementResized(card)]);
//!
//! // Viewport listeners hear about viewport changes.
//! let listener = doc.add_viewport_listener();
//! doc.resize_viewport(Size::new(800.0, 600.0));
//! assert_eq!(doc.drain_events(), vec![DocumentEvent::ViewportResized(listener)]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod selector;
mod tree;
mod types;

pub use selector::Selector;
pub use tree::{DEFAULT_VIEWPORT, Document};
pub use types::{DocumentEvent, ElementData, ElementFlags, ElementId, ListenerId};
