// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_beacon --heading-base-level=0

//! Understory Beacon: overlay markers anchored to document elements.
//!
//! A beacon is a small marker node (a hotspot, a pulsing dot, a tour step indicator) attached to
//! a target element. This crate decides where markers go and keeps them there:
//!
//! - Descriptors come from declarative attributes on elements (`data-beacon="a,b"` plus
//!   `data-beacon-<field>` / `data-beacon-<id>-<field>`) or from programmatic [`BeaconSpec`]s.
//! - Each marker is placed at one of nine [`Position`]s around its target, inside or outside the
//!   target's box ([`Boundary`]).
//! - Markers are refreshed when the viewport or an observed target changes size.
//! - Visibility is toggled through a hidden class, optionally gated per descriptor.
//!
//! ## Hosts
//!
//! The engine works against the [`Host`] trait rather than a concrete document. Layout
//! notifications are delivered by the embedder as [`LayoutEvent`]s. With the `document_adapter`
//! feature, `adapters::document` implements [`Host`] for `understory_document::Document`.
//!
//! ## API overview
//!
//! - [`Beacons`]: the lifecycle manager. Registers descriptors, owns markers and their
//!   [`MarkerCache`], and exposes show/hide/remove/refresh.
//! - [`BeaconOptions`]: defaults, attribute prefix, class names and the [`CallbackRegistry`] used
//!   by declarative `onclick` fields.
//! - [`BeaconKey`]: identity of one registered descriptor; [`BeaconId`]: its caller-facing id.
//! - [`compute_position`]: the placement rule on its own.
//!
//! ## Placement
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use understory_beacon::{Boundary, Position, compute_position};
//!
//! let target = Rect::new(100.0, 50.0, 180.0, 70.0);
//! let marker = Size::new(10.0, 10.0);
//!
//! // Just outside the top-right corner.
//! let p = compute_position(target, marker, Position::TopRight, Boundary::Outer);
//! assert_eq!(p, Point::new(180.0, 40.0));
//!
//! // Center ignores the boundary.
//! let p = compute_position(target, marker, Position::Center, Boundary::Outer);
//! assert_eq!(p, Point::new(135.0, 55.0));
//! ```
//!
//! See the `understory_beacon_demos` examples for complete flows over a document.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod geometry;
pub mod host;
pub mod parse;

mod beacons;
mod cache;
mod list;
mod options;
mod types;

pub use beacons::Beacons;
pub use cache::MarkerCache;
pub use geometry::{compute_position, in_fixed_context};
pub use host::{ElementTree, Host, LayoutEvent, ResizeObserver};
pub use list::BeaconKey;
pub use options::{BeaconOptions, CallbackRegistry, ClassNames, DEFAULT_DATA_PREFIX};
pub use types::{
    Beacon, BeaconId, BeaconSource, BeaconSpec, Boundary, CanShow, ClickEvent, ClickHandler,
    ElementRef, Position,
};
