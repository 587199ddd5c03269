// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Beacon descriptors and the values they are built from.
//!
//! A [`Beacon`] is the resolved descriptor the engine registers. Callers build descriptors either
//! declaratively (attributes on document elements, see [`parse`](crate::parse)) or
//! programmatically from [`BeaconSpec`] values; both arrive through a [`BeaconSource`].

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

/// One of the nine anchor placements relative to a target's box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Position {
    /// Top-left corner.
    TopLeft,
    /// Middle of the top edge.
    Top,
    /// Top-right corner.
    TopRight,
    /// Middle of the left edge.
    Left,
    /// Center of the box. Ignores the boundary mode.
    #[default]
    Center,
    /// Middle of the right edge.
    Right,
    /// Bottom-left corner.
    BottomLeft,
    /// Middle of the bottom edge.
    Bottom,
    /// Bottom-right corner.
    BottomRight,
}

impl Position {
    /// Every position, row by row from the top-left.
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Left,
        Self::Center,
        Self::Right,
        Self::BottomLeft,
        Self::Bottom,
        Self::BottomRight,
    ];

    /// Look up a position by its attribute name (`top-left`, `center`, …).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    /// Parse an attribute value; unknown names fall back to [`Position::Center`].
    pub fn parse(name: &str) -> Self {
        Self::from_name(name.trim()).unwrap_or_default()
    }

    /// Attribute name of this position.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::Top => "top",
            Self::TopRight => "top-right",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::BottomLeft => "bottom-left",
            Self::Bottom => "bottom",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a marker sits inside its target's box or straddles/outside it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Marker stays within the target's box.
    #[default]
    Inner,
    /// Marker is pushed outside the target's box along the anchor's edges.
    Outer,
}

impl Boundary {
    /// Parse an attribute value. Only `inner` is inner; any other value is [`Boundary::Outer`].
    pub fn parse(name: &str) -> Self {
        if name.trim() == "inner" {
            Self::Inner
        } else {
            Self::Outer
        }
    }

    /// Attribute name of this boundary.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Outer => "outer",
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-facing beacon identifier.
///
/// Identifiers are compared structurally; they do not identify a registered descriptor on their
/// own. See [`BeaconKey`](crate::BeaconKey) for identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BeaconId {
    /// Position in the programmatic input, used when no id was given.
    Index(usize),
    /// Explicit or declared name.
    Name(String),
}

impl fmt::Display for BeaconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(n) => f.write_str(n),
        }
    }
}

impl From<&str> for BeaconId {
    fn from(name: &str) -> Self {
        Self::Name(name.into())
    }
}

impl From<String> for BeaconId {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for BeaconId {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Reference to a beacon's target element.
///
/// Selectors are resolved against the host every time the element is needed, so a target that is
/// replaced in the document is picked up again on the next refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementRef<E> {
    /// A direct element handle.
    Handle(E),
    /// A selector resolved lazily with [`Host::query_selector`](crate::Host::query_selector).
    Selector(String),
}

impl<E> From<&str> for ElementRef<E> {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.into())
    }
}

impl<E> From<String> for ElementRef<E> {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

/// Gate consulted by non-forced [`Beacons::show`](crate::Beacons::show).
#[derive(Clone)]
pub enum CanShow {
    /// A fixed answer.
    Flag(bool),
    /// Evaluated on every show.
    Predicate(Rc<dyn Fn() -> bool>),
}

impl CanShow {
    /// Evaluate the gate.
    pub fn evaluate(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Predicate(predicate) => predicate(),
        }
    }
}

impl fmt::Debug for CanShow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Input event delivered to click handlers.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickEvent {
    /// Pointer position in the host's coordinate space.
    pub point: Point,
    propagation_stopped: bool,
}

impl ClickEvent {
    /// A fresh click at `point`.
    pub fn new(point: Point) -> Self {
        Self {
            point,
            propagation_stopped: false,
        }
    }

    /// Keep the event from reaching elements behind the marker.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Returns true once [`ClickEvent::stop_propagation`] was called.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Click callback: receives the triggering event and the clicked descriptor.
pub type ClickHandler<E> = Rc<dyn Fn(&ClickEvent, &Beacon<E>)>;

/// A registered beacon descriptor.
#[derive(Clone)]
pub struct Beacon<E> {
    /// Caller-facing identifier.
    pub id: BeaconId,
    /// Anchor position; `None` uses [`BeaconOptions::position`](crate::BeaconOptions::position).
    pub position: Option<Position>,
    /// Boundary mode; `None` uses [`BeaconOptions::boundary`](crate::BeaconOptions::boundary).
    pub boundary: Option<Boundary>,
    /// Target element. Descriptors without one never get a marker.
    pub element: Option<ElementRef<E>>,
    /// Extra class names for the marker, whitespace separated.
    pub class: Option<String>,
    /// Invoked when the marker is clicked.
    pub on_click: Option<ClickHandler<E>>,
    /// Gate for non-forced show.
    pub can_show: Option<CanShow>,
    /// Free-form fields captured from declarative attributes.
    pub attributes: BTreeMap<String, String>,
}

impl<E> Beacon<E> {
    /// A descriptor with `id` and nothing else set.
    pub fn new(id: impl Into<BeaconId>) -> Self {
        Self {
            id: id.into(),
            position: None,
            boundary: None,
            element: None,
            class: None,
            on_click: None,
            can_show: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Evaluate the show gate. Descriptors without a gate may always be shown.
    pub fn can_show(&self) -> bool {
        self.can_show.as_ref().is_none_or(CanShow::evaluate)
    }

    /// Class names from [`Beacon::class`], split on whitespace.
    pub fn class_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.class
            .as_deref()
            .unwrap_or_default()
            .split_ascii_whitespace()
    }
}

impl<E: fmt::Debug> fmt::Debug for Beacon<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Beacon")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("boundary", &self.boundary)
            .field("element", &self.element)
            .field("class", &self.class)
            .field("on_click", &self.on_click.as_ref().map(|_| ".."))
            .field("can_show", &self.can_show)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Programmatic descriptor input.
///
/// Built with [`BeaconSpec::new`] and the `with_*` builders, then handed to
/// [`Beacons::set_beacons`](crate::Beacons::set_beacons) through a [`BeaconSource`].
#[derive(Clone)]
pub struct BeaconSpec<E> {
    id: Option<BeaconId>,
    beacon: Beacon<E>,
}

impl<E> BeaconSpec<E> {
    /// A spec targeting `element`.
    pub fn new(element: impl Into<ElementRef<E>>) -> Self {
        let mut beacon = Beacon::new(BeaconId::Index(0));
        beacon.element = Some(element.into());
        Self { id: None, beacon }
    }

    /// A spec targeting an element handle.
    pub fn for_element(element: E) -> Self {
        Self::new(ElementRef::Handle(element))
    }

    /// A spec without a target; it is parsed but never gets a marker.
    pub fn detached() -> Self {
        Self {
            id: None,
            beacon: Beacon::new(BeaconId::Index(0)),
        }
    }

    /// Builder: set the identifier.
    pub fn with_id(mut self, id: impl Into<BeaconId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: set the anchor position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.beacon.position = Some(position);
        self
    }

    /// Builder: set the boundary mode.
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.beacon.boundary = Some(boundary);
        self
    }

    /// Builder: extra marker class names.
    pub fn with_class(mut self, class: &str) -> Self {
        self.beacon.class = Some(class.into());
        self
    }

    /// Builder: click handler.
    pub fn on_click(mut self, handler: impl Fn(&ClickEvent, &Beacon<E>) + 'static) -> Self {
        self.beacon.on_click = Some(Rc::new(handler));
        self
    }

    /// Builder: fixed show gate.
    pub fn can_show(mut self, flag: bool) -> Self {
        self.beacon.can_show = Some(CanShow::Flag(flag));
        self
    }

    /// Builder: evaluated show gate.
    pub fn can_show_with(mut self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.beacon.can_show = Some(CanShow::Predicate(Rc::new(predicate)));
        self
    }

    /// Builder: free-form attribute.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.beacon.attributes.insert(name.into(), value.into());
        self
    }

    /// Resolve into a descriptor; `index` is the id when none was given.
    pub fn into_beacon(self, index: usize) -> Beacon<E> {
        let mut beacon = self.beacon;
        beacon.id = self.id.unwrap_or(BeaconId::Index(index));
        beacon
    }
}

impl<E: fmt::Debug> fmt::Debug for BeaconSpec<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeaconSpec")
            .field("id", &self.id)
            .field("beacon", &self.beacon)
            .finish()
    }
}

/// Where [`Beacons::set_beacons`](crate::Beacons::set_beacons) takes its descriptors from.
#[derive(Clone, Debug)]
pub enum BeaconSource<E> {
    /// Scan the document for declared beacons. An empty list accepts every declared id.
    Declared(Vec<String>),
    /// Programmatic descriptors, in order.
    Specs(Vec<BeaconSpec<E>>),
}

impl<E> BeaconSource<E> {
    /// Every declared beacon in the document.
    pub fn declared() -> Self {
        Self::Declared(Vec::new())
    }

    /// Declared beacons whose id is in the comma-separated `ids`. Empty text accepts every id.
    pub fn from_ids(ids: &str) -> Self {
        Self::Declared(split_ids(ids))
    }
}

impl<E> Default for BeaconSource<E> {
    fn default() -> Self {
        Self::declared()
    }
}

impl<E> From<&str> for BeaconSource<E> {
    fn from(ids: &str) -> Self {
        Self::from_ids(ids)
    }
}

impl<E> From<&[&str]> for BeaconSource<E> {
    fn from(ids: &[&str]) -> Self {
        Self::Declared(
            ids.iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(ToString::to_string)
                .collect(),
        )
    }
}

impl<E> From<Vec<String>> for BeaconSource<E> {
    fn from(ids: Vec<String>) -> Self {
        Self::Declared(ids)
    }
}

impl<E> From<BeaconSpec<E>> for BeaconSource<E> {
    fn from(spec: BeaconSpec<E>) -> Self {
        Self::Specs(alloc::vec![spec])
    }
}

impl<E> From<Vec<BeaconSpec<E>>> for BeaconSource<E> {
    fn from(specs: Vec<BeaconSpec<E>>) -> Self {
        Self::Specs(specs)
    }
}

/// Split a comma-separated id list, trimming entries and dropping empty ones.
pub(crate) fn split_ids(ids: &str) -> Vec<String> {
    ids.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}
