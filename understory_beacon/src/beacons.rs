// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle manager.
//!
//! ## Overview
//!
//! [`Beacons`] owns a [`Host`], the registered descriptors and a [`MarkerCache`]. It creates one
//! marker node per descriptor whose target resolves, keeps markers placed as layout changes, and
//! tears them down again.
//!
//! ## Marker contract
//!
//! Every marker carries:
//!
//! - the descriptor's own classes and [`ClassNames::beacon`](crate::ClassNames::beacon);
//! - [`ClassNames::hidden`](crate::ClassNames::hidden) while hidden (markers start hidden);
//! - [`ClassNames::fixed`](crate::ClassNames::fixed) when its target sits in a fixed context;
//! - `<prefix>-position` and `<prefix>-boundary` attributes naming the placement last applied.
//!
//! A marker is appended to its target's parent, or to the body when the target has none.
//!
//! ## Resize synchronization
//!
//! Markers are observed through the host's [`ResizeObserver`](crate::ResizeObserver) if it has one,
//! and a single viewport listener is installed while descriptors are registered. Both arrive as
//! [`LayoutEvent`]s through [`Beacons::handle_layout_event`]; every relevant event runs one
//! [`Beacons::refresh`]. There is no debouncing.
//!
//! ## Lookups
//!
//! [`BeaconKey`] is identity: [`Beacons::show`], [`Beacons::hide`] and [`Beacons::remove`] act on
//! exactly that descriptor. The `*_id` variants look up the first descriptor, in registration
//! order, whose [`BeaconId`] is equal. Unknown keys and ids are silent no-ops.

use alloc::vec::Vec;
use core::fmt;

use crate::cache::MarkerCache;
use crate::geometry::{compute_position, in_fixed_context};
use crate::host::{Host, LayoutEvent};
use crate::list::{BeaconKey, BeaconList};
use crate::options::BeaconOptions;
use crate::parse::parse;
use crate::types::{Beacon, BeaconId, BeaconSource, ClickEvent, ElementRef};

/// Overlay markers anchored to elements of a host document.
///
/// ## Usage
///
/// - Construct with [`Beacons::new`] or [`Beacons::with_options`].
/// - Register descriptors with [`Beacons::set_beacons`]; this replaces anything registered before.
/// - Toggle visibility with [`Beacons::show`] / [`Beacons::hide`] and their `_all` and `_id`
///   variants.
/// - Forward host layout notifications to [`Beacons::handle_layout_event`] and marker clicks to
///   [`Beacons::dispatch_click`].
/// - Tear down with [`Beacons::remove`] or [`Beacons::remove_all`].
pub struct Beacons<H: Host> {
    host: H,
    options: BeaconOptions<H::Element>,
    list: BeaconList<H::Element>,
    cache: MarkerCache<H::Element, H::Listener>,
}

impl<H: Host + fmt::Debug> fmt::Debug for Beacons<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Beacons")
            .field("host", &self.host)
            .field("beacons", &self.list.len())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Beacons<H> {
    /// Create an engine over `host` with default options and nothing registered.
    pub fn new(host: H) -> Self {
        Self::with_options(host, BeaconOptions::default())
    }

    /// Create an engine over `host` with `options`.
    pub fn with_options(host: H, options: BeaconOptions<H::Element>) -> Self {
        Self {
            host,
            options,
            list: BeaconList::new(),
            cache: MarkerCache::new(),
        }
    }

    /// Replace the options.
    ///
    /// Existing markers keep their classes; positions pick up new defaults on the next
    /// [`Beacons::refresh`]. A changed data prefix strips the placement attributes written under
    /// the old one, and the next refresh writes them under the new one.
    pub fn configure(&mut self, options: BeaconOptions<H::Element>) {
        if options.data_prefix != self.options.data_prefix {
            let position = self.options.position_attribute();
            let boundary = self.options.boundary_attribute();
            for key in self.list.keys() {
                if let Some(marker) = self.cache.get(key) {
                    self.host.remove_attribute(marker, &position);
                    self.host.remove_attribute(marker, &boundary);
                }
            }
        }
        self.options = options;
    }

    /// Current options.
    pub fn options(&self) -> &BeaconOptions<H::Element> {
        &self.options
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, for layout changes made by the embedder.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give up the host. Markers stay in it.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Tear down everything, then register descriptors from `source`.
    ///
    /// Returns the keys of every registered descriptor, in order. Descriptors whose target does
    /// not resolve are registered without a marker and logged.
    pub fn set_beacons(&mut self, source: impl Into<BeaconSource<H::Element>>) -> Vec<BeaconKey> {
        self.remove_all();

        let beacons = parse(&self.host, source.into(), &self.options);
        let mut keys = Vec::with_capacity(beacons.len());
        for beacon in beacons {
            let target = resolve_target(&self.host, &beacon);
            if target.is_none() {
                log::warn!(
                    "beacon `{}`: target {:?} not found, no marker created",
                    beacon.id,
                    beacon.element
                );
            }
            let key = self.list.insert(beacon);
            if let Some(target) = target {
                self.attach(key, target);
            }
            keys.push(key);
        }

        if !self.is_empty() {
            self.install_listener();
        }
        log::debug!(
            "registered {} beacons with {} markers",
            keys.len(),
            self.cache.len()
        );
        keys
    }

    // --- lookup ---

    /// Descriptor registered as `key`.
    pub fn beacon(&self, key: BeaconKey) -> Option<&Beacon<H::Element>> {
        self.list.get(key)
    }

    /// First registered descriptor whose id equals `id`.
    pub fn key_of(&self, id: impl Into<BeaconId>) -> Option<BeaconKey> {
        self.list.find(&id.into())
    }

    /// Descriptor found by [`Beacons::key_of`].
    pub fn beacon_by_id(&self, id: impl Into<BeaconId>) -> Option<&Beacon<H::Element>> {
        self.key_of(id).and_then(|k| self.list.get(k))
    }

    /// Registered descriptors in registration order.
    pub fn beacons(&self) -> impl Iterator<Item = (BeaconKey, &Beacon<H::Element>)> + '_ {
        self.list.iter()
    }

    /// Number of registered descriptors, with or without a marker.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    /// Marker node of `key`.
    pub fn marker(&self, key: BeaconKey) -> Option<H::Element> {
        self.cache.get(key)
    }

    /// Descriptor key owning `marker`.
    pub fn key_for_marker(&self, marker: H::Element) -> Option<BeaconKey> {
        self.cache.key_of(marker)
    }

    /// The marker cache.
    pub fn cache(&self) -> &MarkerCache<H::Element, H::Listener> {
        &self.cache
    }

    /// Resolve `key`'s target element now.
    ///
    /// Selector targets are looked up afresh on every call, so this can be polled while waiting
    /// for an element to appear.
    pub fn resolve_element(&self, key: BeaconKey) -> Option<H::Element> {
        self.list
            .get(key)
            .and_then(|b| resolve_target(&self.host, b))
    }

    /// Returns true if `key`'s target currently resolves to something other than `fallback`.
    pub fn target_exists(&self, key: BeaconKey, fallback: Option<H::Element>) -> bool {
        self.resolve_element(key)
            .is_some_and(|el| Some(el) != fallback)
    }

    // --- visibility ---

    /// Show `key`'s marker.
    ///
    /// Without `force`, the descriptor's show gate must agree. Returns true if the marker was
    /// shown.
    pub fn show(&mut self, key: BeaconKey, force: bool) -> bool {
        let (Some(beacon), Some(marker)) = (self.list.get(key), self.cache.get(key)) else {
            return false;
        };
        if !force && !beacon.can_show() {
            return false;
        }
        self.host.remove_class(marker, &self.options.classes.hidden);
        true
    }

    /// [`Beacons::show`] by id.
    pub fn show_id(&mut self, id: impl Into<BeaconId>, force: bool) -> bool {
        self.key_of(id).is_some_and(|k| self.show(k, force))
    }

    /// Hide `key`'s marker. Returns false if it has none.
    pub fn hide(&mut self, key: BeaconKey) -> bool {
        let Some(marker) = self.cache.get(key) else {
            return false;
        };
        self.host.add_class(marker, &self.options.classes.hidden);
        true
    }

    /// [`Beacons::hide`] by id.
    pub fn hide_id(&mut self, id: impl Into<BeaconId>) -> bool {
        self.key_of(id).is_some_and(|k| self.hide(k))
    }

    /// Show every marker, subject to each show gate unless `force`.
    pub fn show_all(&mut self, force: bool) {
        for key in self.list.keys() {
            self.show(key, force);
        }
    }

    /// Hide every marker.
    pub fn hide_all(&mut self) {
        for key in self.list.keys() {
            self.hide(key);
        }
    }

    /// Returns true if `key` has a marker that is not hidden.
    pub fn is_visible(&self, key: BeaconKey) -> bool {
        self.cache
            .get(key)
            .is_some_and(|m| !self.host.has_class(m, &self.options.classes.hidden))
    }

    // --- teardown ---

    /// Unregister `key` and destroy its marker.
    ///
    /// The target stays observed while another marker still targets it. The viewport listener is
    /// uninstalled once nothing is registered. Returns false for a stale key.
    pub fn remove(&mut self, key: BeaconKey) -> bool {
        let Some(beacon) = self.list.remove(key) else {
            return false;
        };
        if let Some(marker) = self.cache.remove(key) {
            self.host.remove_element(marker);
            if let Some(target) = resolve_target(&self.host, &beacon)
                && !self.is_marked(target)
                && let Some(observer) = self.host.resize_observer()
            {
                observer.unobserve(target);
            }
        }
        if self.is_empty() {
            self.uninstall_listener();
        }
        true
    }

    /// [`Beacons::remove`] by id.
    pub fn remove_id(&mut self, id: impl Into<BeaconId>) -> bool {
        self.key_of(id).is_some_and(|k| self.remove(k))
    }

    /// Unregister everything, stop all resize observation and uninstall the viewport listener.
    pub fn remove_all(&mut self) {
        for key in self.list.keys() {
            self.remove(key);
        }
        if let Some(observer) = self.host.resize_observer() {
            observer.disconnect();
        }
        self.uninstall_listener();
    }

    // --- layout ---

    /// Recompute and apply the position of every marker whose target still resolves.
    pub fn refresh(&mut self) {
        for key in self.list.keys() {
            let Some(marker) = self.cache.get(key) else {
                continue;
            };
            let Some(target) = self.resolve_element(key) else {
                continue;
            };
            self.place(key, target, marker);
        }
    }

    /// Handle a host layout notification.
    ///
    /// Refreshes and returns true when the event is for this engine's viewport listener or for an
    /// element one of its markers targets; other events are ignored.
    pub fn handle_layout_event(&mut self, event: LayoutEvent<H::Element, H::Listener>) -> bool {
        let relevant = match event {
            LayoutEvent::ViewportResized(l) => self.cache.viewport_listener() == Some(l),
            LayoutEvent::ElementResized(el) => self.is_marked(el),
        };
        if relevant {
            self.refresh();
        }
        relevant
    }

    // --- input ---

    /// Deliver a click on `marker` to its descriptor's click handler.
    ///
    /// When a handler exists, propagation is stopped before it runs and true is returned.
    pub fn dispatch_click(&self, marker: H::Element, event: &mut ClickEvent) -> bool {
        let Some(beacon) = self.cache.key_of(marker).and_then(|k| self.list.get(k)) else {
            return false;
        };
        let Some(handler) = beacon.on_click.as_ref() else {
            return false;
        };
        event.stop_propagation();
        handler(&*event, beacon);
        true
    }

    // --- internals ---

    fn attach(&mut self, key: BeaconKey, target: H::Element) {
        let marker = self.host.create_marker();
        if let Some(beacon) = self.list.get(key) {
            for class in beacon.class_names() {
                self.host.add_class(marker, class);
            }
        }
        let classes = &self.options.classes;
        self.host.add_class(marker, &classes.beacon);
        self.host.add_class(marker, &classes.hidden);
        if in_fixed_context(&self.host, target) {
            self.host.add_class(marker, &classes.fixed);
        }

        let parent = self
            .host
            .parent_of(target)
            .unwrap_or_else(|| self.host.body());
        self.host.append_child(parent, marker);
        self.cache.insert(key, marker);
        self.place(key, target, marker);

        if let Some(observer) = self.host.resize_observer() {
            observer.observe(target);
        }
    }

    fn place(&mut self, key: BeaconKey, target: H::Element, marker: H::Element) {
        let Some(beacon) = self.list.get(key) else {
            return;
        };
        let position = beacon.position.unwrap_or(self.options.position);
        let boundary = beacon.boundary.unwrap_or(self.options.boundary);
        self.host.set_attribute(
            marker,
            &self.options.position_attribute(),
            position.as_str(),
        );
        self.host.set_attribute(
            marker,
            &self.options.boundary_attribute(),
            boundary.as_str(),
        );
        let offset = compute_position(
            self.host.offset_box(target),
            self.host.computed_size(marker),
            position,
            boundary,
        );
        self.host.set_offset(marker, offset);
    }

    /// Returns true if some live marker targets `el`.
    fn is_marked(&self, el: H::Element) -> bool {
        self.list.iter().any(|(k, b)| {
            self.cache.get(k).is_some() && resolve_target(&self.host, b) == Some(el)
        })
    }

    fn install_listener(&mut self) {
        if self.cache.viewport_listener().is_some() {
            return;
        }
        let listener = self.host.add_viewport_listener();
        self.cache.set_viewport_listener(listener);
        log::debug!("installed viewport listener {listener:?}");
    }

    fn uninstall_listener(&mut self) {
        if let Some(listener) = self.cache.take_viewport_listener() {
            self.host.remove_viewport_listener(listener);
            log::debug!("removed viewport listener {listener:?}");
        }
    }
}

fn resolve_target<H: Host>(host: &H, beacon: &Beacon<H::Element>) -> Option<H::Element> {
    match beacon.element.as_ref()? {
        ElementRef::Handle(el) => host.contains(*el).then_some(*el),
        ElementRef::Selector(selector) => host.query_selector(selector),
    }
}
