// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host implementation for Understory Document.
//!
//! ## Feature
//!
//! Enable with `document_adapter`.
//!
//! ## Notes
//!
//! [`Document`] queues its layout notifications instead of calling back. After mutating the
//! document, call [`pump`] to deliver the queued notifications to a [`Beacons`] instance that owns
//! it. A document built with [`Document::without_resize_observation`] reports no resize observer,
//! so only viewport changes refresh markers.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use understory_document::{Document, DocumentEvent, ElementData, ElementId, ListenerId};

use crate::Beacons;
use crate::host::{ElementTree, Host, LayoutEvent, ResizeObserver};

impl ElementTree for Document {
    type Element = ElementId;

    fn parent_of(&self, el: ElementId) -> Option<ElementId> {
        self.parent(el)
    }

    fn is_document_root(&self, el: ElementId) -> bool {
        el == self.root()
    }

    fn is_fixed(&self, el: ElementId) -> bool {
        Self::is_fixed(self, el)
    }
}

impl ResizeObserver<ElementId> for Document {
    fn observe(&mut self, el: ElementId) {
        Self::observe(self, el);
    }

    fn unobserve(&mut self, el: ElementId) {
        Self::unobserve(self, el);
    }

    fn disconnect(&mut self) {
        self.disconnect_observer();
    }
}

impl Host for Document {
    type Listener = ListenerId;

    fn contains(&self, el: ElementId) -> bool {
        self.is_alive(el)
    }

    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        Self::query_selector(self, selector)
    }

    fn elements_with_attribute(&self, name: &str) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|id| Self::attribute(self, *id, name).is_some())
            .collect()
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        Self::attribute(self, el, name).map(Into::into)
    }

    fn attributes(&self, el: ElementId) -> Vec<(String, String)> {
        self.element(el)
            .map(|e| e.attributes.clone())
            .unwrap_or_default()
    }

    fn body(&self) -> ElementId {
        Self::body(self)
    }

    fn offset_box(&self, el: ElementId) -> Rect {
        self.bounds(el).unwrap_or(Rect::ZERO)
    }

    fn computed_size(&self, el: ElementId) -> Size {
        Self::computed_size(self, el)
    }

    fn create_marker(&mut self) -> ElementId {
        self.create_element(ElementData::new("div"))
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        Self::append_child(self, parent, child);
    }

    fn remove_element(&mut self, el: ElementId) {
        self.remove(el);
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        Self::add_class(self, el, class);
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        Self::remove_class(self, el, class);
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        Self::has_class(self, el, class)
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        Self::set_attribute(self, el, name, value);
    }

    fn remove_attribute(&mut self, el: ElementId, name: &str) {
        Self::remove_attribute(self, el, name);
    }

    fn set_offset(&mut self, el: ElementId, offset: Point) {
        self.set_style_offset(el, offset);
    }

    fn add_viewport_listener(&mut self) -> ListenerId {
        Self::add_viewport_listener(self)
    }

    fn remove_viewport_listener(&mut self, listener: ListenerId) {
        if !Self::remove_viewport_listener(self, listener) {
            log::debug!("viewport listener {listener:?} was not installed");
        }
    }

    fn resize_observer(&mut self) -> Option<&mut dyn ResizeObserver<ElementId>> {
        if self.supports_resize_observation() {
            Some(self)
        } else {
            None
        }
    }
}

/// Convert a document notification into the engine's event type.
pub fn layout_event(event: DocumentEvent) -> LayoutEvent<ElementId, ListenerId> {
    match event {
        DocumentEvent::ViewportResized(l) => LayoutEvent::ViewportResized(l),
        DocumentEvent::ElementResized(e) => LayoutEvent::ElementResized(e),
    }
}

/// Deliver every queued document notification to `beacons`.
///
/// Returns how many notifications triggered a refresh.
pub fn pump(beacons: &mut Beacons<Document>) -> usize {
    let events = beacons.host_mut().drain_events();
    events
        .into_iter()
        .filter(|e| beacons.handle_layout_event(layout_event(*e)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::in_fixed_context;

    #[test]
    fn document_answers_host_queries() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.insert(
            Some(body),
            ElementData::new("div")
                .with_attribute("data-beacon", "a")
                .with_attribute("title", "x"),
        );
        let _b = doc.insert(Some(body), ElementData::new("div"));
        let c = doc.insert(Some(a), ElementData::new("span").with_attribute("data-beacon", "c"));

        assert_eq!(Host::elements_with_attribute(&doc, "data-beacon"), [a, c]);
        assert_eq!(
            Host::attributes(&doc, a),
            [
                (String::from("data-beacon"), String::from("a")),
                (String::from("title"), String::from("x"))
            ]
        );
        assert_eq!(Host::attribute(&doc, c, "data-beacon").as_deref(), Some("c"));
        assert!(ElementTree::is_document_root(&doc, doc.root()));
        assert!(!ElementTree::is_document_root(&doc, body));
    }

    #[test]
    fn fixed_walk_over_document() {
        let mut doc = Document::new();
        let body = doc.body();
        let bar = doc.insert(Some(body), ElementData::new("nav").fixed());
        let item = doc.insert(Some(bar), ElementData::new("a"));
        let plain = doc.insert(Some(body), ElementData::new("p"));
        assert!(in_fixed_context(&doc, item));
        assert!(!in_fixed_context(&doc, plain));

        doc.set_fixed(body, true);
        assert!(!in_fixed_context(&doc, plain), "body is never consulted");
    }

    #[test]
    fn resize_observer_availability() {
        let mut doc = Document::new();
        assert!(Host::resize_observer(&mut doc).is_some());
        let mut bare = Document::new().without_resize_observation();
        assert!(Host::resize_observer(&mut bare).is_none());
    }

    #[test]
    fn markers_are_placed_by_style_offset() {
        let mut doc = Document::new();
        doc.set_class_size("gc-beacon", Size::new(12.0, 12.0));
        let m = Host::create_marker(&mut doc);
        Host::add_class(&mut doc, m, "gc-beacon");
        Host::set_offset(&mut doc, m, Point::new(5.0, 6.0));
        assert_eq!(doc.style_offset(m), Some(Point::new(5.0, 6.0)));
        assert_eq!(Host::offset_box(&doc, m), Rect::new(5.0, 6.0, 17.0, 18.0));
    }
}
