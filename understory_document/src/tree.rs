// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, attributes, layout, and notifications.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect, Size};

use crate::selector::Selector;
use crate::types::{DocumentEvent, ElementData, ElementFlags, ElementId, ListenerId};

/// Viewport used by [`Document::new`].
pub const DEFAULT_VIEWPORT: Size = Size::new(1024.0, 768.0);

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A retained element tree standing in for a rendered document.
///
/// The document always has a root element (`html`) with a `body` child. Elements created with
/// [`Document::create_element`] are detached until appended somewhere under the root; detached
/// elements are invisible to queries.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: ElementId,
    body: ElementId,
    viewport: Size,
    next_listener: u32,
    listeners: Vec<ListenerId>,
    // `None` when the document offers no per-element resize observation.
    observed: Option<Vec<ElementId>>,
    class_sizes: Vec<(String, Size)>,
    events: Vec<DocumentEvent>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("viewport", &self.viewport)
            .field("listeners", &self.listeners)
            .field("observed", &self.observed)
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    data: ElementData,
}

impl Node {
    fn new(generation: u32, data: ElementData) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
        }
    }
}

impl Document {
    /// Create a document holding `html` and `body`, with [`DEFAULT_VIEWPORT`] and resize observation.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: ElementId::new(0, 0),
            body: ElementId::new(0, 0),
            viewport: DEFAULT_VIEWPORT,
            next_listener: 0,
            listeners: Vec::new(),
            observed: Some(Vec::new()),
            class_sizes: Vec::new(),
            events: Vec::new(),
        };
        let viewport = Rect::from_origin_size(Point::ZERO, DEFAULT_VIEWPORT);
        doc.root = doc.insert(None, ElementData::new("html").with_bounds(viewport));
        doc.body = doc.insert(Some(doc.root), ElementData::new("body").with_bounds(viewport));
        doc
    }

    /// Builder: drop per-element resize observation support.
    pub fn without_resize_observation(mut self) -> Self {
        self.observed = None;
        self
    }

    /// The root (`html`) element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// The `body` element.
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Insert a new element as the last child of `parent` (or detached if `None`).
    pub fn insert(&mut self, parent: Option<ElementId>, data: ElementData) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = ElementId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, data: ElementData) -> ElementId {
        self.insert(None, data)
    }

    /// Move `child` to the end of `parent`'s children.
    ///
    /// Appending an element under itself or one of its descendants is ignored.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if !self.is_alive(parent) || !self.is_alive(child) || self.is_ancestor_or_self(child, parent)
        {
            return;
        }
        if let Some(old) = self.node(child).parent {
            self.unlink_parent(child, old);
        }
        self.link_parent(child, parent);
    }

    /// Remove an element and its subtree. The root and body cannot be removed.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) || id == self.root || id == self.body {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes[next.idx()].take() else {
                continue;
            };
            stack.extend(node.children);
            if let Some(observed) = &mut self.observed {
                observed.retain(|o| *o != next);
            }
            self.free_list.push(next.idx());
        }
    }

    /// Returns true if `id` refers to a live element.
    ///
    /// See [`ElementId`] docs for the generational semantics.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns true if `id` is live and reachable from the root.
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.is_alive(id) && self.is_ancestor_or_self(self.root, id)
    }

    /// Element data, if `id` is live.
    pub fn element(&self, id: ElementId) -> Option<&ElementData> {
        self.node_opt(id).map(|n| &n.data)
    }

    /// Parent of `id`, if any.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id)?.parent
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    // --- attributes and classes ---

    /// Attribute value.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.node_opt(id)?
            .data
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, keeping its declaration slot if it already exists.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        match n.data.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.into(),
            None => n.data.attributes.push((name.into(), value.into())),
        }
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.attributes.retain(|(k, _)| k != name);
        }
    }

    /// Add a class if not already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(n) = self.node_opt_mut(id)
            && !n.data.classes.iter().any(|c| c == class)
        {
            n.data.classes.push(class.into());
        }
    }

    /// Remove a class.
    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.classes.retain(|c| c != class);
        }
    }

    /// Returns true if the element carries `class`.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.data.classes.iter().any(|c| c == class))
    }

    // --- layout ---

    /// Offset box of the element.
    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.data.bounds)
    }

    /// Update the offset box. Queues [`DocumentEvent::ElementResized`] when an observed element
    /// changes size.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        let resized = n.data.bounds.size() != bounds.size();
        n.data.bounds = bounds;
        if resized && self.is_observed(id) {
            self.events.push(DocumentEvent::ElementResized(id));
        }
    }

    /// Set or clear the `position: fixed` flag.
    pub fn set_fixed(&mut self, id: ElementId, fixed: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.flags.set(ElementFlags::FIXED, fixed);
        }
    }

    /// Returns true if the element's computed `position` is `fixed`.
    pub fn is_fixed(&self, id: ElementId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.data.flags.contains(ElementFlags::FIXED))
    }

    /// Declare a stylesheet size for elements carrying `class`. Later rules win.
    pub fn set_class_size(&mut self, class: &str, size: Size) {
        self.class_sizes.retain(|(c, _)| c != class);
        self.class_sizes.push((class.into(), size));
    }

    /// Computed size: the last class size rule matching the element, else its offset box size.
    pub fn computed_size(&self, id: ElementId) -> Size {
        let Some(n) = self.node_opt(id) else {
            return Size::ZERO;
        };
        self.class_sizes
            .iter()
            .rev()
            .find(|(class, _)| n.data.classes.iter().any(|c| c == class))
            .map_or(n.data.bounds.size(), |(_, size)| *size)
    }

    /// Position an element absolutely at `offset` (its style `left`/`top`).
    pub fn set_style_offset(&mut self, id: ElementId, offset: Point) {
        let size = self.computed_size(id);
        if let Some(n) = self.node_opt_mut(id) {
            n.data.flags |= ElementFlags::ABSOLUTE;
            n.data.style_offset = Some(offset);
            n.data.bounds = Rect::from_origin_size(offset, size);
        }
    }

    /// Style offset last applied with [`Document::set_style_offset`].
    pub fn style_offset(&self, id: ElementId) -> Option<Point> {
        self.node_opt(id)?.data.style_offset
    }

    // --- queries ---

    /// Connected elements in document (pre-)order, starting at the root.
    pub fn document_order(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// First connected element matching `selector` in document order.
    pub fn query_selector(&self, selector: &str) -> Option<ElementId> {
        let sel = Selector::parse(selector)?;
        self.document_order()
            .into_iter()
            .find(|id| self.element(*id).is_some_and(|e| sel.matches(e)))
    }

    /// All connected elements matching `selector` in document order.
    pub fn query_selector_all(&self, selector: &str) -> Vec<ElementId> {
        let Some(sel) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.document_order()
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(|e| sel.matches(e)))
            .collect()
    }

    // --- viewport ---

    /// Current viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Resize the viewport. Root and body follow, and every installed listener is notified.
    pub fn resize_viewport(&mut self, size: Size) {
        self.viewport = size;
        let rect = Rect::from_origin_size(Point::ZERO, size);
        for id in [self.root, self.body] {
            if let Some(n) = self.node_opt_mut(id) {
                n.data.bounds = rect;
            }
        }
        self.events.extend(
            self.listeners
                .iter()
                .map(|l| DocumentEvent::ViewportResized(*l)),
        );
    }

    /// Install a viewport resize listener.
    pub fn add_viewport_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        self.listeners.push(id);
        id
    }

    /// Uninstall a viewport resize listener. Returns false if it was not installed.
    pub fn remove_viewport_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| *l != id);
        before != self.listeners.len()
    }

    /// Installed viewport listeners.
    pub fn viewport_listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    // --- resize observation ---

    /// Returns true if the document can observe per-element resizes.
    pub fn supports_resize_observation(&self) -> bool {
        self.observed.is_some()
    }

    /// Start observing `id` for size changes. No-op without observation support.
    pub fn observe(&mut self, id: ElementId) {
        let alive = self.is_alive(id);
        if let Some(observed) = &mut self.observed
            && alive
            && !observed.contains(&id)
        {
            observed.push(id);
        }
    }

    /// Stop observing `id`.
    pub fn unobserve(&mut self, id: ElementId) {
        if let Some(observed) = &mut self.observed {
            observed.retain(|o| *o != id);
        }
    }

    /// Stop observing every element.
    pub fn disconnect_observer(&mut self) {
        if let Some(observed) = &mut self.observed {
            observed.clear();
        }
    }

    /// Returns true if `id` is currently observed.
    pub fn is_observed(&self, id: ElementId) -> bool {
        self.observed.as_ref().is_some_and(|o| o.contains(&id))
    }

    /// Number of observed elements.
    pub fn observed_count(&self) -> usize {
        self.observed.as_ref().map_or(0, Vec::len)
    }

    /// Take every queued notification, oldest first.
    pub fn drain_events(&mut self) -> Vec<DocumentEvent> {
        core::mem::take(&mut self.events)
    }

    // --- internals ---

    fn node(&self, id: ElementId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling ElementId")
    }

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn is_ancestor_or_self(&self, ancestor: ElementId, mut id: ElementId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn boxed(tag: &str, x: f64, y: f64, w: f64, h: f64) -> ElementData {
        ElementData::new(tag).with_bounds(Rect::new(x, y, x + w, y + h))
    }

    #[test]
    fn new_document_has_root_and_body() {
        let doc = Document::new();
        assert_eq!(doc.parent(doc.body()), Some(doc.root()));
        assert_eq!(doc.parent(doc.root()), None);
        assert_eq!(doc.element(doc.root()).unwrap().tag, "html");
        assert_eq!(doc.document_order(), vec![doc.root(), doc.body()]);
    }

    #[test]
    fn document_order_is_preorder() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.insert(Some(body), ElementData::new("div"));
        let a1 = doc.insert(Some(a), ElementData::new("span"));
        let b = doc.insert(Some(body), ElementData::new("div"));
        assert_eq!(
            doc.document_order(),
            vec![doc.root(), body, a, a1, b],
            "children come before later siblings"
        );
    }

    #[test]
    fn liveness_remove_reuse() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.insert(Some(body), ElementData::new("div"));
        let a1 = doc.insert(Some(a), ElementData::new("span"));
        doc.remove(a);
        assert!(!doc.is_alive(a));
        assert!(!doc.is_alive(a1), "subtree goes with its root");
        assert!(doc.children(body).is_empty());

        let b = doc.insert(Some(body), ElementData::new("div"));
        assert!(doc.is_alive(b));
        assert!(!doc.is_alive(a));
        if a.0 == b.0 || a1.0 == b.0 {
            assert!(b.1 > 1, "generation must increase on reuse");
        }
    }

    #[test]
    fn root_and_body_are_permanent() {
        let mut doc = Document::new();
        doc.remove(doc.body());
        doc.remove(doc.root());
        assert!(doc.is_alive(doc.body()));
        assert!(doc.is_alive(doc.root()));
    }

    #[test]
    fn detached_elements_are_not_queried() {
        let mut doc = Document::new();
        let el = doc.create_element(ElementData::new("div").with_attribute("id", "x"));
        assert!(doc.query_selector("#x").is_none());
        assert!(!doc.is_connected(el));
        doc.append_child(doc.body(), el);
        assert_eq!(doc.query_selector("#x"), Some(el));
        assert!(doc.is_connected(el));
    }

    #[test]
    fn append_child_rejects_cycles() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.insert(Some(body), ElementData::new("div"));
        let b = doc.insert(Some(a), ElementData::new("div"));
        doc.append_child(b, a);
        assert_eq!(doc.parent(a), Some(body));
        assert_eq!(doc.parent(b), Some(a));
    }

    #[test]
    fn attributes_and_classes() {
        let mut doc = Document::new();
        let el = doc.insert(Some(doc.body()), ElementData::new("div"));
        doc.set_attribute(el, "data-x", "1");
        doc.set_attribute(el, "data-y", "2");
        doc.set_attribute(el, "data-x", "3");
        let attrs = &doc.element(el).unwrap().attributes;
        assert_eq!(attrs[0], ("data-x".into(), "3".into()), "slot is kept on overwrite");
        doc.remove_attribute(el, "data-x");
        assert_eq!(doc.attribute(el, "data-x"), None);

        doc.add_class(el, "a");
        doc.add_class(el, "a");
        assert_eq!(doc.element(el).unwrap().classes.len(), 1);
        assert!(doc.has_class(el, "a"));
        doc.remove_class(el, "a");
        assert!(!doc.has_class(el, "a"));
    }

    #[test]
    fn computed_size_prefers_class_rules() {
        let mut doc = Document::new();
        let el = doc.insert(Some(doc.body()), boxed("div", 0.0, 0.0, 30.0, 40.0));
        assert_eq!(doc.computed_size(el), Size::new(30.0, 40.0));
        doc.set_class_size("dot", Size::new(10.0, 10.0));
        doc.set_class_size("big", Size::new(20.0, 20.0));
        doc.add_class(el, "dot");
        assert_eq!(doc.computed_size(el), Size::new(10.0, 10.0));
        doc.add_class(el, "big");
        assert_eq!(doc.computed_size(el), Size::new(20.0, 20.0), "later rule wins");
    }

    #[test]
    fn style_offset_moves_bounds() {
        let mut doc = Document::new();
        doc.set_class_size("dot", Size::new(10.0, 10.0));
        let el = doc.insert(Some(doc.body()), ElementData::new("div").with_class("dot"));
        doc.set_style_offset(el, Point::new(5.0, 7.0));
        assert_eq!(doc.style_offset(el), Some(Point::new(5.0, 7.0)));
        assert_eq!(doc.bounds(el), Some(Rect::new(5.0, 7.0, 15.0, 17.0)));
        assert!(
            doc.element(el)
                .unwrap()
                .flags
                .contains(ElementFlags::ABSOLUTE)
        );
    }

    #[test]
    fn observed_resize_queues_event() {
        let mut doc = Document::new();
        let el = doc.insert(Some(doc.body()), boxed("div", 0.0, 0.0, 10.0, 10.0));
        doc.set_bounds(el, Rect::new(0.0, 0.0, 20.0, 10.0));
        assert!(doc.drain_events().is_empty(), "unobserved resize is silent");

        doc.observe(el);
        doc.set_bounds(el, Rect::new(5.0, 5.0, 25.0, 15.0));
        assert!(doc.drain_events().is_empty(), "move without resize is silent");
        doc.set_bounds(el, Rect::new(0.0, 0.0, 30.0, 10.0));
        assert_eq!(doc.drain_events(), vec![DocumentEvent::ElementResized(el)]);

        doc.unobserve(el);
        doc.set_bounds(el, Rect::new(0.0, 0.0, 40.0, 10.0));
        assert!(doc.drain_events().is_empty());
    }

    #[test]
    fn observation_can_be_unsupported() {
        let mut doc = Document::new().without_resize_observation();
        let el = doc.insert(Some(doc.body()), boxed("div", 0.0, 0.0, 10.0, 10.0));
        doc.observe(el);
        assert!(!doc.supports_resize_observation());
        assert!(!doc.is_observed(el));
        assert_eq!(doc.observed_count(), 0);
    }

    #[test]
    fn removal_drops_observation() {
        let mut doc = Document::new();
        let el = doc.insert(Some(doc.body()), ElementData::new("div"));
        doc.observe(el);
        doc.remove(el);
        assert_eq!(doc.observed_count(), 0);
    }

    #[test]
    fn viewport_listeners() {
        let mut doc = Document::new();
        doc.resize_viewport(Size::new(800.0, 600.0));
        assert!(doc.drain_events().is_empty(), "no listeners, no events");

        let l1 = doc.add_viewport_listener();
        let l2 = doc.add_viewport_listener();
        assert_ne!(l1, l2);
        doc.resize_viewport(Size::new(640.0, 480.0));
        assert_eq!(
            doc.drain_events(),
            vec![
                DocumentEvent::ViewportResized(l1),
                DocumentEvent::ViewportResized(l2)
            ]
        );
        assert_eq!(doc.bounds(doc.body()), Some(Rect::new(0.0, 0.0, 640.0, 480.0)));

        assert!(doc.remove_viewport_listener(l1));
        assert!(!doc.remove_viewport_listener(l1));
        assert_eq!(doc.viewport_listeners(), &[l2]);
    }
}
