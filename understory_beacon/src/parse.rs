// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Descriptor parsing.
//!
//! ## Declarative beacons
//!
//! An element declares beacons with the prefix attribute (by default `data-beacon`) holding a
//! comma-separated id list. Sibling attributes supply fields:
//!
//! - `data-beacon-<field>` applies to every beacon declared on the element.
//! - `data-beacon-<id>-<field>` applies to beacon `<id>` only, and wins over the former.
//!
//! Field names never contain `-`. The fields `position`, `boundary`, `class` and `onclick` fill
//! the matching [`Beacon`] members; anything else lands in [`Beacon::attributes`]. `onclick` names
//! a handler in [`BeaconOptions::callbacks`]; it is never evaluated as code.
//!
//! ```html
//! <div data-beacon="a,b" data-beacon-position="left" data-beacon-a-position="top"></div>
//! ```
//!
//! yields `a` at `top` and `b` at `left`. Declarative descriptors take the instance defaults for
//! anything the attributes leave unset.
//!
//! ## Programmatic beacons
//!
//! [`BeaconSpec`] values become descriptors in input order; a spec without an id is identified by
//! its index.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::host::Host;
use crate::options::BeaconOptions;
use crate::types::{
    Beacon, BeaconId, BeaconSource, BeaconSpec, Boundary, ElementRef, Position, split_ids,
};

/// Build descriptors from `source`.
pub fn parse<H: Host>(
    host: &H,
    source: BeaconSource<H::Element>,
    options: &BeaconOptions<H::Element>,
) -> Vec<Beacon<H::Element>> {
    match source {
        BeaconSource::Declared(ids) => declared_beacons(host, &ids, options),
        BeaconSource::Specs(specs) => spec_beacons(specs),
    }
}

/// Scan the document for declared beacons, in document order.
///
/// Only ids in `ids` are kept, unless `ids` is empty.
pub fn declared_beacons<H: Host>(
    host: &H,
    ids: &[String],
    options: &BeaconOptions<H::Element>,
) -> Vec<Beacon<H::Element>> {
    let prefix = options.data_prefix.as_str();
    let mut out = Vec::new();
    for el in host.elements_with_attribute(prefix) {
        let Some(declared) = host.attribute(el, prefix) else {
            continue;
        };
        let attributes = host.attributes(el);
        for id in split_ids(&declared) {
            if !ids.is_empty() && !ids.contains(&id) {
                continue;
            }
            let fields = collect_fields(&attributes, prefix, &id);
            out.push(declared_beacon(el, id, fields, options));
        }
    }
    out
}

/// Turn programmatic specs into descriptors, in input order.
pub fn spec_beacons<E>(specs: Vec<BeaconSpec<E>>) -> Vec<Beacon<E>> {
    specs
        .into_iter()
        .enumerate()
        .map(|(i, spec)| spec.into_beacon(i))
        .collect()
}

/// Global fields merged with the fields scoped to `id`; scoped fields win.
fn collect_fields(
    attributes: &[(String, String)],
    prefix: &str,
    id: &str,
) -> BTreeMap<String, String> {
    let mut global = BTreeMap::new();
    let mut scoped = BTreeMap::new();
    for (name, value) in attributes {
        let Some(rest) = name
            .strip_prefix(prefix)
            .and_then(|r| r.strip_prefix('-'))
        else {
            continue;
        };
        if is_field(rest) {
            global.insert(rest.into(), value.clone());
        } else if let Some(field) = rest
            .strip_prefix(id)
            .and_then(|r| r.strip_prefix('-'))
            .filter(|f| is_field(f))
        {
            scoped.insert(field.into(), value.clone());
        }
    }
    global.extend(scoped);
    global
}

fn is_field(name: &str) -> bool {
    !name.is_empty() && !name.contains('-')
}

fn declared_beacon<E: Copy>(
    el: E,
    id: String,
    fields: BTreeMap<String, String>,
    options: &BeaconOptions<E>,
) -> Beacon<E> {
    let mut beacon = Beacon::new(BeaconId::Name(id));
    beacon.position = Some(options.position);
    beacon.boundary = Some(options.boundary);
    beacon.element = Some(ElementRef::Handle(el));
    for (field, value) in fields {
        match field.as_str() {
            "position" => beacon.position = Some(Position::parse(&value)),
            "boundary" => beacon.boundary = Some(Boundary::parse(&value)),
            "class" => beacon.class = Some(value),
            "onclick" => {
                beacon.on_click = options.callbacks.get(value.trim());
                if beacon.on_click.is_none() {
                    log::warn!(
                        "beacon `{}`: no click handler registered as `{}`",
                        beacon.id,
                        value
                    );
                }
            }
            _ => {
                beacon.attributes.insert(field, value);
            }
        }
    }
    beacon
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_document::{Document, ElementData, ElementId};

    fn doc_with(elements: &[ElementData]) -> (Document, Vec<ElementId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let ids = elements
            .iter()
            .map(|e| doc.insert(Some(body), e.clone()))
            .collect();
        (doc, ids)
    }

    fn names<E>(beacons: &[Beacon<E>]) -> Vec<String> {
        beacons.iter().map(|b| alloc::format!("{}", b.id)).collect()
    }

    #[test]
    fn scoped_fields_override_global_fields() {
        let (doc, els) = doc_with(&[ElementData::new("div")
            .with_attribute("data-beacon", "a,b")
            .with_attribute("data-beacon-position", "left")
            .with_attribute("data-beacon-a-position", "top")]);
        let beacons = declared_beacons(&doc, &[], &BeaconOptions::default());
        assert_eq!(names(&beacons), vec!["a", "b"]);
        assert_eq!(beacons[0].position, Some(Position::Top), "scoped wins");
        assert_eq!(beacons[1].position, Some(Position::Left), "global applies");
        for b in &beacons {
            assert_eq!(b.element, Some(ElementRef::Handle(els[0])));
            assert_eq!(b.boundary, Some(Boundary::Inner), "instance default");
        }
    }

    #[test]
    fn id_filter_and_document_order() {
        let (doc, els) = doc_with(&[
            ElementData::new("div").with_attribute("data-beacon", "c"),
            ElementData::new("div").with_attribute("data-beacon", "a, b"),
            ElementData::new("div").with_attribute("data-beacon", ""),
            ElementData::new("div").with_attribute("data-beacon-a-position", "top"),
        ]);
        let opts = BeaconOptions::default();

        let all = declared_beacons(&doc, &[], &opts);
        assert_eq!(names(&all), vec!["c", "a", "b"], "empty declaration yields nothing");

        let some = declared_beacons(&doc, &[String::from("b"), String::from("c")], &opts);
        assert_eq!(names(&some), vec!["c", "b"], "document order, not filter order");
        assert_eq!(some[1].element, Some(ElementRef::Handle(els[1])));

        let none = declared_beacons(&doc, &[String::from("zzz")], &opts);
        assert!(none.is_empty());
    }

    #[test]
    fn ids_match_exactly_not_by_substring() {
        let (doc, _) = doc_with(&[ElementData::new("div").with_attribute("data-beacon", "step10")]);
        let found = declared_beacons(&doc, &[String::from("step1")], &BeaconOptions::default());
        assert!(found.is_empty());
    }

    #[test]
    fn fields_are_typed_or_kept_verbatim() {
        let (doc, _) = doc_with(&[ElementData::new("div")
            .with_attribute("data-beacon", "a")
            .with_attribute("data-beacon-boundary", "sideways")
            .with_attribute("data-beacon-class", "pulse big")
            .with_attribute("data-beacon-title", "Hello")
            .with_attribute("data-beacon-a-title", "Hi a")
            .with_attribute("data-beacon-x-y-z", "ignored")
            .with_attribute("data-beacon-position", "middle")]);
        let b = &declared_beacons(&doc, &[], &BeaconOptions::default())[0];
        assert_eq!(b.boundary, Some(Boundary::Outer), "unknown boundary normalizes");
        assert_eq!(b.position, Some(Position::Center), "unknown position falls back");
        assert_eq!(b.class.as_deref(), Some("pulse big"));
        assert_eq!(b.attributes.get("title").map(String::as_str), Some("Hi a"));
        assert_eq!(b.attributes.len(), 1, "multi-dash names are not fields");
    }

    #[test]
    fn instance_defaults_apply_to_declared_beacons() {
        let (doc, _) = doc_with(&[ElementData::new("div").with_attribute("data-beacon", "a")]);
        let opts = BeaconOptions {
            position: Position::BottomRight,
            boundary: Boundary::Outer,
            ..Default::default()
        };
        let b = &declared_beacons(&doc, &[], &opts)[0];
        assert_eq!(b.position, Some(Position::BottomRight));
        assert_eq!(b.boundary, Some(Boundary::Outer));
    }

    #[test]
    fn custom_prefix() {
        let (doc, _) = doc_with(&[ElementData::new("div")
            .with_attribute("data-hint", "a")
            .with_attribute("data-hint-position", "top")
            .with_attribute("data-beacon", "b")]);
        let opts = BeaconOptions {
            data_prefix: "data-hint".into(),
            ..Default::default()
        };
        let beacons = declared_beacons(&doc, &[], &opts);
        assert_eq!(names(&beacons), vec!["a"]);
        assert_eq!(beacons[0].position, Some(Position::Top));
    }

    #[test]
    fn onclick_resolves_through_registry() {
        let (doc, _) = doc_with(&[
            ElementData::new("div")
                .with_attribute("data-beacon", "a")
                .with_attribute("data-beacon-onclick", "open"),
            ElementData::new("div")
                .with_attribute("data-beacon", "b")
                .with_attribute("data-beacon-onclick", "alert('x')"),
        ]);
        let mut opts: BeaconOptions<ElementId> = BeaconOptions::default();
        opts.callbacks.register("open", |_, _| {});
        let beacons = declared_beacons(&doc, &[], &opts);
        assert!(beacons[0].on_click.is_some());
        assert!(beacons[1].on_click.is_none(), "source text is never evaluated");
        assert!(beacons[1].attributes.is_empty(), "onclick is not a free-form field");
    }

    #[test]
    fn detached_declarations_are_not_scanned() {
        let mut doc = Document::new();
        let _ = doc.create_element(ElementData::new("div").with_attribute("data-beacon", "a"));
        assert!(declared_beacons(&doc, &[], &BeaconOptions::default()).is_empty());
    }

    #[test]
    fn specs_keep_order_and_index_ids() {
        let doc = Document::new();
        let source: BeaconSource<ElementId> = vec![
            BeaconSpec::new("#one"),
            BeaconSpec::new("#two").with_id("two"),
            BeaconSpec::for_element(doc.body()).with_position(Position::Top),
        ]
        .into();
        let beacons = parse(&doc, source, &BeaconOptions::default());
        assert_eq!(names(&beacons), vec!["0", "two", "2"]);
        assert_eq!(beacons[2].element, Some(ElementRef::Handle(doc.body())));
        assert_eq!(beacons[0].position, None, "programmatic defaults resolve at layout time");
    }

    #[test]
    fn single_spec_source() {
        let doc = Document::new();
        let beacons = parse(
            &doc,
            BeaconSpec::new("#x").into(),
            &BeaconOptions::default(),
        );
        assert_eq!(beacons.len(), 1);
        assert_eq!(beacons[0].id, BeaconId::Index(0));
    }
}
