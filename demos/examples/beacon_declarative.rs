// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative beacons read from element attributes.
//!
//! Two elements declare beacons with `data-beacon`; shared fields use `data-beacon-<field>` and
//! per-beacon overrides use `data-beacon-<id>-<field>`. A click handler is registered by name and
//! referenced from `data-beacon-<id>-onclick`.
//!
//! Run:
//! - `cargo run -p understory_beacon_demos --example beacon_declarative`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use understory_beacon::{BeaconOptions, BeaconSource, Beacons, ClickEvent};
use understory_document::{Document, ElementData, ElementId};

fn main() {
    let mut doc = Document::new();
    doc.set_class_size("gc-beacon", Size::new(12.0, 12.0));

    let toolbar = doc.insert(
        Some(doc.body()),
        ElementData::new("header")
            .with_attribute("data-beacon", "search,profile")
            .with_attribute("data-beacon-position", "bottom")
            .with_attribute("data-beacon-boundary", "outer")
            .with_attribute("data-beacon-profile-position", "right")
            .with_attribute("data-beacon-profile-onclick", "open_profile_tip")
            .with_attribute("data-beacon-title", "Toolbar")
            .with_bounds(Rect::new(0.0, 0.0, 400.0, 40.0)),
    );
    let editor = doc.insert(
        Some(doc.body()),
        ElementData::new("main")
            .with_attribute("data-beacon", "editor")
            .with_attribute("data-beacon-class", "pulse")
            .with_bounds(Rect::new(0.0, 60.0, 400.0, 360.0)),
    );

    let log = Rc::new(RefCell::new(Vec::new()));
    let mut options: BeaconOptions<ElementId> = BeaconOptions::default();
    {
        let log = log.clone();
        options
            .callbacks
            .register("open_profile_tip", move |event, beacon| {
                log.borrow_mut().push(format!("{} at {:?}", beacon.id, event.point));
            });
    }

    let mut beacons = Beacons::with_options(doc, options);

    // Only the toolbar beacons.
    let keys = beacons.set_beacons("search, profile");
    assert_eq!(keys.len(), 2);

    println!("Registered beacons:");
    for (key, beacon) in beacons.beacons() {
        let marker = beacons.marker(key).expect("every toolbar beacon has a marker");
        let doc = beacons.host();
        println!(
            "  {:<8} {:>6}/{:<5} offset={:?} title={:?}",
            beacon.id.to_string(),
            doc.attribute(marker, "data-beacon-position").unwrap_or("?"),
            doc.attribute(marker, "data-beacon-boundary").unwrap_or("?"),
            doc.style_offset(marker),
            beacon.attributes.get("title"),
        );
    }

    let search = beacons.key_of("search").expect("search registered");
    let profile = beacons.key_of("profile").expect("profile registered");
    let offset = |key| beacons.marker(key).and_then(|m| beacons.host().style_offset(m));
    assert_eq!(offset(search), Some(Point::new(194.0, 40.0)), "bottom/outer");
    assert_eq!(offset(profile), Some(Point::new(400.0, 14.0)), "right/outer override");
    assert_eq!(beacons.resolve_element(search), Some(toolbar));

    // Markers start hidden; reveal them.
    beacons.show_all(false);
    assert!(beacons.is_visible(search) && beacons.is_visible(profile));

    // Route a click on the profile marker.
    let marker = beacons.marker(profile).expect("profile marker");
    let mut click = ClickEvent::new(Point::new(405.0, 20.0));
    assert!(beacons.dispatch_click(marker, &mut click));
    assert!(click.is_propagation_stopped());
    println!("Click log: {:?}", log.borrow());
    assert_eq!(log.borrow().len(), 1);

    // Every declared beacon, including the editor one.
    let keys = beacons.set_beacons(BeaconSource::declared());
    assert_eq!(keys.len(), 3);
    let editor_key = beacons.key_of("editor").expect("editor registered");
    let editor_marker = beacons.marker(editor_key).expect("editor marker");
    assert!(beacons.host().has_class(editor_marker, "pulse"));
    assert_eq!(beacons.resolve_element(editor_key), Some(editor));
    assert!(
        !beacons.host().is_alive(marker),
        "the previous batch was torn down"
    );

    beacons.remove_all();
    assert!(beacons.cache().is_empty());
    assert!(beacons.host().viewport_listeners().is_empty());
    println!("Torn down.");
}
