// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Programmatic beacons, show gates, and a placement grid.
//!
//! Builds one beacon per position/boundary pair around a single card, prints the resulting marker
//! offsets as a table, then exercises show gates and removal.
//!
//! Run:
//! - `cargo run -p understory_beacon_demos --example beacon_programmatic`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use understory_beacon::{BeaconSpec, Beacons, Boundary, Position, compute_position};
use understory_document::{Document, ElementData};

fn main() {
    let card_box = Rect::new(100.0, 50.0, 180.0, 70.0);
    let marker_size = Size::new(10.0, 10.0);

    let mut doc = Document::new();
    doc.set_class_size("gc-beacon", marker_size);
    let card = doc.insert(
        Some(doc.body()),
        ElementData::new("div")
            .with_attribute("id", "card")
            .with_bounds(card_box),
    );

    let specs: Vec<_> = Position::ALL
        .into_iter()
        .flat_map(|p| [Boundary::Inner, Boundary::Outer].map(move |b| (p, b)))
        .map(|(p, b)| {
            BeaconSpec::new("#card")
                .with_id(format!("{p}/{b}"))
                .with_position(p)
                .with_boundary(b)
        })
        .collect();

    let mut beacons = Beacons::new(doc);
    let keys = beacons.set_beacons(specs);
    assert_eq!(keys.len(), 18);

    println!("{:<20} {:>14}", "position/boundary", "offset");
    for (key, beacon) in beacons.beacons() {
        let marker = beacons.marker(key).expect("#card resolves");
        let offset = beacons.host().style_offset(marker).expect("placed");
        println!("{:<20} {:>6},{:>6}", beacon.id.to_string(), offset.x, offset.y);

        let expected = compute_position(
            card_box,
            marker_size,
            beacon.position.expect("set on every spec"),
            beacon.boundary.expect("set on every spec"),
        );
        assert_eq!(offset, expected, "{}", beacon.id);
    }
    let corner = beacons.key_of("top-right/outer").expect("registered");
    let corner_marker = beacons.marker(corner).expect("marker");
    assert_eq!(
        beacons.host().style_offset(corner_marker),
        Some(Point::new(180.0, 40.0))
    );

    // Show gates: a fixed flag and a predicate evaluated on every show.
    let unlocked = Rc::new(Cell::new(false));
    let gate = unlocked.clone();
    let keys = beacons.set_beacons(vec![
        BeaconSpec::for_element(card).with_id("intro"),
        BeaconSpec::for_element(card)
            .with_id("advanced")
            .with_position(Position::BottomRight)
            .can_show_with(move || gate.get()),
        BeaconSpec::for_element(card)
            .with_id("never")
            .can_show(false),
    ]);
    assert_eq!(beacons.cache().len(), 3, "previous grid was replaced");

    beacons.show_all(false);
    let visible = |b: &Beacons<Document>| {
        keys.iter()
            .filter(|k| b.is_visible(**k))
            .map(|k| b.beacon(*k).map(|d| d.id.to_string()).unwrap_or_default())
            .collect::<Vec<_>>()
    };
    println!("Visible after show_all: {:?}", visible(&beacons));
    assert_eq!(visible(&beacons), ["intro"]);

    unlocked.set(true);
    beacons.show_id("advanced", false);
    beacons.show_id("never", true);
    println!("Visible after unlocking: {:?}", visible(&beacons));
    assert_eq!(visible(&beacons), ["intro", "advanced", "never"]);

    // Removing one beacon keeps the viewport listener; removing the last drops it.
    assert!(beacons.remove_id("intro"));
    assert!(beacons.remove_id("advanced"));
    assert_eq!(beacons.host().viewport_listeners().len(), 1);
    assert!(beacons.remove_id("never"));
    assert!(beacons.host().viewport_listeners().is_empty());
    assert!(!beacons.remove_id("never"), "unknown ids are no-ops");
    println!("All beacons removed.");
}
