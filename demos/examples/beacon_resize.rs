// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keeping markers in place as layout changes.
//!
//! The document queues layout notifications; `pump` delivers them to the engine, which refreshes
//! on its own viewport listener and on observed targets. A second document without resize
//! observation shows the viewport-only fallback.
//!
//! Run:
//! - `cargo run -p understory_beacon_demos --example beacon_resize`

use kurbo::{Point, Rect, Size};
use understory_beacon::adapters::document::pump;
use understory_beacon::{BeaconSpec, Beacons, Boundary, Position};
use understory_document::{Document, ElementData, ElementId};

fn page(doc: &mut Document) -> ElementId {
    doc.set_class_size("gc-beacon", Size::new(8.0, 8.0));
    let body = doc.body();
    let sidebar = doc.insert(
        Some(body),
        ElementData::new("aside")
            .fixed()
            .with_bounds(Rect::new(0.0, 0.0, 200.0, 600.0)),
    );
    doc.insert(
        Some(sidebar),
        ElementData::new("button")
            .with_attribute("id", "save")
            .with_bounds(Rect::new(20.0, 20.0, 120.0, 52.0)),
    )
}

fn main() {
    let mut doc = Document::new();
    let save = page(&mut doc);

    let mut beacons = Beacons::new(doc);
    let key = beacons.set_beacons(
        BeaconSpec::new("#save")
            .with_position(Position::TopRight)
            .with_boundary(Boundary::Outer),
    )[0];
    let marker = beacons.marker(key).expect("#save resolves");
    let offset = |b: &Beacons<Document>| b.host().style_offset(marker);

    println!("Initial offset: {:?}", offset(&beacons));
    assert_eq!(offset(&beacons), Some(Point::new(120.0, 12.0)));
    assert!(
        beacons.host().has_class(marker, "gc-beacon-fixed"),
        "target lives in a fixed sidebar"
    );
    let _ = beacons.host_mut().drain_events();

    // The button grows: the observed target reports a resize.
    beacons
        .host_mut()
        .set_bounds(save, Rect::new(20.0, 20.0, 160.0, 60.0));
    let refreshed = pump(&mut beacons);
    println!("After target resize ({refreshed} refresh): {:?}", offset(&beacons));
    assert_eq!(refreshed, 1);
    assert_eq!(offset(&beacons), Some(Point::new(160.0, 12.0)));

    // A viewport change reaches the engine's own listener.
    beacons.host_mut().resize_viewport(Size::new(1280.0, 800.0));
    assert_eq!(pump(&mut beacons), 1);

    // Without per-element observation, only viewport changes refresh markers.
    let mut bare = Document::new().without_resize_observation();
    let save = page(&mut bare);
    let mut fallback = Beacons::new(bare);
    let key = fallback.set_beacons(BeaconSpec::for_element(save))[0];
    let marker = fallback.marker(key).expect("marker");
    let center = |b: &Beacons<Document>| b.host().style_offset(marker);
    assert_eq!(center(&fallback), Some(Point::new(66.0, 32.0)));

    fallback
        .host_mut()
        .set_bounds(save, Rect::new(20.0, 20.0, 160.0, 60.0));
    assert_eq!(pump(&mut fallback), 0, "no resize observation");
    assert_eq!(center(&fallback), Some(Point::new(66.0, 32.0)), "stale until the viewport moves");

    fallback.host_mut().resize_viewport(Size::new(1280.0, 800.0));
    assert_eq!(pump(&mut fallback), 1);
    println!("Fallback offset after viewport resize: {:?}", center(&fallback));
    assert_eq!(center(&fallback), Some(Point::new(86.0, 36.0)));

    beacons.remove_all();
    fallback.remove_all();
    assert_eq!(beacons.host().observed_count(), 0);
}
