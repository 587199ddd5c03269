// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_beacon::{BeaconSource, BeaconSpec, Beacons, Position};
use understory_document::{Document, ElementData, ElementId};

/// A body with `n` cards laid out in rows of ten, each declaring one beacon.
fn gen_page(n: usize) -> (Document, Vec<ElementId>) {
    let mut doc = Document::new();
    doc.set_class_size("gc-beacon", Size::new(10.0, 10.0));
    let body = doc.body();
    let cards = (0..n)
        .map(|i| {
            let x0 = (i % 10) as f64 * 100.0;
            let y0 = (i / 10) as f64 * 60.0;
            doc.insert(
                Some(body),
                ElementData::new("div")
                    .with_attribute("data-beacon", &format!("b{i}"))
                    .with_attribute("data-beacon-position", "top-right")
                    .with_attribute("data-beacon-boundary", "outer")
                    .with_bounds(Rect::new(x0, y0, x0 + 80.0, y0 + 40.0)),
            )
        })
        .collect();
    (doc, cards)
}

fn bench_set_beacons(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_beacons");
    for &n in &[16_usize, 128] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("declared_n{n}"), |b| {
            b.iter_batched(
                || Beacons::new(gen_page(n).0),
                |mut beacons| {
                    let keys = beacons.set_beacons(BeaconSource::declared());
                    black_box(keys.len());
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("programmatic_n{n}"), |b| {
            b.iter_batched(
                || {
                    let (doc, cards) = gen_page(n);
                    let specs: Vec<_> = cards
                        .into_iter()
                        .map(|c| BeaconSpec::for_element(c).with_position(Position::Bottom))
                        .collect();
                    (Beacons::new(doc), specs)
                },
                |(mut beacons, specs)| {
                    let keys = beacons.set_beacons(specs);
                    black_box(keys.len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh");
    for &n in &[16_usize, 128] {
        let (doc, cards) = gen_page(n);
        let mut beacons = Beacons::new(doc);
        beacons.set_beacons(BeaconSource::declared());
        let mut grow = false;
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("after_resize_n{n}"), |b| {
            b.iter(|| {
                grow = !grow;
                let w = if grow { 120.0 } else { 80.0 };
                for c in &cards {
                    let r = beacons.host().bounds(*c).unwrap_or(Rect::ZERO);
                    beacons
                        .host_mut()
                        .set_bounds(*c, Rect::new(r.x0, r.y0, r.x0 + w, r.y1));
                }
                let _ = beacons.host_mut().drain_events();
                beacons.refresh();
                black_box(beacons.cache().len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_set_beacons, bench_refresh);
criterion_main!(benches);
