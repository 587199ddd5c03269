// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_beacon::{Boundary, Position, compute_position};

fn gen_targets(n: usize, cell: f64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Rect::new(x0, y0, x0 + cell * 0.8, y0 + cell * 0.5));
        }
    }
    out
}

fn bench_compute_position(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_position");
    let marker = Size::new(10.7, 10.2);
    for &n in &[16_usize, 64] {
        let targets = gen_targets(n, 40.0);
        group.throughput(Throughput::Elements((n * n * 18) as u64));
        group.bench_function(format!("all_placements_n{n}"), |b| {
            b.iter(|| {
                let mut acc = 0.0;
                for t in &targets {
                    for p in Position::ALL {
                        for boundary in [Boundary::Inner, Boundary::Outer] {
                            let pt = compute_position(*t, marker, p, boundary);
                            acc += pt.x + pt.y;
                        }
                    }
                }
                black_box(acc);
            });
        });
    }
    group.finish();
}

fn bench_parse_names(c: &mut Criterion) {
    let names = [
        "top-left",
        "top",
        "top-right",
        "left",
        "center",
        "right",
        "bottom-left",
        "bottom",
        "bottom-right",
        "nowhere",
    ];
    c.bench_function("position_parse", |b| {
        b.iter(|| {
            for name in names {
                black_box(Position::parse(black_box(name)));
            }
        });
    });
}

criterion_group!(benches, bench_compute_position, bench_parse_names);
criterion_main!(benches);
