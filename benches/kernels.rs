// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::{criterion_group, criterion_main, Criterion};
use mandelfield::engine::KERNELS;
use mandelfield::{Engine, Field, LaneBatch, Viewport};

const CLASSIC: Viewport = Viewport {
    xmin: -2.5,
    xmax: 1.0,
    ymin: -1.2,
    ymax: 1.2,
};

fn single_thread_kernels(c: &mut Criterion) {
    for kernel in KERNELS.iter() {
        let engine = Engine::new().with_kernel(*kernel).with_threads(1);
        let mut field = Field::new(160, 120).unwrap();
        c.bench_function(&format!("{} 160x120", kernel), move |b| {
            b.iter(|| engine.compute(&mut field, 256, &CLASSIC))
        });
    }
}

fn threaded_tiles(c: &mut Criterion) {
    let engine = Engine::new();
    let mut field = Field::new(640, 360).unwrap();
    c.bench_function("tiled4 640x360 all threads", move |b| {
        b.iter(|| engine.compute(&mut field, 256, &CLASSIC))
    });
}

// The same four points through the packed and the plain-array batch.
fn packed_against_portable(c: &mut Criterion) {
    let batch = LaneBatch {
        x: [-0.75, -0.1, 0.3, -1.25],
        y: [0.1, 0.651, 0.5, 0.02],
    };
    c.bench_function("batch of 4, packed", move |b| {
        b.iter(|| batch.escape_times(1000, true))
    });
    c.bench_function("batch of 4, portable", move |b| {
        b.iter(|| batch.escape_times_portable(1000, true))
    });
}

criterion_group!(
    benches,
    single_thread_kernels,
    threaded_tiles,
    packed_against_portable
);
criterion_main!(benches);
