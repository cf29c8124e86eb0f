//! Benchmarks for the atomic envelope cell.
//!
//! The render path does one `load` per voice per sample; the control side does
//! a `trigger` per note and the scheduler a `decay_step` per tick.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use steelpan_dsp::dsp::EnvelopeCell;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let cell = EnvelopeCell::new();
        cell.trigger(0.3);

        group.bench_with_input(BenchmarkId::new("load", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += black_box(&cell).load().level;
                }
                sum
            })
        });
    }

    let cell = EnvelopeCell::new();
    group.bench_function("trigger", |b| b.iter(|| black_box(&cell).trigger(0.3)));

    group.bench_function("decay_step", |b| {
        b.iter(|| {
            let generation = cell.trigger(0.3);
            black_box(&cell).decay_step(generation, 0.95, 0.001)
        })
    });

    group.finish();
}
