//! Benchmarks for the one-pole smoothing filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use steelpan_dsp::dsp::{HarmonicOscillator, OnePole};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let mut osc = HarmonicOscillator::new();
        let source: Vec<f32> = (0..size).map(|_| osc.next_sample(440.0, 48_000.0)).collect();
        let mut buffer = source.clone();

        let mut filter = OnePole::new(0.7);
        group.bench_with_input(BenchmarkId::new("one_pole", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&source);
                filter.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
