//! Benchmarks for the output limiter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use steelpan_dsp::dsp::distortion::soft_limit_buffer;

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    for &size in BLOCK_SIZES {
        // Half the samples over the ceiling
        let source: Vec<f32> = (0..size).map(|i| (i as f32 / size as f32) * 3.2 - 1.6).collect();
        let mut buffer = source.clone();

        group.bench_with_input(BenchmarkId::new("soft_limit", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&source);
                soft_limit_buffer(black_box(&mut buffer), 0.8);
            })
        });
    }

    group.finish();
}
