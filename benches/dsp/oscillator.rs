//! Benchmarks for the harmonic partial oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use steelpan_dsp::dsp::HarmonicOscillator;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Four partials from one sin/cos pair
        let mut osc = HarmonicOscillator::new();
        group.bench_with_input(BenchmarkId::new("partials", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.next_sample(black_box(440.0), black_box(48_000.0));
                }
            })
        });

        // Reference: plain sine at the same rate
        let mut phase = 0.0f32;
        let increment = std::f32::consts::TAU * 440.0 / 48_000.0;
        group.bench_with_input(BenchmarkId::new("sine_reference", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = black_box(phase).sin();
                    phase = (phase + increment) % std::f32::consts::TAU;
                }
            })
        });
    }

    group.finish();
}
