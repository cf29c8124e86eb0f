//! The device callback: render, channel fan-out and the output tap.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use steelpan_dsp::{DecaySchedule, Engine, EngineConfig, OfflineBackend};

use crate::BLOCK_SIZES;

fn held_engine(channels: u16) -> Engine<OfflineBackend> {
    let config = EngineConfig::new()
        .channels(channels)
        .decay(DecaySchedule {
            hold: std::time::Duration::from_secs(3_600),
            ..DecaySchedule::default()
        });
    let mut engine = Engine::with_backend(config, OfflineBackend::new());
    if let Err(e) = engine.initialize() {
        panic!("offline engine failed to start: {e}");
    }
    for label in ["C4", "E4", "G4", "A#4", "D5", "F#3", "B3", "C#3"] {
        if let Err(e) = engine.note_on_named(label) {
            panic!("bad chord label {label}: {e}");
        }
    }
    engine
}

pub fn bench_callback(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/callback");

    for &channels in &[1u16, 2] {
        for &size in BLOCK_SIZES {
            let engine = held_engine(channels);
            let Some(sink) = engine.backend().sink() else {
                continue;
            };
            let mut buffer = vec![0.0f32; size * channels as usize];

            group.bench_with_input(
                BenchmarkId::new(format!("full_pool_{channels}ch"), size),
                &size,
                |b, _| {
                    b.iter(|| sink.pull(black_box(&mut buffer)));
                },
            );
        }
    }

    group.finish();
}
