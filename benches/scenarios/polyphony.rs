//! Mixer cost as the number of sounding voices grows.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use steelpan_dsp::synth::{Mixer, Voice, VoiceState};
use steelpan_dsp::ToneShaping;

use crate::BLOCK_SIZES;

const VOICE_COUNTS: &[usize] = &[1, 4, 8, 16];

fn sounding_mixer(voices: usize) -> (Vec<Arc<VoiceState>>, Mixer) {
    let states: Vec<_> = (0..voices).map(|_| Arc::new(VoiceState::new())).collect();
    for (i, state) in states.iter().enumerate() {
        state.trigger(220.0 * (1.0 + i as f32 * 0.25), 0.3);
    }
    let render = states
        .iter()
        .map(|state| Voice::new(state.clone(), 0.001))
        .collect();
    (states, Mixer::new(render, ToneShaping::default()))
}

pub fn bench_polyphony(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/polyphony");

    for &voices in VOICE_COUNTS {
        for &size in BLOCK_SIZES {
            let mut buffer = vec![0.0f32; size];
            let (_states, mut mixer) = sounding_mixer(voices);

            group.bench_with_input(
                BenchmarkId::new(format!("{voices}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        mixer.render_block(black_box(&mut buffer), black_box(48_000.0));
                    })
                },
            );
        }
    }

    // Silent pool: the cost floor when nothing is playing
    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let (states, mut mixer) = sounding_mixer(8);
        for state in &states {
            let seen = state.envelope().load();
            state.envelope().silence(seen.generation);
        }

        group.bench_with_input(BenchmarkId::new("8_silent", size), &size, |b, _| {
            b.iter(|| {
                mixer.render_block(black_box(&mut buffer), black_box(48_000.0));
            })
        });
    }

    group.finish();
}
