//! Render a short phrase without an audio device and print its level envelope.
//!
//! Decay runs on wall-clock time, so the render is paced in 10 ms blocks.

use std::thread;
use std::time::{Duration, Instant};

use steelpan_dsp::{Engine, EngineConfig, OfflineBackend};

const BLOCK_MS: u64 = 10;
const PHRASE: [(u64, &str); 6] = [
    (0, "C4"),
    (250, "E4"),
    (500, "G4"),
    (750, "C#4"),
    (1_000, "F#4"),
    (1_000, "A3"),
];

fn main() -> steelpan_dsp::Result<()> {
    env_logger::init();

    let config = EngineConfig::default();
    let mut engine = Engine::with_backend(config, OfflineBackend::new());
    engine.initialize()?;

    let Some(sink) = engine.backend().sink() else {
        return Ok(());
    };
    let rate = sink.format().sample_rate as usize;
    let frames = rate * BLOCK_MS as usize / 1000;

    let start = Instant::now();
    let mut next = 0;
    let mut total = Vec::new();

    for block in 0..300u64 {
        let now_ms = block * BLOCK_MS;
        while next < PHRASE.len() && PHRASE[next].0 <= now_ms {
            engine.note_on_named(PHRASE[next].1)?;
            next += 1;
        }

        let samples = sink.pull_frames(frames);
        if block % 10 == 0 {
            let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
            println!(
                "{:>5} ms  peak {:.3}  voices {}",
                now_ms,
                peak,
                engine.active_voices()
            );
        }
        total.extend(samples);

        let due = start + Duration::from_millis(now_ms + BLOCK_MS);
        if let Some(wait) = due.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
    }

    let rms = (total.iter().map(|s| s * s).sum::<f32>() / total.len().max(1) as f32).sqrt();
    println!("Rendered {} samples at {} Hz, rms {:.4}", total.len(), rate, rms);

    engine.shutdown();
    Ok(())
}
