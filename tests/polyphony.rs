use std::collections::HashSet;
use std::thread;
use std::time::{Duration, Instant};

use steelpan_dsp::{DecaySchedule, Engine, EngineConfig, OfflineBackend, OfflineSink};

fn held_config() -> EngineConfig {
    EngineConfig::new().decay(DecaySchedule {
        hold: Duration::from_secs(10),
        ..DecaySchedule::default()
    })
}

fn start(config: EngineConfig) -> (Engine<OfflineBackend>, OfflineSink) {
    let mut engine = Engine::with_backend(config, OfflineBackend::new());
    engine.initialize().expect("initialize");
    let sink = engine.backend().sink().expect("sink");
    (engine, sink)
}

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

#[test]
fn eight_notes_take_eight_voices() {
    let (mut engine, _sink) = start(held_config());
    let mut used = HashSet::new();
    for k in 1..=8 {
        let voice = engine.note_on(110.0 * k as f32).expect("voice");
        assert!(!voice.stolen);
        used.insert(voice.index);
    }
    assert_eq!(used.len(), 8);
    assert_eq!(engine.active_voices(), 8);
}

#[test]
fn ninth_note_steals_first_voice() {
    let (mut engine, _sink) = start(held_config());
    for k in 1..=8 {
        engine.note_on(110.0 * k as f32);
    }

    let ninth = engine.note_on(1_000.0).expect("voice");
    assert_eq!(ninth.index, 0);
    assert!(ninth.stolen);

    let voices = engine.voices();
    assert_eq!(voices[0].frequency, 1_000.0);
    assert_eq!(voices[0].level, 0.3);
    assert_eq!(voices[1].frequency, 220.0);
}

#[test]
fn full_chord_stays_under_ceiling() {
    let (mut engine, sink) = start(held_config().attack_level(1.0));
    for label in ["C4", "E4", "G4", "C5", "E5", "G5", "C6", "E6"] {
        engine.note_on_named(label).expect("label");
    }

    let samples = sink.pull_frames(8_192);
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    assert!(peak <= 0.8);
    assert!(peak > 0.5);
}

#[test]
fn voice_is_silenced_after_max_ticks() {
    // 0.3 * 0.99^4 is still audible: only the tick cap can end this note
    let (mut engine, _sink) = start(EngineConfig::new().decay(DecaySchedule {
        hold: Duration::from_millis(5),
        tick: Duration::from_millis(2),
        factor: 0.99,
        max_ticks: 4,
    }));
    engine.note_on(440.0).expect("voice");

    assert!(wait_until(Duration::from_secs(2), || engine
        .active_voices()
        == 0));
    assert_eq!(engine.voices()[0].level, 0.0);
}

#[test]
fn restrike_restarts_envelope() {
    let (mut engine, _sink) = start(EngineConfig::new().polyphony(1).decay(DecaySchedule {
        hold: Duration::from_millis(50),
        tick: Duration::from_millis(5),
        factor: 0.9,
        max_ticks: 100,
    }));

    let first = engine.note_on(440.0).expect("voice");
    assert!(wait_until(Duration::from_secs(2), || engine.voices()[0].level
        < 0.3));

    let second = engine.note_on(330.0).expect("voice");
    assert_eq!(second.index, first.index);
    assert_ne!(second.generation, first.generation);
    assert_eq!(engine.voices()[0].frequency, 330.0);
    assert!(engine.voices()[0].level > 0.25);
}

#[test]
fn unplayable_notes_are_ignored() {
    let (mut engine, _sink) = start(held_config());
    engine.note_on(440.0);
    for frequency in [0.0, -220.0, f32::NAN, f32::INFINITY] {
        assert!(engine.note_on(frequency).is_none());
    }
    assert_eq!(engine.active_voices(), 1);
}

#[test]
fn concurrent_rendering_and_striking() {
    let (mut engine, sink) = start(EngineConfig::new().decay(DecaySchedule {
        hold: Duration::from_millis(5),
        tick: Duration::from_millis(1),
        factor: 0.8,
        max_ticks: 50,
    }));

    let renderer = thread::spawn(move || {
        let mut buffer = vec![0.0; 256];
        let mut peak = 0.0f32;
        for _ in 0..400 {
            sink.pull(&mut buffer);
            peak = buffer.iter().fold(peak, |acc, &s| acc.max(s.abs()));
            assert!(buffer.iter().all(|s| s.is_finite()));
        }
        peak
    });

    for k in 0..200 {
        engine.note_on(200.0 + k as f32 * 5.0);
        thread::sleep(Duration::from_micros(200));
    }

    let peak = renderer.join().expect("renderer");
    assert!(peak <= 0.8);
}
