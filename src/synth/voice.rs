use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::dsp::{EnvelopeCell, HarmonicOscillator};

/// Control-side state of one polyphonic slot.
///
/// Shared between the trigger path, the envelope scheduler and the audio
/// thread. Every field is a lock-free atomic; readers may see values up to one
/// buffer stale.
pub struct VoiceState {
    frequency: AtomicU32, // f32 bits
    envelope: EnvelopeCell,
}

impl VoiceState {
    pub fn new() -> Self {
        Self {
            frequency: AtomicU32::new(0.0f32.to_bits()),
            envelope: EnvelopeCell::new(),
        }
    }

    /// Strike this voice. Returns the envelope generation the new note owns,
    /// or `None` if `frequency` cannot be played.
    ///
    /// The frequency is published before the envelope so the audio thread
    /// never renders the new level at the old pitch.
    pub fn trigger(&self, frequency: f32, attack_level: f32) -> Option<u32> {
        if !is_playable(frequency) {
            return None;
        }

        self.frequency.store(frequency.to_bits(), Ordering::Release);
        Some(self.envelope.trigger(attack_level))
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        f32::from_bits(self.frequency.load(Ordering::Acquire))
    }

    #[inline]
    pub fn envelope(&self) -> &EnvelopeCell {
        &self.envelope
    }

    pub fn is_active(&self, silence_threshold: f32) -> bool {
        self.envelope.level() >= silence_threshold
    }

    pub fn snapshot(&self, silence_threshold: f32) -> VoiceSnapshot {
        let level = self.envelope.level();
        VoiceSnapshot {
            frequency: self.frequency(),
            level,
            active: level >= silence_threshold,
        }
    }
}

impl Default for VoiceState {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of a voice, for meters and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSnapshot {
    pub frequency: f32,
    pub level: f32,
    pub active: bool,
}

/// Frequencies that keep the phase increment finite and non-negative.
#[inline]
pub fn is_playable(frequency: f32) -> bool {
    frequency.is_finite() && frequency > 0.0
}

/// Audio-thread half of a voice.
///
/// Owns the oscillator phase outright. A trigger is noticed through the
/// envelope generation changing, at which point the phase restarts at zero.
pub struct Voice {
    state: Arc<VoiceState>,
    osc: HarmonicOscillator,
    generation: u32, // last generation rendered
    silence_threshold: f32,
}

impl Voice {
    pub fn new(state: Arc<VoiceState>, silence_threshold: f32) -> Self {
        let generation = state.envelope().load().generation;
        Self {
            state,
            osc: HarmonicOscillator::new(),
            generation,
            silence_threshold,
        }
    }

    /// Render one sample of this voice at `sample_rate`.
    ///
    /// Inaudible voices return exactly zero after a single comparison. The
    /// first time a voice is found below the threshold its level is forced to
    /// zero, marking it inactive.
    #[inline]
    pub fn render_sample(&mut self, sample_rate: f32) -> f32 {
        let envelope = self.state.envelope().load();
        if envelope.level < self.silence_threshold {
            if envelope.level != 0.0 {
                self.state.envelope().try_silence(envelope);
            }
            return 0.0;
        }

        if envelope.generation != self.generation {
            self.generation = envelope.generation;
            self.osc.reset();
        }

        let frequency = self.state.frequency();
        self.osc.next_sample(frequency, sample_rate) * envelope.level
    }

    /// Phase the next rendered sample will use.
    pub fn phase(&self) -> f32 {
        if self.state.envelope().load().generation != self.generation {
            0.0
        } else {
            self.osc.phase()
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active(self.silence_threshold)
    }

    pub fn state(&self) -> &Arc<VoiceState> {
        &self.state
    }
}
