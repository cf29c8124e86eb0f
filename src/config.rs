//! Configuration for the steelpan engine

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Wall-clock decay applied to every triggered voice.
///
/// After `hold`, the level is multiplied by `factor` once per `tick` until it
/// falls below the silence threshold or `max_ticks` steps have run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecaySchedule {
    pub hold: Duration,
    pub tick: Duration,
    pub factor: f32,
    pub max_ticks: u32,
}

impl Default for DecaySchedule {
    fn default() -> Self {
        Self {
            hold: Duration::from_millis(100),
            tick: Duration::from_millis(20),
            factor: 0.95,
            max_ticks: 100,
        }
    }
}

impl DecaySchedule {
    /// Upper bound on how long a single decay can keep a voice sounding.
    pub fn max_duration(&self) -> Duration {
        self.hold + self.tick * self.max_ticks
    }
}

/// Mix bus shaping: one-pole smoothing followed by a symmetric limiter.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneShaping {
    /// Weight of the current mixed sample; the previous output gets `1 - smoothing`.
    pub smoothing: f32,
    /// Output is clamped to `[-ceiling, ceiling]`.
    pub ceiling: f32,
}

impl Default for ToneShaping {
    fn default() -> Self {
        Self {
            smoothing: 0.7,
            ceiling: 0.8,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Requested sample rate; the rate negotiated by the sink wins.
    pub sample_rate: u32,
    /// Requested channel count. The mono mix is copied to every channel.
    pub channels: u16,
    pub polyphony: usize,
    pub attack_level: f32,
    pub silence_threshold: f32,
    pub decay: DecaySchedule,
    pub tone: ToneShaping,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 1,
            polyphony: 8,
            attack_level: 0.3,
            silence_threshold: 0.001,
            decay: DecaySchedule::default(),
            tone: ToneShaping::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    pub fn channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    pub fn polyphony(mut self, voices: usize) -> Self {
        self.polyphony = voices;
        self
    }

    pub fn attack_level(mut self, level: f32) -> Self {
        self.attack_level = level;
        self
    }

    pub fn silence_threshold(mut self, threshold: f32) -> Self {
        self.silence_threshold = threshold;
        self
    }

    pub fn decay(mut self, decay: DecaySchedule) -> Self {
        self.decay = decay;
        self
    }

    pub fn tone(mut self, tone: ToneShaping) -> Self {
        self.tone = tone;
        self
    }

    /// Check that every parameter keeps the render path finite and bounded.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(EngineError::InvalidConfig(msg));

        if self.sample_rate == 0 {
            return invalid("sample rate must be non-zero".into());
        }
        if self.channels == 0 {
            return invalid("channel count must be non-zero".into());
        }
        if self.polyphony == 0 {
            return invalid("polyphony must be at least one voice".into());
        }
        if !(self.attack_level > 0.0 && self.attack_level <= 1.0) {
            return invalid(format!(
                "attack level {} outside (0, 1]",
                self.attack_level
            ));
        }
        if !(self.silence_threshold > 0.0 && self.silence_threshold < self.attack_level) {
            return invalid(format!(
                "silence threshold {} must lie in (0, attack level)",
                self.silence_threshold
            ));
        }
        if !(self.decay.factor > 0.0 && self.decay.factor < 1.0) {
            return invalid(format!("decay factor {} outside (0, 1)", self.decay.factor));
        }
        if self.decay.tick.is_zero() {
            return invalid("decay tick must be non-zero".into());
        }
        if self.decay.max_ticks == 0 {
            return invalid("decay must run at least one tick".into());
        }
        if !(self.tone.smoothing > 0.0 && self.tone.smoothing <= 1.0) {
            return invalid(format!(
                "smoothing weight {} outside (0, 1]",
                self.tone.smoothing
            ));
        }
        if !(self.tone.ceiling > 0.0) {
            return invalid(format!("limiter ceiling {} must be positive", self.tone.ceiling));
        }

        Ok(())
    }
}
