use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::scheduler::EnvelopeScheduler;
use crate::error::Result;
use crate::synth::voice::{is_playable, Voice, VoiceSnapshot, VoiceState};

/// The voice chosen for a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceRef {
    pub index: usize,
    pub generation: u32,
    /// Whether an audible note was cut off to make room.
    pub stolen: bool,
}

/// Fixed pool of voices plus the allocation policy.
///
/// Allocation prefers the first silent voice in index order. When every voice
/// is sounding, voices are stolen round-robin: the cursor only moves when a
/// steal happens, so the stolen slot is fully determined by trigger order.
pub struct VoicePool {
    voices: Vec<Arc<VoiceState>>,
    next_round_robin: usize,
    attack_level: f32,
    silence_threshold: f32,
    scheduler: EnvelopeScheduler,
}

impl VoicePool {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let scheduler = EnvelopeScheduler::spawn(config.decay, config.silence_threshold)?;
        let voices = (0..config.polyphony)
            .map(|_| Arc::new(VoiceState::new()))
            .collect();

        Ok(Self {
            voices,
            next_round_robin: 0,
            attack_level: config.attack_level,
            silence_threshold: config.silence_threshold,
            scheduler,
        })
    }

    /// Strike a note at `frequency`, stealing a voice if the pool is full.
    ///
    /// Never blocks. Returns `None` only for unplayable frequencies (zero,
    /// negative or non-finite), which are ignored without disturbing any voice.
    pub fn allocate(&mut self, frequency: f32) -> Option<VoiceRef> {
        if !is_playable(frequency) {
            log::debug!("ignoring unplayable frequency {}", frequency);
            return None;
        }

        let (index, stolen) = self.select();
        let voice = &self.voices[index];
        let generation = voice.trigger(frequency, self.attack_level)?;
        self.scheduler.schedule(voice, generation);

        Some(VoiceRef {
            index,
            generation,
            stolen,
        })
    }

    fn select(&mut self) -> (usize, bool) {
        if let Some(index) = self
            .voices
            .iter()
            .position(|voice| !voice.is_active(self.silence_threshold))
        {
            return (index, false);
        }

        let index = self.next_round_robin;
        self.next_round_robin = (index + 1) % self.voices.len();
        log::debug!("all {} voices busy, stealing voice {}", self.voices.len(), index);
        (index, true)
    }

    /// Build the audio-thread halves of every voice, in pool order.
    pub fn render_voices(&self) -> Vec<Voice> {
        self.voices
            .iter()
            .map(|state| Voice::new(state.clone(), self.silence_threshold))
            .collect()
    }

    pub fn snapshots(&self) -> Vec<VoiceSnapshot> {
        self.voices
            .iter()
            .map(|voice| voice.snapshot(self.silence_threshold))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.voices
            .iter()
            .filter(|voice| voice.is_active(self.silence_threshold))
            .count()
    }

    pub fn voice(&self, index: usize) -> Option<&Arc<VoiceState>> {
        self.voices.get(index)
    }

    pub fn next_round_robin(&self) -> usize {
        self.next_round_robin
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Stop the decay thread. Voices keep whatever level they had.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
    }
}
