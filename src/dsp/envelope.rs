use std::sync::atomic::{AtomicU64, Ordering};

/*
Strike-and-Decay Envelope
=========================

A steelpan note has no sustain: the stick strikes, the note rings at its
attack level for a moment, then dies away exponentially.

  Level
   0.3 ┤████████╲
       │         ╲╲
       │           ╲╲╲
       │              ╲╲╲╲___
  0.001┤─────────────────────╲╲╲______ → silent
       └──hold──┴─tick─┴─tick─┴─ ... ──→ wall-clock time

Every tick the level is multiplied by the decay factor:

    level(n) = attack · factor^n

With attack = 0.3 and factor = 0.95 the level reaches the 0.001 audibility
threshold after ln(0.001/0.3)/ln(0.95) ≈ 111 ticks. The tick budget stops
earlier than that, so the final step forces the level to zero.


Two Writers, One Word
---------------------

Unlike a per-sample ADSR, this envelope is advanced by a background thread on
wall-clock time while the audio thread reads it every sample. Two control
operations write it:

    trigger     raise to the attack level (note on)
    decay step  multiply by the factor (scheduler tick)

and the audio thread may write zero once the level is inaudible.

A decay step belongs to the trigger that started it. If the voice is struck
again mid-decay, steps from the old strike must not touch the new note. Each
trigger therefore bumps a 32-bit generation, and the generation lives in the
same atomic word as the level:

    63            32 31             0
    ┌──────────────┬────────────────┐
    │  generation  │  level (f32)   │
    └──────────────┴────────────────┘

A decay step is a compare-and-swap on the whole word, so it either applies to
the generation it was scheduled for or fails. No lock is ever taken.
*/

#[inline(always)]
fn pack(generation: u32, level: f32) -> u64 {
    ((generation as u64) << 32) | level.to_bits() as u64
}

#[inline(always)]
fn unpack(word: u64) -> EnvelopeValue {
    EnvelopeValue {
        generation: (word >> 32) as u32,
        level: f32::from_bits(word as u32),
    }
}

/// A consistent (generation, level) pair read from an [`EnvelopeCell`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeValue {
    pub generation: u32,
    pub level: f32,
}

/// Outcome of a single scheduled decay step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecayStep {
    /// Level was multiplied and is still audible.
    Decayed(f32),
    /// Level dropped below the threshold and was forced to zero.
    Finished,
    /// The voice was re-triggered; this decay no longer owns it.
    Superseded,
}

pub struct EnvelopeCell {
    word: AtomicU64,
}

impl EnvelopeCell {
    pub fn new() -> Self {
        Self {
            word: AtomicU64::new(pack(0, 0.0)),
        }
    }

    #[inline]
    pub fn load(&self) -> EnvelopeValue {
        unpack(self.word.load(Ordering::Acquire))
    }

    #[inline]
    pub fn level(&self) -> f32 {
        self.load().level
    }

    /// Start a new strike at `level`. Returns the generation that now owns the envelope.
    pub fn trigger(&self, level: f32) -> u32 {
        let previous = match self.word.fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
            Some(pack(unpack(word).generation.wrapping_add(1), level))
        }) {
            Ok(word) | Err(word) => word,
        };

        unpack(previous).generation.wrapping_add(1)
    }

    /// Multiply the level by `factor` if `generation` still owns the envelope.
    pub fn decay_step(&self, generation: u32, factor: f32, threshold: f32) -> DecayStep {
        let mut current = self.word.load(Ordering::Acquire);
        loop {
            let value = unpack(current);
            if value.generation != generation {
                return DecayStep::Superseded;
            }
            if value.level < threshold {
                return DecayStep::Finished;
            }

            let decayed = value.level * factor;
            let (next_level, step) = if decayed < threshold {
                (0.0, DecayStep::Finished)
            } else {
                (decayed, DecayStep::Decayed(decayed))
            };

            match self.word.compare_exchange_weak(
                current,
                pack(generation, next_level),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return step,
                Err(actual) => current = actual,
            }
        }
    }

    /// Force the level to zero if `generation` still owns the envelope.
    ///
    /// Returns false when a newer trigger has taken over.
    pub fn silence(&self, generation: u32) -> bool {
        let mut current = self.word.load(Ordering::Acquire);
        loop {
            let value = unpack(current);
            if value.generation != generation {
                return false;
            }
            if value.level == 0.0 {
                return true;
            }
            match self.word.compare_exchange_weak(
                current,
                pack(generation, 0.0),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Single-attempt variant of [`silence`](Self::silence) for the audio thread.
    ///
    /// Never loops: if `seen` is stale, whoever changed the word wins.
    #[inline]
    pub fn try_silence(&self, seen: EnvelopeValue) -> bool {
        self.word
            .compare_exchange(
                pack(seen.generation, seen.level),
                pack(seen.generation, 0.0),
                Ordering::AcqRel,
                Ordering::Relaxed,
            )
            .is_ok()
    }
}

impl Default for EnvelopeCell {
    fn default() -> Self {
        Self::new()
    }
}
