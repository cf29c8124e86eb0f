use std::f32::consts::TAU;

/*
Steelpan Partial Oscillator
===========================

A struck steelpan note is dominated by its fundamental with a short stack of
harmonic partials above it. We approximate the timbre with additive synthesis:
four sines at integer multiples of the fundamental, at fixed weights.

    s(φ) = 0.60·sin(φ) + 0.30·sin(2φ) + 0.15·sin(3φ) + 0.08·sin(4φ)

    weight
     0.60 ┤ █
     0.30 ┤ █  █
     0.15 ┤ █  █  █
     0.08 ┤ █  █  █  █
          └─f─2f─3f─4f──→ frequency

The weights sum to 1.13, so a single voice at full gain can peak slightly
above 1.0. The mix bus limiter takes care of that.


Phase Accumulation
------------------

The oscillator keeps one phase φ in [0, 2π) and advances it once per sample:

    φ += 2π · f / sample_rate

Every harmonic is derived from the same φ, so partials never drift against
each other. The increment comes from the sample rate, so calling this at any
rate other than the real output rate detunes the voice.


Harmonics Without Extra sin() Calls
-----------------------------------

Only sin(φ) and cos(φ) are evaluated. Higher partials use the Chebyshev
recurrence:

    sin(nφ) = 2·cos(φ)·sin((n-1)φ) − sin((n-2)φ)

which is exact in real arithmetic and loses only a few ulps over four terms.
*/

/// Relative weights of the fundamental and its first three harmonics.
pub const PARTIAL_WEIGHTS: [f32; 4] = [0.6, 0.3, 0.15, 0.08];

pub struct HarmonicOscillator {
    phase: f32, // radians, always in [0, TAU)
}

impl HarmonicOscillator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Evaluate the partial stack at `phase` without touching oscillator state.
    #[inline]
    pub fn waveform(phase: f32) -> f32 {
        let (s1, c1) = phase.sin_cos();
        let two_cos = 2.0 * c1;
        let s2 = two_cos * s1;
        let s3 = two_cos * s2 - s1;
        let s4 = two_cos * s3 - s2;

        PARTIAL_WEIGHTS[0] * s1
            + PARTIAL_WEIGHTS[1] * s2
            + PARTIAL_WEIGHTS[2] * s3
            + PARTIAL_WEIGHTS[3] * s4
    }

    /// Produce one sample at the current phase, then advance by one sample period.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let sample = Self::waveform(self.phase);
        self.advance(frequency, sample_rate);
        sample
    }

    #[inline]
    fn advance(&mut self, frequency: f32, sample_rate: f32) {
        let increment = TAU * frequency / sample_rate;
        if !increment.is_finite() || increment < 0.0 {
            return;
        }

        self.phase += increment;
        if self.phase >= TAU {
            self.phase -= TAU;
            // Only reachable when frequency exceeds the sample rate
            if self.phase >= TAU {
                self.phase %= TAU;
            }
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

impl Default for HarmonicOscillator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct(phase: f32) -> f32 {
        0.6 * phase.sin() + 0.3 * (2.0 * phase).sin() + 0.15 * (3.0 * phase).sin()
            + 0.08 * (4.0 * phase).sin()
    }

    fn angular_distance(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    #[test]
    fn recurrence_matches_direct_sum() {
        for i in 0..1_000 {
            let phase = i as f32 * TAU / 1_000.0;
            let expected = direct(phase);
            let actual = HarmonicOscillator::waveform(phase);
            assert!(
                (expected - actual).abs() < 1e-5,
                "phase {phase}: expected {expected}, got {actual}"
            );
        }
    }

    #[test]
    fn first_sample_starts_at_zero_crossing() {
        let mut osc = HarmonicOscillator::new();
        let sample = osc.next_sample(440.0, 48_000.0);
        assert!(sample.abs() < 1e-7);
    }

    #[test]
    fn phase_tracks_sample_count() {
        let sample_rate = 48_000.0;
        let frequency = 440.0;
        let mut osc = HarmonicOscillator::new();

        for n in 1..=1_000u32 {
            osc.next_sample(frequency, sample_rate);
            let expected = (n as f64 * std::f64::consts::TAU * frequency as f64
                / sample_rate as f64)
                .rem_euclid(std::f64::consts::TAU) as f32;
            assert!(
                angular_distance(osc.phase(), expected) < 1e-3,
                "after {n} samples expected {expected}, got {}",
                osc.phase()
            );
        }
    }

    #[test]
    fn phase_stays_wrapped_above_nyquist() {
        let mut osc = HarmonicOscillator::new();
        for _ in 0..64 {
            osc.next_sample(100_000.0, 48_000.0);
            assert!((0.0..TAU).contains(&osc.phase()));
        }
    }

    #[test]
    fn non_finite_increment_leaves_phase_alone() {
        let mut osc = HarmonicOscillator::new();
        osc.next_sample(440.0, 48_000.0);
        let before = osc.phase();

        osc.next_sample(f32::INFINITY, 48_000.0);
        osc.next_sample(440.0, 0.0);

        assert_eq!(osc.phase(), before);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut osc = HarmonicOscillator::new();
        for _ in 0..10 {
            osc.next_sample(220.0, 48_000.0);
        }
        osc.reset();
        assert_eq!(osc.phase(), 0.0);
    }
}
