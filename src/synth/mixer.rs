//! Mix bus: voice summing and tone shaping.

use crate::config::ToneShaping;
use crate::dsp::distortion::soft_limit;
use crate::dsp::OnePole;
use crate::synth::voice::Voice;

/// Sums every voice, smooths the sum, then limits it.
///
/// Owned by the audio thread. The smoothing filter's history lives here, so
/// two mixers never share state.
pub struct Mixer {
    voices: Vec<Voice>,
    filter: OnePole,
    ceiling: f32,
}

impl Mixer {
    pub fn new(voices: Vec<Voice>, tone: ToneShaping) -> Self {
        Self {
            voices,
            filter: OnePole::new(tone.smoothing),
            ceiling: tone.ceiling,
        }
    }

    /// Render one mono frame. Always within `[-ceiling, ceiling]`.
    #[inline]
    pub fn render_frame(&mut self, sample_rate: f32) -> f32 {
        let mut mixed = 0.0;
        for voice in self.voices.iter_mut() {
            mixed += voice.render_sample(sample_rate);
        }

        let smoothed = self.filter.next_sample(mixed);
        soft_limit(smoothed, self.ceiling)
    }

    pub fn render_block(&mut self, out: &mut [f32], sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.render_frame(sample_rate);
        }
    }

    /// The smoothing filter's last output, before limiting.
    pub fn previous_sample(&self) -> f32 {
        self.filter.previous()
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }
}
