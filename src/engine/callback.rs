//! The real-time boundary.
//!
//! [`RenderCallback`] is what the audio sink calls from its own thread. It must
//! not allocate, lock, log or block: every operation in here is bounded.

#[cfg(feature = "rtrb")]
use rtrb::Producer;

use crate::engine::stream::StreamFormat;
use crate::synth::Mixer;

/// What the sink should do after a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackResult {
    Continue,
}

pub struct RenderCallback {
    mixer: Mixer,
    format: StreamFormat,
    sample_rate: f32,
    #[cfg(feature = "rtrb")]
    tap: Option<Producer<f32>>,
}

impl RenderCallback {
    pub fn new(mixer: Mixer, format: StreamFormat) -> Self {
        Self {
            mixer,
            format,
            sample_rate: format.sample_rate as f32,
            #[cfg(feature = "rtrb")]
            tap: None,
        }
    }

    /// Copy every rendered mono frame into `tap`. Frames that don't fit are dropped.
    #[cfg(feature = "rtrb")]
    pub fn with_tap(mut self, tap: Producer<f32>) -> Self {
        self.tap = Some(tap);
        self
    }

    /// Fill an interleaved buffer. The mono mix is written to every channel of
    /// each frame; a trailing partial frame is zeroed.
    pub fn render(&mut self, data: &mut [f32]) -> CallbackResult {
        let channels = self.format.channels.max(1) as usize;
        let mut frames = data.chunks_exact_mut(channels);

        for frame in &mut frames {
            let sample = self.mixer.render_frame(self.sample_rate);
            frame.fill(sample);

            #[cfg(feature = "rtrb")]
            if let Some(tap) = self.tap.as_mut() {
                let _ = tap.push(sample);
            }
        }
        frames.into_remainder().fill(0.0);

        CallbackResult::Continue
    }

    pub fn format(&self) -> StreamFormat {
        self.format
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToneShaping;
    use crate::synth::{Voice, VoiceState};
    use std::sync::Arc;

    fn callback(channels: u16) -> (Arc<VoiceState>, RenderCallback) {
        let state = Arc::new(VoiceState::new());
        let mixer = Mixer::new(vec![Voice::new(state.clone(), 0.001)], ToneShaping::default());
        let format = StreamFormat {
            sample_rate: 48_000,
            channels,
        };
        (state, RenderCallback::new(mixer, format))
    }

    #[test]
    fn always_continues() {
        let (_state, mut callback) = callback(1);
        let mut buffer = vec![0.0; 128];
        assert_eq!(callback.render(&mut buffer), CallbackResult::Continue);
        assert_eq!(callback.render(&mut []), CallbackResult::Continue);
    }

    #[test]
    fn replicates_mono_across_channels() {
        let (state, mut callback) = callback(2);
        state.trigger(440.0, 0.3);

        let mut buffer = vec![0.0; 256];
        callback.render(&mut buffer);

        for frame in buffer.chunks_exact(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert!(buffer.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn stereo_advances_once_per_frame() {
        let (mono_state, mut mono) = callback(1);
        let (stereo_state, mut stereo) = callback(2);
        mono_state.trigger(440.0, 0.3);
        stereo_state.trigger(440.0, 0.3);

        let mut mono_buf = vec![0.0; 64];
        let mut stereo_buf = vec![0.0; 128];
        mono.render(&mut mono_buf);
        stereo.render(&mut stereo_buf);

        for (i, frame) in stereo_buf.chunks_exact(2).enumerate() {
            assert_eq!(frame[0], mono_buf[i]);
        }
    }

    #[test]
    fn partial_frame_is_zeroed() {
        let (state, mut callback) = callback(2);
        state.trigger(440.0, 0.3);

        let mut buffer = vec![1.0; 5];
        callback.render(&mut buffer);
        assert_eq!(buffer[4], 0.0);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn tap_receives_mono_frames() {
        let (state, callback) = callback(2);
        let (tx, mut rx) = rtrb::RingBuffer::<f32>::new(16);
        let mut callback = callback.with_tap(tx);
        state.trigger(440.0, 0.3);

        // 32 frames into a 16-slot tap: overflow is dropped, not blocked on
        let mut buffer = vec![0.0; 64];
        callback.render(&mut buffer);

        let mut tapped = Vec::new();
        while let Ok(sample) = rx.pop() {
            tapped.push(sample);
        }
        assert_eq!(tapped.len(), 16);
        for (i, sample) in tapped.iter().enumerate() {
            assert_eq!(*sample, buffer[i * 2]);
        }
    }
}
