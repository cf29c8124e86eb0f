//! The engine: voice pool, decay scheduler and output stream wired together.
//!
//! ```ignore
//! use steelpan_dsp::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! engine.initialize()?;
//! engine.note_on(440.0);
//! engine.note_on_named("C#4")?;
//! engine.shutdown();
//! ```

pub mod callback;
pub mod cpal_backend;
pub mod offline;
pub mod scheduler;
pub mod stream;

#[cfg(feature = "rtrb")]
use rtrb::Producer;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::pan::notes;
use crate::synth::{Mixer, VoicePool, VoiceRef, VoiceSnapshot};

use self::callback::RenderCallback;
use self::cpal_backend::CpalBackend;
use self::stream::{AudioBackend, ManagedStream, StreamFormat, StreamRequest, StreamState};

pub struct Engine<B: AudioBackend = CpalBackend> {
    config: EngineConfig,
    backend: B,
    pool: Option<VoicePool>,
    stream: ManagedStream<B::Stream>,
    #[cfg(feature = "rtrb")]
    tap: Option<Producer<f32>>,
}

impl Engine<CpalBackend> {
    /// An engine that plays through the default output device.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_backend(config, CpalBackend::new())
    }
}

impl<B: AudioBackend> Engine<B> {
    pub fn with_backend(config: EngineConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            pool: None,
            stream: ManagedStream::closed(),
            #[cfg(feature = "rtrb")]
            tap: None,
        }
    }

    /// Build the voice pool, start the decay thread and open and start the
    /// output stream.
    ///
    /// Calling this on a running engine does nothing. On failure everything
    /// built so far is torn down and the engine stays inert.
    pub fn initialize(&mut self) -> Result<()> {
        if self.pool.is_some() {
            log::debug!("engine already initialized");
            return Ok(());
        }

        self.config.validate()?;
        let mut pool = VoicePool::new(&self.config)?;

        let request = StreamRequest {
            sample_rate: self.config.sample_rate,
            channels: self.config.channels,
        };
        let voices = pool.render_voices();
        let tone = self.config.tone;
        #[cfg(feature = "rtrb")]
        let tap = self.tap.take();

        let build = move |format: StreamFormat| {
            let callback = RenderCallback::new(Mixer::new(voices, tone), format);
            #[cfg(feature = "rtrb")]
            let callback = match tap {
                Some(tap) => callback.with_tap(tap),
                None => callback,
            };
            callback
        };

        if let Err(e) = self.stream.open(&mut self.backend, &request, build) {
            pool.shutdown();
            return Err(e);
        }
        if let Err(e) = self.stream.start() {
            let _ = self.stream.close();
            pool.shutdown();
            return Err(e);
        }

        if let Some(format) = self.stream.format() {
            if format.sample_rate != request.sample_rate {
                log::warn!(
                    "requested {} Hz, device runs at {} Hz",
                    request.sample_rate,
                    format.sample_rate
                );
            }
            log::info!(
                "engine started: {} voices, {} Hz, {} channel(s)",
                pool.len(),
                format.sample_rate,
                format.channels
            );
        }

        self.pool = Some(pool);
        Ok(())
    }

    /// Stop and close the stream, then stop the decay thread. Never fails and
    /// may be called any number of times.
    pub fn shutdown(&mut self) {
        if self.stream.state() == StreamState::Started {
            if let Err(e) = self.stream.stop() {
                log::warn!("error stopping output stream: {}", e);
            }
        }
        if self.stream.state() != StreamState::Closed {
            if let Err(e) = self.stream.close() {
                log::warn!("error closing output stream: {}", e);
            }
        }

        if let Some(mut pool) = self.pool.take() {
            pool.shutdown();
            log::info!("engine shut down");
        }
    }

    /// Strike a note. Ignored (returning `None`) before `initialize` and for
    /// unplayable frequencies.
    pub fn note_on(&mut self, frequency: f32) -> Option<VoiceRef> {
        let Some(pool) = self.pool.as_mut() else {
            log::debug!("note_on({}) before initialize", frequency);
            return None;
        };
        pool.allocate(frequency)
    }

    /// Strike a note by label, e.g. `"A4"`, `"F#3"` or `"Eb5"`.
    pub fn note_on_named(&mut self, label: &str) -> Result<Option<VoiceRef>> {
        let frequency = notes::frequency(label)?;
        Ok(self.note_on(frequency))
    }

    /// Per-voice state, in pool order. Empty before `initialize`.
    pub fn voices(&self) -> Vec<VoiceSnapshot> {
        self.pool
            .as_ref()
            .map(VoicePool::snapshots)
            .unwrap_or_default()
    }

    pub fn active_voices(&self) -> usize {
        self.pool.as_ref().map_or(0, VoicePool::active_count)
    }

    /// Route a copy of the rendered mono signal into `tap`. Takes effect on
    /// the next `initialize`.
    #[cfg(feature = "rtrb")]
    pub fn set_output_tap(&mut self, tap: Producer<f32>) {
        if self.pool.is_some() {
            log::warn!("output tap set on a running engine; it applies after re-initialize");
        }
        self.tap = Some(tap);
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.is_some()
    }

    /// The negotiated format, while a stream is open.
    pub fn format(&self) -> Option<StreamFormat> {
        self.stream.format()
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.format().map(|f| f.sample_rate)
    }

    pub fn stream_state(&self) -> StreamState {
        self.stream.state()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: AudioBackend> Drop for Engine<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
