//! Pull-driven output for tests, benchmarks and offline rendering.
//!
//! The offline "device" renders only when something calls [`OfflineSink::pull`],
//! and only while the stream is started.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::engine::callback::RenderCallback;
use crate::engine::stream::{AudioBackend, OutputStream, StreamFormat, StreamRequest};
use crate::error::{EngineError, Result};

struct Shared {
    callback: Mutex<RenderCallback>,
    started: AtomicBool,
}

#[derive(Default)]
pub struct OfflineBackend {
    sample_rate: Option<u32>,
    fail_on_open: bool,
    fail_on_stop: bool,
    sink: Option<OfflineSink>,
    opened: usize,
}

impl OfflineBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Negotiate `sample_rate` regardless of what is requested.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    /// A backend whose `open` always fails.
    pub fn failing() -> Self {
        Self {
            fail_on_open: true,
            ..Self::default()
        }
    }

    /// Streams from this backend report an error when stopped.
    pub fn fail_on_stop(mut self) -> Self {
        self.fail_on_stop = true;
        self
    }

    /// The sink of the most recently opened stream.
    pub fn sink(&self) -> Option<OfflineSink> {
        self.sink.clone()
    }

    /// How many streams have been opened.
    pub fn opened(&self) -> usize {
        self.opened
    }
}

impl AudioBackend for OfflineBackend {
    type Stream = OfflineStream;

    fn open<F>(&mut self, request: &StreamRequest, build: F) -> Result<OfflineStream>
    where
        F: FnOnce(StreamFormat) -> RenderCallback,
    {
        if self.fail_on_open {
            return Err(EngineError::BuildStream("offline sink refused to open".into()));
        }

        let format = StreamFormat {
            sample_rate: self.sample_rate.unwrap_or(request.sample_rate),
            channels: request.channels,
        };
        let shared = Arc::new(Shared {
            callback: Mutex::new(build(format)),
            started: AtomicBool::new(false),
        });

        self.sink = Some(OfflineSink {
            shared: shared.clone(),
            format,
        });
        self.opened += 1;

        Ok(OfflineStream {
            shared,
            format,
            fail_on_stop: self.fail_on_stop,
        })
    }
}

pub struct OfflineStream {
    shared: Arc<Shared>,
    format: StreamFormat,
    fail_on_stop: bool,
}

impl OutputStream for OfflineStream {
    fn format(&self) -> StreamFormat {
        self.format
    }

    fn start(&mut self) -> Result<()> {
        self.shared.started.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.shared.started.store(false, Ordering::Release);
        if self.fail_on_stop {
            return Err(EngineError::PauseStream("offline sink failed to stop".into()));
        }
        Ok(())
    }
}

impl Drop for OfflineStream {
    fn drop(&mut self) {
        self.shared.started.store(false, Ordering::Release);
    }
}

/// The consumer end of an offline stream. Stands in for the audio device.
#[derive(Clone)]
pub struct OfflineSink {
    shared: Arc<Shared>,
    format: StreamFormat,
}

impl OfflineSink {
    /// Render into `out` (interleaved). Returns `false` and writes silence
    /// when the stream is not started.
    pub fn pull(&self, out: &mut [f32]) -> bool {
        if !self.is_started() {
            out.fill(0.0);
            return false;
        }

        match self.shared.callback.lock() {
            Ok(mut callback) => {
                callback.render(out);
                true
            }
            Err(_) => {
                out.fill(0.0);
                false
            }
        }
    }

    /// Pull `frames` frames into a fresh buffer.
    pub fn pull_frames(&self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames * self.format.channels as usize];
        self.pull(&mut out);
        out
    }

    pub fn is_started(&self) -> bool {
        self.shared.started.load(Ordering::Acquire)
    }

    pub fn format(&self) -> StreamFormat {
        self.format
    }
}
