//! Output stream collaborators.
//!
//! An [`AudioBackend`] negotiates a format and hands back an opened
//! [`OutputStream`] that pulls from a [`RenderCallback`]. [`ManagedStream`]
//! wraps the stream with its lifecycle:
//!
//! ```text
//! Closed -> Open -> Started -> Stopped -> Closed
//!                      ^          |
//!                      +----------+
//! ```

use crate::engine::callback::RenderCallback;
use crate::error::{EngineError, Result};

/// What the engine asks the backend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRequest {
    pub sample_rate: u32,
    pub channels: u16,
}

/// What the backend actually delivered. This is the format the callback renders at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Closed,
    Open,
    Started,
    Stopped,
}

impl StreamState {
    fn can_transition(self, to: StreamState) -> bool {
        use StreamState::*;
        matches!(
            (self, to),
            (Closed, Open)
                | (Open, Started)
                | (Open, Closed)
                | (Started, Stopped)
                | (Stopped, Started)
                | (Stopped, Closed)
        )
    }
}

pub trait AudioBackend {
    type Stream: OutputStream;

    /// Negotiate a format for `request`, build the callback for that format
    /// with `build`, and return the stream opened but not started.
    fn open<F>(&mut self, request: &StreamRequest, build: F) -> Result<Self::Stream>
    where
        F: FnOnce(StreamFormat) -> RenderCallback;
}

/// An opened output stream. Closing is dropping.
pub trait OutputStream {
    fn format(&self) -> StreamFormat;
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

/// A stream plus the state machine that guards it.
pub struct ManagedStream<S: OutputStream> {
    stream: Option<S>,
    state: StreamState,
}

impl<S: OutputStream> ManagedStream<S> {
    pub fn closed() -> Self {
        Self {
            stream: None,
            state: StreamState::Closed,
        }
    }

    /// Open through `backend`.
    pub fn open<B, F>(&mut self, backend: &mut B, request: &StreamRequest, build: F) -> Result<()>
    where
        B: AudioBackend<Stream = S>,
        F: FnOnce(StreamFormat) -> RenderCallback,
    {
        self.check(StreamState::Open)?;
        let stream = backend.open(request, build)?;
        self.stream = Some(stream);
        self.state = StreamState::Open;
        Ok(())
    }

    pub fn start(&mut self) -> Result<()> {
        self.check(StreamState::Started)?;
        if let Some(stream) = self.stream.as_mut() {
            stream.start()?;
        }
        self.state = StreamState::Started;
        Ok(())
    }

    /// Stop playback. The state moves to `Stopped` even when the sink reports an
    /// error, so the stream can still be closed.
    pub fn stop(&mut self) -> Result<()> {
        self.check(StreamState::Stopped)?;
        let result = match self.stream.as_mut() {
            Some(stream) => stream.stop(),
            None => Ok(()),
        };
        self.state = StreamState::Stopped;
        result
    }

    pub fn close(&mut self) -> Result<()> {
        self.check(StreamState::Closed)?;
        self.stream = None;
        self.state = StreamState::Closed;
        Ok(())
    }

    fn check(&self, to: StreamState) -> Result<()> {
        if self.state.can_transition(to) {
            Ok(())
        } else {
            Err(EngineError::StreamState {
                from: self.state,
                to,
            })
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn format(&self) -> Option<StreamFormat> {
        self.stream.as_ref().map(|s| s.format())
    }

    pub fn stream(&self) -> Option<&S> {
        self.stream.as_ref()
    }
}

impl<S: OutputStream> Default for ManagedStream<S> {
    fn default() -> Self {
        Self::closed()
    }
}
