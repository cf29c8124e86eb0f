//! Error types for the steelpan engine

use thiserror::Error;

use crate::engine::stream::StreamState;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No default output device available")]
    NoOutputDevice,

    #[error("Unsupported stream format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to build output stream: {0}")]
    BuildStream(String),

    #[error("Failed to start output stream: {0}")]
    PlayStream(String),

    #[error("Failed to stop output stream: {0}")]
    PauseStream(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown note label: {0}")]
    InvalidNote(String),

    #[error("Invalid pan layout edit: {0}")]
    InvalidLayout(String),

    #[error("Illegal stream transition {from:?} -> {to:?}")]
    StreamState { from: StreamState, to: StreamState },

    #[error("Envelope scheduler error: {0}")]
    Scheduler(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
