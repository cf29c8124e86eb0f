pub mod config; // Engine parameters and validation
pub mod dsp;
pub mod engine; // Stream plumbing and the public engine
pub mod error;
pub mod pan; // Note names and pad layout
pub mod synth; // Voice management and polyphony

pub use config::{DecaySchedule, EngineConfig, ToneShaping};
pub use engine::offline::{OfflineBackend, OfflineSink};
pub use engine::stream::{StreamFormat, StreamState};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use synth::{VoiceRef, VoiceSnapshot};
