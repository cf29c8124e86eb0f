//! Low-level DSP primitives used by the voices and the mix bus.
//!
//! These components are allocation-free and realtime-safe. The envelope cell
//! is the one piece shared across threads; everything else is owned by the
//! audio thread.

/// Mix bus limiter.
pub mod distortion;
/// Generation-tagged atomic envelope with wall-clock decay steps.
pub mod envelope;
/// One-pole smoothing filter.
pub mod filter;
/// Additive steelpan partial oscillator.
pub mod oscillator;

pub use envelope::{DecayStep, EnvelopeCell, EnvelopeValue};
pub use filter::OnePole;
pub use oscillator::HarmonicOscillator;
