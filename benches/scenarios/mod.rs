//! Full render path benchmarks.
//!
//! Every voice in the pool sounding at once is the worst case the audio
//! thread ever sees.

mod callback;
mod polyphony;

pub use callback::bench_callback;
pub use polyphony::bench_polyphony;
