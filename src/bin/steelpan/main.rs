//! steelpan - play the double tenor from the terminal
//!
//! Run with: cargo run --bin steelpan

mod app;
mod ui;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use rtrb::RingBuffer;
use steelpan_dsp::{Engine, EngineConfig};

use app::App;

/// Samples the scope can fall behind before the tap starts dropping them
const TAP_CAPACITY: usize = 16_384;

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let (tap, audio_rx) = RingBuffer::<f32>::new(TAP_CAPACITY);
    let mut engine = Engine::new(EngineConfig::default());
    engine.set_output_tap(tap);
    engine
        .initialize()
        .wrap_err("failed to start audio output")?;

    let mut terminal = ratatui::init();
    let result = App::new(engine, audio_rx).run(&mut terminal);
    ratatui::restore();

    result
}
