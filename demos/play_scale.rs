//! Walk up every pad of the double tenor on the default output device.

use std::thread;
use std::time::Duration;

use steelpan_dsp::pan::PanLayout;
use steelpan_dsp::{Engine, EngineConfig};

fn main() -> steelpan_dsp::Result<()> {
    env_logger::init();

    let mut engine = Engine::new(EngineConfig::default());
    engine.initialize()?;

    let layout = PanLayout::double_tenor();
    let mut pads: Vec<_> = layout.iter().collect();
    pads.sort_by(|a, b| a.frequency().total_cmp(&b.frequency()));
    pads.dedup_by(|a, b| a.note.midi() == b.note.midi());

    for pad in pads {
        if let Some(voice) = engine.note_on(pad.frequency()) {
            println!(
                "{:<4} {:>7.2} Hz  drum {}  voice {}{}",
                pad.label(),
                pad.frequency(),
                pad.drum,
                voice.index,
                if voice.stolen { " (stolen)" } else { "" }
            );
        }
        thread::sleep(Duration::from_millis(180));
    }

    // Let the last notes ring out
    thread::sleep(engine.config().decay.max_duration());
    engine.shutdown();
    Ok(())
}
