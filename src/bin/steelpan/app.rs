//! Keyboard instrument: keys strike pads, the engine does the rest.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use rtrb::Consumer;
use steelpan_dsp::pan::PanLayout;
use steelpan_dsp::Engine;

use crate::ui::{self, SpectrumAnalyzer, View};

/// Samples kept for the scope and the FFT
pub const VIS_BUFFER_SIZE: usize = 2048;

/// Keys for each drum, outer ring first, in layout order
const DRUM_KEYS: [&str; 2] = ["1234567qwert", "asdfghjzxc"];

/// How long a struck pad stays highlighted
const FLASH: Duration = Duration::from_millis(150);

pub struct App {
    engine: Engine,
    layout: PanLayout,
    /// (key, pad index)
    keymap: Vec<(char, usize)>,
    audio_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    last_strike: Option<(usize, Instant)>,
    should_quit: bool,
}

impl App {
    pub fn new(engine: Engine, audio_rx: Consumer<f32>) -> Self {
        let layout = PanLayout::double_tenor();
        let keymap = build_keymap(&layout);
        let sample_rate = engine.sample_rate().unwrap_or(48_000) as f32;

        Self {
            engine,
            layout,
            keymap,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            last_strike: None,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.spectrum.update(&self.audio_buffer);

            let view = self.view();
            terminal.draw(|frame| ui::render(frame, &view))?;

            // ~60fps; drain every pending key so fast rolls aren't delayed a frame each
            if event::poll(Duration::from_millis(16))? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press {
                            self.handle_key(key.code);
                        }
                    }
                }
            }
        }

        self.engine.shutdown();
        Ok(())
    }

    fn poll_audio(&mut self) {
        let available = self.audio_rx.slots();
        if available == 0 {
            return;
        }

        self.audio_buffer
            .extend(std::iter::from_fn(|| self.audio_rx.pop().ok()).take(available));
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) => {
                let c = c.to_ascii_lowercase();
                if let Some(&(_, index)) = self.keymap.iter().find(|(k, _)| *k == c) {
                    self.strike(index);
                }
            }
            _ => {}
        }
    }

    fn strike(&mut self, index: usize) {
        let Some(pad) = self.layout.pads().get(index) else {
            return;
        };
        if self.engine.note_on(pad.frequency()).is_some() {
            self.last_strike = Some((index, Instant::now()));
        }
    }

    fn view(&self) -> View<'_> {
        let flashing = self
            .last_strike
            .filter(|(_, at)| at.elapsed() < FLASH)
            .map(|(index, _)| index);

        View {
            layout: &self.layout,
            keymap: &self.keymap,
            voices: self.engine.voices(),
            attack_level: self.engine.config().attack_level,
            ceiling: self.engine.config().tone.ceiling,
            format: self.engine.format(),
            audio: &self.audio_buffer,
            spectrum: self.spectrum.data(),
            flashing,
            last_note: self
                .last_strike
                .and_then(|(index, _)| self.layout.pads().get(index))
                .map(|pad| pad.label()),
        }
    }
}

fn build_keymap(layout: &PanLayout) -> Vec<(char, usize)> {
    let mut keymap = Vec::new();
    for (drum, keys) in DRUM_KEYS.iter().enumerate() {
        let pads = layout
            .pads()
            .iter()
            .enumerate()
            .filter(|(_, pad)| pad.drum == drum);
        for (key, (index, _)) in keys.chars().zip(pads) {
            keymap.push((key, index));
        }
    }
    keymap
}
