//! TUI for the steelpan
//!
//! Two drums of pads on top, per-voice meters and the output scope and
//! spectrum below.

mod meters;
mod pads;
mod spectrum;
mod status;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use steelpan_dsp::pan::PanLayout;
use steelpan_dsp::{StreamFormat, VoiceSnapshot};

pub use spectrum::SpectrumAnalyzer;

use meters::render_meters;
use pads::render_drum;
use spectrum::render_spectrum;
use status::{render_status, AudioStats};
use waveform::render_waveform;

/// Everything one frame needs, borrowed from the app.
pub struct View<'a> {
    pub layout: &'a PanLayout,
    pub keymap: &'a [(char, usize)],
    pub voices: Vec<VoiceSnapshot>,
    pub attack_level: f32,
    /// Limiter ceiling, marked on the scope
    pub ceiling: f32,
    pub format: Option<StreamFormat>,
    pub audio: &'a [f32],
    pub spectrum: &'a [(f64, f64)],
    pub flashing: Option<usize>,
    pub last_note: Option<String>,
}

pub fn render(frame: &mut Frame, view: &View) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Status bar
            Constraint::Min(12),    // Drums
            Constraint::Length(10), // Meters | scope | spectrum
            Constraint::Length(1),  // Help bar
        ])
        .split(area);

    render_status(frame, rows[0], view, &AudioStats::from_buffer(view.audio));

    let drums = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    for (drum, &area) in drums.iter().enumerate().take(view.layout.drum_count()) {
        render_drum(frame, area, view, drum);
    }

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(32),
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(rows[2]);
    render_meters(frame, bottom[0], &view.voices, view.attack_level);
    render_waveform(
        frame,
        bottom[1],
        view.audio,
        view.format.map(|f| f.sample_rate),
        view.ceiling,
    );
    render_spectrum(frame, bottom[2], view.spectrum);

    let help = Paragraph::new(" [1-7 q-t] Left drum  [a-j z-c] Right drum  [Esc] Quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[3]);
}
