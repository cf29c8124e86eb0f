//! Voice meters - one gauge per voice, scaled to the attack level

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    widgets::{Block, Borders, LineGauge},
    Frame,
};
use steelpan_dsp::VoiceSnapshot;

pub fn render_meters(frame: &mut Frame, area: Rect, voices: &[VoiceSnapshot], attack_level: f32) {
    let block = Block::default().title(" Voices ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(voices.iter().map(|_| Constraint::Length(1)))
        .split(inner);

    for (i, (voice, &row)) in voices.iter().zip(rows.iter()).enumerate() {
        let ratio = if attack_level > 0.0 {
            (voice.level / attack_level).clamp(0.0, 1.0) as f64
        } else {
            0.0
        };
        let label = if voice.active {
            format!("{} {:>7.1}Hz", i, voice.frequency)
        } else {
            format!("{}        --", i)
        };

        let gauge = LineGauge::default()
            .ratio(ratio)
            .label(label)
            .line_set(symbols::line::THICK)
            .filled_style(Style::default().fg(if voice.active {
                Color::Green
            } else {
                Color::DarkGray
            }))
            .unfilled_style(Style::default().fg(Color::Black));
        frame.render_widget(gauge, row);
    }
}
