//! Status bar - stream format, polyphony in use and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::View;

pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_status(frame: &mut Frame, area: Rect, view: &View, stats: &AudioStats) {
    let block = Block::default().title(" steelpan ").borders(Borders::ALL);

    let format = match view.format {
        Some(f) => format!("{:.1}kHz {}ch  ", f.sample_rate as f32 / 1000.0, f.channels),
        None => "no stream  ".to_string(),
    };
    let active = view.voices.iter().filter(|v| v.active).count();

    let line = Line::from(vec![
        Span::styled(format, Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Voices {}/{}  ", active, view.voices.len()),
            Style::default().fg(if active == view.voices.len() && active > 0 {
                Color::Red
            } else {
                Color::Green
            }),
        ),
        Span::styled(
            format!("Last: {}  ", view.last_note.as_deref().unwrap_or("-")),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
