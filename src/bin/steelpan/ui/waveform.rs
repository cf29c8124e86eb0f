//! Output scope with the limiter ceiling marked
//!
//! The x axis is time in milliseconds across the visual buffer. Dashed red
//! rails sit at `±ceiling`; the title turns red while any sample is pinned
//! against them.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Head-room drawn above the ceiling so the rails don't sit on the border
const MARGIN: f64 = 1.15;

/// Points per ceiling rail; sparse so the rail reads as dashed
const RAIL_POINTS: usize = 24;

pub fn render_waveform(
    frame: &mut Frame,
    area: Rect,
    audio_buffer: &[f32],
    sample_rate: Option<u32>,
    ceiling: f32,
) {
    let span_ms = sample_rate
        .filter(|&rate| rate > 0)
        .map_or(1.0, |rate| audio_buffer.len() as f64 * 1_000.0 / rate as f64);
    let step = span_ms / audio_buffer.len().max(1) as f64;

    let data: Vec<(f64, f64)> = audio_buffer
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 * step, sample as f64))
        .collect();

    let ceiling = ceiling as f64;
    let rail = |level: f64| -> Vec<(f64, f64)> {
        (0..RAIL_POINTS)
            .map(|i| (span_ms * i as f64 / (RAIL_POINTS - 1) as f64, level))
            .collect()
    };
    let upper = rail(ceiling);
    let lower = rail(-ceiling);

    let peak = audio_buffer.iter().fold(0.0f32, |acc, &s| acc.max(s.abs())) as f64;
    let limiting = ceiling > 0.0 && peak >= ceiling * 0.999;

    let mut title = vec![Span::raw(" Output ")];
    title.push(Span::styled(
        format!("peak {} ", format_db(peak)),
        Style::default().fg(Color::DarkGray),
    ));
    if limiting {
        title.push(Span::styled(
            "LIMIT ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL);

    let rail_style = Style::default().fg(Color::Red);
    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(rail_style)
            .data(&upper),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(rail_style)
            .data(&lower),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&data),
    ];

    let range = (ceiling * MARGIN).max(0.1);
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, span_ms])
                .labels(vec!["0".to_string(), format!("{:.0} ms", span_ms)])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-range, range])
                .labels(vec![format!("-{:.1}", ceiling), format!("{:.1}", ceiling)])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

fn format_db(level: f64) -> String {
    if level <= 1e-5 {
        "-inf dB".to_string()
    } else {
        format!("{:.1} dB", 20.0 * level.log10())
    }
}
