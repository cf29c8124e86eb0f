//! Drum widget - the pads of one drum at their positions on the bowl

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle},
        Block, Borders,
    },
    Frame,
};
use steelpan_dsp::pan::Ring;

use super::View;

pub fn render_drum(frame: &mut Frame, area: Rect, view: &View, drum: usize) {
    let title = if drum == 0 { " Left drum " } else { " Right drum " };
    let block = Block::default().title(title).borders(Borders::ALL);

    let canvas = Canvas::default()
        .block(block)
        .x_bounds([-1.1, 1.1])
        .y_bounds([-1.1, 1.1])
        .paint(|ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: 1.0,
                color: Color::DarkGray,
            });

            for (index, pad) in view.layout.pads().iter().enumerate() {
                if pad.drum != drum {
                    continue;
                }

                let sounding = view
                    .voices
                    .iter()
                    .any(|v| v.active && v.frequency == pad.frequency());
                let color = if view.flashing == Some(index) {
                    Color::White
                } else if sounding {
                    Color::Yellow
                } else if pad.ring == Ring::Inner {
                    Color::Cyan
                } else {
                    Color::Blue
                };

                // Layout y grows down, canvas y grows up
                let (x, y) = (pad.x as f64, -pad.y as f64);
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: pad.radius() as f64,
                    color,
                });

                let key = view
                    .keymap
                    .iter()
                    .find(|(_, i)| *i == index)
                    .map(|(k, _)| k.to_string())
                    .unwrap_or_default();
                ctx.print(
                    x - 0.08,
                    y,
                    Line::from(vec![
                        Span::styled(pad.label(), Style::default().fg(color)),
                        Span::styled(format!(" {}", key), Style::default().fg(Color::DarkGray)),
                    ]),
                );
            }
        });

    frame.render_widget(canvas, area);
}
