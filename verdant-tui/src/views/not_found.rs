//! Fallback view for routes whose record does not exist.

use crate::state::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, message: &str, area: Rect) {
    let lines = vec![
        Line::raw(""),
        Line::styled(message.to_string(), Style::default().fg(app.theme.text_dim)),
        Line::raw(""),
        Line::styled(
            "Esc to go back • h for the dashboard",
            Style::default().fg(app.theme.text_muted),
        ),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
