//! Common view rendering helpers.

use crate::theme::VerdantTheme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
};

/// A rectangle of the given percentage size centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Split `area` into `count` equal columns.
pub fn equal_columns(area: Rect, count: u16) -> Vec<Rect> {
    let count = count.max(1);
    let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, u32::from(count))).collect();
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

pub fn titled_block<'a>(title: impl Into<String>, theme: &VerdantTheme, focused: bool) -> Block<'a> {
    let border = if focused { theme.border_focus } else { theme.border };
    Block::default()
        .title(title.into())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}
