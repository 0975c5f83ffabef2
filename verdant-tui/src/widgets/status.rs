//! Status badge spans.

use crate::theme::{delivery_status_color, progress_status_color, VerdantTheme};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};
use verdant_core::{DeliveryStatus, ProgressStatus};

pub struct StatusBadge;

impl StatusBadge {
    pub fn delivery(status: DeliveryStatus, theme: &VerdantTheme) -> Span<'static> {
        Span::styled(
            format!("[{}]", status.label()),
            Style::default()
                .fg(delivery_status_color(status, theme))
                .add_modifier(Modifier::BOLD),
        )
    }

    pub fn progress(status: ProgressStatus, theme: &VerdantTheme) -> Span<'static> {
        Span::styled(
            format!("[{}]", status.label()),
            Style::default().fg(progress_status_color(status, theme)),
        )
    }
}
