//! Verdant theme and color utilities.

use crate::notifications::NotificationKind;
use ratatui::style::Color;
use verdant_core::{DeliveryStatus, ProgressStatus};

#[derive(Debug, Clone)]
pub struct VerdantTheme {
    pub bg: Color,
    pub bg_secondary: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl VerdantTheme {
    pub fn verdant() -> Self {
        Self {
            bg: Color::Rgb(15, 23, 42),
            bg_secondary: Color::Rgb(30, 41, 59),
            bg_highlight: Color::Rgb(51, 65, 85),
            primary: Color::Rgb(16, 185, 129),
            primary_dim: Color::Rgb(6, 95, 70),
            accent: Color::Rgb(99, 102, 241),
            success: Color::Rgb(16, 185, 129),
            warning: Color::Rgb(245, 158, 11),
            error: Color::Rgb(239, 68, 68),
            info: Color::Rgb(59, 130, 246),
            text: Color::Rgb(241, 245, 249),
            text_dim: Color::Rgb(148, 163, 184),
            text_muted: Color::Rgb(100, 116, 139),
            border: Color::Rgb(71, 85, 105),
            border_focus: Color::Rgb(16, 185, 129),
        }
    }
}

impl Default for VerdantTheme {
    fn default() -> Self {
        Self::verdant()
    }
}

pub fn delivery_status_color(status: DeliveryStatus, theme: &VerdantTheme) -> Color {
    match status {
        DeliveryStatus::Running => theme.info,
        DeliveryStatus::Delayed => theme.warning,
        DeliveryStatus::Completed => theme.success,
    }
}

pub fn progress_status_color(status: ProgressStatus, theme: &VerdantTheme) -> Color {
    match status {
        ProgressStatus::Completed => theme.success,
        ProgressStatus::Running => theme.info,
        ProgressStatus::Upcoming => theme.text_muted,
    }
}

pub fn notification_color(kind: NotificationKind, theme: &VerdantTheme) -> Color {
    match kind {
        NotificationKind::Success => theme.success,
        NotificationKind::Error => theme.error,
        NotificationKind::Info => theme.info,
        NotificationKind::Warning => theme.warning,
    }
}

/// Glyph drawn for a stage or step node.
pub fn progress_glyph(status: ProgressStatus) -> &'static str {
    match status {
        ProgressStatus::Completed => "✔",
        ProgressStatus::Running => "◐",
        ProgressStatus::Upcoming => "○",
    }
}
