//! Pipeline progress gauge.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};
use verdant_core::{format_percent, PipelineProgress};

pub struct ProgressBar {
    pub title: String,
    pub progress: PipelineProgress,
    pub running_style: Style,
    pub finished_style: Style,
}

impl ProgressBar {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let ratio = self.progress.ratio().clamp(0.0, 1.0);
        let style = if self.progress.is_finished() {
            self.finished_style
        } else {
            self.running_style
        };
        let label = format!(
            "{}/{} stages  {}",
            self.progress.completed,
            self.progress.total,
            format_percent(ratio)
        );

        let gauge = Gauge::default()
            .block(Block::default().title(self.title.as_str()).borders(Borders::ALL))
            .gauge_style(style)
            .ratio(ratio)
            .label(label);
        f.render_widget(gauge, area);
    }
}
