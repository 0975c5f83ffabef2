//! Headline metric card.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct MetricCard<'a> {
    pub title: &'a str,
    pub value: String,
    pub subtitle: String,
    pub value_style: Style,
    pub subtitle_style: Style,
}

impl<'a> MetricCard<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                self.value.clone(),
                self.value_style.add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(self.subtitle.clone(), self.subtitle_style)),
        ];
        let card = Paragraph::new(lines)
            .block(Block::default().title(self.title).borders(Borders::ALL));
        f.render_widget(card, area);
    }
}
