//! Text input box backed by a `TextArea` buffer.

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

pub struct TextInput<'a> {
    pub title: &'a str,
    pub buffer: &'a TextArea<'static>,
    pub placeholder: &'a str,
    pub focused: bool,
    pub style: Style,
    pub focus_style: Style,
    pub placeholder_style: Style,
}

impl<'a> TextInput<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = self.buffer.lines();
        let empty = lines.iter().all(|l| l.is_empty());
        let text: Vec<Line> = if empty && !self.focused {
            vec![Line::styled(self.placeholder.to_string(), self.placeholder_style)]
        } else {
            lines.iter().map(|l| Line::raw(l.clone())).collect()
        };

        let border = if self.focused { self.focus_style } else { self.style };
        let widget = Paragraph::new(text).block(
            Block::default()
                .title(self.title)
                .borders(Borders::ALL)
                .border_style(border),
        );
        f.render_widget(widget, area);

        if self.focused {
            let (row, col) = self.buffer.cursor();
            let x = (area.x + 1).saturating_add(u16::try_from(col).unwrap_or(u16::MAX));
            let y = (area.y + 1).saturating_add(u16::try_from(row).unwrap_or(u16::MAX));
            let max_x = area.right().saturating_sub(2);
            let max_y = area.bottom().saturating_sub(2);
            f.set_cursor(x.min(max_x), y.min(max_y));
        }
    }
}
