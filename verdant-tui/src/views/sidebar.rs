//! Sidebar with the dashboard link and the customer list.

use crate::nav::Route;
use crate::state::{App, Focus, SidebarEntry};
use crate::views::helpers::titled_block;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let entries = app.sidebar_entries();
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let (label, active) = match entry {
                SidebarEntry::Dashboard => {
                    ("Dashboard".to_string(), *app.route() == Route::Dashboard)
                }
                SidebarEntry::Customers => {
                    let marker = if app.sidebar.customers_expanded { "▾" } else { "▸" };
                    (format!("{} Customers", marker), false)
                }
                SidebarEntry::Customer { id, name } => {
                    let active = matches!(
                        app.route(),
                        Route::Customer { customer_id } if customer_id == id
                    );
                    (format!("  {}", name), active)
                }
            };
            let style = if active {
                Style::default()
                    .fg(app.theme.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            ListItem::new(Line::styled(label, style))
        })
        .collect();

    let focused = app.focus == Focus::Sidebar;
    let mut state = ListState::default();
    if focused {
        state.select(Some(app.sidebar.selected.min(entries.len().saturating_sub(1))));
    }
    let list = List::new(items)
        .block(titled_block("Verdant", &app.theme, focused))
        .highlight_style(Style::default().bg(app.theme.bg_highlight))
        .highlight_symbol("› ");
    f.render_stateful_widget(list, chunks[0], &mut state);

    let version = Paragraph::new(format!(" Verdant v{}", env!("CARGO_PKG_VERSION")))
        .style(Style::default().fg(app.theme.text_muted));
    f.render_widget(version, chunks[1]);
}
