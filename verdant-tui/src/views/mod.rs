//! View rendering dispatch.

pub mod customer;
pub mod dashboard;
pub mod delivery;
pub mod helpers;
pub mod not_found;
pub mod sidebar;
pub mod workflow;

use crate::keys::HELP_LINES;
use crate::nav::Route;
use crate::state::{App, Focus, InputTarget};
use crate::theme::notification_color;
use helpers::centered_rect;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 30;

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(f.size());

    sidebar::render(f, app, columns[0]);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(columns[1]);

    render_header(f, app, layout[0]);

    match app.route() {
        Route::Dashboard => dashboard::render(f, app, layout[1]),
        Route::Customer { customer_id } => customer::render(f, app, customer_id, layout[1]),
        Route::Delivery { delivery_id } => delivery::render(f, app, delivery_id, layout[1]),
        Route::WorkflowStage {
            delivery_id,
            stage_id,
        } => workflow::render(f, app, delivery_id, *stage_id, layout[1]),
    }

    render_footer(f, app, layout[2]);

    if app.help_visible {
        render_help(f, app);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let crumbs = app.route().breadcrumbs(app.source.as_ref());
    let last = crumbs.len().saturating_sub(1);
    let mut spans = Vec::new();
    for (index, crumb) in crumbs.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(app.theme.text_muted)));
        }
        let style = if index == last {
            Style::default()
                .fg(app.theme.text)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text_dim)
        };
        spans.push(Span::styled(crumb.label.clone(), style));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default().borders(Borders::ALL).title(Span::styled(
            app.route().title(),
            Style::default().fg(app.theme.primary),
        )),
    );
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = if let Some(note) = app.notifications.latest() {
        (
            format!("{}: {}", note.kind.label(), note.message),
            Style::default().fg(notification_color(note.kind, &app.theme)),
        )
    } else {
        (
            footer_help(app).to_string(),
            Style::default().fg(app.theme.text_dim),
        )
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

fn footer_help(app: &App) -> &'static str {
    match app.editing {
        Some(InputTarget::Search) => "type to search • Enter/Esc done",
        Some(InputTarget::Query | InputTarget::Instructions) => {
            "Tab switch field • Ctrl-S submit • Esc stop editing"
        }
        None if app.focus == Focus::Sidebar => {
            "j/k move • Enter open • Space fold customers • Esc leave sidebar"
        }
        None => match app.route() {
            Route::Dashboard => {
                "j/k move • Enter open • Tab running/past • / search • c g t filter • 1-0 sort • ? help"
            }
            Route::Customer { .. } => "j/k move • Enter open phase • Esc back • ? help",
            Route::Delivery { .. } => "w open workflow • C customer • Esc back • ? help",
            Route::WorkflowStage { .. } => {
                "j/k move • Space expand • e edit • a run action • l audit trail • Esc back"
            }
        },
    }
}

fn render_help(f: &mut Frame<'_>, app: &App) {
    let area = centered_rect(60, 70, f.size());
    let items: Vec<ListItem> = HELP_LINES
        .iter()
        .map(|(keys, description)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<8}", keys), Style::default().fg(app.theme.primary)),
                Span::raw(*description),
            ]))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title("Keybindings")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focus)),
    );
    f.render_widget(Clear, area);
    f.render_widget(list, area);
}
