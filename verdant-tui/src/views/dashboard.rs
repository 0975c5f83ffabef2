//! Dashboard view: headline metrics, filters and the delivery table.

use crate::state::{App, InputTarget};
use crate::theme::delivery_status_color;
use crate::views::helpers::{equal_columns, titled_block};
use crate::widgets::{FilterBar, FilterOption, MetricCard, TextInput};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use verdant_core::{format_count, format_date, DeliveryRecord, SortKey};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    render_metrics(f, app, chunks[0]);
    render_filters(f, app, chunks[1]);
    render_table(f, app, chunks[2]);
}

fn render_metrics(f: &mut Frame<'_>, app: &App, area: Rect) {
    let metrics = app.dashboard_metrics();
    let customers = {
        let mut ids: Vec<&str> = app
            .source
            .running_records()
            .into_iter()
            .map(|r| r.customer_id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    };
    let theme = &app.theme;
    let subtitle_style = Style::default().fg(theme.text_dim);

    let cards = [
        MetricCard {
            title: "Active Deliveries",
            value: metrics.total_active.to_string(),
            subtitle: format!("Across {} customers", customers),
            value_style: Style::default().fg(theme.info),
            subtitle_style,
        },
        MetricCard {
            title: "On Track",
            value: metrics.on_track.to_string(),
            subtitle: "Within estimated timeline".to_string(),
            value_style: Style::default().fg(theme.success),
            subtitle_style,
        },
        MetricCard {
            title: "Delayed",
            value: metrics.delayed.to_string(),
            subtitle: "Requires attention".to_string(),
            value_style: Style::default().fg(theme.warning),
            subtitle_style,
        },
        MetricCard {
            title: "Completed",
            value: metrics.completed.to_string(),
            subtitle: "Delivered to customers".to_string(),
            value_style: Style::default().fg(theme.primary),
            subtitle_style,
        },
    ];

    for (card, column) in cards.iter().zip(equal_columns(area, 4)) {
        card.render(f, column);
    }
}

fn render_filters(f: &mut Frame<'_>, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);
    let theme = &app.theme;

    TextInput {
        title: "Search [/]",
        buffer: &app.dashboard.search,
        placeholder: "Search phases, customers, contracts...",
        focused: app.editing == Some(InputTarget::Search),
        style: Style::default().fg(theme.text),
        focus_style: Style::default().fg(theme.border_focus),
        placeholder_style: Style::default().fg(theme.text_muted),
    }
    .render(f, columns[0]);

    let query = &app.dashboard.query;
    let filters = vec![
        FilterOption::facet("[c] Customer", &query.customer, !query.customer.is_all()),
        FilterOption::facet("[g] Stage", &query.stage, !query.stage.is_all()),
        FilterOption::facet("[t] Status", &query.status, !query.status.is_all()),
        FilterOption::facet("[Tab]", app.dashboard.partition.label(), true),
    ];
    FilterBar {
        title: "Filters [x clears]",
        filters: &filters,
        active_style: Style::default()
            .fg(theme.bg)
            .bg(theme.primary)
            .add_modifier(Modifier::BOLD),
        inactive_style: Style::default().fg(theme.text_dim),
    }
    .render(f, columns[1]);
}

fn render_table(f: &mut Frame<'_>, app: &App, area: Rect) {
    let records = app.dashboard_records();
    let theme = &app.theme;
    let title = format!(
        "{} Delivery Phases ({})",
        app.dashboard.partition.label(),
        records.len()
    );
    let block = titled_block(title, theme, app.editing.is_none());

    if records.is_empty() {
        let empty = Paragraph::new(vec![
            Line::raw(""),
            Line::styled(
                "No delivery phases match the current filters",
                Style::default().fg(theme.text_dim),
            ),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let sort = app.dashboard.query.sort;
    let header_cells = SortKey::all().iter().enumerate().map(|(index, key)| {
        let digit = (index + 1) % 10;
        let arrow = if sort.key == Some(*key) {
            sort.direction.arrow()
        } else {
            ""
        };
        Cell::from(format!("{} {}{}", digit, key.label(), arrow))
    });
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD),
    );

    let rows = records.iter().map(|record| record_row(app, record));
    let widths = [
        Constraint::Length(13),
        Constraint::Min(18),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Min(16),
        Constraint::Length(12),
    ];

    let mut state = TableState::default();
    state.select(
        app.dashboard
            .selected
            .as_deref()
            .and_then(|id| records.iter().position(|r| r.id == id)),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(theme.bg_highlight))
        .highlight_symbol("› ");
    f.render_stateful_widget(table, area, &mut state);
}

fn record_row<'a>(app: &App, record: &DeliveryRecord) -> Row<'a> {
    let status_style = Style::default().fg(delivery_status_color(record.status, &app.theme));
    Row::new(vec![
        Cell::from(record.id.clone()),
        Cell::from(record.customer_name.clone()),
        Cell::from(record.delivery_year.to_string()),
        Cell::from(format!("Phase {}", record.phase_number)),
        Cell::from(format_count(u64::from(record.unit_count))),
        Cell::from(record.contract_id.clone()),
        Cell::from(format_date(record.start_date)),
        Cell::from(format_date(record.estimated_delivery_date)),
        Cell::from(record.current_stage_name.clone()),
        Cell::from(Span::styled(record.status.label(), status_style)),
    ])
}
