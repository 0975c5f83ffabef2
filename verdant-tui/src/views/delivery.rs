//! Delivery phase detail: pipeline progress and current stage.

use crate::nav::current_workflow_route;
use crate::state::App;
use crate::theme::{progress_glyph, progress_status_color};
use crate::views::helpers::{equal_columns, titled_block};
use crate::views::not_found;
use crate::widgets::{MetricCard, ProgressBar, StatusBadge};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};
use verdant_core::{
    format_count, format_date, format_optional_date, DeliveryRecord, PipelineProgress,
    ProgressStatus, StageProgress,
};

pub fn render(f: &mut Frame<'_>, app: &App, delivery_id: &str, area: Rect) {
    let Some(delivery) = app.source.delivery_by_id(delivery_id) else {
        not_found::render(f, app, "Delivery phase not found", area);
        return;
    };
    let stages = delivery.stages(app.source.stage_catalog());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    render_heading(f, app, delivery, chunks[0]);
    render_cards(f, app, delivery, chunks[1]);

    ProgressBar {
        title: "Delivery Pipeline".to_string(),
        progress: PipelineProgress::from_stages(&stages),
        running_style: Style::default().fg(app.theme.info).bg(app.theme.bg_secondary),
        finished_style: Style::default().fg(app.theme.success).bg(app.theme.bg_secondary),
    }
    .render(f, chunks[2]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[3]);
    render_stages(f, app, &stages, body[0]);
    render_current_stage(f, app, delivery, body[1]);
}

fn render_heading(f: &mut Frame<'_>, app: &App, delivery: &DeliveryRecord, area: Rect) {
    let theme = &app.theme;
    let lines = vec![
        Line::from(vec![
            Span::styled(
                delivery.id.clone(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            StatusBadge::delivery(delivery.status, theme),
        ]),
        Line::styled(
            format!(
                "{} - Phase {} ({})",
                delivery.customer_name, delivery.phase_number, delivery.delivery_year
            ),
            Style::default().fg(theme.text_dim),
        ),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_cards(f: &mut Frame<'_>, app: &App, delivery: &DeliveryRecord, area: Rect) {
    let value_style = Style::default().fg(app.theme.text);
    let subtitle_style = Style::default().fg(app.theme.text_muted);
    let cards = [
        MetricCard {
            title: "Feeders",
            value: format_count(u64::from(delivery.unit_count)),
            subtitle: delivery.contract_id.clone(),
            value_style,
            subtitle_style,
        },
        MetricCard {
            title: "Network Type",
            value: delivery.network_type.label().to_string(),
            subtitle: String::new(),
            value_style,
            subtitle_style,
        },
        MetricCard {
            title: "Start Date",
            value: format_date(delivery.start_date),
            subtitle: String::new(),
            value_style,
            subtitle_style,
        },
        MetricCard {
            title: "Est. Delivery",
            value: format_date(delivery.estimated_delivery_date),
            subtitle: String::new(),
            value_style,
            subtitle_style,
        },
    ];
    for (card, column) in cards.iter().zip(equal_columns(area, 4)) {
        card.render(f, column);
    }
}

fn render_stages(f: &mut Frame<'_>, app: &App, stages: &[StageProgress], area: Rect) {
    let theme = &app.theme;
    let catalog = app.source.stage_catalog();

    let mut items: Vec<ListItem> = stages
        .iter()
        .map(|stage| {
            let color = progress_status_color(stage.status, theme);
            let name = catalog
                .get(stage.stage_id)
                .map_or_else(|| format!("Stage {}", stage.stage_id), |d| d.short_name.clone());
            let name_style = if stage.status == ProgressStatus::Running {
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", progress_glyph(stage.status)), Style::default().fg(color)),
                Span::styled(format!("{:<22}", name), name_style),
                Span::styled(
                    format!(
                        "{:>7}/{:<7}",
                        format_count(u64::from(stage.units_processed)),
                        format_count(u64::from(stage.units_total))
                    ),
                    Style::default().fg(theme.text_dim),
                ),
                Span::styled(stage.status.label(), Style::default().fg(color)),
            ]))
        })
        .collect();

    items.push(ListItem::new(Line::raw("")));
    items.push(ListItem::new(legend(app)));

    let list = List::new(items).block(titled_block("Stages", theme, false));
    f.render_widget(list, area);
}

fn legend(app: &App) -> Line<'static> {
    let mut spans = Vec::new();
    for status in [
        ProgressStatus::Completed,
        ProgressStatus::Running,
        ProgressStatus::Upcoming,
    ] {
        spans.push(Span::styled(
            format!("{} {}  ", progress_glyph(status), status.label()),
            Style::default().fg(progress_status_color(status, &app.theme)),
        ));
    }
    Line::from(spans)
}

fn render_current_stage(f: &mut Frame<'_>, app: &App, delivery: &DeliveryRecord, area: Rect) {
    let theme = &app.theme;
    let catalog = app.source.stage_catalog();
    let description = catalog
        .get(delivery.current_stage_index)
        .map(|d| d.description.clone())
        .unwrap_or_default();

    let mut lines = vec![
        Line::styled(
            format!(
                "Stage {} - {}",
                delivery.current_stage_index, delivery.current_stage_name
            ),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!("ETA: {}", format_optional_date(delivery.stage_eta)),
            Style::default().fg(theme.text_dim),
        ),
        Line::raw(""),
        Line::raw(description),
    ];
    if current_workflow_route(app.source.as_ref(), delivery).is_some() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "[w] Open Workflow",
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ));
    }

    let panel = Paragraph::new(lines)
        .block(titled_block("Current Stage Details", theme, false))
        .wrap(Wrap { trim: true });
    f.render_widget(panel, area);
}
