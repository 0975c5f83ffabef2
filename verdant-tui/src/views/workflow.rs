//! Stage workflow view: unit counters, steps, forms and audit trail.

use crate::nav::resolve_workflow;
use crate::state::{step_offers_action, App, InputTarget};
use crate::theme::{progress_glyph, progress_status_color};
use crate::views::helpers::{equal_columns, titled_block};
use crate::views::not_found;
use crate::widgets::{MetricCard, TextInput};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use verdant_core::{
    format_count, format_timestamp, StageId, StageWorkflow, StepKind, WorkflowStepRecord, MISSING,
};

pub fn render(f: &mut Frame<'_>, app: &App, delivery_id: &str, stage_id: StageId, area: Rect) {
    let Some((delivery, workflow)) = resolve_workflow(app.source.as_ref(), delivery_id, stage_id)
    else {
        not_found::render(f, app, "Workflow data not found", area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    let heading = vec![
        Line::styled(
            format!("{} Workflow", workflow.stage_name),
            Style::default()
                .fg(app.theme.text)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!("{} • {}", delivery.id, delivery.customer_name),
            Style::default().fg(app.theme.text_dim),
        ),
    ];
    f.render_widget(Paragraph::new(heading), chunks[0]);

    render_counters(f, app, workflow, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[2]);
    render_steps(f, app, workflow, body[0]);

    if app.workflow_view.show_audit {
        render_audit(f, app, delivery_id, body[1]);
    } else {
        render_step_detail(f, app, workflow, body[1]);
    }
}

fn render_counters(f: &mut Frame<'_>, app: &App, workflow: &StageWorkflow, area: Rect) {
    let theme = &app.theme;
    let subtitle_style = Style::default().fg(theme.text_muted);
    let card = |title, value: u32, color| MetricCard {
        title,
        value: format_count(u64::from(value)),
        subtitle: "feeders".to_string(),
        value_style: Style::default().fg(color),
        subtitle_style,
    };
    let cards = [
        card("Units in Scope", workflow.units_in_scope, theme.text),
        card("Units Released", workflow.units_released, theme.info),
        card("Already Processed", workflow.units_already_processed, theme.success),
        card("Remaining", workflow.units_remaining, theme.warning),
    ];
    for (card, column) in cards.iter().zip(equal_columns(area, 4)) {
        card.render(f, column);
    }
}

fn render_steps(f: &mut Frame<'_>, app: &App, workflow: &StageWorkflow, area: Rect) {
    let theme = &app.theme;
    let expansion = &app.workflow_view.expansion;

    let items: Vec<ListItem> = workflow
        .steps
        .iter()
        .map(|step| {
            let color = progress_status_color(step.status, theme);
            let marker = if expansion.is_expanded(step.id) { "▾" } else { "▸" };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{} ", progress_glyph(step.status)), Style::default().fg(color)),
                    Span::styled(
                        format!("Step {} - {}", step.id, step.name),
                        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!(" {}", marker), Style::default().fg(theme.text_muted)),
                ]),
                Line::styled(
                    format!("    {} • {}", step.authorized_role, step.status.label()),
                    Style::default().fg(theme.text_dim),
                ),
            ])
        })
        .collect();

    let mut state = ListState::default();
    state.select(
        app.workflow_view
            .selected
            .and_then(|id| workflow.steps.iter().position(|s| s.id == id)),
    );
    let list = List::new(items)
        .block(titled_block(
            format!("Steps ({}/{} done)", workflow.completed_steps(), workflow.steps.len()),
            theme,
            app.editing.is_none(),
        ))
        .highlight_style(Style::default().bg(theme.bg_highlight))
        .highlight_symbol("› ");
    f.render_stateful_widget(list, area, &mut state);
}

fn render_step_detail(f: &mut Frame<'_>, app: &App, workflow: &StageWorkflow, area: Rect) {
    let theme = &app.theme;
    let Some(step) = app
        .workflow_view
        .expansion
        .expanded()
        .and_then(|id| workflow.step(id))
    else {
        let hint = Paragraph::new(vec![
            Line::raw(""),
            Line::styled(
                "Select a step and press Space to expand it",
                Style::default().fg(theme.text_dim),
            ),
        ])
        .block(titled_block("Step Details", theme, false));
        f.render_widget(hint, area);
        return;
    };

    let shows_form = step.kind == StepKind::ShareRequirement && step_offers_action(step);
    let constraints: &[Constraint] = if shows_form {
        &[Constraint::Min(6), Constraint::Length(3), Constraint::Length(5)]
    } else {
        &[Constraint::Min(0)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints.to_vec())
        .split(area);

    let detail = Paragraph::new(step_lines(app, step))
        .block(titled_block(format!("Step {} - {}", step.id, step.name), theme, false))
        .wrap(Wrap { trim: true });
    f.render_widget(detail, chunks[0]);

    if shows_form {
        let style = Style::default().fg(theme.text);
        let focus_style = Style::default().fg(theme.border_focus);
        let placeholder_style = Style::default().fg(theme.text_muted);
        TextInput {
            title: "Query (required)",
            buffer: &app.workflow_view.query_input,
            placeholder: "Define the feeder scope...",
            focused: app.editing == Some(InputTarget::Query),
            style,
            focus_style,
            placeholder_style,
        }
        .render(f, chunks[1]);
        TextInput {
            title: "Instructions",
            buffer: &app.workflow_view.instructions_input,
            placeholder: "Optional notes for the GIS team...",
            focused: app.editing == Some(InputTarget::Instructions),
            style,
            focus_style,
            placeholder_style,
        }
        .render(f, chunks[2]);
    }
}

fn step_lines(app: &App, step: &WorkflowStepRecord) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let label = Style::default().fg(theme.text_dim);
    let mut lines = vec![
        Line::raw(step.description.clone()),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Role      ", label),
            Span::raw(step.authorized_role.clone()),
        ]),
        Line::from(vec![
            Span::styled("Status    ", label),
            Span::styled(
                step.status.label(),
                Style::default().fg(progress_status_color(step.status, theme)),
            ),
        ]),
    ];
    if let Some(at) = step.completed_at {
        lines.push(Line::from(vec![
            Span::styled("Completed ", label),
            Span::raw(format!(
                "{} by {}",
                format_timestamp(at),
                step.completed_by.as_deref().unwrap_or(MISSING)
            )),
        ]));
    }
    if let Some(payload) = &step.payload {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("Query     ", label),
            Span::raw(payload.query.clone().unwrap_or_else(|| MISSING.to_string())),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Notes     ", label),
            Span::raw(
                payload
                    .instructions
                    .clone()
                    .unwrap_or_else(|| MISSING.to_string()),
            ),
        ]));
    }

    lines.push(Line::raw(""));
    if step_offers_action(step) {
        let hint = match step.kind {
            StepKind::ShareRequirement => {
                format!("[e] edit form • [a]/Ctrl-S {}", step.kind.action_label())
            }
            _ => format!("[a] {}", step.kind.action_label()),
        };
        lines.push(Line::styled(
            hint,
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ));
    } else {
        lines.push(Line::styled(
            "No action available for this step",
            Style::default().fg(theme.text_muted),
        ));
    }
    lines
}

fn render_audit(f: &mut Frame<'_>, app: &App, delivery_id: &str, area: Rect) {
    let theme = &app.theme;
    let entries = app.source.audit_logs(delivery_id);
    let items: Vec<ListItem> = if entries.is_empty() {
        vec![ListItem::new(Line::styled(
            "No audit entries recorded",
            Style::default().fg(theme.text_dim),
        ))]
    } else {
        entries
            .iter()
            .map(|entry| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            format_timestamp(entry.timestamp),
                            Style::default().fg(theme.text_muted),
                        ),
                        Span::raw("  "),
                        Span::styled(
                            entry.action.clone(),
                            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::styled(
                        format!("{} ({}) • {}", entry.user, entry.role, entry.stage),
                        Style::default().fg(theme.text_dim),
                    ),
                    Line::raw(entry.details.clone()),
                    Line::raw(""),
                ])
            })
            .collect()
    };
    let list = List::new(items).block(titled_block(
        format!("Audit Trail ({}) [l]", entries.len()),
        theme,
        false,
    ));
    f.render_widget(list, area);
}
