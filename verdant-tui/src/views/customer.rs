//! Customer profile with summary counts and its delivery phases.

use crate::state::App;
use crate::theme::progress_status_color;
use crate::views::helpers::titled_block;
use crate::views::not_found;
use crate::widgets::{DetailPanel, StatusBadge};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};
use verdant_core::{
    format_count, format_currency, format_date, CustomerRecord, CustomerSummary, DeliveryRecord,
};

pub fn render(f: &mut Frame<'_>, app: &App, customer_id: &str, area: Rect) {
    let Some(customer) = app.source.customer_by_id(customer_id) else {
        not_found::render(f, app, "Customer not found", area);
        return;
    };
    let deliveries = app.source.deliveries_by_customer(customer_id);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(6)])
        .split(columns[0]);

    profile_panel(app, customer).render(f, left[0]);

    let summary = CustomerSummary::for_deliveries(deliveries.iter().copied());
    DetailPanel {
        title: "Delivery Summary",
        fields: vec![
            ("Running", summary.running.to_string()),
            ("Completed", summary.completed.to_string()),
            ("Total Feeders", format_count(summary.total_units)),
            ("Total Phases", summary.total_phases.to_string()),
        ],
        style: Style::default().fg(app.theme.text_dim),
    }
    .render(f, left[1]);

    render_deliveries(f, app, &deliveries, columns[1]);
}

fn profile_panel<'a>(app: &App, customer: &'a CustomerRecord) -> DetailPanel<'a> {
    DetailPanel {
        title: customer.name.as_str(),
        fields: vec![
            ("Industry", customer.industry.clone()),
            (
                "Headquarters",
                format!("{}, {}", customer.hq_state, customer.hq_country),
            ),
            ("Annual ARR", format_currency(customer.arr)),
            ("Contract ID", customer.contract_id.clone()),
            (
                "Contract Period",
                format!(
                    "{} - {}",
                    format_date(customer.contract_start_date),
                    format_date(customer.contract_end_date)
                ),
            ),
            ("Primary Contact", customer.contact_name.clone()),
            ("Email", customer.contact_email.clone()),
            ("Role", customer.contact_role.clone()),
        ],
        style: Style::default().fg(app.theme.text_dim),
    }
}

fn render_deliveries(f: &mut Frame<'_>, app: &App, deliveries: &[&DeliveryRecord], area: Rect) {
    let theme = &app.theme;
    let catalog = app.source.stage_catalog();

    let items: Vec<ListItem> = deliveries
        .iter()
        .map(|delivery| {
            let heading = Line::from(vec![
                Span::styled(
                    delivery.id.clone(),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                StatusBadge::delivery(delivery.status, theme),
                Span::styled(
                    format!(
                        "  Phase {} ({}) • {} feeders • est. {}",
                        delivery.phase_number,
                        delivery.delivery_year,
                        format_count(u64::from(delivery.unit_count)),
                        format_date(delivery.estimated_delivery_date)
                    ),
                    Style::default().fg(theme.text_dim),
                ),
            ]);
            let chips: Vec<Span> = delivery
                .stages(catalog)
                .iter()
                .filter_map(|stage| {
                    let definition = catalog.get(stage.stage_id)?;
                    Some(Span::styled(
                        format!(" {}: {} ", definition.short_name, stage.status.label()),
                        Style::default().fg(progress_status_color(stage.status, theme)),
                    ))
                })
                .collect();
            ListItem::new(vec![heading, Line::from(chips), Line::raw("")])
        })
        .collect();

    let mut state = ListState::default();
    state.select(
        app.customer_view
            .selected
            .as_deref()
            .and_then(|id| deliveries.iter().position(|d| d.id == id)),
    );
    let list = List::new(items)
        .block(titled_block(
            format!("Delivery Phases ({})", deliveries.len()),
            theme,
            true,
        ))
        .highlight_style(Style::default().bg(theme.bg_highlight))
        .highlight_symbol("› ");
    f.render_stateful_widget(list, area, &mut state);
}
