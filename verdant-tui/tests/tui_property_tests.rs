use chrono::{Duration, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use proptest::prelude::*;
use ratatui::{backend::TestBackend, Terminal};
use std::path::PathBuf;
use std::sync::Arc;
use verdant_core::{DeliveryStatus, ProgressStatus};
use verdant_test_utils::fixtures;
use verdant_test_utils::InMemorySource;
use verdant_tui::config::{ThemeConfig, TuiConfig};
use verdant_tui::keys::{map_key, Action};
use verdant_tui::nav::Route;
use verdant_tui::notifications::{Notification, NotificationCenter, NotificationKind};
use verdant_tui::state::{App, InputTarget, EMPTY_QUERY_MESSAGE};
use verdant_tui::theme::{delivery_status_color, notification_color, progress_status_color, VerdantTheme};
use verdant_tui::views::render_view;

fn base_config() -> TuiConfig {
    TuiConfig {
        tick_rate_ms: 250,
        notification_ttl_ms: 4_000,
        log_path: PathBuf::from("tmp/verdant-tui.log"),
        fixture_path: None,
        theme: ThemeConfig {
            name: "verdant".to_string(),
        },
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
}

fn app_with(source: InMemorySource, route: Route) -> App {
    App::new(base_config(), Arc::new(source), route)
}

/// Built-in data with the labelling workflow rewound to its first step.
fn requirement_pending_source() -> InMemorySource {
    let json = fixtures::builtin_json_with(|value| {
        let steps = &mut value["workflows"]["DP-2025-001"]["steps"];
        steps[0]["status"] = "running".into();
        steps[0]["completedAt"] = serde_json::Value::Null;
        steps[0]["completedBy"] = serde_json::Value::Null;
        if let Some(step) = steps[0].as_object_mut() {
            step.remove("payload");
        }
        steps[1]["status"] = "upcoming".into();
    });
    InMemorySource::from_json_str(&json).unwrap()
}

fn labelling_route() -> Route {
    Route::WorkflowStage {
        delivery_id: "DP-2025-001".to_string(),
        stage_id: 6,
    }
}

fn rendered(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(180, 50)).unwrap();
    terminal.draw(|f| render_view(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

// ============================================================================
// Config validation
// ============================================================================

#[test]
fn config_defaults_are_valid() {
    assert!(base_config().validate().is_ok());
}

#[test]
fn config_rejects_zero_intervals() {
    let mut config = base_config();
    config.tick_rate_ms = 0;
    assert!(config.validate().is_err());

    let mut config = base_config();
    config.notification_ttl_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_log_path() {
    let mut config = base_config();
    config.log_path = PathBuf::new();
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_theme_name() {
    let mut config = base_config();
    config.theme = ThemeConfig {
        name: "unknown".to_string(),
    };
    assert!(config.validate().is_err());
}

// ============================================================================
// Requirement form submission
// ============================================================================

#[test]
fn empty_query_is_rejected_and_form_kept() {
    let mut app = app_with(requirement_pending_source(), labelling_route());
    assert_eq!(app.workflow_view.selected, Some(1));

    app.apply(Action::EditForm);
    assert_eq!(app.editing, Some(InputTarget::Query));
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.editing, Some(InputTarget::Instructions));
    type_text(&mut app, "west corridor only");
    app.handle_key(ctrl('s'));

    let latest = app.notifications.latest().unwrap();
    assert_eq!(latest.kind, NotificationKind::Error);
    assert_eq!(latest.message, EMPTY_QUERY_MESSAGE);
    assert_eq!(app.workflow_view.instructions_input.lines(), ["west corridor only"]);
    assert_eq!(app.editing, Some(InputTarget::Instructions));
}

#[test]
fn submitted_requirement_notifies_next_role_and_clears_form() {
    let mut app = app_with(requirement_pending_source(), labelling_route());
    app.apply(Action::EditForm);
    type_text(&mut app, "SELECT feeder_id FROM feeders");
    app.handle_key(ctrl('s'));

    let latest = app.notifications.latest().unwrap();
    assert_eq!(latest.kind, NotificationKind::Success);
    assert_eq!(
        latest.message,
        "Requirement submitted successfully! Notification sent to GIS team."
    );
    assert_eq!(app.workflow_view.query_input.lines(), [""]);
    assert_eq!(app.editing, None);

    // The workflow itself is never changed by an action.
    let workflow = app.source.workflow_steps("DP-2025-001").unwrap();
    assert_eq!(workflow.steps[0].status, ProgressStatus::Running);
}

#[test]
fn completed_requirement_step_has_no_form() {
    let mut app = app_with(fixtures::builtin_source(), labelling_route());
    app.apply(Action::MoveUp);
    assert_eq!(app.workflow_view.selected, Some(1));
    app.apply(Action::EditForm);
    assert_eq!(app.editing, None);
    assert_eq!(
        app.notifications.latest().map(|n| n.kind),
        Some(NotificationKind::Warning)
    );
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn dashboard_renders_metrics_and_rows() {
    let app = app_with(fixtures::builtin_source(), Route::Dashboard);
    let screen = rendered(&app);
    assert!(screen.contains("Active Deliveries"));
    assert!(screen.contains("Across 5 customers"));
    assert!(screen.contains("Running Delivery Phases (6)"));
    assert!(screen.contains("DP-2025-004"));
    assert!(!screen.contains("DP-2024-001"));
}

#[test]
fn missing_records_render_not_found() {
    let app = app_with(
        fixtures::builtin_source(),
        Route::Customer {
            customer_id: "cust-999".to_string(),
        },
    );
    assert!(rendered(&app).contains("Customer not found"));

    let app = app_with(
        fixtures::builtin_source(),
        Route::Delivery {
            delivery_id: "DP-1999-001".to_string(),
        },
    );
    assert!(rendered(&app).contains("Delivery phase not found"));

    let app = app_with(
        fixtures::builtin_source(),
        Route::WorkflowStage {
            delivery_id: "DP-2025-001".to_string(),
            stage_id: 2,
        },
    );
    assert!(rendered(&app).contains("Workflow data not found"));
}

#[test]
fn delivery_offers_workflow_only_for_current_stage() {
    let app = app_with(
        fixtures::builtin_source(),
        Route::Delivery {
            delivery_id: "DP-2025-001".to_string(),
        },
    );
    let screen = rendered(&app);
    assert!(screen.contains("Stage 6 - Span Labelling"));
    assert!(screen.contains("[w] Open Workflow"));

    let app = app_with(
        fixtures::builtin_source(),
        Route::Delivery {
            delivery_id: "DP-2025-002".to_string(),
        },
    );
    assert!(!rendered(&app).contains("[w] Open Workflow"));
}

#[test]
fn workflow_renders_steps_and_audit_trail() {
    let mut app = app_with(fixtures::builtin_source(), labelling_route());
    let screen = rendered(&app);
    assert!(screen.contains("Span Labelling Workflow"));
    assert!(screen.contains("Step 2 - Accept Labelling Work"));

    app.apply(Action::ToggleAudit);
    assert!(rendered(&app).contains("Audit Trail (8)"));
}

#[test]
fn footer_shows_latest_notification() {
    let mut app = app_with(fixtures::builtin_source(), labelling_route());
    app.apply(Action::PerformAction);
    assert!(rendered(&app).contains("SUCCESS: Downloading data package... (32 units released)"));
}

// ============================================================================
// Keybindings, routes, colors and expiry
// ============================================================================

proptest! {
    #[test]
    fn keybinding_digit_sorts_column(digit in 0u8..=9u8) {
        let ch = char::from(b'0' + digit);
        let event = KeyEvent {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        };
        let expected = if digit == 0 { 9 } else { usize::from(digit) - 1 };
        prop_assert_eq!(map_key(event), Some(Action::SortBy(expected)));
    }

    #[test]
    fn navigation_keys_consistent(use_vim in prop::bool::ANY, down in prop::bool::ANY) {
        let code = match (use_vim, down) {
            (true, true) => KeyCode::Char('j'),
            (true, false) => KeyCode::Char('k'),
            (false, true) => KeyCode::Down,
            (false, false) => KeyCode::Up,
        };
        let expected = if down { Action::MoveDown } else { Action::MoveUp };
        prop_assert_eq!(map_key(key(code)), Some(expected));
    }

    #[test]
    fn all_action_keys_mapped(key_char in "[qhscgtxCwela?/ ]") {
        let c = key_char.chars().next().unwrap();
        let action = map_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        prop_assert!(action.is_some(), "Key '{}' should map to an action", c);
    }

    #[test]
    fn route_paths_round_trip(
        id in "[A-Za-z0-9-]{1,16}",
        stage in 0u32..20,
        variant in 0usize..4,
    ) {
        let route = match variant {
            0 => Route::Dashboard,
            1 => Route::Customer { customer_id: id },
            2 => Route::Delivery { delivery_id: id },
            _ => Route::WorkflowStage { delivery_id: id, stage_id: stage },
        };
        prop_assert_eq!(Route::parse(&route.path()).unwrap(), route);
    }

    #[test]
    fn delivery_status_colors_correct(status_idx in 0usize..3) {
        let theme = VerdantTheme::default();
        let statuses = [
            DeliveryStatus::Running,
            DeliveryStatus::Delayed,
            DeliveryStatus::Completed,
        ];
        let expected_colors = [theme.info, theme.warning, theme.success];
        prop_assert_eq!(
            delivery_status_color(statuses[status_idx], &theme),
            expected_colors[status_idx]
        );
    }

    #[test]
    fn progress_status_colors_correct(status_idx in 0usize..3) {
        let theme = VerdantTheme::default();
        let statuses = [
            ProgressStatus::Completed,
            ProgressStatus::Running,
            ProgressStatus::Upcoming,
        ];
        let expected_colors = [theme.success, theme.info, theme.text_muted];
        prop_assert_eq!(
            progress_status_color(statuses[status_idx], &theme),
            expected_colors[status_idx]
        );
    }

    #[test]
    fn error_notifications_use_error_color(message in ".{0,40}") {
        let theme = VerdantTheme::default();
        let note = Notification::new(NotificationKind::Error, message);
        prop_assert_eq!(notification_color(note.kind, &theme), theme.error);
    }

    #[test]
    fn notifications_expire_after_ttl(ttl_ms in 1i64..10_000, elapsed_ms in 0i64..20_000) {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let ttl = Duration::milliseconds(ttl_ms);
        let mut center = NotificationCenter::new(ttl);
        center.push(Notification::at(NotificationKind::Info, "saved", created));
        center.expire(created + Duration::milliseconds(elapsed_ms));
        prop_assert_eq!(center.is_empty(), elapsed_ms >= ttl_ms);
    }
}
