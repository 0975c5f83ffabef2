//! Application state and view state definitions.

use crate::config::TuiConfig;
use crate::keys::{self, Action};
use crate::nav::{current_workflow_route, resolve_workflow, Navigator, Route};
use crate::notifications::{NotificationCenter, NotificationKind, Notifier};
use crate::theme::VerdantTheme;
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tui_textarea::TextArea;
use verdant_core::{
    customers_by_name, query, DashboardMetrics, DeliveryId, DeliveryRecord, DeliveryStatus, Facet,
    FacetOptions, Partition, RecordQuery, SortKey, StageWorkflow, StepExpansion, StepId, StepKind,
    VerdantError, WorkflowAction, WorkflowStepRecord,
};
use verdant_storage::DeliverySource;

/// Shown when a requirement is submitted without query text.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a query to define the feeder scope";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Content,
    Sidebar,
}

/// Which text input currently receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Search,
    Query,
    Instructions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEntry {
    Dashboard,
    Customers,
    Customer { id: String, name: String },
}

#[derive(Debug, Clone)]
pub struct SidebarState {
    pub selected: usize,
    pub customers_expanded: bool,
}

impl SidebarState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            customers_expanded: true,
        }
    }
}

impl Default for SidebarState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct DashboardState {
    pub partition: Partition,
    pub query: RecordQuery,
    pub selected: Option<DeliveryId>,
    pub search: TextArea<'static>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerViewState {
    pub selected: Option<DeliveryId>,
}

#[derive(Default)]
pub struct WorkflowViewState {
    pub selected: Option<StepId>,
    pub expansion: StepExpansion,
    pub query_input: TextArea<'static>,
    pub instructions_input: TextArea<'static>,
    pub show_audit: bool,
}

impl WorkflowViewState {
    pub fn for_workflow(workflow: &StageWorkflow) -> Self {
        Self {
            selected: workflow
                .next_action_step()
                .or_else(|| workflow.steps.first())
                .map(|s| s.id),
            ..Self::default()
        }
    }

    fn clear_form(&mut self) {
        self.query_input = TextArea::default();
        self.instructions_input = TextArea::default();
    }
}

pub struct App {
    pub config: TuiConfig,
    pub theme: VerdantTheme,
    pub source: Arc<dyn DeliverySource>,
    pub navigator: Navigator,
    pub focus: Focus,
    pub sidebar: SidebarState,
    pub dashboard: DashboardState,
    pub customer_view: CustomerViewState,
    pub workflow_view: WorkflowViewState,
    pub editing: Option<InputTarget>,
    pub notifications: NotificationCenter,
    pub help_visible: bool,
}

impl App {
    pub fn new(config: TuiConfig, source: Arc<dyn DeliverySource>, initial: Route) -> Self {
        let notifications = NotificationCenter::new(config.notification_ttl());
        let mut app = Self {
            config,
            theme: VerdantTheme::verdant(),
            source,
            navigator: Navigator::new(initial),
            focus: Focus::Content,
            sidebar: SidebarState::new(),
            dashboard: DashboardState::default(),
            customer_view: CustomerViewState::default(),
            workflow_view: WorkflowViewState::default(),
            editing: None,
            notifications,
            help_visible: false,
        };
        app.reconcile_dashboard_selection();
        app.enter_route();
        info!(route = %app.route().path(), "Application state initialized");
        app
    }

    pub fn route(&self) -> &Route {
        self.navigator.current()
    }

    pub fn navigate(&mut self, route: Route) {
        let path = route.path();
        if self.navigator.push(route) {
            info!(route = %path, "Route changed");
            self.enter_route();
        }
    }

    pub fn go_back(&mut self) {
        if self.navigator.back() {
            info!(route = %self.route().path(), "Route changed (back)");
            self.enter_route();
        }
    }

    fn enter_route(&mut self) {
        self.editing = None;
        self.focus = Focus::Content;
        let source = Arc::clone(&self.source);
        match self.navigator.current().clone() {
            Route::Dashboard => {}
            Route::Customer { customer_id } => {
                self.customer_view.selected = source
                    .deliveries_by_customer(&customer_id)
                    .first()
                    .map(|d| d.id.clone());
            }
            Route::Delivery { .. } => {}
            Route::WorkflowStage {
                delivery_id,
                stage_id,
            } => {
                self.workflow_view = match resolve_workflow(source.as_ref(), &delivery_id, stage_id) {
                    Some((_, workflow)) => WorkflowViewState::for_workflow(workflow),
                    None => WorkflowViewState::default(),
                };
            }
        }
    }

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notifications.notify(kind, message.into());
    }

    pub fn on_tick(&mut self, now: DateTime<Utc>) {
        self.notifications.expire(now);
    }

    // ========================================================================
    // Derived view data
    // ========================================================================

    /// Records in the active partition that pass the dashboard query.
    pub fn dashboard_records(&self) -> Vec<&DeliveryRecord> {
        let partition = self.dashboard.partition.select(self.source.deliveries());
        query(partition, &self.dashboard.query)
    }

    pub fn dashboard_metrics(&self) -> DashboardMetrics {
        let running = self.source.running_records();
        let past = self.source.past_records();
        DashboardMetrics::from_partitions(&running, &past)
    }

    /// Facet picker values, drawn from the running partition.
    pub fn facet_options(&self) -> FacetOptions {
        FacetOptions::collect(self.source.running_records())
    }

    pub fn selected_dashboard_record(&self) -> Option<&DeliveryRecord> {
        let id = self.dashboard.selected.as_deref()?;
        self.dashboard_records().into_iter().find(|r| r.id == id)
    }

    pub fn sidebar_entries(&self) -> Vec<SidebarEntry> {
        let mut entries = vec![SidebarEntry::Dashboard, SidebarEntry::Customers];
        if self.sidebar.customers_expanded {
            entries.extend(customers_by_name(self.source.customers()).into_iter().map(|c| {
                SidebarEntry::Customer {
                    id: c.id.clone(),
                    name: c.name.clone(),
                }
            }));
        }
        entries
    }

    // ========================================================================
    // Input handling
    // ========================================================================

    /// Handle a key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        if let Some(target) = self.editing {
            self.handle_text_key(target, key);
            return false;
        }
        match keys::map_key(key) {
            Some(action) => self.apply(action),
            None => false,
        }
    }

    fn handle_text_key(&mut self, target: InputTarget, key: KeyEvent) {
        let submit = key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s');
        match (target, key.code) {
            (_, KeyCode::Esc) | (InputTarget::Search, KeyCode::Enter) => {
                self.editing = None;
                return;
            }
            (InputTarget::Query, KeyCode::Tab | KeyCode::BackTab) => {
                self.editing = Some(InputTarget::Instructions);
                return;
            }
            (InputTarget::Instructions, KeyCode::Tab | KeyCode::BackTab) => {
                self.editing = Some(InputTarget::Query);
                return;
            }
            (InputTarget::Query | InputTarget::Instructions, _) if submit => {
                self.perform_action();
                return;
            }
            _ => {}
        }

        let Some(input) = keys::text_input(key) else {
            return;
        };
        match target {
            InputTarget::Search => {
                if self.dashboard.search.input(input) {
                    self.sync_search();
                }
            }
            InputTarget::Query => {
                self.workflow_view.query_input.input(input);
            }
            InputTarget::Instructions => {
                self.workflow_view.instructions_input.input(input);
            }
        }
    }

    /// Apply a mapped action. Returns true when the app should quit.
    pub fn apply(&mut self, action: Action) -> bool {
        if action == Action::Quit {
            return true;
        }
        if self.help_visible {
            self.help_visible = false;
            return false;
        }

        match action {
            Action::Quit => return true,
            Action::OpenHelp => self.help_visible = true,
            Action::Back => {
                if self.focus == Focus::Sidebar {
                    self.focus = Focus::Content;
                } else {
                    self.go_back();
                }
            }
            Action::Home => self.navigate(Route::Dashboard),
            Action::FocusSidebar => {
                self.focus = match self.focus {
                    Focus::Content => Focus::Sidebar,
                    Focus::Sidebar => Focus::Content,
                };
            }
            Action::MoveDown => self.move_selection(true),
            Action::MoveUp => self.move_selection(false),
            Action::Select => self.select(),
            Action::TogglePartition => {
                if self.on_dashboard() {
                    self.dashboard.partition = self.dashboard.partition.toggled();
                    self.reconcile_dashboard_selection();
                }
            }
            Action::OpenSearch => {
                if self.on_dashboard() {
                    self.editing = Some(InputTarget::Search);
                }
            }
            Action::CycleCustomer => {
                if self.on_dashboard() {
                    let options = self.facet_options();
                    self.dashboard.query.customer =
                        cycle_facet(&self.dashboard.query.customer, &options.customers);
                    self.reconcile_dashboard_selection();
                }
            }
            Action::CycleStage => {
                if self.on_dashboard() {
                    let options = self.facet_options();
                    self.dashboard.query.stage =
                        cycle_facet(&self.dashboard.query.stage, &options.stages);
                    self.reconcile_dashboard_selection();
                }
            }
            Action::CycleStatus => {
                if self.on_dashboard() {
                    self.dashboard.query.status =
                        cycle_facet(&self.dashboard.query.status, DeliveryStatus::all());
                    self.reconcile_dashboard_selection();
                }
            }
            Action::ClearFilters => {
                if self.on_dashboard() {
                    self.dashboard.query = RecordQuery {
                        sort: self.dashboard.query.sort,
                        ..RecordQuery::default()
                    };
                    self.dashboard.search = TextArea::default();
                    self.reconcile_dashboard_selection();
                }
            }
            Action::SortBy(index) => {
                if self.on_dashboard() {
                    if let Some(key) = SortKey::all().get(index) {
                        self.dashboard.query.sort.toggle(*key);
                        self.reconcile_dashboard_selection();
                    }
                }
            }
            Action::OpenCustomer => self.open_customer(),
            Action::OpenWorkflow => self.open_workflow(),
            Action::ToggleExpand => self.toggle_expand(),
            Action::EditForm => self.edit_form(),
            Action::PerformAction => self.perform_action(),
            Action::ToggleAudit => {
                if matches!(self.route(), Route::WorkflowStage { .. }) {
                    self.workflow_view.show_audit = !self.workflow_view.show_audit;
                }
            }
        }
        false
    }

    fn on_dashboard(&self) -> bool {
        self.focus == Focus::Content && *self.route() == Route::Dashboard
    }

    fn sync_search(&mut self) {
        let text = self.dashboard.search.lines().join(" ");
        self.dashboard.query.search_text = if text.is_empty() { None } else { Some(text) };
        self.reconcile_dashboard_selection();
    }

    /// Keep the dashboard selection inside the visible records.
    fn reconcile_dashboard_selection(&mut self) {
        let records = self.dashboard_records();
        let count = records.len();
        let keep = self
            .dashboard
            .selected
            .as_deref()
            .is_some_and(|id| records.iter().any(|r| r.id == id));
        let first = records.first().map(|r| r.id.clone());
        if !keep {
            self.dashboard.selected = first;
        }
        debug!(
            partition = self.dashboard.partition.label(),
            results = count,
            noop = self.dashboard.query.is_noop(),
            "Dashboard query applied"
        );
    }

    fn move_selection(&mut self, forward: bool) {
        if self.focus == Focus::Sidebar {
            let len = self.sidebar_entries().len();
            self.sidebar.selected = step_index(self.sidebar.selected, len, forward);
            return;
        }
        let source = Arc::clone(&self.source);
        match self.navigator.current().clone() {
            Route::Dashboard => {
                let records = query(
                    self.dashboard.partition.select(source.deliveries()),
                    &self.dashboard.query,
                );
                step_key(&records, &mut self.dashboard.selected, forward);
            }
            Route::Customer { customer_id } => {
                let records = source.deliveries_by_customer(&customer_id);
                step_key(&records, &mut self.customer_view.selected, forward);
            }
            Route::Delivery { .. } => {}
            Route::WorkflowStage {
                delivery_id,
                stage_id,
            } => {
                if let Some((_, workflow)) = resolve_workflow(source.as_ref(), &delivery_id, stage_id) {
                    step_key(&workflow.steps, &mut self.workflow_view.selected, forward);
                }
            }
        }
    }

    fn select(&mut self) {
        if self.focus == Focus::Sidebar {
            self.activate_sidebar_entry();
            return;
        }
        match self.route().clone() {
            Route::Dashboard => {
                if let Some(id) = self.dashboard.selected.clone() {
                    self.navigate(Route::Delivery { delivery_id: id });
                }
            }
            Route::Customer { .. } => {
                if let Some(id) = self.customer_view.selected.clone() {
                    self.navigate(Route::Delivery { delivery_id: id });
                }
            }
            Route::Delivery { .. } => self.open_workflow(),
            Route::WorkflowStage { .. } => self.toggle_expand(),
        }
    }

    fn activate_sidebar_entry(&mut self) {
        let entries = self.sidebar_entries();
        match entries.get(self.sidebar.selected).cloned() {
            Some(SidebarEntry::Dashboard) => self.navigate(Route::Dashboard),
            Some(SidebarEntry::Customers) => {
                self.sidebar.customers_expanded = !self.sidebar.customers_expanded;
                return;
            }
            Some(SidebarEntry::Customer { id, .. }) => {
                self.navigate(Route::Customer { customer_id: id })
            }
            None => return,
        }
        self.focus = Focus::Content;
    }

    fn open_customer(&mut self) {
        let customer_id = match self.route() {
            Route::Dashboard => self.selected_dashboard_record().map(|r| r.customer_id.clone()),
            Route::Delivery { delivery_id } | Route::WorkflowStage { delivery_id, .. } => self
                .source
                .delivery_by_id(delivery_id)
                .map(|r| r.customer_id.clone()),
            Route::Customer { .. } => None,
        };
        if let Some(customer_id) = customer_id {
            self.navigate(Route::Customer { customer_id });
        }
    }

    fn open_workflow(&mut self) {
        let delivery_id = match self.route() {
            Route::Dashboard => self.dashboard.selected.clone(),
            Route::Delivery { delivery_id } => Some(delivery_id.clone()),
            _ => None,
        };
        let Some(delivery_id) = delivery_id else {
            return;
        };
        let source = Arc::clone(&self.source);
        let target = source
            .delivery_by_id(&delivery_id)
            .and_then(|delivery| current_workflow_route(source.as_ref(), delivery));
        match target {
            Some(route) => self.navigate(route),
            None => self.notify(
                NotificationKind::Info,
                format!("No workflow is available for the current stage of {}", delivery_id),
            ),
        }
    }

    fn toggle_expand(&mut self) {
        if self.focus == Focus::Sidebar {
            self.sidebar.customers_expanded = !self.sidebar.customers_expanded;
            let len = self.sidebar_entries().len();
            self.sidebar.selected = self.sidebar.selected.min(len.saturating_sub(1));
            return;
        }
        if matches!(self.route(), Route::WorkflowStage { .. }) {
            if let Some(step_id) = self.workflow_view.selected {
                self.workflow_view.expansion.toggle(step_id);
                if !self.workflow_view.expansion.is_expanded(step_id) {
                    self.editing = None;
                }
            }
        }
    }

    fn edit_form(&mut self) {
        let Some((workflow, step_id)) = self.selected_step_target() else {
            return;
        };
        let editable = workflow
            .step(step_id)
            .is_some_and(|step| step.kind == StepKind::ShareRequirement && step_offers_action(step));
        if editable {
            if !self.workflow_view.expansion.is_expanded(step_id) {
                self.workflow_view.expansion.toggle(step_id);
            }
            self.editing = Some(InputTarget::Query);
        } else {
            self.notify(
                NotificationKind::Warning,
                format!("Step {} has no requirement form to edit", step_id),
            );
        }
    }

    fn selected_step_target(&self) -> Option<(StageWorkflow, StepId)> {
        let Route::WorkflowStage {
            delivery_id,
            stage_id,
        } = self.route()
        else {
            return None;
        };
        let (_, workflow) = resolve_workflow(self.source.as_ref(), delivery_id, *stage_id)?;
        let step_id = self
            .workflow_view
            .expansion
            .expanded()
            .or(self.workflow_view.selected)?;
        Some((workflow.clone(), step_id))
    }

    /// Run the action of the expanded (or selected) workflow step.
    ///
    /// Outcomes are reported as notifications; the workflow is never changed.
    pub fn perform_action(&mut self) {
        let Some((workflow, step_id)) = self.selected_step_target() else {
            return;
        };
        let Some(step) = workflow.step(step_id) else {
            return;
        };
        let action = match step.kind {
            StepKind::ShareRequirement => WorkflowAction::SubmitRequirement {
                query: self.workflow_view.query_input.lines().join("\n"),
                instructions: self.workflow_view.instructions_input.lines().join("\n"),
            },
            StepKind::AcceptWork => WorkflowAction::DownloadPackage,
            StepKind::SubmitResult => WorkflowAction::UploadResult,
        };

        match workflow.perform(step_id, &action) {
            Ok(receipt) => {
                info!(
                    stage_id = workflow.stage_id,
                    step_id,
                    action = action.name(),
                    "Workflow action performed"
                );
                if matches!(action, WorkflowAction::SubmitRequirement { .. }) {
                    self.workflow_view.clear_form();
                    self.editing = None;
                }
                self.notify(NotificationKind::Success, receipt.message);
            }
            Err(err) => {
                warn!(step_id, action = action.name(), error = %err, "Workflow action rejected");
                let message = match &err {
                    VerdantError::Validation(verdant_core::ValidationError::EmptyRequiredField {
                        ..
                    }) => EMPTY_QUERY_MESSAGE.to_string(),
                    VerdantError::Validation(inner) => inner.to_string(),
                    VerdantError::Lookup(inner) => inner.to_string(),
                };
                self.notify(NotificationKind::Error, message);
            }
        }
    }
}

/// Whether a step currently presents its action.
pub fn step_offers_action(step: &WorkflowStepRecord) -> bool {
    verdant_core::action_available(step.kind, step.status)
}

/// Next facet in the cycle `All -> options... -> All`.
pub fn cycle_facet<T: Clone + PartialEq>(current: &Facet<T>, options: &[T]) -> Facet<T> {
    match current {
        Facet::All => options.first().cloned().map_or(Facet::All, Facet::Only),
        Facet::Only(value) => match options.iter().position(|o| o == value) {
            Some(index) if index + 1 < options.len() => Facet::Only(options[index + 1].clone()),
            _ => Facet::All,
        },
    }
}

fn step_index(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    let current = current.min(len - 1);
    if forward {
        (current + 1) % len
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

fn step_key<T: Keyed>(items: &[T], selected: &mut Option<T::Key>, forward: bool) {
    if forward {
        select_next_key(items, selected);
    } else {
        select_prev_key(items, selected);
    }
}

fn select_next_key<T: Keyed>(items: &[T], selected: &mut Option<T::Key>) {
    if items.is_empty() {
        *selected = None;
        return;
    }
    let index = selected
        .as_ref()
        .and_then(|key| items.iter().position(|item| item.key() == *key));
    let next = match index {
        Some(index) => (index + 1) % items.len(),
        None => 0,
    };
    *selected = Some(items[next].key());
}

fn select_prev_key<T: Keyed>(items: &[T], selected: &mut Option<T::Key>) {
    if items.is_empty() {
        *selected = None;
        return;
    }
    let index = selected
        .as_ref()
        .and_then(|key| items.iter().position(|item| item.key() == *key))
        .unwrap_or(0);
    let prev = if index == 0 { items.len() - 1 } else { index - 1 };
    *selected = Some(items[prev].key());
}

trait Keyed {
    type Key: PartialEq;
    fn key(&self) -> Self::Key;
}

impl Keyed for DeliveryRecord {
    type Key = DeliveryId;
    fn key(&self) -> DeliveryId {
        self.id.clone()
    }
}

impl Keyed for WorkflowStepRecord {
    type Key = StepId;
    fn key(&self) -> StepId {
        self.id
    }
}

impl<T: Keyed> Keyed for &T {
    type Key = T::Key;
    fn key(&self) -> T::Key {
        (**self).key()
    }
}
