//! Routes, breadcrumbs and the back stack.

use verdant_core::{DeliveryId, DeliveryRecord, StageId, StageWorkflow};
use verdant_storage::DeliverySource;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Dashboard,
    Customer {
        customer_id: String,
    },
    Delivery {
        delivery_id: DeliveryId,
    },
    WorkflowStage {
        delivery_id: DeliveryId,
        stage_id: StageId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("Unrecognized route path: {0}")]
    Unrecognized(String),
    #[error("Invalid stage id in route path: {0}")]
    InvalidStage(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::Customer { customer_id } => format!("/customer/{}", customer_id),
            Route::Delivery { delivery_id } => format!("/delivery/{}", delivery_id),
            Route::WorkflowStage {
                delivery_id,
                stage_id,
            } => format!("/delivery/{}/stage/{}", delivery_id, stage_id),
        }
    }

    pub fn parse(path: &str) -> Result<Route, RouteError> {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        match segments.as_slice() {
            [] => Ok(Route::Dashboard),
            ["customer", id] => Ok(Route::Customer {
                customer_id: (*id).to_string(),
            }),
            ["delivery", id] => Ok(Route::Delivery {
                delivery_id: (*id).to_string(),
            }),
            ["delivery", id, "stage", stage] => {
                let stage_id = stage
                    .parse::<StageId>()
                    .map_err(|_| RouteError::InvalidStage((*stage).to_string()))?;
                Ok(Route::WorkflowStage {
                    delivery_id: (*id).to_string(),
                    stage_id,
                })
            }
            _ => Err(RouteError::Unrecognized(trimmed.to_string())),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Customer { .. } => "Customer",
            Route::Delivery { .. } => "Delivery Phase",
            Route::WorkflowStage { .. } => "Stage Workflow",
        }
    }

    /// Breadcrumb trail for this route, labelled from the data source.
    pub fn breadcrumbs(&self, source: &dyn DeliverySource) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb::link("Dashboard", Route::Dashboard)];
        match self {
            Route::Dashboard => {
                crumbs[0].route = None;
            }
            Route::Customer { customer_id } => match source.customer_by_id(customer_id) {
                Some(customer) => crumbs.push(Breadcrumb::label(customer.name.clone())),
                None => crumbs.push(Breadcrumb::label("Customer Not Found")),
            },
            Route::Delivery { delivery_id } => match source.delivery_by_id(delivery_id) {
                Some(delivery) => {
                    crumbs.push(customer_crumb(delivery));
                    crumbs.push(Breadcrumb::label(delivery.id.clone()));
                }
                None => crumbs.push(Breadcrumb::label("Not Found")),
            },
            Route::WorkflowStage {
                delivery_id,
                stage_id,
            } => match resolve_workflow(source, delivery_id, *stage_id) {
                Some((delivery, workflow)) => {
                    crumbs.push(customer_crumb(delivery));
                    crumbs.push(Breadcrumb::link(
                        delivery.id.clone(),
                        Route::Delivery {
                            delivery_id: delivery.id.clone(),
                        },
                    ));
                    crumbs.push(Breadcrumb::label(workflow.stage_name.clone()));
                }
                None => crumbs.push(Breadcrumb::label("Not Found")),
            },
        }
        crumbs
    }
}

fn customer_crumb(delivery: &DeliveryRecord) -> Breadcrumb {
    Breadcrumb::link(
        delivery.customer_name.clone(),
        Route::Customer {
            customer_id: delivery.customer_id.clone(),
        },
    )
}

/// The delivery and its workflow, when the workflow covers `stage_id`.
pub fn resolve_workflow<'a>(
    source: &'a dyn DeliverySource,
    delivery_id: &str,
    stage_id: StageId,
) -> Option<(&'a DeliveryRecord, &'a StageWorkflow)> {
    let delivery = source.delivery_by_id(delivery_id)?;
    let workflow = source.workflow_steps(delivery_id)?;
    (workflow.stage_id == stage_id).then_some((delivery, workflow))
}

/// Workflow route for the delivery's current stage, if that stage has one.
pub fn current_workflow_route(source: &dyn DeliverySource, delivery: &DeliveryRecord) -> Option<Route> {
    resolve_workflow(source, &delivery.id, delivery.current_stage_index).map(|(d, w)| {
        Route::WorkflowStage {
            delivery_id: d.id.clone(),
            stage_id: w.stage_id,
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub route: Option<Route>,
}

impl Breadcrumb {
    fn link(label: impl Into<String>, route: Route) -> Self {
        Self {
            label: label.into(),
            route: Some(route),
        }
    }

    fn label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            route: None,
        }
    }
}

/// Current route plus the routes visited before it.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: Route,
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Move to `route`. Returns false when already there.
    pub fn push(&mut self, route: Route) -> bool {
        if route == self.current {
            return false;
        }
        let previous = std::mem::replace(&mut self.current, route);
        self.history.push(previous);
        true
    }

    /// Return to the previous route. Returns false at the bottom of the stack.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}
