//! View-model for the project detail page.
//!
//! `ProjectDetailView` owns the page state and publishes it as immutable
//! [`ViewState`] snapshots over a `tokio::sync::watch` channel. Operations
//! take `&self`, so a front-end may fire them from several tasks at once the
//! way a user can click a button twice before the first request returns.

pub mod messages;
mod state;

pub use state::{MessageKind, StatusMessage, ViewState};

use serde::{Deserialize, Serialize};
use shared_types::{Amount, NewService, Project, Service};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use crate::api::{ApiError, ProjectsApi};

/// What happens to a response that arrives after a newer request of the
/// same kind has been issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleResponses {
    /// Only the most recently issued request may update the page.
    #[default]
    Discard,
    /// Whichever response resolves last wins.
    Apply,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewOptions {
    pub stale_responses: StaleResponses,
}

/// Result of a single view operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request succeeded and the new state was published.
    Applied,
    /// Local validation failed; the error message was published and no
    /// request was sent.
    Rejected,
    /// The request failed; the operation's error message was published.
    Failed,
    /// The response belonged to a superseded request or the view was closed.
    Discarded,
    /// Mutations are not offered while the project is still loading.
    NotLoaded,
}

pub struct ProjectDetailView {
    api: Arc<dyn ProjectsApi>,
    project_id: Mutex<String>,
    options: ViewOptions,
    state: watch::Sender<Arc<ViewState>>,
    closed: watch::Sender<bool>,
    load_seq: AtomicU64,
    mutation_seq: AtomicU64,
}

impl ProjectDetailView {
    pub fn new(api: Arc<dyn ProjectsApi>, project_id: impl Into<String>, options: ViewOptions) -> Self {
        let (state, _) = watch::channel(Arc::new(ViewState::default()));
        let (closed, _) = watch::channel(false);

        Self {
            api,
            project_id: Mutex::new(project_id.into()),
            options,
            state,
            closed,
            load_seq: AtomicU64::new(0),
            mutation_seq: AtomicU64::new(0),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> Arc<ViewState> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewState>> {
        self.state.subscribe()
    }

    pub fn project_id(&self) -> String {
        self.project_id
            .lock()
            .map(|id| id.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Stops the view: in-flight requests resolve as `Outcome::Discarded`
    /// and nothing is published afterwards.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Points the page at another project and loads it. The current
    /// snapshot stays on screen until the response arrives.
    pub async fn set_project_id(&self, project_id: impl Into<String>) -> Outcome {
        let project_id = project_id.into();
        match self.project_id.lock() {
            Ok(mut id) => *id = project_id,
            Err(poisoned) => *poisoned.into_inner() = project_id,
        }
        self.load().await
    }

    pub async fn load(&self) -> Outcome {
        let ticket = self.issue(&self.load_seq);
        tracing::debug!("Loading project {}", ticket.project_id);

        match self.request(self.api.get_project(&ticket.project_id)).await {
            Ok(project) => self.commit(&ticket, Outcome::Applied, |state| {
                let services = project.services.clone();
                state.with_project(project).with_services(services)
            }),
            Err(e) => self.fail(&ticket, messages::LOAD_FAILED, e),
        }
    }

    /// Submits the edited project. Budget below cost is rejected locally.
    pub async fn edit_project(&self, updated: Project) -> Outcome {
        if self.state().is_loading() {
            return Outcome::NotLoaded;
        }
        if updated.budget < updated.cost {
            return self.reject(messages::BUDGET_BELOW_COST);
        }

        let ticket = self.issue(&self.mutation_seq);
        tracing::info!("Updating project {}", updated.id);

        match self
            .request(self.api.patch_project(&updated.id, &updated))
            .await
        {
            Ok(project) => self.commit(&ticket, Outcome::Applied, |state| {
                state
                    .with_project(project)
                    .with_project_form(false)
                    .with_success(messages::PROJECT_UPDATED)
            }),
            Err(e) => self.fail(&ticket, messages::UPDATE_FAILED, e),
        }
    }

    /// Appends a service with a fresh id, unless it would push the cost over
    /// the budget.
    pub async fn create_service(&self, service: NewService) -> Outcome {
        let snapshot = self.state();
        if snapshot.is_loading() {
            return Outcome::NotLoaded;
        }

        let service = service.into_service();
        let cost = snapshot.project.cost + service.cost;
        if cost > snapshot.project.budget {
            return self.reject(messages::BUDGET_EXCEEDED);
        }

        let mut services = snapshot.services.clone();
        services.push(service);
        let updated = Project {
            services,
            cost,
            ..snapshot.project.clone()
        };

        let ticket = self.issue(&self.mutation_seq);
        tracing::info!(
            "Adding service to project {} (cost {} of {})",
            updated.id,
            updated.cost,
            updated.budget
        );

        match self
            .request(self.api.patch_project(&updated.id, &updated))
            .await
        {
            Ok(project) => self.commit(&ticket, Outcome::Applied, |state| {
                let services = project.services.clone();
                state
                    .with_project(project)
                    .with_services(services)
                    .with_service_form(false)
                    .with_success(messages::SERVICE_ADDED)
            }),
            Err(e) => self.fail(&ticket, messages::ADD_FAILED, e),
        }
    }

    /// Removes a service and subtracts its cost. On success the locally
    /// computed project is kept, whatever the server echoes back.
    pub async fn remove_service(&self, service_id: &str, service_cost: Amount) -> Outcome {
        let snapshot = self.state();
        if snapshot.is_loading() {
            return Outcome::NotLoaded;
        }

        let services: Vec<Service> = snapshot
            .project
            .services
            .iter()
            .filter(|service| service.id != service_id)
            .cloned()
            .collect();
        let updated = Project {
            services: services.clone(),
            cost: snapshot.project.cost - service_cost,
            ..snapshot.project.clone()
        };

        let ticket = self.issue(&self.mutation_seq);
        tracing::info!("Removing service {} from project {}", service_id, updated.id);

        match self
            .request(self.api.patch_project(&updated.id, &updated))
            .await
        {
            Ok(_) => self.commit(&ticket, Outcome::Applied, |state| {
                state
                    .with_project(updated)
                    .with_services(services)
                    .with_success(messages::SERVICE_REMOVED)
            }),
            Err(e) => self.fail(&ticket, messages::REMOVE_FAILED, e),
        }
    }

    pub fn toggle_project_form(&self) {
        self.publish(|state| {
            let show = !state.show_project_form;
            state.with_project_form(show)
        });
    }

    pub fn toggle_service_form(&self) {
        self.publish(|state| {
            let show = !state.show_service_form;
            state.with_service_form(show)
        });
    }

    async fn request<T>(
        &self,
        call: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        if self.is_closed() {
            return Err(ApiError::Cancelled);
        }

        let closed = self.closed.subscribe();
        tokio::select! {
            result = call => result,
            _ = wait_closed(closed) => Err(ApiError::Cancelled),
        }
    }

    fn publish(&self, next: impl FnOnce(ViewState) -> ViewState) {
        self.state.send_modify(|state| {
            *state = Arc::new(next(state.as_ref().clone()));
        });
    }

    /// Publishes `next` unless the view has closed or moved to another
    /// project since the request was issued. Under `StaleResponses::Discard`
    /// a newer request of the same kind also wins.
    fn commit(
        &self,
        ticket: &Ticket<'_>,
        outcome: Outcome,
        next: impl FnOnce(ViewState) -> ViewState,
    ) -> Outcome {
        if self.is_closed() {
            return Outcome::Discarded;
        }
        // Checked under both policies.
        if self.project_id() != ticket.project_id {
            tracing::debug!("Discarding response for project {}", ticket.project_id);
            return Outcome::Discarded;
        }
        if self.options.stale_responses == StaleResponses::Discard && !ticket.is_latest() {
            tracing::debug!("Discarding response for superseded request {}", ticket.value);
            return Outcome::Discarded;
        }

        self.publish(next);
        outcome
    }

    fn fail(&self, ticket: &Ticket<'_>, message: &str, error: ApiError) -> Outcome {
        if matches!(error, ApiError::Cancelled) {
            return Outcome::Discarded;
        }

        tracing::warn!("{}: {}", message, error);
        self.commit(ticket, Outcome::Failed, |state| state.with_error(message))
    }

    fn issue<'a>(&self, seq: &'a AtomicU64) -> Ticket<'a> {
        Ticket {
            seq,
            value: seq.fetch_add(1, Ordering::SeqCst) + 1,
            project_id: self.project_id(),
        }
    }

    fn reject(&self, message: &str) -> Outcome {
        if self.is_closed() {
            return Outcome::Discarded;
        }

        tracing::info!("Rejected: {}", message);
        self.publish(|state| state.with_error(message));
        Outcome::Rejected
    }
}

/// Identifies one request: its place in a sequence and the project the view
/// was showing when it was issued.
struct Ticket<'a> {
    seq: &'a AtomicU64,
    value: u64,
    project_id: String,
}

impl Ticket<'_> {
    fn is_latest(&self) -> bool {
        self.seq.load(Ordering::SeqCst) == self.value
    }
}

async fn wait_closed(mut closed: watch::Receiver<bool>) {
    while !*closed.borrow_and_update() {
        if closed.changed().await.is_err() {
            return;
        }
    }
}
