use serde::{Deserialize, Serialize};
use shared_types::{Project, Service};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
}

/// Everything the project page shows, as one immutable snapshot.
///
/// `services` is tracked separately from `project.services`: a project edit
/// replaces the project but keeps the services list the page already shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub project: Project,
    pub services: Vec<Service>,
    pub show_project_form: bool,
    pub show_service_form: bool,
    pub status: Option<StatusMessage>,
}

impl ViewState {
    /// Nothing but the loading indicator is shown until a named project
    /// arrives.
    pub fn is_loading(&self) -> bool {
        !self.project.is_loaded()
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self.status,
            Some(StatusMessage {
                kind: MessageKind::Error,
                ..
            })
        )
    }

    pub(crate) fn with_project(self, project: Project) -> Self {
        Self { project, ..self }
    }

    pub(crate) fn with_services(self, services: Vec<Service>) -> Self {
        Self { services, ..self }
    }

    pub(crate) fn with_project_form(self, show_project_form: bool) -> Self {
        Self {
            show_project_form,
            ..self
        }
    }

    pub(crate) fn with_service_form(self, show_service_form: bool) -> Self {
        Self {
            show_service_form,
            ..self
        }
    }

    pub(crate) fn with_success(self, text: &str) -> Self {
        self.with_status(MessageKind::Success, text)
    }

    pub(crate) fn with_error(self, text: &str) -> Self {
        self.with_status(MessageKind::Error, text)
    }

    fn with_status(self, kind: MessageKind, text: &str) -> Self {
        Self {
            status: Some(StatusMessage {
                text: text.to_string(),
                kind,
            }),
            ..self
        }
    }
}
