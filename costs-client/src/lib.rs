pub mod api;
pub mod config;
pub mod forms;
pub mod render;
pub mod view;

pub use api::{ApiError, HttpProjectsApi, ProjectsApi};
pub use config::ClientConfig;
pub use view::{Outcome, ProjectDetailView, StaleResponses, ViewOptions, ViewState};
