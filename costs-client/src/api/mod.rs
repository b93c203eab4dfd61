pub mod http;

pub use http::HttpProjectsApi;

use async_trait::async_trait;
use shared_types::Project;
use thiserror::Error;

/// Failure talking to the projects API.
///
/// The view collapses every variant into one message per operation; the
/// distinction only reaches the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to decode project: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("request cancelled")]
    Cancelled,
}

/// Remote store for projects and their embedded services.
#[async_trait]
pub trait ProjectsApi: Send + Sync {
    /// `GET /projects/{id}`
    async fn get_project(&self, id: &str) -> Result<Project, ApiError>;

    /// `PATCH /projects/{id}` with the whole project; returns the stored record.
    async fn patch_project(&self, id: &str, project: &Project) -> Result<Project, ApiError>;
}
