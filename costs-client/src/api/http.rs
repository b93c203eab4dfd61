use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use shared_types::Project;
use std::time::Duration;

use super::{ApiError, ProjectsApi};
use crate::config::ApiConfig;

/// `ProjectsApi` over HTTP/JSON.
pub struct HttpProjectsApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProjectsApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn project_url(&self, id: &str) -> String {
        format!("{}/projects/{}", self.base_url, id)
    }

    async fn read_project(response: reqwest::Response) -> Result<Project, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        response.json::<Project>().await.map_err(ApiError::Decode)
    }
}

#[async_trait]
impl ProjectsApi for HttpProjectsApi {
    async fn get_project(&self, id: &str) -> Result<Project, ApiError> {
        let url = self.project_url(id);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(ApiError::Request)?;

        Self::read_project(response).await
    }

    async fn patch_project(&self, id: &str, project: &Project) -> Result<Project, ApiError> {
        let url = self.project_url(id);
        tracing::debug!("PATCH {}", url);

        let response = self
            .client
            .patch(&url)
            .json(project)
            .send()
            .await
            .map_err(ApiError::Request)?;

        Self::read_project(response).await
    }
}
