//! Client for the remote job API.
//!
//! [`JobApi`] is the seam the orchestrator depends on; [`HttpJobApi`] is
//! the production implementation on top of [`reqwest`].

use async_trait::async_trait;
use atelier_core::types::TaskId;

use crate::config::GenerationConfig;
use crate::error::JobApiError;
use crate::messages::{ApiEnvelope, CreatedTask, GenerateRequest, QueryRequest, TaskSnapshot};

pub const GENERATE_PATH: &str = "/api/ai/generate";
pub const QUERY_PATH: &str = "/api/ai/query";

const CREATE_FALLBACK_MESSAGE: &str = "Failed to create an image task";
const QUERY_FALLBACK_MESSAGE: &str = "Failed to query task";

/// Operations the orchestrator needs from the job backend.
#[async_trait]
pub trait JobApi: Send + Sync + 'static {
    /// Create a task and return its id.
    async fn create_task(&self, request: &GenerateRequest) -> Result<TaskId, JobApiError>;

    /// Fetch the current state of a task.
    async fn query_task(&self, task_id: &str) -> Result<TaskSnapshot, JobApiError>;

    /// Download a result image.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, JobApiError>;
}

/// HTTP client for the job API.
#[derive(Debug, Clone)]
pub struct HttpJobApi {
    client: reqwest::Client,
    api_url: String,
}

impl HttpJobApi {
    /// * `api_url` - Base URL, e.g. `http://localhost:3000`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    /// Build a client honouring the configured request timeout.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, JobApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config.api_url.clone()))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    // ---- private helpers ----

    /// Return the response unchanged on a 2xx status, otherwise a
    /// [`JobApiError::Status`] carrying the body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, JobApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(JobApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_envelope<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<ApiEnvelope<T>, JobApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<ApiEnvelope<T>>().await?)
    }
}

#[async_trait]
impl JobApi for HttpJobApi {
    async fn create_task(&self, request: &GenerateRequest) -> Result<TaskId, JobApiError> {
        let response = self
            .client
            .post(self.url(GENERATE_PATH))
            .json(request)
            .send()
            .await?;

        Self::parse_envelope::<CreatedTask>(response)
            .await?
            .into_result(CREATE_FALLBACK_MESSAGE)?
            .and_then(|data| data.task_id())
            .ok_or(JobApiError::MissingTaskId)
    }

    async fn query_task(&self, task_id: &str) -> Result<TaskSnapshot, JobApiError> {
        let body = QueryRequest {
            task_id: task_id.to_string(),
        };
        let response = self
            .client
            .post(self.url(QUERY_PATH))
            .json(&body)
            .send()
            .await?;

        Ok(Self::parse_envelope::<TaskSnapshot>(response)
            .await?
            .into_result(QUERY_FALLBACK_MESSAGE)?
            .unwrap_or_default())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, JobApiError> {
        let target = if url.starts_with('/') {
            self.url(url)
        } else {
            url.to_string()
        };
        let response = self.client.get(target).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let api = HttpJobApi::new("http://localhost:3000/");
        assert_eq!(api.api_url(), "http://localhost:3000");
        assert_eq!(api.url(QUERY_PATH), "http://localhost:3000/api/ai/query");
    }

    #[test]
    fn builds_from_config() {
        let config = GenerationConfig {
            api_url: "http://api.example".into(),
            poll_interval: Duration::from_millis(4000),
            request_timeout: Some(Duration::from_secs(5)),
        };
        let api = HttpJobApi::from_config(&config).unwrap();
        assert_eq!(api.api_url(), "http://api.example");
    }
}
