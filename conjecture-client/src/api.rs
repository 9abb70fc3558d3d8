//! HTTP actions against the pipeline server: start, decisions, status

use async_trait::async_trait;
use tracing::debug;

use crate::error::ClientError;
use crate::protocol::{ActionRequest, ActionResponse, JobStatusResponse, StartRequest, StartResponse};

/// The request side of the workflow API, factored out so the monitor can be
/// exercised in tests without a server.
#[async_trait]
pub trait WorkflowApi: Send + Sync + 'static {
    /// Start a new job. Failure here surfaces as a terminal errored session
    /// without a stream ever having been opened.
    async fn start_job(&self, arxiv_id: &str) -> Result<StartResponse, ClientError>;

    /// Answer the most recent pending decision. Fire-and-forget from the
    /// caller's perspective: the only contract is accepted-or-failed.
    async fn send_action(&self, job_id: &str, action: &str) -> Result<(), ClientError>;

    /// Resolve a possibly server-relative URL against the API base.
    fn resolve(&self, path: &str) -> String;
}

/// reqwest-backed client for the workflow API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One-shot query of a job's server-side status.
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, ClientError> {
        let url = format!("{}/api/workflow/{}/status", self.base_url, job_id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Api(format!("status request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(ClientError::Api(format!(
                "status request rejected: {}",
                response.status()
            )));
        }
        response
            .json::<JobStatusResponse>()
            .await
            .map_err(|e| ClientError::Api(format!("invalid status response: {e}")))
    }
}

#[async_trait]
impl WorkflowApi for ApiClient {
    async fn start_job(&self, arxiv_id: &str) -> Result<StartResponse, ClientError> {
        let url = format!("{}/api/workflow/start", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&StartRequest {
                arxiv_id: arxiv_id.to_string(),
            })
            .send()
            .await
            .map_err(|e| ClientError::Startup(format!("start request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(ClientError::Startup(format!(
                "start request rejected: {}",
                response.status()
            )));
        }
        response
            .json::<StartResponse>()
            .await
            .map_err(|e| ClientError::Startup(format!("invalid start response: {e}")))
    }

    async fn send_action(&self, job_id: &str, action: &str) -> Result<(), ClientError> {
        let url = format!("{}/api/workflow/{}/action", self.base_url, job_id);
        let response = self
            .http
            .post(&url)
            .json(&ActionRequest {
                action: action.to_string(),
            })
            .send()
            .await
            .map_err(|e| ClientError::DecisionSend(format!("action request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(ClientError::DecisionSend(format!(
                "action request rejected: {}",
                response.status()
            )));
        }
        if let Ok(ack) = response.json::<ActionResponse>().await {
            debug!(status = %ack.status, message = ?ack.message, "decision acknowledged");
        }
        Ok(())
    }

    fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}
