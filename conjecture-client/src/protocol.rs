//! Wire protocol shared with the pipeline server: request/response bodies
//! and the SSE event vocabulary

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Request body for `POST /api/workflow/start`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
    /// arXiv paper id, e.g. "2301.12345"
    pub arxiv_id: String,
}

/// Response body after starting a workflow job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartResponse {
    pub job_id: String,
    /// Stream endpoint for this job, usually server-relative
    pub stream_url: String,
}

/// Server-side job status, from `GET /api/workflow/{job_id}/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    /// Blocked on a human decision
    Waiting,
    Completed,
    Error,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Waiting => "waiting",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }
}

/// Response body of the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(default)]
    pub phase: Option<u8>,
    #[serde(default)]
    pub iteration: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Request body for `POST /api/workflow/{job_id}/action`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,
}

/// Acknowledgment body of the action endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Which human-in-the-loop decision the server is blocked on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// Continue the phase-1 critique/revision loop, or accept the summary
    RefinementDecision,
    /// Proceed into phase 2, or finish after phase 1
    Phase2Decision,
}

/// Quality verdict category assigned by the final judge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityCategory {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

impl QualityCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            QualityCategory::Excellent => "excellent",
            QualityCategory::Good => "good",
            QualityCategory::Acceptable => "acceptable",
            QualityCategory::Poor => "poor",
        }
    }
}

/// Per-dimension quality sub-scores, each in 0..=10
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityAssessment {
    #[serde(default)]
    pub clarity_score: Option<f64>,
    #[serde(default)]
    pub feasibility_score: Option<f64>,
    #[serde(default)]
    pub novelty_score: Option<f64>,
    #[serde(default)]
    pub rigor_score: Option<f64>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub justification: Option<String>,
    #[serde(default)]
    pub verdict: Option<String>,
}

/// One frame of the job's event stream.
///
/// The server tags every frame with a `type` field; anything that does not
/// deserialize into one of these seven kinds is a malformed frame and gets
/// discarded without aborting the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    StepStart {
        step: String,
        #[serde(default)]
        message: Option<String>,
    },
    StepProgress {
        step: String,
        #[serde(default)]
        message: Option<String>,
        /// Optional percentage in 0..=100
        #[serde(default)]
        progress: Option<u8>,
    },
    StepComplete {
        step: String,
        #[serde(default)]
        message: Option<String>,
        /// Artifact text for artifact-producing steps
        #[serde(default)]
        output: Option<String>,
    },
    /// Partial merge of phase-level results; any subset of fields may appear
    PhaseComplete {
        #[serde(default)]
        phase: Option<u8>,
        #[serde(default)]
        summary: Option<String>,
        #[serde(default)]
        mechanism: Option<String>,
        #[serde(default)]
        critique: Option<String>,
        #[serde(default)]
        critic_status: Option<String>,
        #[serde(default)]
        iteration: Option<u32>,
    },
    UserActionRequired {
        action: DecisionKind,
        options: Vec<String>,
        #[serde(default)]
        message: Option<String>,
    },
    Error {
        error: String,
        #[serde(default)]
        step: Option<String>,
    },
    Complete {
        #[serde(default)]
        final_report: Option<String>,
        /// Overall score in 0..=100
        #[serde(default)]
        quality_score: Option<f64>,
        #[serde(default)]
        quality_category: Option<QualityCategory>,
        #[serde(default)]
        quality_assessment: Option<QualityAssessment>,
    },
}

impl WorkflowEvent {
    /// Parse one SSE data payload into an event.
    pub fn parse(data: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(data)?)
    }
}
