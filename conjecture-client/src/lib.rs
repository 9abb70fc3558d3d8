//! Client-side monitor for the conjecture research pipeline.
//!
//! The server runs a two-phase paper-analysis pipeline and streams progress
//! as discrete SSE events; this crate turns that stream into a coherent
//! [`session::WorkflowSession`] view and exposes the start/decide/abort
//! actions back to the server.

pub mod api;
pub mod error;
pub mod monitor;
pub mod protocol;
pub mod session;
pub mod stream;

// Re-export for downstream trait impls
pub use async_trait::async_trait;

pub use api::{ApiClient, WorkflowApi};
pub use error::ClientError;
pub use monitor::{EventSink, MonitorMessage, WorkflowMonitor};
pub use protocol::{
    DecisionKind, JobStatus, JobStatusResponse, QualityAssessment, QualityCategory, StartResponse,
    WorkflowEvent,
};
pub use session::{
    Artifacts, PendingDecision, Phase, QualityResult, Step, StepStatus, Terminal, WorkflowSession,
};
pub use stream::{ConnectionStatus, EventTransport, FrameBuffer, SseTransport, StreamConnection};
