//! Failure taxonomy for the monitoring client

use thiserror::Error;

/// Everything that can go wrong on the client side of a monitoring session.
///
/// Pipeline failures reported by the server arrive as `error` events and are
/// folded into the session's terminal state rather than surfacing here.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The start request was rejected or failed before a stream existed.
    #[error("failed to start workflow: {0}")]
    Startup(String),

    /// A stream frame was not a well-formed event. Non-fatal: the frame is
    /// logged and discarded, the stream keeps going.
    #[error("malformed event frame: {0}")]
    MalformedEvent(#[from] serde_json::Error),

    /// Transport-level drop or handshake failure. Fatal to the session; the
    /// client does not reconnect.
    #[error("event stream connection lost: {0}")]
    Connectivity(String),

    /// The decision send failed. Logged only; the optimistic clear of the
    /// pending decision stands.
    #[error("failed to send decision: {0}")]
    DecisionSend(String),

    /// A non-stream API request failed.
    #[error("api request failed: {0}")]
    Api(String),
}
