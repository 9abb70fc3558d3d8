//! Live SSE connection to a job's event stream

use futures::StreamExt;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::monitor::{EventSink, MonitorMessage};
use crate::protocol::WorkflowEvent;

/// Lifecycle of the (at most one) live stream connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No job started yet
    Idle,
    Connecting,
    Connected,
    Disconnected,
}

/// A live connection handle. Closing is idempotent and never touches the
/// server; it only tears down the local reader.
pub trait StreamConnection: Send {
    fn close(&mut self);
    fn is_open(&self) -> bool;
}

/// Opens event stream connections. The production implementation speaks SSE
/// over reqwest; tests substitute a spy to observe open/close behavior.
pub trait EventTransport {
    fn open(&self, url: &str, sink: EventSink) -> Box<dyn StreamConnection>;
}

/// Incremental buffer that splits raw SSE bytes into event data payloads.
///
/// Frames are `data:` lines terminated by a blank line; comment and other
/// non-data lines are skipped.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: String,
}

impl FrameBuffer {
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.push_str(&String::from_utf8_lossy(chunk));
        // Normalize CRLF so frame detection only looks for "\n\n". Re-run
        // over the whole buffer because a "\r\n" can straddle two chunks.
        if self.buf.contains('\r') {
            self.buf = self.buf.replace("\r\n", "\n");
        }
    }

    /// Data payload of the next complete frame, if one is buffered.
    pub fn next_data(&mut self) -> Option<String> {
        loop {
            let end = self.buf.find("\n\n")?;
            let frame: String = self.buf.drain(..end + 2).collect();
            let mut data_lines: Vec<&str> = Vec::new();
            for line in frame.lines() {
                if let Some(rest) = line.strip_prefix("data:") {
                    data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
                }
            }
            if !data_lines.is_empty() {
                return Some(data_lines.join("\n"));
            }
            // Heartbeat or comment-only frame; keep scanning.
        }
    }
}

/// SSE transport backed by reqwest. Each `open` spawns one reader task on
/// the supplied runtime handle.
pub struct SseTransport {
    http: reqwest::Client,
    handle: Handle,
}

impl SseTransport {
    pub fn new(handle: Handle) -> Self {
        Self {
            http: reqwest::Client::new(),
            handle,
        }
    }
}

impl EventTransport for SseTransport {
    fn open(&self, url: &str, sink: EventSink) -> Box<dyn StreamConnection> {
        let http = self.http.clone();
        let url = url.to_string();
        let task = self.handle.spawn(async move {
            run_stream(http, url, sink).await;
        });
        Box::new(SseConnection { task: Some(task) })
    }
}

struct SseConnection {
    task: Option<JoinHandle<()>>,
}

impl StreamConnection for SseConnection {
    fn close(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_open(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }
}

impl Drop for SseConnection {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_stream(http: reqwest::Client, url: String, sink: EventSink) {
    debug!(%url, "opening event stream");
    let response = match http
        .get(&url)
        .header("Accept", "text/event-stream")
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            sink.send(MonitorMessage::StreamError {
                error: ClientError::Connectivity(format!("connection failed: {e}")),
            });
            return;
        }
    };
    if !response.status().is_success() {
        sink.send(MonitorMessage::StreamError {
            error: ClientError::Connectivity(format!(
                "stream handshake rejected: {}",
                response.status()
            )),
        });
        return;
    }
    sink.send(MonitorMessage::Connected);

    let mut stream = response.bytes_stream();
    let mut frames = FrameBuffer::default();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                frames.push(&chunk);
                while let Some(data) = frames.next_data() {
                    match WorkflowEvent::parse(&data) {
                        Ok(event) => {
                            let done = matches!(event, WorkflowEvent::Complete { .. });
                            sink.send(MonitorMessage::Event(event));
                            if done {
                                // The server stops sending after `complete`,
                                // but we do not rely on that: close our side.
                                sink.send(MonitorMessage::StreamClosed);
                                return;
                            }
                        }
                        Err(e) => warn!("discarding malformed event frame: {e}"),
                    }
                }
            }
            Err(e) => {
                sink.send(MonitorMessage::StreamError {
                    error: ClientError::Connectivity(format!("stream read failed: {e}")),
                });
                return;
            }
        }
    }
    sink.send(MonitorMessage::StreamClosed);
}
