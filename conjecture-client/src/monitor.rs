//! The controller: one session, one connection, one fold loop

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::WorkflowApi;
use crate::error::ClientError;
use crate::protocol::WorkflowEvent;
use crate::session::WorkflowSession;
use crate::stream::{ConnectionStatus, EventTransport, StreamConnection};

/// Message delivered from a background task to the monitor's fold loop
#[derive(Debug)]
pub enum MonitorMessage {
    /// The start request was accepted
    Started { job_id: String, stream_url: String },
    StartFailed { error: ClientError },
    /// Stream handshake succeeded
    Connected,
    Event(WorkflowEvent),
    /// Transport-level failure; ends the session
    StreamError { error: ClientError },
    /// The stream ended without a transport error
    StreamClosed,
    /// The decision send failed; logged only
    DecisionFailed { error: ClientError },
}

pub(crate) struct Envelope {
    generation: u64,
    message: MonitorMessage,
}

/// Sending half handed to background tasks. Messages are stamped with the
/// session generation current when the task was spawned, so anything that
/// resolves after a reset is dropped instead of touching the new session.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<Envelope>,
    generation: u64,
}

impl EventSink {
    pub fn send(&self, message: MonitorMessage) {
        // The receiver only disappears when the monitor is gone.
        let _ = self.tx.send(Envelope {
            generation: self.generation,
            message,
        });
    }
}

/// Owns exactly one [`WorkflowSession`] and at most one live stream
/// connection, and feeds every event and response through the session fold
/// on the caller's thread via [`WorkflowMonitor::poll`].
pub struct WorkflowMonitor<A, T> {
    api: A,
    transport: T,
    handle: Handle,
    session: WorkflowSession,
    connection: Option<Box<dyn StreamConnection>>,
    status: ConnectionStatus,
    generation: u64,
    tx: mpsc::UnboundedSender<Envelope>,
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl<A, T> WorkflowMonitor<A, T>
where
    A: WorkflowApi + Clone,
    T: EventTransport,
{
    pub fn new(api: A, transport: T, handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            transport,
            handle,
            session: WorkflowSession::new(),
            connection: None,
            status: ConnectionStatus::Idle,
            generation: 0,
            tx,
            rx,
        }
    }

    pub fn session(&self) -> &WorkflowSession {
        &self.session
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn has_open_connection(&self) -> bool {
        self.connection.as_ref().map(|c| c.is_open()).unwrap_or(false)
    }

    fn sink(&self) -> EventSink {
        EventSink {
            tx: self.tx.clone(),
            generation: self.generation,
        }
    }

    /// Start monitoring a new job. Any previous session is fully discarded:
    /// the prior connection is closed before the new start request goes out,
    /// and in-flight responses from the prior session are invalidated.
    pub fn start(&mut self, arxiv_id: &str) {
        self.close_connection();
        self.generation += 1;
        self.session = WorkflowSession::new();
        self.status = ConnectionStatus::Connecting;
        info!(arxiv_id, "starting workflow job");

        let api = self.api.clone();
        let sink = self.sink();
        let arxiv_id = arxiv_id.to_string();
        self.handle.spawn(async move {
            match api.start_job(&arxiv_id).await {
                Ok(response) => sink.send(MonitorMessage::Started {
                    job_id: response.job_id,
                    stream_url: response.stream_url,
                }),
                Err(error) => sink.send(MonitorMessage::StartFailed { error }),
            }
        });
    }

    /// Answer the pending decision with one of its offered options.
    ///
    /// The pending decision is cleared optimistically before the request
    /// resolves; a failed send is logged and does not roll the clear back.
    pub fn answer(&mut self, option: &str) {
        if self.session.is_terminal() {
            return;
        }
        let Some(decision) = self.session.pending_decision.as_ref() else {
            return;
        };
        if !decision.options.iter().any(|o| o == option) {
            warn!(option, "ignoring decision option the server did not offer");
            return;
        }
        let Some(job_id) = self.session.job_id.clone() else {
            return;
        };
        self.session.pending_decision = None;
        info!(option, "sending decision");

        let api = self.api.clone();
        let sink = self.sink();
        let option = option.to_string();
        self.handle.spawn(async move {
            if let Err(error) = api.send_action(&job_id, &option).await {
                sink.send(MonitorMessage::DecisionFailed { error });
            }
        });
    }

    /// Stop monitoring: close the connection without notifying the server.
    pub fn abort(&mut self) {
        self.close_connection();
        if self.status != ConnectionStatus::Idle {
            self.status = ConnectionStatus::Disconnected;
        }
    }

    /// Drain and fold everything the background tasks have delivered.
    /// Returns whether the session or connection status changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(envelope) = self.rx.try_recv() {
            if envelope.generation != self.generation {
                debug!("dropping message from a superseded session");
                continue;
            }
            changed = true;
            self.handle_message(envelope.message);
        }
        changed
    }

    fn handle_message(&mut self, message: MonitorMessage) {
        match message {
            MonitorMessage::Started { job_id, stream_url } => {
                info!(job_id, "workflow job accepted, opening stream");
                self.session.job_id = Some(job_id);
                let url = self.api.resolve(&stream_url);
                let sink = self.sink();
                self.connection = Some(self.transport.open(&url, sink));
            }
            MonitorMessage::StartFailed { error } => {
                self.status = ConnectionStatus::Disconnected;
                self.session.fail(error.to_string());
            }
            MonitorMessage::Connected => {
                self.status = ConnectionStatus::Connected;
            }
            MonitorMessage::Event(event) => {
                let completed = matches!(event, WorkflowEvent::Complete { .. });
                self.session.apply(&event);
                if completed {
                    self.close_connection();
                    self.status = ConnectionStatus::Disconnected;
                }
            }
            MonitorMessage::StreamError { error } => {
                self.close_connection();
                self.status = ConnectionStatus::Disconnected;
                self.session.fail(error.to_string());
            }
            MonitorMessage::StreamClosed => {
                self.close_connection();
                self.status = ConnectionStatus::Disconnected;
                // A stream that ends mid-run is a dropped session; after a
                // terminal event it is just the server hanging up.
                if !self.session.is_terminal() {
                    self.session
                        .fail("event stream ended unexpectedly".to_string());
                }
            }
            MonitorMessage::DecisionFailed { error } => {
                warn!("decision send failed, optimistic clear stands: {error}");
            }
        }
    }

    fn close_connection(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
    }
}
