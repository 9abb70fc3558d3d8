//! Application state and input handling for the monitor TUI
//!
//! All workflow state lives in the library's `WorkflowMonitor`; this layer
//! only adds what the terminal needs: the input buffer, the selected output
//! tab, scroll positions and key bindings.

use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use tokio::runtime::Handle;
use tracing::info;

use conjecture_client::{ApiClient, ConnectionStatus, SseTransport, WorkflowMonitor};

/// Which artifact pane is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTab {
    Summary,
    Critique,
    Mechanism,
    Report,
    Quality,
}

impl OutputTab {
    pub const ALL: [OutputTab; 5] = [
        OutputTab::Summary,
        OutputTab::Critique,
        OutputTab::Mechanism,
        OutputTab::Report,
        OutputTab::Quality,
    ];

    pub fn title(self) -> &'static str {
        match self {
            OutputTab::Summary => "Summary",
            OutputTab::Critique => "Critique",
            OutputTab::Mechanism => "Mechanism",
            OutputTab::Report => "Report",
            OutputTab::Quality => "Quality",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct App {
    pub monitor: WorkflowMonitor<ApiClient, SseTransport>,
    /// arXiv id being edited before a run starts
    pub input: String,
    /// arXiv id of the last started job, for the saved-results pointer
    pub started_arxiv_id: Option<String>,
    pub running: bool,
    pub output_tab: OutputTab,
    pub output_scroll: u16,
    pub last_update: Option<DateTime<Local>>,
    pub should_quit: bool,
}

impl App {
    pub fn new(server: &str, handle: Handle, arxiv_id: Option<String>) -> Self {
        let api = ApiClient::new(server);
        let transport = SseTransport::new(handle.clone());
        Self {
            monitor: WorkflowMonitor::new(api, transport, handle),
            input: arxiv_id.unwrap_or_default(),
            started_arxiv_id: None,
            running: false,
            output_tab: OutputTab::Summary,
            output_scroll: 0,
            last_update: None,
            should_quit: false,
        }
    }

    /// Drain background messages into the session; called once per UI tick.
    pub fn tick(&mut self) {
        if self.monitor.poll() {
            self.last_update = Some(Local::now());
        }
        if self.running
            && (self.monitor.session().is_terminal()
                || self.monitor.status() == ConnectionStatus::Disconnected)
        {
            self.running = false;
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        // A pending decision captures the number keys.
        if self.monitor.session().pending_decision.is_some() {
            if let KeyCode::Char(c) = code {
                if let Some(digit) = c.to_digit(10) {
                    self.answer_decision(digit as usize);
                    return;
                }
            }
        }

        match code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => {
                self.output_tab = self.output_tab.next();
                self.output_scroll = 0;
            }
            KeyCode::BackTab => {
                self.output_tab = self.output_tab.prev();
                self.output_scroll = 0;
            }
            KeyCode::Up => self.output_scroll = self.output_scroll.saturating_sub(1),
            KeyCode::Down => self.output_scroll = self.output_scroll.saturating_add(1),
            KeyCode::PageUp => self.output_scroll = self.output_scroll.saturating_sub(10),
            KeyCode::PageDown => self.output_scroll = self.output_scroll.saturating_add(10),
            KeyCode::Enter if !self.running => self.start_job(),
            KeyCode::Backspace if !self.running => {
                self.input.pop();
            }
            KeyCode::Char('q') if self.running => self.should_quit = true,
            KeyCode::Char('a') if self.running => {
                info!("aborting monitored job");
                self.monitor.abort();
                self.running = false;
            }
            KeyCode::Char(c) if !self.running && !c.is_control() => self.input.push(c),
            _ => {}
        }
    }

    fn answer_decision(&mut self, number: usize) {
        if number == 0 {
            return;
        }
        let option = self
            .monitor
            .session()
            .pending_decision
            .as_ref()
            .and_then(|d| d.options.get(number - 1))
            .cloned();
        if let Some(option) = option {
            self.monitor.answer(&option);
        }
    }

    fn start_job(&mut self) {
        let arxiv_id = self.input.trim().to_string();
        if arxiv_id.is_empty() {
            return;
        }
        info!(arxiv_id, "starting job from the ui");
        self.output_tab = OutputTab::Summary;
        self.output_scroll = 0;
        self.last_update = None;
        self.started_arxiv_id = Some(arxiv_id.clone());
        self.running = true;
        self.monitor.start(&arxiv_id);
    }
}
