//! Workflow session state and the event fold

use crate::protocol::{DecisionKind, QualityAssessment, QualityCategory, WorkflowEvent};

/// Status of a single checklist step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Running,
    Complete,
    Error,
}

/// A named unit of pipeline work in the current phase's checklist
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub id: &'static str,
    pub name: &'static str,
    pub status: StepStatus,
    pub message: Option<String>,
    /// Optional percentage reported by step_progress events
    pub progress: Option<u8>,
}

impl Step {
    fn new(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            status: StepStatus::Pending,
            message: None,
            progress: None,
        }
    }
}

const PHASE1_STEPS: [(&str, &str); 5] = [
    ("ingest", "Download & Process Paper"),
    ("summarize", "Generate Summary"),
    ("critic", "Critic Evaluation"),
    ("revision", "Revision (if needed)"),
    ("mechanism", "Extract Mechanism"),
];

const PHASE2_STEPS: [(&str, &str); 7] = [
    ("context_ingestion", "Context Ingestion"),
    ("agenda_creator", "Create Research Agenda"),
    ("brainstormer", "Generate Proposal"),
    ("critics", "Parallel Critics"),
    ("feedback", "Consolidate Feedback"),
    ("report", "Generate Report"),
    ("quality", "Quality Assessment"),
];

/// One of the two sequential pipeline stages. Monotonic within a session:
/// once a session reaches phase 2 it never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    One,
    Two,
}

impl Phase {
    pub fn number(self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Phase::One => "Paper Analysis",
            Phase::Two => "Open Problem Formulation",
        }
    }

    /// Fresh checklist for this phase, all steps pending
    pub fn checklist(self) -> Vec<Step> {
        let table: &[(&'static str, &'static str)] = match self {
            Phase::One => &PHASE1_STEPS,
            Phase::Two => &PHASE2_STEPS,
        };
        table.iter().map(|(id, name)| Step::new(id, name)).collect()
    }
}

/// Generated text accumulated over the session. Fields are filled or
/// overwritten by events, never cleared before the next job start.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Artifacts {
    pub summary: Option<String>,
    pub critique: Option<String>,
    /// Critic verdict for the latest iteration, e.g. "PASS"
    pub critic_status: Option<String>,
    pub mechanism: Option<String>,
    pub final_report: Option<String>,
}

/// Quality verdict carried by the terminal `complete` event
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QualityResult {
    /// Overall score in 0..=100
    pub score: Option<f64>,
    pub category: Option<QualityCategory>,
    pub assessment: Option<QualityAssessment>,
}

/// The single outstanding human-in-the-loop choice, if any
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDecision {
    pub kind: DecisionKind,
    pub options: Vec<String>,
    pub prompt: String,
}

/// Session-ending outcome
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Terminal {
    #[default]
    None,
    Completed,
    Errored(String),
}

/// Root state of one monitored job.
///
/// Mutated exclusively through [`WorkflowSession::apply`] (plus the
/// connectivity/startup failure path in [`WorkflowSession::fail`]); the
/// network plumbing only produces the events that get folded here.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSession {
    /// Assigned by the server on start; absent before that
    pub job_id: Option<String>,
    pub phase: Phase,
    /// How many times the phase-1 critique/revision loop has run
    pub iteration: u32,
    /// Ordered checklist of the active phase
    pub steps: Vec<Step>,
    pub artifacts: Artifacts,
    pub quality: Option<QualityResult>,
    pub pending_decision: Option<PendingDecision>,
    pub terminal: Terminal,
}

impl Default for WorkflowSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowSession {
    pub fn new() -> Self {
        Self {
            job_id: None,
            phase: Phase::One,
            iteration: 1,
            steps: Phase::One.checklist(),
            artifacts: Artifacts::default(),
            quality: None,
            pending_decision: None,
            terminal: Terminal::None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal != Terminal::None
    }

    /// First running step, if any
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.status == StepStatus::Running)
    }

    pub fn completed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Complete)
            .count()
    }

    fn step_mut(&mut self, id: &str) -> Option<&mut Step> {
        self.steps.iter_mut().find(|s| s.id == id)
    }

    /// Fold one event into the session, strictly in arrival order.
    ///
    /// Events naming a step id absent from the current checklist leave the
    /// checklist untouched; that guards against stale frames landing just
    /// after a phase transition replaced it, and against server-internal
    /// node names that have no checklist entry.
    pub fn apply(&mut self, event: &WorkflowEvent) {
        match event {
            WorkflowEvent::StepStart { step, message } => {
                if let Some(s) = self.step_mut(step) {
                    s.status = StepStatus::Running;
                    s.message = message.clone();
                    s.progress = None;
                }
            }
            WorkflowEvent::StepProgress {
                step,
                message,
                progress,
            } => {
                if let Some(s) = self.step_mut(step) {
                    s.message = message.clone();
                    if progress.is_some() {
                        s.progress = *progress;
                    }
                }
            }
            WorkflowEvent::StepComplete {
                step,
                message,
                output,
            } => {
                if let Some(s) = self.step_mut(step) {
                    s.status = StepStatus::Complete;
                    s.message = message.clone();
                }
                // Artifact capture is keyed on the step id alone, so an
                // artifact still lands if its producing step never appeared
                // in the checklist as running.
                if let Some(output) = output {
                    match step.as_str() {
                        "summarize" => self.artifacts.summary = Some(output.clone()),
                        "critic" => self.artifacts.critique = Some(output.clone()),
                        "mechanism" => self.artifacts.mechanism = Some(output.clone()),
                        _ => {}
                    }
                }
            }
            WorkflowEvent::PhaseComplete {
                phase,
                summary,
                mechanism,
                critique,
                critic_status,
                iteration,
            } => {
                // Partial merge: absent fields stay as they were.
                if let Some(v) = summary {
                    self.artifacts.summary = Some(v.clone());
                }
                if let Some(v) = mechanism {
                    self.artifacts.mechanism = Some(v.clone());
                }
                if let Some(v) = critique {
                    self.artifacts.critique = Some(v.clone());
                }
                if let Some(v) = critic_status {
                    self.artifacts.critic_status = Some(v.clone());
                }
                if let Some(i) = iteration {
                    // Iteration only moves forward.
                    self.iteration = self.iteration.max(*i);
                }
                // Always yields a fresh phase-2 checklist, even when the
                // session is already in phase 2. Phase stays monotonic
                // either way.
                if *phase == Some(2) {
                    self.phase = Phase::Two;
                    self.steps = Phase::Two.checklist();
                }
            }
            WorkflowEvent::UserActionRequired {
                action,
                options,
                message,
            } => {
                // Replaces any outstanding decision; only the latest one is
                // ever answerable.
                self.pending_decision = Some(PendingDecision {
                    kind: *action,
                    options: options.clone(),
                    prompt: message.clone().unwrap_or_default(),
                });
            }
            WorkflowEvent::Error { error, step } => {
                if let Some(step) = step {
                    if let Some(s) = self.step_mut(step) {
                        s.status = StepStatus::Error;
                    }
                }
                self.terminal = Terminal::Errored(error.clone());
            }
            WorkflowEvent::Complete {
                final_report,
                quality_score,
                quality_category,
                quality_assessment,
            } => {
                if let Some(report) = final_report {
                    self.artifacts.final_report = Some(report.clone());
                }
                if quality_score.is_some()
                    || quality_category.is_some()
                    || quality_assessment.is_some()
                {
                    let quality = self.quality.get_or_insert_with(QualityResult::default);
                    if let Some(score) = quality_score {
                        quality.score = Some(*score);
                    }
                    if let Some(category) = quality_category {
                        quality.category = Some(*category);
                    }
                    if let Some(assessment) = quality_assessment {
                        quality.assessment = Some(assessment.clone());
                    }
                }
                self.terminal = Terminal::Completed;
            }
        }
    }

    /// Record a client-side failure (startup or connectivity) as the
    /// terminal outcome. A session that already ended keeps its outcome; a
    /// stream dropping right after `complete` is not an error.
    pub fn fail(&mut self, message: String) {
        if !self.is_terminal() {
            self.terminal = Terminal::Errored(message);
        }
    }
}
