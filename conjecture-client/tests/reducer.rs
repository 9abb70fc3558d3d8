//! Tests for the session fold: step lifecycle, phase transitions, artifact
//! accumulation, pending decisions and terminal outcomes

mod common;

use common::*;
use conjecture_client::{
    DecisionKind, Phase, QualityAssessment, QualityCategory, StepStatus, Terminal, WorkflowEvent,
    WorkflowSession,
};

// ============================================================================
// Fresh session
// ============================================================================

#[test]
fn test_new_session_defaults() {
    let session = WorkflowSession::new();
    assert_eq!(session.phase, Phase::One);
    assert_eq!(session.iteration, 1);
    assert_eq!(session.steps.len(), 5);
    assert!(session
        .steps
        .iter()
        .all(|s| s.status == StepStatus::Pending));
    assert!(session.job_id.is_none());
    assert!(session.pending_decision.is_none());
    assert_eq!(session.terminal, Terminal::None);
}

// ============================================================================
// Step lifecycle
// ============================================================================

#[test]
fn test_step_lifecycle_fold() {
    let mut session = WorkflowSession::new();
    session.apply(&step_start("ingest", "Downloading paper..."));
    session.apply(&step_progress("ingest", "Parsing LaTeX..."));
    session.apply(&step_progress("ingest", "Cleaning sources..."));
    session.apply(&step_complete("ingest", Some("Paper processed"), None));

    let step = session.steps.iter().find(|s| s.id == "ingest").unwrap();
    assert_eq!(step.status, StepStatus::Complete);
    assert_eq!(step.message.as_deref(), Some("Paper processed"));
}

#[test]
fn test_step_progress_keeps_status_and_tracks_percentage() {
    let mut session = WorkflowSession::new();
    session.apply(&step_start("summarize", "Generating summary..."));
    session.apply(&WorkflowEvent::StepProgress {
        step: "summarize".to_string(),
        message: Some("Halfway".to_string()),
        progress: Some(50),
    });

    let step = session.steps.iter().find(|s| s.id == "summarize").unwrap();
    assert_eq!(step.status, StepStatus::Running);
    assert_eq!(step.message.as_deref(), Some("Halfway"));
    assert_eq!(step.progress, Some(50));
}

#[test]
fn test_unknown_step_is_noop() {
    let mut session = WorkflowSession::new();
    session.apply(&step_start("ingest", "Downloading..."));
    let before = session.clone();

    // The server emits internal node names that have no checklist entry.
    session.apply(&step_start("sanity_checker", "Running sanity check..."));
    session.apply(&step_progress("done_decision", "Deciding..."));
    session.apply(&step_complete("obstruction_analyzer", None, None));

    assert_eq!(session, before);
}

#[test]
fn test_artifact_capture_sequence() {
    // start -> step_start(summarize) -> step_complete(summarize, "S1")
    //       -> step_complete(critic, "C1") with critic never started
    let mut session = WorkflowSession::new();
    session.apply(&step_start("summarize", "Generating summary..."));
    session.apply(&step_complete("summarize", None, Some("S1")));
    session.apply(&step_complete("critic", None, Some("C1")));

    assert_eq!(session.artifacts.summary.as_deref(), Some("S1"));
    assert_eq!(session.artifacts.critique.as_deref(), Some("C1"));
    // critic jumped straight from pending to complete
    let critic = session.steps.iter().find(|s| s.id == "critic").unwrap();
    assert_eq!(critic.status, StepStatus::Complete);
}

// ============================================================================
// Phase transition
// ============================================================================

#[test]
fn test_phase_transition_resets_checklist() {
    let mut session = WorkflowSession::new();
    session.apply(&step_start("ingest", "Downloading..."));
    session.apply(&step_complete("ingest", None, None));
    session.apply(&step_start("summarize", "Summarizing..."));

    session.apply(&phase_transition());

    assert_eq!(session.phase, Phase::Two);
    assert_eq!(session.steps.len(), 7);
    assert!(session
        .steps
        .iter()
        .all(|s| s.status == StepStatus::Pending && s.message.is_none()));
    assert_eq!(session.steps[0].id, "context_ingestion");
    assert_eq!(session.steps[6].id, "quality");
}

#[test]
fn test_repeated_phase_transition_resets_checklist_again() {
    let mut session = WorkflowSession::new();
    session.apply(&phase_transition());
    session.apply(&step_start("brainstormer", "Drafting..."));
    session.apply(&step_complete("brainstormer", None, None));

    session.apply(&phase_transition());

    // Still phase 2, but the checklist comes back fresh.
    assert_eq!(session.phase, Phase::Two);
    assert_eq!(session.steps.len(), 7);
    assert!(session
        .steps
        .iter()
        .all(|s| s.status == StepStatus::Pending));
}

#[test]
fn test_phase_complete_partial_merge() {
    let mut session = WorkflowSession::new();
    session.apply(&step_complete("critic", None, Some("C1")));

    session.apply(&WorkflowEvent::PhaseComplete {
        phase: Some(1),
        summary: Some("S1".to_string()),
        mechanism: None,
        critique: None,
        critic_status: Some("FAIL".to_string()),
        iteration: Some(2),
    });

    assert_eq!(session.artifacts.summary.as_deref(), Some("S1"));
    // Fields absent from the payload stay as they were.
    assert_eq!(session.artifacts.critique.as_deref(), Some("C1"));
    assert!(session.artifacts.mechanism.is_none());
    assert_eq!(session.artifacts.critic_status.as_deref(), Some("FAIL"));
    assert_eq!(session.iteration, 2);
    // phase 1 payload does not touch the checklist
    assert_eq!(session.phase, Phase::One);
    assert_eq!(session.steps.len(), 5);
}

#[test]
fn test_iteration_never_decreases() {
    let mut session = WorkflowSession::new();
    session.apply(&WorkflowEvent::PhaseComplete {
        phase: Some(1),
        summary: None,
        mechanism: None,
        critique: None,
        critic_status: None,
        iteration: Some(3),
    });
    session.apply(&WorkflowEvent::PhaseComplete {
        phase: Some(1),
        summary: None,
        mechanism: None,
        critique: None,
        critic_status: None,
        iteration: Some(2),
    });
    assert_eq!(session.iteration, 3);
}

// ============================================================================
// Pending decisions
// ============================================================================

#[test]
fn test_pending_decision_replaced_by_latest() {
    let mut session = WorkflowSession::new();
    session.apply(&decision(
        DecisionKind::RefinementDecision,
        &["continue", "stop"],
        "Iteration 1: continue refinement?",
    ));
    session.apply(&decision(
        DecisionKind::Phase2Decision,
        &["start_phase2", "skip_phase2"],
        "Phase 1 done. Start phase 2?",
    ));

    let pending = session.pending_decision.as_ref().unwrap();
    assert_eq!(pending.kind, DecisionKind::Phase2Decision);
    assert_eq!(pending.options, vec!["start_phase2", "skip_phase2"]);
    assert_eq!(pending.prompt, "Phase 1 done. Start phase 2?");
}

// ============================================================================
// Terminal outcomes
// ============================================================================

#[test]
fn test_error_event_sets_terminal_and_marks_step() {
    let mut session = WorkflowSession::new();
    session.apply(&step_start("summarize", "Summarizing..."));
    session.apply(&pipeline_error("LLM call failed", Some("summarize")));

    assert_eq!(
        session.terminal,
        Terminal::Errored("LLM call failed".to_string())
    );
    let step = session.steps.iter().find(|s| s.id == "summarize").unwrap();
    assert_eq!(step.status, StepStatus::Error);
}

#[test]
fn test_error_event_without_step() {
    let mut session = WorkflowSession::new();
    session.apply(&pipeline_error("workflow crashed", None));
    assert!(session.is_terminal());
    assert!(session
        .steps
        .iter()
        .all(|s| s.status == StepStatus::Pending));
}

#[test]
fn test_complete_event_fold() {
    let mut session = WorkflowSession::new();
    session.apply(&WorkflowEvent::Complete {
        final_report: Some("# Proposal".to_string()),
        quality_score: Some(82.5),
        quality_category: Some(QualityCategory::Good),
        quality_assessment: Some(QualityAssessment {
            clarity_score: Some(8.0),
            feasibility_score: Some(7.5),
            novelty_score: Some(9.0),
            rigor_score: Some(8.5),
            overall_score: Some(8.25),
            justification: Some("Solid proposal".to_string()),
            verdict: Some("accept".to_string()),
        }),
    });

    assert_eq!(session.terminal, Terminal::Completed);
    assert_eq!(session.artifacts.final_report.as_deref(), Some("# Proposal"));
    let quality = session.quality.as_ref().unwrap();
    assert_eq!(quality.score, Some(82.5));
    assert_eq!(quality.category, Some(QualityCategory::Good));
    assert_eq!(
        quality.assessment.as_ref().unwrap().novelty_score,
        Some(9.0)
    );
}

#[test]
fn test_complete_event_without_quality() {
    let mut session = WorkflowSession::new();
    session.apply(&completion(Some("report")));
    assert_eq!(session.terminal, Terminal::Completed);
    assert!(session.quality.is_none());
}

#[test]
fn test_trailing_events_after_terminal_keep_outcome() {
    let mut session = WorkflowSession::new();
    session.apply(&pipeline_error("workflow crashed", None));
    session.apply(&step_start("ingest", "Downloading..."));
    // Trailing events still fold, but the outcome stays put.
    assert_eq!(
        session.terminal,
        Terminal::Errored("workflow crashed".to_string())
    );
}

#[test]
fn test_fail_does_not_override_terminal() {
    let mut session = WorkflowSession::new();
    session.apply(&completion(None));
    session.fail("connection lost".to_string());
    assert_eq!(session.terminal, Terminal::Completed);

    let mut session = WorkflowSession::new();
    session.fail("connection lost".to_string());
    assert_eq!(
        session.terminal,
        Terminal::Errored("connection lost".to_string())
    );
}
