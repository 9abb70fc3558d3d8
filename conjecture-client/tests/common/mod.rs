//! Shared event constructors for the client tests
#![allow(dead_code)]

use conjecture_client::{DecisionKind, WorkflowEvent};

pub fn step_start(step: &str, message: &str) -> WorkflowEvent {
    WorkflowEvent::StepStart {
        step: step.to_string(),
        message: Some(message.to_string()),
    }
}

pub fn step_progress(step: &str, message: &str) -> WorkflowEvent {
    WorkflowEvent::StepProgress {
        step: step.to_string(),
        message: Some(message.to_string()),
        progress: None,
    }
}

pub fn step_complete(step: &str, message: Option<&str>, output: Option<&str>) -> WorkflowEvent {
    WorkflowEvent::StepComplete {
        step: step.to_string(),
        message: message.map(str::to_string),
        output: output.map(str::to_string),
    }
}

pub fn phase_transition() -> WorkflowEvent {
    WorkflowEvent::PhaseComplete {
        phase: Some(2),
        summary: None,
        mechanism: None,
        critique: None,
        critic_status: None,
        iteration: None,
    }
}

pub fn decision(kind: DecisionKind, options: &[&str], message: &str) -> WorkflowEvent {
    WorkflowEvent::UserActionRequired {
        action: kind,
        options: options.iter().map(|o| o.to_string()).collect(),
        message: Some(message.to_string()),
    }
}

pub fn pipeline_error(error: &str, step: Option<&str>) -> WorkflowEvent {
    WorkflowEvent::Error {
        error: error.to_string(),
        step: step.map(str::to_string),
    }
}

pub fn completion(final_report: Option<&str>) -> WorkflowEvent {
    WorkflowEvent::Complete {
        final_report: final_report.map(str::to_string),
        quality_score: None,
        quality_category: None,
        quality_assessment: None,
    }
}
