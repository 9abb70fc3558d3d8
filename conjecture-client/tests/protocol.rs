//! Tests for wire-format parsing of stream frames and API bodies

use conjecture_client::{
    DecisionKind, JobStatus, JobStatusResponse, QualityCategory, WorkflowEvent,
};

#[test]
fn test_parse_step_start() {
    let event =
        WorkflowEvent::parse(r#"{"type":"step_start","step":"ingest","message":"Downloading paper..."}"#)
            .unwrap();
    assert_eq!(
        event,
        WorkflowEvent::StepStart {
            step: "ingest".to_string(),
            message: Some("Downloading paper...".to_string()),
        }
    );
}

#[test]
fn test_parse_step_progress_with_percentage() {
    let event =
        WorkflowEvent::parse(r#"{"type":"step_progress","step":"ingest","message":"Parsing","progress":40}"#)
            .unwrap();
    assert_eq!(
        event,
        WorkflowEvent::StepProgress {
            step: "ingest".to_string(),
            message: Some("Parsing".to_string()),
            progress: Some(40),
        }
    );
}

#[test]
fn test_parse_step_complete_with_output() {
    let event =
        WorkflowEvent::parse(r#"{"type":"step_complete","step":"summarize","output":"S1"}"#).unwrap();
    assert_eq!(
        event,
        WorkflowEvent::StepComplete {
            step: "summarize".to_string(),
            message: None,
            output: Some("S1".to_string()),
        }
    );
}

#[test]
fn test_parse_phase_complete_subset() {
    let event = WorkflowEvent::parse(
        r#"{"type":"phase_complete","phase":1,"critic_status":"PASS","iteration":2}"#,
    )
    .unwrap();
    match event {
        WorkflowEvent::PhaseComplete {
            phase,
            summary,
            critic_status,
            iteration,
            ..
        } => {
            assert_eq!(phase, Some(1));
            assert_eq!(summary, None);
            assert_eq!(critic_status.as_deref(), Some("PASS"));
            assert_eq!(iteration, Some(2));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_parse_user_action_required() {
    let event = WorkflowEvent::parse(
        r#"{"type":"user_action_required","action":"refinement_decision","options":["continue","stop"],"message":"Continue refinement?"}"#,
    )
    .unwrap();
    assert_eq!(
        event,
        WorkflowEvent::UserActionRequired {
            action: DecisionKind::RefinementDecision,
            options: vec!["continue".to_string(), "stop".to_string()],
            message: Some("Continue refinement?".to_string()),
        }
    );
}

#[test]
fn test_parse_error_event() {
    let event =
        WorkflowEvent::parse(r#"{"type":"error","error":"LLM call failed","step":"critic"}"#).unwrap();
    assert_eq!(
        event,
        WorkflowEvent::Error {
            error: "LLM call failed".to_string(),
            step: Some("critic".to_string()),
        }
    );
}

#[test]
fn test_parse_complete_event() {
    let event = WorkflowEvent::parse(
        r##"{
            "type": "complete",
            "final_report": "# Proposal",
            "quality_score": 82.5,
            "quality_category": "good",
            "quality_assessment": {
                "clarity_score": 8.0,
                "feasibility_score": 7.5,
                "novelty_score": 9.0,
                "rigor_score": 8.5,
                "overall_score": 8.25,
                "justification": "Solid proposal",
                "verdict": "accept"
            }
        }"##,
    )
    .unwrap();
    match event {
        WorkflowEvent::Complete {
            final_report,
            quality_score,
            quality_category,
            quality_assessment,
        } => {
            assert_eq!(final_report.as_deref(), Some("# Proposal"));
            assert_eq!(quality_score, Some(82.5));
            assert_eq!(quality_category, Some(QualityCategory::Good));
            let assessment = quality_assessment.unwrap();
            assert_eq!(assessment.clarity_score, Some(8.0));
            assert_eq!(assessment.verdict.as_deref(), Some("accept"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

// ============================================================================
// Malformed frames
// ============================================================================

#[test]
fn test_unknown_type_is_malformed() {
    assert!(WorkflowEvent::parse(r#"{"type":"heartbeat"}"#).is_err());
}

#[test]
fn test_missing_type_is_malformed() {
    assert!(WorkflowEvent::parse(r#"{"step":"ingest"}"#).is_err());
}

#[test]
fn test_invalid_json_is_malformed() {
    assert!(WorkflowEvent::parse("not json at all").is_err());
}

#[test]
fn test_unknown_quality_category_is_malformed() {
    assert!(WorkflowEvent::parse(r#"{"type":"complete","quality_category":"stellar"}"#).is_err());
}

// ============================================================================
// API bodies
// ============================================================================

#[test]
fn test_parse_job_status_response() {
    let status: JobStatusResponse = serde_json::from_str(
        r#"{"job_id":"abc123","status":"waiting","current_step":"critic","phase":1,"iteration":2}"#,
    )
    .unwrap();
    assert_eq!(status.job_id, "abc123");
    assert_eq!(status.status, JobStatus::Waiting);
    assert_eq!(status.current_step.as_deref(), Some("critic"));
    assert_eq!(status.phase, Some(1));
    assert!(status.error.is_none());
}
