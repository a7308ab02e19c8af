#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{model, simple};
use shapediff_core::core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ADDED, FIELD_COMPONENT, FIELD_DURATION_MS,
    FIELD_ERR_CODE, FIELD_ERR_KIND, FIELD_EVALUATOR, FIELD_EVENT_COUNT, FIELD_EVENT_ID,
    FIELD_HAS_ERRORS, FIELD_MATCHED, FIELD_REMOVED, FIELD_SHAPE_ID, FIELD_SUPPRESSED_COUNT,
    FIELD_TRACE_ID,
};
use shapediff_core::core_types::{RequestContext, RequestId, TraceId};
use shapediff_core::diff::{
    DiffIndex, Evaluator, EvaluatorRegistry, ModelDiffEngine, Suppression, ValidationEvent,
};
use shapediff_core::errors::{ExError, ExErrorKind};
use shapediff_core::logging_facility::test_capture::init_test_capture;
use shapediff_core::model::ShapeKind;
use shapediff_core::{log_op_end, log_op_error, log_op_start};

fn context(request_id: &str) -> RequestContext {
    RequestContext::with_request_id(RequestId::from_string(request_id.to_string()))
}

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(start_events, 1, "Should have captured one start event");
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_event = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .expect("Should have end event");
    assert_eq!(end_event.field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ExError::new(ExErrorKind::ContractViolation).with_shape_id("a#Ghost");
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events();
    let error_event = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");
    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("ERR_CONTRACT_VIOLATION"));
    assert_eq!(error_event.field(FIELD_ERR_KIND), Some("ContractViolation"));
}

#[test]
fn test_log_macros_with_multiple_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_4";

    log_op_start!(op_name, shape_id = "acme#City", evaluators = 3u64);

    let events = capture.events();
    let start_event = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name))
        .expect("Should have start event");
    assert_eq!(start_event.field(FIELD_SHAPE_ID), Some("acme#City"));
    assert_eq!(start_event.field("evaluators"), Some("3"));
}

#[test]
fn test_diff_logs_start_and_end_with_counts() {
    let capture = init_test_capture();
    let request_id = "diff-logging-request-5";

    let old = model(vec![
        simple("a#Keep", ShapeKind::String),
        simple("a#Gone", ShapeKind::String),
    ]);
    let new = model(vec![simple("a#Keep", ShapeKind::String)]);
    let suppression = Suppression::new("ShapeRemoved", "a#Gone", "retired").unwrap();

    let result = ModelDiffEngine::standard()
        .diff_with_context(&context(request_id), &old, &new, &[suppression])
        .unwrap();
    assert!(!result.has_errors());

    capture.assert_request_event(request_id, "diff", EVENT_START);
    capture.assert_request_event(request_id, "diff", EVENT_END);

    let events = capture.events_for_request(request_id);
    let starts = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .count();
    assert_eq!(starts, 1, "Should have exactly one start event");

    let end = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(end.field(FIELD_EVENT_COUNT), Some("1"));
    assert_eq!(end.field(FIELD_SUPPRESSED_COUNT), Some("1"));
    assert_eq!(end.field(FIELD_HAS_ERRORS), Some("false"));
    assert!(end.field(FIELD_DURATION_MS).is_some());

    let index_built = events
        .iter()
        .find(|e| e.field(FIELD_ADDED).is_some())
        .expect("Should log partition sizes");
    assert_eq!(index_built.field(FIELD_ADDED), Some("0"));
    assert_eq!(index_built.field(FIELD_REMOVED), Some("1"));
    assert_eq!(index_built.field(FIELD_MATCHED), Some("1"));

    let mut evaluators: Vec<&str> = events
        .iter()
        .filter_map(|e| e.field(FIELD_EVALUATOR))
        .collect();
    evaluators.sort_unstable();
    let mut expected = ModelDiffEngine::standard().registry().event_ids();
    expected.sort_unstable();
    assert_eq!(evaluators, expected);

    let suppressed = events
        .iter()
        .find(|e| e.field(FIELD_EVENT_ID).is_some())
        .expect("Should log the suppressed event");
    assert_eq!(suppressed.field(FIELD_EVENT_ID), Some("ShapeRemoved"));
    assert_eq!(suppressed.field(FIELD_SHAPE_ID), Some("a#Gone"));
}

#[test]
fn test_diff_records_trace_id_and_component() {
    let capture = init_test_capture();
    let request_id = "diff-logging-request-7";
    let ctx = context(request_id).with_trace_id(TraceId::from_string("ci-run-77".to_string()));

    let m = model(vec![simple("a#Keep", ShapeKind::String)]);
    ModelDiffEngine::standard()
        .diff_with_context(&ctx, &m, &m, &[])
        .unwrap();

    let events = capture.events_for_request(request_id);
    let start = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_START))
        .expect("Should have start event");
    assert_eq!(start.field(FIELD_TRACE_ID), Some("ci-run-77"));
    assert_eq!(start.field(FIELD_COMPONENT), Some("shapediff_core::diff::engine"));
}

#[test]
fn test_diff_without_trace_id_omits_field() {
    let capture = init_test_capture();
    let request_id = "diff-logging-request-8";

    let m = model(vec![]);
    ModelDiffEngine::standard()
        .diff_with_context(&context(request_id), &m, &m, &[])
        .unwrap();

    let events = capture.events_for_request(request_id);
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| e.field(FIELD_TRACE_ID).is_none()));
}

struct Rogue;

impl Evaluator for Rogue {
    fn event_id(&self) -> &'static str {
        "Rogue"
    }

    fn evaluate(&self, _index: &DiffIndex<'_>) -> Vec<ValidationEvent> {
        vec![ValidationEvent::note(
            "Rogue",
            common::id("elsewhere#Phantom"),
            "not in either model",
        )]
    }
}

#[test]
fn test_diff_failure_logs_end_error() {
    let capture = init_test_capture();
    let request_id = "diff-logging-request-6";

    let engine = ModelDiffEngine::new(EvaluatorRegistry::empty().with(Arc::new(Rogue)));
    let m = model(vec![]);
    let err = engine
        .diff_with_context(&context(request_id), &m, &m, &[])
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ContractViolation);

    capture.assert_request_event(request_id, "diff", EVENT_START);
    capture.assert_request_event(request_id, "diff", EVENT_END_ERROR);

    let events = capture.events_for_request(request_id);
    assert!(events
        .iter()
        .all(|e| e.event.as_deref() != Some(EVENT_END)));
    let error_event = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .unwrap();
    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("ERR_CONTRACT_VIOLATION"));
    assert_eq!(error_event.field(FIELD_SHAPE_ID), Some("elsewhere#Phantom"));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_assert_request_event_fails_for_unknown_request() {
    let capture = init_test_capture();
    capture.assert_request_event("no-such-request-999", "diff", EVENT_START);
}
