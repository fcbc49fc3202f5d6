//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("x"), ErrorCode::Forbidden)]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::conflict("x"), ErrorCode::Conflict)]
#[case(Error::upstream("x"), ErrorCode::UpstreamError)]
#[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("x"), ErrorCode::InternalError)]
fn constructors_set_expected_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.message(), "x");
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_codes_in_snake_case_and_skips_empty_fields() {
    let value = serde_json::to_value(Error::upstream("provider down")).expect("serialise");
    assert_eq!(value, json!({ "code": "upstream_error", "message": "provider down" }));
}

#[rstest]
fn serialises_trace_id_and_details_in_camel_case(expected_trace_id: String) {
    let error = Error::invalid_request("bad")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "field": "title" }));
    let value = serde_json::to_value(error).expect("serialise");

    assert_eq!(value["traceId"], json!(expected_trace_id));
    assert_eq!(value["details"]["field"], json!("title"));
}
