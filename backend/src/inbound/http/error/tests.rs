//! Tests for HTTP error mapping.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::FieldViolation;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body()).await.expect("body");
    let body = serde_json::from_slice(&bytes).expect("json body");
    (status, header, body)
}

#[rstest]
#[case(Error::validation(vec![FieldViolation::new("email", "is required")]), StatusCode::BAD_REQUEST)]
#[case(Error::missing_parameter("start"), StatusCode::BAD_REQUEST)]
#[case(Error::invalid_argument("bad id"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_follows_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_the_trace_id() {
    let error = Error::internal("pool exhausted at 10.0.0.5")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "host": "10.0.0.5" }));

    let (status, header, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({ "code": "internal_error", "message": "Internal server error", "traceId": TRACE_ID })
    );
}

#[rstest]
#[actix_web::test]
async fn validation_errors_list_every_violation() {
    let error = Error::validation(vec![
        FieldViolation::new("email", "must be a valid email address"),
        FieldViolation::new("age", "is required"),
    ]);

    let (status, header, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(header, None);
    assert_eq!(body["code"], "validation_failed");
    assert_eq!(
        body["errors"],
        json!([
            { "field": "email", "message": "must be a valid email address" },
            { "field": "age", "message": "is required" }
        ])
    );
}
