//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(error: &Error) -> Value {
    let response = ResponseError::error_response(error);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON")
}

#[rstest]
#[case(Error::not_authenticated("login"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("not yours"), StatusCode::FORBIDDEN)]
#[case(Error::record_not_found("gone"), StatusCode::NOT_FOUND)]
#[case(Error::invalid_input("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::missing_page_count("how long?"), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(Error::conflict("again"), StatusCode::CONFLICT)]
#[case(Error::partial_reciprocal_failure("u2", "half"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::backend_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("database password is hunter2")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "secret": "x" }));

    let response = ResponseError::error_response(&error);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(header.as_deref(), Some(TRACE_ID));

    let body = body_of(&error).await;
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(body["traceId"], TRACE_ID);
    assert!(body.get("details").is_none());
}

#[actix_web::test]
async fn partial_failure_keeps_failed_uid() {
    let error = Error::partial_reciprocal_failure("u2", "friend removal incomplete");

    let body = body_of(&error).await;
    assert_eq!(body["code"], "partial_reciprocal_failure");
    assert_eq!(body["message"], "friend removal incomplete");
    assert_eq!(body["details"]["failedUid"], "u2");
}

#[actix_web::test]
async fn client_errors_pass_through() {
    let error = Error::invalid_input("uid must not be empty");

    let body = body_of(&error).await;
    assert_eq!(body["code"], "invalid_input");
    assert_eq!(body["message"], "uid must not be empty");
}
