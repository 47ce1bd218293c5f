//! Tests for shelf HTTP handlers.

use super::*;
use crate::inbound::http::test_utils::{api_app, session_cookie, sign_up_request};
use crate::test_support::InMemoryBackend;
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

fn dune(page_count: Option<u32>) -> Value {
    json!({ "title": "Dune", "authors": ["Frank Herbert"], "pageCount": page_count })
}

fn status_put(cookie: &Cookie<'static>, volume: &str, body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::put()
        .uri(&format!("/api/v1/shelf/{volume}/status"))
        .cookie(cookie.clone())
        .set_json(body)
}

#[rstest]
#[case(actix_test::TestRequest::get().uri("/api/v1/shelf?status=READ"))]
#[case(actix_test::TestRequest::get().uri("/api/v1/shelf/abc123"))]
#[case(actix_test::TestRequest::delete().uri("/api/v1/shelf/abc123"))]
#[case(actix_test::TestRequest::put().uri("/api/v1/shelf/abc123/status").set_json(json!({"status": "READ"})))]
#[actix_web::test]
async fn anonymous_calls_are_unauthorised(#[case] request: actix_test::TestRequest) {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(api_app(backend.http_state())).await;

    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("not_authenticated"));
}

#[actix_web::test]
async fn status_button_toggles_off() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(api_app(backend.http_state())).await;
    let signed_up = actix_test::call_service(&app, sign_up_request("ada@example.com").to_request()).await;
    let cookie = session_cookie(&signed_up);

    let first = actix_test::call_service(
        &app,
        status_put(&cookie, "abc123", json!({ "status": "TO_READ", "book": dune(Some(412)) }))
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(first).await;
    assert_eq!(body.get("status").and_then(Value::as_str), Some("TO_READ"));
    assert_eq!(
        body.pointer("/book/title").and_then(Value::as_str),
        Some("Dune")
    );

    let second = actix_test::call_service(
        &app,
        status_put(&cookie, "abc123", json!({ "status": "TO_READ" })).to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(second).await;
    assert_eq!(body.get("status"), Some(&Value::Null));
    assert_eq!(body.get("book"), Some(&Value::Null));

    let lookup = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/shelf/abc123")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn completing_without_page_count_is_unprocessable() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(api_app(backend.http_state())).await;
    let signed_up = actix_test::call_service(&app, sign_up_request("ada@example.com").to_request()).await;
    let cookie = session_cookie(&signed_up);

    let response = actix_test::call_service(
        &app,
        status_put(&cookie, "abc123", json!({ "status": "READ", "book": dune(None) })).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("missing_page_count"));
}

#[actix_web::test]
async fn patch_completion_fills_pages() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(api_app(backend.http_state())).await;
    let signed_up = actix_test::call_service(&app, sign_up_request("ada@example.com").to_request()).await;
    let cookie = session_cookie(&signed_up);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/shelf/abc123")
            .cookie(cookie.clone())
            .set_json(json!({ "status": "READ", "pageCount": 250, "book": dune(None) }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("pageInReading").and_then(Value::as_u64), Some(250));
    assert_eq!(body.get("pageCount").and_then(Value::as_u64), Some(250));
}

#[actix_web::test]
async fn progress_is_clamped_and_listed() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(api_app(backend.http_state())).await;
    let signed_up = actix_test::call_service(&app, sign_up_request("ada@example.com").to_request()).await;
    let cookie = session_cookie(&signed_up);

    let patched = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/shelf/abc123")
            .cookie(cookie.clone())
            .set_json(json!({ "status": "READING", "pageInReading": 900, "book": dune(Some(412)) }))
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(patched).await;
    assert_eq!(body.get("pageInReading").and_then(Value::as_u64), Some(412));

    let listed = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/shelf?status=reading")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(listed).await;
    let ids: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|book| book.get("id").and_then(Value::as_str))
        .collect();
    assert_eq!(ids, vec!["abc123"]);
}

#[rstest]
#[case("/api/v1/shelf", "missing_field")]
#[case("/api/v1/shelf?status=DONE", "invalid_status")]
#[actix_web::test]
async fn listing_requires_known_status(#[case] uri: &str, #[case] code: &str) {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(api_app(backend.http_state())).await;
    let signed_up = actix_test::call_service(&app, sign_up_request("ada@example.com").to_request()).await;
    let cookie = session_cookie(&signed_up);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.pointer("/details/code").and_then(Value::as_str), Some(code));
}

#[actix_web::test]
async fn removal_is_idempotent() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(api_app(backend.http_state())).await;
    let signed_up = actix_test::call_service(&app, sign_up_request("ada@example.com").to_request()).await;
    let cookie = session_cookie(&signed_up);
    actix_test::call_service(
        &app,
        status_put(&cookie, "abc123", json!({ "status": "READING", "book": dune(Some(412)) }))
            .to_request(),
    )
    .await;

    for _ in 0..2 {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/v1/shelf/abc123")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}

#[actix_web::test]
async fn reading_time_accumulates() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(api_app(backend.http_state())).await;
    let signed_up = actix_test::call_service(&app, sign_up_request("ada@example.com").to_request()).await;
    let cookie = session_cookie(&signed_up);
    actix_test::call_service(
        &app,
        status_put(&cookie, "abc123", json!({ "status": "READING", "book": dune(Some(412)) }))
            .to_request(),
    )
    .await;

    let mut total = None;
    for seconds in [600, 300] {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/shelf/abc123/reading-time")
                .cookie(cookie.clone())
                .set_json(json!({ "seconds": seconds }))
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(response).await;
        total = body.get("totalReadSeconds").and_then(Value::as_u64);
    }

    assert_eq!(total, Some(900));
}

#[rstest]
fn status_change_from_outcome() {
    assert_eq!(
        StatusChange::from(ShelfOutcome::Removed),
        StatusChange {
            status: None,
            book: None
        }
    );
}
