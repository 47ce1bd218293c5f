//! Tests for friends HTTP handlers.

use super::*;
use crate::inbound::http::test_utils::{api_app, session_cookie, sign_up_request};
use crate::test_support::{InMemoryBackend, uid};
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

struct Member {
    uid: String,
    cookie: Cookie<'static>,
}

async fn join<S>(app: &S, email: &str) -> Member
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, sign_up_request(email).to_request()).await;
    let cookie = session_cookie(&response);
    let body: Value = actix_test::read_body_json(response).await;
    Member {
        uid: body
            .get("uid")
            .and_then(Value::as_str)
            .expect("uid in profile")
            .to_owned(),
        cookie,
    }
}

fn as_member(member: &Member, request: actix_test::TestRequest) -> actix_http::Request {
    request.cookie(member.cookie.clone()).to_request()
}

#[actix_web::test]
async fn request_accept_and_remove_round_trip() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(api_app(backend.http_state())).await;
    let ada = join(&app, "ada@example.com").await;
    let bob = join(&app, "bob@example.com").await;

    let sent = actix_test::call_service(
        &app,
        as_member(
            &ada,
            actix_test::TestRequest::post()
                .uri("/api/v1/friends/requests")
                .set_json(json!({ "toUid": bob.uid, "message": "hi" })),
        ),
    )
    .await;
    assert_eq!(sent.status(), StatusCode::CREATED);
    let sent: Value = actix_test::read_body_json(sent).await;
    let request_id = sent.get("id").and_then(Value::as_str).expect("id").to_owned();

    let pending = actix_test::call_service(
        &app,
        as_member(
            &ada,
            actix_test::TestRequest::get().uri(&format!("/api/v1/users/{}/relationship", bob.uid)),
        ),
    )
    .await;
    let pending: Value = actix_test::read_body_json(pending).await;
    assert_eq!(pending.get("relationship").and_then(Value::as_str), Some("PENDING"));

    let inbox = actix_test::call_service(
        &app,
        as_member(
            &bob,
            actix_test::TestRequest::get().uri("/api/v1/friends/requests?direction=incoming"),
        ),
    )
    .await;
    let inbox: Value = actix_test::read_body_json(inbox).await;
    assert_eq!(inbox.as_array().map(Vec::len), Some(1));

    let accepted = actix_test::call_service(
        &app,
        as_member(
            &bob,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/friends/requests/{request_id}/accept")),
        ),
    )
    .await;
    assert_eq!(accepted.status(), StatusCode::OK);

    let friends = actix_test::call_service(
        &app,
        as_member(&ada, actix_test::TestRequest::get().uri("/api/v1/friends")),
    )
    .await;
    let friends: Value = actix_test::read_body_json(friends).await;
    assert_eq!(
        friends.pointer("/0/uid").and_then(Value::as_str),
        Some(bob.uid.as_str())
    );

    let removed = actix_test::call_service(
        &app,
        as_member(
            &ada,
            actix_test::TestRequest::delete().uri(&format!("/api/v1/friends/{}", bob.uid)),
        ),
    )
    .await;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);

    let status_response = actix_test::call_service(
        &app,
        as_member(
            &bob,
            actix_test::TestRequest::get().uri(&format!("/api/v1/users/{}/relationship", ada.uid)),
        ),
    )
    .await;
    let status_body: Value = actix_test::read_body_json(status_response).await;
    assert_eq!(
        status_body.get("relationship").and_then(Value::as_str),
        Some("NOT_FRIEND")
    );
}

#[actix_web::test]
async fn partial_removal_names_failed_side() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(api_app(backend.http_state())).await;
    let ada = join(&app, "ada@example.com").await;
    let bob = join(&app, "bob@example.com").await;
    let sent = actix_test::call_service(
        &app,
        as_member(
            &ada,
            actix_test::TestRequest::post()
                .uri("/api/v1/friends/requests")
                .set_json(json!({ "toUid": bob.uid })),
        ),
    )
    .await;
    let sent: Value = actix_test::read_body_json(sent).await;
    let request_id = sent.get("id").and_then(Value::as_str).expect("id").to_owned();
    actix_test::call_service(
        &app,
        as_member(
            &bob,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/friends/requests/{request_id}/accept")),
        ),
    )
    .await;
    backend.profiles.fail_friend_writes_for(&uid(&bob.uid));

    let response = actix_test::call_service(
        &app,
        as_member(
            &ada,
            actix_test::TestRequest::delete().uri(&format!("/api/v1/friends/{}", bob.uid)),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("partial_reciprocal_failure")
    );
    assert_eq!(
        body.pointer("/details/failedUid").and_then(Value::as_str),
        Some(bob.uid.as_str())
    );
}

#[actix_web::test]
async fn duplicate_pending_request_conflicts() {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(api_app(backend.http_state())).await;
    let ada = join(&app, "ada@example.com").await;
    let bob = join(&app, "bob@example.com").await;

    let mut statuses = Vec::new();
    for _ in 0..2 {
        let response = actix_test::call_service(
            &app,
            as_member(
                &ada,
                actix_test::TestRequest::post()
                    .uri("/api/v1/friends/requests")
                    .set_json(json!({ "toUid": bob.uid })),
            ),
        )
        .await;
        statuses.push(response.status());
    }

    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[rstest]
#[case("/api/v1/friends/requests/not-a-uuid/accept", "invalid_request_id")]
#[case("/api/v1/friends/requests?direction=sideways", "invalid_value")]
#[actix_web::test]
async fn malformed_input_is_rejected(#[case] uri: &str, #[case] code: &str) {
    let backend = InMemoryBackend::new();
    let app = actix_test::init_service(api_app(backend.http_state())).await;
    let ada = join(&app, "ada@example.com").await;
    let request = if uri.ends_with("/accept") {
        actix_test::TestRequest::post().uri(uri)
    } else {
        actix_test::TestRequest::get().uri(uri)
    };

    let response = actix_test::call_service(&app, as_member(&ada, request)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.pointer("/details/code").and_then(Value::as_str), Some(code));
}

#[rstest]
#[case(None, Direction::Incoming)]
#[case(Some("Outgoing"), Direction::Outgoing)]
fn direction_defaults_to_incoming(#[case] raw: Option<&str>, #[case] expected: Direction) {
    assert_eq!(parse_direction(raw).expect("direction"), expected);
}
