//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/signup {"email":"ada@example.com","password":"hunter22"}
//! POST /api/v1/login  {"email":"ada@example.com","password":"hunter22"}
//! POST /api/v1/logout
//! ```
//!
//! Sign-up and login both answer with the caller's profile and set the
//! session cookie.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Caller, Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ProfileSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Credentials for sign-up and login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    /// Account email.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Plain-text password, copied into zeroizing credentials.
    pub password: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyEmail => ("email", "empty_email"),
        LoginValidationError::MalformedEmail => ("email", "malformed_email"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
        LoginValidationError::ShortPassword { .. } => ("password", "short_password"),
    };
    Error::invalid_input(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Create an account, its profile and a session.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = ProfileSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid credentials shape", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signUp",
    security([])
)]
#[post("/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let CredentialsRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::for_sign_up(&email, &password).map_err(map_login_validation_error)?;
    let uid = state.login.register(&credentials).await?;
    let profile = state
        .profile
        .ensure_profile(&Caller::User(uid.clone()), credentials.email())
        .await?;
    session.persist_user(&uid)?;
    info!(%uid, "signed up");
    Ok(HttpResponse::Created().json(profile))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = ProfileSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid credentials shape", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let CredentialsRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_login_validation_error)?;
    let uid = state.login.authenticate(&credentials).await?;
    // Accounts created before their profile write finished get one now.
    let profile = state
        .profile
        .ensure_profile(&Caller::User(uid.clone()), credentials.email())
        .await?;
    session.persist_user(&uid)?;
    Ok(HttpResponse::Ok().json(profile))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{api_app, session_cookie};
    use crate::test_support::InMemoryBackend;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    fn credentials(email: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[actix_web::test]
    async fn sign_up_creates_profile_and_session() {
        let backend = InMemoryBackend::new();
        let app = actix_test::init_service(api_app(backend.http_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(credentials(" Ada@Example.com ", "hunter22"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let _cookie = session_cookie(&response);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("email").and_then(Value::as_str), Some("ada@example.com"));
        assert_eq!(body.get("friends"), Some(&serde_json::json!([])));
    }

    #[actix_web::test]
    async fn duplicate_sign_up_conflicts() {
        let backend = InMemoryBackend::new();
        let app = actix_test::init_service(api_app(backend.http_state())).await;
        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/signup")
                    .set_json(credentials("ada@example.com", "hunter22"))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), expected);
        }
    }

    #[rstest]
    #[case("", "hunter22", "email", "empty_email")]
    #[case("ada", "hunter22", "email", "malformed_email")]
    #[case("ada@example.com", "abc", "password", "short_password")]
    #[actix_web::test]
    async fn sign_up_reports_field_errors(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let backend = InMemoryBackend::new();
        let app = actix_test::init_service(api_app(backend.http_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(credentials(email, password))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        let details = body.get("details").expect("details");
        assert_eq!(details.get("field").and_then(Value::as_str), Some(field));
        assert_eq!(details.get("code").and_then(Value::as_str), Some(code));
    }

    #[actix_web::test]
    async fn login_after_sign_up_and_wrong_password() {
        let backend = InMemoryBackend::new();
        let app = actix_test::init_service(api_app(backend.http_state())).await;
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(credentials("ada@example.com", "hunter22"))
                .to_request(),
        )
        .await;

        let ok = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(credentials("ada@example.com", "hunter22"))
                .to_request(),
        )
        .await;
        assert_eq!(ok.status(), StatusCode::OK);

        let denied = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(credentials("ada@example.com", "wrong-one"))
                .to_request(),
        )
        .await;
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn logout_is_no_content() {
        let backend = InMemoryBackend::new();
        let app = actix_test::init_service(api_app(backend.http_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post().uri("/api/v1/logout").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
