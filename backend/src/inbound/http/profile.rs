//! Profile HTTP handlers.
//!
//! ```text
//! GET   /api/v1/users/me
//! PATCH /api/v1/users/me           {"name":"Ada","surname":"Lovelace"}
//! PUT   /api/v1/users/me/username  {"username":"bookworm"}
//! GET   /api/v1/users/search?username=book
//! ```

use actix_web::{HttpResponse, get, patch, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Profile;
use crate::domain::ports::{UpdateProfileRequest, UserSearchHit};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ProfileSchema, UserSearchHitSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Body for `PATCH /users/me`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateBody {
    #[schema(example = "Ada")]
    pub name: Option<String>,
    #[schema(example = "Lovelace")]
    pub surname: Option<String>,
}

/// Body for `PUT /users/me/username`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsernameBody {
    /// 3 to 30 characters of `a-z`, `0-9`, `.` or `_`; stored lowercase.
    #[schema(example = "bookworm")]
    pub username: Option<String>,
}

/// Query for `GET /users/search`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserSearchParams {
    /// Username prefix.
    pub username: Option<String>,
}

/// The caller's own profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile", body = ProfileSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No profile yet", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentProfile"
)]
#[get("/users/me")]
pub async fn current_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let profile = state.profile_query.current_profile(&caller).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-cache"))
        .json(profile))
}

/// Change the caller's display names.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = ProfileUpdateBody,
    responses(
        (status = 200, description = "Updated profile", body = ProfileSchema),
        (status = 400, description = "Blank or overlong name", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[patch("/users/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileUpdateBody>,
) -> ApiResult<web::Json<Profile>> {
    let caller = session.caller()?;
    let ProfileUpdateBody { name, surname } = payload.into_inner();
    let request = UpdateProfileRequest {
        name: name.ok_or_else(|| missing_field_error(FieldName::new("name")))?,
        surname: surname.ok_or_else(|| missing_field_error(FieldName::new("surname")))?,
    };
    Ok(web::Json(state.profile.update_profile(&caller, request).await?))
}

/// Claim a unique username.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/username",
    request_body = UsernameBody,
    responses(
        (status = 200, description = "Updated profile", body = ProfileSchema),
        (status = 400, description = "Malformed username", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUsername"
)]
#[put("/users/me/username")]
pub async fn register_username(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UsernameBody>,
) -> ApiResult<web::Json<Profile>> {
    let caller = session.caller()?;
    let username = payload
        .into_inner()
        .username
        .ok_or_else(|| missing_field_error(FieldName::new("username")))?;
    Ok(web::Json(
        state.profile.register_username(&caller, &username).await?,
    ))
}

/// Find users by username prefix, excluding the caller.
#[utoipa::path(
    get,
    path = "/api/v1/users/search",
    params(UserSearchParams),
    responses(
        (status = 200, description = "Matches with relationship", body = [UserSearchHitSchema]),
        (status = 400, description = "Blank search", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "searchUsers"
)]
#[get("/users/search")]
pub async fn search_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<UserSearchParams>,
) -> ApiResult<web::Json<Vec<UserSearchHit>>> {
    let caller = session.caller()?;
    let prefix = query
        .into_inner()
        .username
        .ok_or_else(|| missing_field_error(FieldName::new("username")))?;
    Ok(web::Json(
        state.profile_query.search_by_username(&caller, &prefix).await?,
    ))
}
