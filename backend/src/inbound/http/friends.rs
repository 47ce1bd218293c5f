//! Friends HTTP handlers.
//!
//! ```text
//! GET    /api/v1/friends
//! DELETE /api/v1/friends/{uid}
//! GET    /api/v1/friends/requests?direction=incoming|outgoing
//! POST   /api/v1/friends/requests {"toUid":"u2","message":"hi"}
//! POST   /api/v1/friends/requests/{id}/accept
//! POST   /api/v1/friends/requests/{id}/reject
//! GET    /api/v1/users/{uid}/relationship
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::SendFriendRequest;
use crate::domain::{Friend, FriendRequest, RelationshipStatus, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    ErrorSchema, FriendRequestSchema, FriendSchema, RelationshipStatusSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, missing_field_error, parse_request_id, parse_user_id,
};

const UID: FieldName = FieldName::new("uid");
const REQUEST_ID: FieldName = FieldName::new("requestId");

/// Body for `POST /friends/requests`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    /// Recipient uid.
    pub to_uid: Option<String>,
    /// Optional note, at most 280 characters.
    pub message: Option<String>,
}

/// Which inbox `GET /friends/requests` reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Direction {
    #[default]
    Incoming,
    Outgoing,
}

/// Query for `GET /friends/requests`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequestListParams {
    /// `incoming` (default) or `outgoing`.
    pub direction: Option<String>,
}

fn parse_direction(raw: Option<&str>) -> ApiResult<Direction> {
    match raw.map(str::trim) {
        None => Ok(Direction::default()),
        Some(value) if value.eq_ignore_ascii_case("incoming") => Ok(Direction::Incoming),
        Some(value) if value.eq_ignore_ascii_case("outgoing") => Ok(Direction::Outgoing),
        Some(value) => Err(invalid_value_error(
            FieldName::new("direction"),
            value,
            "must be incoming or outgoing",
        )),
    }
}

/// Response for `GET /users/{uid}/relationship`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipResponse {
    /// The other user.
    #[schema(value_type = String)]
    pub uid: UserId,
    /// How the caller relates to them.
    #[schema(value_type = RelationshipStatusSchema)]
    pub relationship: RelationshipStatus,
}

/// List the caller's friends.
#[utoipa::path(
    get,
    path = "/api/v1/friends",
    responses(
        (status = 200, description = "Friends ordered by uid", body = [FriendSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "listFriends"
)]
#[get("/friends")]
pub async fn list_friends(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Friend>>> {
    let caller = session.caller()?;
    Ok(web::Json(state.friends_query.list_friends(&caller).await?))
}

/// End a friendship on both sides.
///
/// When only one side could be updated the response is a 500 whose
/// `details.failedUid` names the side to retry.
#[utoipa::path(
    delete,
    path = "/api/v1/friends/{uid}",
    params(("uid" = String, Path, description = "Friend to remove")),
    responses(
        (status = 204, description = "Removed on both sides"),
        (status = 400, description = "Invalid uid", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Partial reciprocal failure", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "removeFriend"
)]
#[delete("/friends/{uid}")]
pub async fn remove_friend(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let other = parse_user_id(&path.into_inner(), UID)?;
    state.friends.remove_friend(&caller, &other).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Pending requests addressed to, or sent by, the caller.
#[utoipa::path(
    get,
    path = "/api/v1/friends/requests",
    params(RequestListParams),
    responses(
        (status = 200, description = "Pending requests, newest first", body = [FriendRequestSchema]),
        (status = 400, description = "Invalid direction", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "listFriendRequests"
)]
#[get("/friends/requests")]
pub async fn list_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RequestListParams>,
) -> ApiResult<web::Json<Vec<FriendRequest>>> {
    let caller = session.caller()?;
    let requests = match parse_direction(query.direction.as_deref())? {
        Direction::Incoming => state.friends_query.incoming_requests(&caller).await?,
        Direction::Outgoing => state.friends_query.outgoing_requests(&caller).await?,
    };
    Ok(web::Json(requests))
}

/// Ask another user to be friends.
#[utoipa::path(
    post,
    path = "/api/v1/friends/requests",
    request_body = FriendRequestBody,
    responses(
        (status = 201, description = "Request created", body = FriendRequestSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown recipient", body = ErrorSchema),
        (status = 409, description = "Already friends or already pending", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "sendFriendRequest"
)]
#[post("/friends/requests")]
pub async fn send_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FriendRequestBody>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let FriendRequestBody { to_uid, message } = payload.into_inner();
    let to_uid = to_uid.ok_or_else(|| missing_field_error(FieldName::new("toUid")))?;
    let request = state
        .friends
        .send_friend_request(&caller, SendFriendRequest { to_uid, message })
        .await?;
    Ok(HttpResponse::Created().json(request))
}

/// Accept a pending request addressed to the caller.
#[utoipa::path(
    post,
    path = "/api/v1/friends/requests/{id}/accept",
    params(("id" = String, Path, description = "Friend request id")),
    responses(
        (status = 200, description = "Accepted request", body = FriendRequestSchema),
        (status = 403, description = "Not the recipient", body = ErrorSchema),
        (status = 404, description = "Unknown request", body = ErrorSchema),
        (status = 409, description = "Already resolved", body = ErrorSchema),
        (status = 500, description = "Partial reciprocal failure", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "acceptFriendRequest"
)]
#[post("/friends/requests/{id}/accept")]
pub async fn accept_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<FriendRequest>> {
    let caller = session.caller()?;
    let id = parse_request_id(&path.into_inner(), REQUEST_ID)?;
    Ok(web::Json(state.friends.accept_friend_request(&caller, &id).await?))
}

/// Reject a pending request addressed to the caller.
#[utoipa::path(
    post,
    path = "/api/v1/friends/requests/{id}/reject",
    params(("id" = String, Path, description = "Friend request id")),
    responses(
        (status = 200, description = "Rejected request", body = FriendRequestSchema),
        (status = 403, description = "Not the recipient", body = ErrorSchema),
        (status = 404, description = "Unknown request", body = ErrorSchema),
        (status = 409, description = "Already resolved", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "rejectFriendRequest"
)]
#[post("/friends/requests/{id}/reject")]
pub async fn reject_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<FriendRequest>> {
    let caller = session.caller()?;
    let id = parse_request_id(&path.into_inner(), REQUEST_ID)?;
    Ok(web::Json(state.friends.reject_friend_request(&caller, &id).await?))
}

/// How the caller relates to another user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{uid}/relationship",
    params(("uid" = String, Path, description = "Other user")),
    responses(
        (status = 200, description = "Relationship", body = RelationshipResponse),
        (status = 400, description = "Invalid uid", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["friends"],
    operation_id = "getRelationship"
)]
#[get("/users/{uid}/relationship")]
pub async fn relationship(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RelationshipResponse>> {
    let caller = session.caller()?;
    let uid = parse_user_id(&path.into_inner(), UID)?;
    let status = state.friends_query.relationship_with(&caller, &uid).await?;
    Ok(web::Json(RelationshipResponse {
        uid,
        relationship: status,
    }))
}

#[cfg(test)]
#[path = "friends_tests.rs"]
mod tests;
