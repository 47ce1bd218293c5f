//! Domain primitives, rules and services.
//!
//! Purpose: model shelves, friendships and profiles independently of any
//! transport or store. Pure decision functions ([`plan_exclusive_status`],
//! [`plan_upsert`], [`relationship_status`]) hold the rules; services apply
//! them through the driven ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - UserId, Username, Profile, Friend, Caller: identity.
//! - VolumeId, ReadingStatus, BookPayload, UserBook: shelf records.
//! - FriendRequest, RelationshipStatus: friends graph.
//! - Subscription: cancellable live observation.
//! - ShelfService, FriendsService, ProfileService, CatalogService.

mod auth;
mod catalog_service;
mod error;
mod friends;
mod friends_service;
pub mod ports;
mod profile_service;
mod shelf;
mod shelf_service;
mod subscription;
mod trace_id;
mod user;

pub use self::auth::{LoginCredentials, LoginValidationError, PASSWORD_MIN};
pub use self::catalog_service::CatalogService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::friends::{
    DuplicateRequestPolicy, FriendRequest, FriendRequestId, FriendRequestStatus,
    ParseDuplicateRequestPolicyError, REQUEST_MESSAGE_MAX, RelationshipStatus, RequestFilter,
    relationship_status,
};
pub use self::friends_service::FriendsService;
pub use self::profile_service::{ProfileService, SEARCH_LIMIT};
pub use self::shelf::{
    BookPayload, PageCountPolicy, ParsePageCountPolicyError, ParseReadingStatusError,
    ReadingStatus, ShelfChanges, ShelfDecision, UserBook, VOLUME_ID_MAX, VolumeId,
    VolumeIdValidationError, add_reading_time, clamp_pages, plan_exclusive_status, plan_upsert,
};
pub use self::shelf_service::ShelfService;
pub use self::subscription::{ReleaseGuard, Subscription};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Caller, Friend, Profile, USER_ID_MAX, USER_ID_MIN, USERNAME_MAX, USERNAME_MIN, UserId,
    UserValidationError, Username,
};

/// Convenient result alias for use-case and handler code.
///
/// # Examples
/// ```
/// use readtrack::domain::{ApiResult, Error};
///
/// fn guard(allowed: bool) -> ApiResult<()> {
///     if allowed { Ok(()) } else { Err(Error::forbidden("nope")) }
/// }
/// assert!(guard(false).is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
