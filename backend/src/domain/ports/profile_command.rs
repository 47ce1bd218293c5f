//! Driving ports for profile editing and user search.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Caller, Error, Friend, Profile, RelationshipStatus};

/// Maximum characters for a name or surname.
pub const PROFILE_NAME_MAX: usize = 64;

/// Request to change the caller's display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
}

/// One username search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchHit {
    /// Matching user.
    #[serde(flatten)]
    pub user: Friend,
    /// How the caller relates to them.
    pub relationship: RelationshipStatus,
}

/// Profile mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Create the caller's profile when it does not exist yet.
    async fn ensure_profile(&self, caller: &Caller, email: &str) -> Result<Profile, Error>;

    /// Replace the caller's name and surname.
    async fn update_profile(
        &self,
        caller: &Caller,
        request: UpdateProfileRequest,
    ) -> Result<Profile, Error>;

    /// Claim a username for the caller.
    async fn register_username(&self, caller: &Caller, username: &str) -> Result<Profile, Error>;
}

/// Profile reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// The caller's own profile.
    async fn current_profile(&self, caller: &Caller) -> Result<Profile, Error>;

    /// Other users whose username starts with `prefix`.
    async fn search_by_username(
        &self,
        caller: &Caller,
        prefix: &str,
    ) -> Result<Vec<UserSearchHit>, Error>;
}
