//! Port for profile documents and the friend-uid sets they carry.

use async_trait::async_trait;

use crate::domain::{Profile, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile store adapters.
    pub enum ProfileRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "profile store connection failed: {message}",
        /// A read or write failed during execution.
        Query { message: String } =>
            "profile store query failed: {message}",
        /// The profile to update does not exist.
        Missing { uid: String } =>
            "no profile exists for {uid}",
        /// Another profile already holds the username.
        UsernameTaken { username: String } =>
            "username {username} is already taken",
    }
}

/// Port for profile storage.
///
/// Friend-uid writes have set semantics: adding a present uid or removing an
/// absent one succeeds without change, so a failed reciprocal write can be
/// retried safely.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch one profile.
    async fn find_profile(&self, uid: &UserId) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Fetch the profiles that exist among `uids`, in uid order.
    async fn find_profiles(&self, uids: &[UserId]) -> Result<Vec<Profile>, ProfileRepositoryError>;

    /// Insert or replace a profile.
    async fn save_profile(&self, profile: &Profile) -> Result<(), ProfileRepositoryError>;

    /// The friend set of `uid`; empty when no profile exists.
    async fn friend_uids(&self, uid: &UserId) -> Result<Vec<UserId>, ProfileRepositoryError>;

    /// Add `other` to the friend set of `uid`.
    async fn add_friend_uid(&self, uid: &UserId, other: &UserId) -> Result<(), ProfileRepositoryError>;

    /// Remove `other` from the friend set of `uid`.
    async fn remove_friend_uid(
        &self,
        uid: &UserId,
        other: &UserId,
    ) -> Result<(), ProfileRepositoryError>;

    /// Claim `username` for `uid` and record it on the profile in one step.
    ///
    /// Re-claiming the name a profile already holds succeeds. Claiming a new
    /// name releases the previous one.
    async fn claim_username(
        &self,
        uid: &UserId,
        username: &Username,
    ) -> Result<(), ProfileRepositoryError>;

    /// Profiles whose username starts with `prefix`, ordered by username.
    async fn find_by_username_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<Profile>, ProfileRepositoryError>;
}
