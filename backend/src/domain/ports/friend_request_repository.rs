//! Port for friend request documents.

use async_trait::async_trait;

use crate::domain::{
    DuplicateRequestPolicy, FriendRequest, FriendRequestId, FriendRequestStatus, RequestFilter,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by friend request store adapters.
    pub enum FriendRequestRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "friend request store connection failed: {message}",
        /// A read or write failed during execution.
        Query { message: String } =>
            "friend request store query failed: {message}",
        /// The request to update does not exist.
        Missing { id: String } =>
            "friend request {id} does not exist",
        /// A pending request between the same pair already exists.
        DuplicatePending { from_uid: String, to_uid: String } =>
            "a pending request from {from_uid} to {to_uid} already exists",
    }
}

/// Port for friend request storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendRequestRepository: Send + Sync {
    /// Store a new request.
    ///
    /// Under [`DuplicateRequestPolicy::Reject`] the adapter checks for an
    /// existing pending request between the same ordered pair and inserts in
    /// one step, failing with
    /// [`FriendRequestRepositoryError::DuplicatePending`].
    async fn create(
        &self,
        request: &FriendRequest,
        policy: DuplicateRequestPolicy,
    ) -> Result<(), FriendRequestRepositoryError>;

    /// Fetch one request.
    async fn find(
        &self,
        id: &FriendRequestId,
    ) -> Result<Option<FriendRequest>, FriendRequestRepositoryError>;

    /// Overwrite the status of an existing request.
    async fn update_status(
        &self,
        id: &FriendRequestId,
        status: FriendRequestStatus,
    ) -> Result<(), FriendRequestRepositoryError>;

    /// Requests matching `filter`, newest first.
    async fn query(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<FriendRequest>, FriendRequestRepositoryError>;
}
