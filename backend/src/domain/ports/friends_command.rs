//! Driving ports for the friends graph.
//!
//! [`FriendsCommand`] covers the request lifecycle and unfriending;
//! [`FriendsQuery`] reads relationships and request inboxes. Both act on behalf
//! of the [`Caller`].

use async_trait::async_trait;

use crate::domain::{Caller, Error, Friend, FriendRequest, FriendRequestId, RelationshipStatus, UserId};

/// Request to befriend another user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendFriendRequest {
    /// Recipient uid as supplied by the client; validated by the service.
    pub to_uid: String,
    /// Optional note for the recipient.
    pub message: Option<String>,
}

/// Friend request lifecycle and unfriending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendsCommand: Send + Sync {
    /// Create a pending request from the caller.
    async fn send_friend_request(
        &self,
        caller: &Caller,
        request: SendFriendRequest,
    ) -> Result<FriendRequest, Error>;

    /// Accept a pending request addressed to the caller, befriending both
    /// users.
    async fn accept_friend_request(
        &self,
        caller: &Caller,
        id: &FriendRequestId,
    ) -> Result<FriendRequest, Error>;

    /// Reject a pending request addressed to the caller.
    async fn reject_friend_request(
        &self,
        caller: &Caller,
        id: &FriendRequestId,
    ) -> Result<FriendRequest, Error>;

    /// End the friendship between the caller and `other` on both sides.
    async fn remove_friend(&self, caller: &Caller, other: &UserId) -> Result<(), Error>;
}

/// Relationship and inbox reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendsQuery: Send + Sync {
    /// How the caller relates to `candidate`.
    async fn relationship_with(
        &self,
        caller: &Caller,
        candidate: &UserId,
    ) -> Result<RelationshipStatus, Error>;

    /// The caller's friends, ordered by uid.
    async fn list_friends(&self, caller: &Caller) -> Result<Vec<Friend>, Error>;

    /// Pending requests addressed to the caller, newest first.
    async fn incoming_requests(&self, caller: &Caller) -> Result<Vec<FriendRequest>, Error>;

    /// Pending requests the caller has sent, newest first.
    async fn outgoing_requests(&self, caller: &Caller) -> Result<Vec<FriendRequest>, Error>;
}
