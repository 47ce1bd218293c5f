//! Friend requests and the relationship rules between two users.
//!
//! A [`FriendRequest`] moves from pending to accepted or rejected exactly once.
//! Friendship itself is a symmetric relation stored as a friend-uid set on
//! each profile; [`crate::domain::FriendsService`] keeps both sides in step.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Error, UserId};

/// Maximum characters in an optional request message.
pub const REQUEST_MESSAGE_MAX: usize = 280;

/// Identifier of a friend request document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FriendRequestId(Uuid);

impl FriendRequestId {
    /// Fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FriendRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for FriendRequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Lifecycle state of a friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendRequestStatus {
    /// Awaiting the recipient.
    Pending,
    /// Accepted; both users are friends.
    Accepted,
    /// Declined. Terminal.
    Rejected,
}

/// A request from one user to befriend another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    /// Request identifier.
    pub id: FriendRequestId,
    /// Sender.
    pub from_uid: UserId,
    /// Recipient.
    pub to_uid: UserId,
    /// Lifecycle state.
    pub status: FriendRequestStatus,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Optional note from the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FriendRequest {
    /// Build a pending request after checking the pair and message.
    ///
    /// # Errors
    /// `invalid_input` when `from` and `to` are the same user or the message
    /// exceeds [`REQUEST_MESSAGE_MAX`] characters.
    pub fn pending(
        from: UserId,
        to: UserId,
        message: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, Error> {
        if from == to {
            return Err(Error::invalid_input("you cannot send a friend request to yourself"));
        }
        let message = message.map(str::trim).filter(|text| !text.is_empty());
        if message.is_some_and(|text| text.chars().count() > REQUEST_MESSAGE_MAX) {
            return Err(Error::invalid_input(format!(
                "request message must be at most {REQUEST_MESSAGE_MAX} characters"
            )));
        }
        Ok(Self {
            id: FriendRequestId::random(),
            from_uid: from,
            to_uid: to,
            status: FriendRequestStatus::Pending,
            created_at,
            message: message.map(str::to_owned),
        })
    }

    /// Resolve the request on behalf of `actor`.
    ///
    /// # Errors
    /// - `forbidden` when `actor` is not the recipient.
    /// - `conflict` when the request is no longer pending.
    /// - `invalid_input` when `outcome` is [`FriendRequestStatus::Pending`].
    pub fn resolve(&self, actor: &UserId, outcome: FriendRequestStatus) -> Result<Self, Error> {
        if outcome == FriendRequestStatus::Pending {
            return Err(Error::invalid_input("a request can only be accepted or rejected"));
        }
        if &self.to_uid != actor {
            return Err(Error::forbidden("only the recipient can answer a friend request"));
        }
        if self.status != FriendRequestStatus::Pending {
            return Err(Error::conflict(format!(
                "friend request {} has already been answered",
                self.id
            )));
        }
        Ok(Self {
            status: outcome,
            ..self.clone()
        })
    }
}

/// How the caller relates to another user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipStatus {
    /// Already friends.
    IsFriend,
    /// The caller has a pending request out to them.
    Pending,
    /// Neither.
    NotFriend,
}

/// Classify `candidate` against the caller's friends and pending sent requests.
///
/// Friendship takes precedence over a pending request.
///
/// # Examples
/// ```
/// use readtrack::domain::{RelationshipStatus, UserId, relationship_status};
///
/// let u2 = UserId::new("u2").unwrap();
/// let friends = [u2.clone()];
/// let sent = [u2.clone()];
/// assert_eq!(relationship_status(&u2, &friends, &sent), RelationshipStatus::IsFriend);
/// assert_eq!(relationship_status(&u2, &[], &sent), RelationshipStatus::Pending);
/// assert_eq!(relationship_status(&u2, &[], &[]), RelationshipStatus::NotFriend);
/// ```
pub fn relationship_status<'a>(
    candidate: &UserId,
    friends: impl IntoIterator<Item = &'a UserId>,
    sent_request_uids: impl IntoIterator<Item = &'a UserId>,
) -> RelationshipStatus {
    if friends.into_iter().any(|uid| uid == candidate) {
        RelationshipStatus::IsFriend
    } else if sent_request_uids.into_iter().any(|uid| uid == candidate) {
        RelationshipStatus::Pending
    } else {
        RelationshipStatus::NotFriend
    }
}

/// Whether a second pending request between the same pair is allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateRequestPolicy {
    /// A pending request from the same sender to the same recipient is a
    /// conflict.
    #[default]
    Reject,
    /// Multiple pending requests may coexist.
    Allow,
}

/// Error returned when parsing an unknown [`DuplicateRequestPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown duplicate request policy: {0} (expected reject or allow)")]
pub struct ParseDuplicateRequestPolicyError(String);

impl FromStr for DuplicateRequestPolicy {
    type Err = ParseDuplicateRequestPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "allow" => Ok(Self::Allow),
            _ => Err(ParseDuplicateRequestPolicyError(s.to_owned())),
        }
    }
}

/// Criteria for querying friend requests. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    /// Sender.
    pub from_uid: Option<UserId>,
    /// Recipient.
    pub to_uid: Option<UserId>,
    /// Lifecycle state.
    pub status: Option<FriendRequestStatus>,
}

impl RequestFilter {
    /// Pending requests addressed to `uid`.
    pub fn incoming(uid: UserId) -> Self {
        Self {
            to_uid: Some(uid),
            status: Some(FriendRequestStatus::Pending),
            ..Self::default()
        }
    }

    /// Pending requests sent by `uid`.
    pub fn outgoing(uid: UserId) -> Self {
        Self {
            from_uid: Some(uid),
            status: Some(FriendRequestStatus::Pending),
            ..Self::default()
        }
    }

    /// Pending requests from `from` to `to`.
    pub fn pending_between(from: UserId, to: UserId) -> Self {
        Self {
            from_uid: Some(from),
            to_uid: Some(to),
            status: Some(FriendRequestStatus::Pending),
        }
    }

    /// Whether `request` satisfies every set criterion.
    pub fn matches(&self, request: &FriendRequest) -> bool {
        self.from_uid.as_ref().is_none_or(|uid| uid == &request.from_uid)
            && self.to_uid.as_ref().is_none_or(|uid| uid == &request.to_uid)
            && self.status.is_none_or(|status| status == request.status)
    }
}
