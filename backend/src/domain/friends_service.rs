//! Friends domain service.
//!
//! Implements [`FriendsCommand`] and [`FriendsQuery`]. Accepting a request and
//! removing a friend each touch two profiles; the writes run one after the
//! other. A failure of the first write is reported as the store error itself;
//! only a failure of the second is `partial_reciprocal_failure`, naming the
//! profile that was not updated.
//! Friend-set writes are idempotent, so repeating the operation converges.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    FriendRequestRepository, FriendRequestRepositoryError, FriendsCommand, FriendsQuery,
    ProfileRepository, ProfileRepositoryError, SendFriendRequest,
};
use crate::domain::{
    Caller, DuplicateRequestPolicy, Error, Friend, FriendRequest, FriendRequestId,
    FriendRequestStatus, RelationshipStatus, RequestFilter, UserId, relationship_status,
};

pub(crate) fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            Error::backend_unavailable(format!("profile store unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile store error: {message}"))
        }
        ProfileRepositoryError::Missing { uid } => {
            Error::record_not_found(format!("no profile exists for {uid}"))
        }
        ProfileRepositoryError::UsernameTaken { username } => {
            Error::conflict(format!("username {username} is already taken"))
        }
    }
}

pub(crate) fn map_request_error(error: FriendRequestRepositoryError) -> Error {
    match error {
        FriendRequestRepositoryError::Connection { message } => {
            Error::backend_unavailable(format!("friend request store unavailable: {message}"))
        }
        FriendRequestRepositoryError::Query { message } => {
            Error::internal(format!("friend request store error: {message}"))
        }
        FriendRequestRepositoryError::Missing { id } => {
            Error::record_not_found(format!("friend request {id} does not exist"))
        }
        FriendRequestRepositoryError::DuplicatePending { to_uid, .. } => {
            Error::conflict(format!("a friend request to {to_uid} is already pending"))
        }
    }
}

/// Friends service implementing the friends driving ports.
#[derive(Clone)]
pub struct FriendsService<P, Q> {
    profile_repo: Arc<P>,
    request_repo: Arc<Q>,
    clock: Arc<dyn Clock>,
    duplicate_policy: DuplicateRequestPolicy,
}

impl<P, Q> FriendsService<P, Q> {
    /// Create a service with the default [`DuplicateRequestPolicy`].
    pub fn new(profile_repo: Arc<P>, request_repo: Arc<Q>, clock: Arc<dyn Clock>) -> Self {
        Self {
            profile_repo,
            request_repo,
            clock,
            duplicate_policy: DuplicateRequestPolicy::default(),
        }
    }

    /// Replace the policy for repeated pending requests.
    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicateRequestPolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

impl<P, Q> FriendsService<P, Q>
where
    P: ProfileRepository,
    Q: FriendRequestRepository,
{
    async fn load_request(&self, id: &FriendRequestId) -> Result<FriendRequest, Error> {
        self.request_repo
            .find(id)
            .await
            .map_err(map_request_error)?
            .ok_or_else(|| Error::record_not_found(format!("friend request {id} does not exist")))
    }

    async fn pending_requests(&self, filter: RequestFilter) -> Result<Vec<FriendRequest>, Error> {
        self.request_repo
            .query(&filter)
            .await
            .map_err(map_request_error)
    }

    /// Add each user to the other's friend set, recipient first.
    async fn befriend(&self, request: &FriendRequest) -> Result<(), Error> {
        let (recipient, sender) = (&request.to_uid, &request.from_uid);
        // Nothing has been written yet, so this is a plain store failure. The
        // request stays accepted and the recipient may accept it again.
        if let Err(err) = self.profile_repo.add_friend_uid(recipient, sender).await {
            warn!(request_id = %request.id, uid = %recipient, error = %err, "friend add failed before either side was written");
            return Err(map_profile_error(err));
        }
        if let Err(err) = self.profile_repo.add_friend_uid(sender, recipient).await {
            warn!(request_id = %request.id, failed_uid = %sender, error = %err, "reciprocal friend add failed");
            return Err(Error::partial_reciprocal_failure(
                sender,
                format!("request accepted but {sender} was not updated: {err}"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<P, Q> FriendsCommand for FriendsService<P, Q>
where
    P: ProfileRepository,
    Q: FriendRequestRepository,
{
    async fn send_friend_request(
        &self,
        caller: &Caller,
        request: SendFriendRequest,
    ) -> Result<FriendRequest, Error> {
        let from = caller.require()?;
        let to = UserId::new(request.to_uid)
            .map_err(|err| Error::invalid_input(format!("invalid recipient: {err}")))?;
        let pending = FriendRequest::pending(
            from.clone(),
            to,
            request.message.as_deref(),
            self.clock.utc(),
        )?;

        if self
            .profile_repo
            .find_profile(&pending.to_uid)
            .await
            .map_err(map_profile_error)?
            .is_none()
        {
            return Err(Error::record_not_found(format!(
                "no user exists with uid {}",
                pending.to_uid
            )));
        }
        let friends = self
            .profile_repo
            .friend_uids(from)
            .await
            .map_err(map_profile_error)?;
        if friends.contains(&pending.to_uid) {
            return Err(Error::conflict(format!(
                "you are already friends with {}",
                pending.to_uid
            )));
        }

        self.request_repo
            .create(&pending, self.duplicate_policy)
            .await
            .map_err(map_request_error)?;
        info!(request_id = %pending.id, from = %pending.from_uid, to = %pending.to_uid, "friend request sent");
        Ok(pending)
    }

    async fn accept_friend_request(
        &self,
        caller: &Caller,
        id: &FriendRequestId,
    ) -> Result<FriendRequest, Error> {
        let uid = caller.require()?;
        let request = self.load_request(id).await?;

        // An accepted request may be accepted again by its recipient to repair
        // a partially applied friendship.
        let accepted = if request.status == FriendRequestStatus::Accepted && &request.to_uid == uid {
            request
        } else {
            let accepted = request.resolve(uid, FriendRequestStatus::Accepted)?;
            self.request_repo
                .update_status(id, FriendRequestStatus::Accepted)
                .await
                .map_err(map_request_error)?;
            accepted
        };

        self.befriend(&accepted).await?;
        info!(request_id = %accepted.id, from = %accepted.from_uid, to = %accepted.to_uid, "friend request accepted");
        Ok(accepted)
    }

    async fn reject_friend_request(
        &self,
        caller: &Caller,
        id: &FriendRequestId,
    ) -> Result<FriendRequest, Error> {
        let uid = caller.require()?;
        let rejected = self
            .load_request(id)
            .await?
            .resolve(uid, FriendRequestStatus::Rejected)?;
        self.request_repo
            .update_status(id, FriendRequestStatus::Rejected)
            .await
            .map_err(map_request_error)?;
        info!(request_id = %rejected.id, "friend request rejected");
        Ok(rejected)
    }

    async fn remove_friend(&self, caller: &Caller, other: &UserId) -> Result<(), Error> {
        let uid = caller.require()?;
        if uid == other {
            return Err(Error::invalid_input("you cannot unfriend yourself"));
        }

        self.profile_repo
            .remove_friend_uid(uid, other)
            .await
            .map_err(map_profile_error)?;

        match self.profile_repo.remove_friend_uid(other, uid).await {
            // No profile on the other side means no friend set to clear.
            Ok(()) | Err(ProfileRepositoryError::Missing { .. }) => {}
            Err(err) => {
                warn!(%uid, failed_uid = %other, error = %err, "reciprocal friend removal failed");
                return Err(Error::partial_reciprocal_failure(
                    other,
                    format!("{other} was removed from your friends but their list was not updated: {err}"),
                ));
            }
        }
        info!(%uid, %other, "friend removed");
        Ok(())
    }
}

#[async_trait]
impl<P, Q> FriendsQuery for FriendsService<P, Q>
where
    P: ProfileRepository,
    Q: FriendRequestRepository,
{
    async fn relationship_with(
        &self,
        caller: &Caller,
        candidate: &UserId,
    ) -> Result<RelationshipStatus, Error> {
        let uid = caller.require()?;
        let friends = self
            .profile_repo
            .friend_uids(uid)
            .await
            .map_err(map_profile_error)?;
        let sent = self.pending_requests(RequestFilter::outgoing(uid.clone())).await?;
        Ok(relationship_status(
            candidate,
            &friends,
            sent.iter().map(|request| &request.to_uid),
        ))
    }

    async fn list_friends(&self, caller: &Caller) -> Result<Vec<Friend>, Error> {
        let uid = caller.require()?;
        let friends = self
            .profile_repo
            .friend_uids(uid)
            .await
            .map_err(map_profile_error)?;
        let profiles = self
            .profile_repo
            .find_profiles(&friends)
            .await
            .map_err(map_profile_error)?;
        Ok(profiles.into_iter().map(Friend::from).collect())
    }

    async fn incoming_requests(&self, caller: &Caller) -> Result<Vec<FriendRequest>, Error> {
        let uid = caller.require()?;
        self.pending_requests(RequestFilter::incoming(uid.clone())).await
    }

    async fn outgoing_requests(&self, caller: &Caller) -> Result<Vec<FriendRequest>, Error> {
        let uid = caller.require()?;
        self.pending_requests(RequestFilter::outgoing(uid.clone())).await
    }
}

#[cfg(test)]
#[path = "friends_service_tests.rs"]
mod tests;
