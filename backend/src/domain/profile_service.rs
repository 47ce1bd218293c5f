//! Profile domain service: own-profile editing, username registration and
//! username search.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::friends_service::{map_profile_error, map_request_error};
use crate::domain::ports::{
    FriendRequestRepository, PROFILE_NAME_MAX, ProfileCommand, ProfileQuery, ProfileRepository,
    UpdateProfileRequest, UserSearchHit,
};
use crate::domain::{
    Caller, Error, Friend, Profile, RequestFilter, USERNAME_MAX, UserId, Username,
    relationship_status,
};

/// Largest number of hits returned by a username search.
pub const SEARCH_LIMIT: usize = 20;

fn validate_name(field: &str, raw: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > PROFILE_NAME_MAX {
        return Err(Error::invalid_input(format!(
            "{field} must be at most {PROFILE_NAME_MAX} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Profile service implementing the profile driving ports.
#[derive(Clone)]
pub struct ProfileService<P, Q> {
    profile_repo: Arc<P>,
    request_repo: Arc<Q>,
}

impl<P, Q> ProfileService<P, Q> {
    /// Create a service over the profile and friend request stores.
    pub fn new(profile_repo: Arc<P>, request_repo: Arc<Q>) -> Self {
        Self {
            profile_repo,
            request_repo,
        }
    }
}

impl<P, Q> ProfileService<P, Q>
where
    P: ProfileRepository,
    Q: FriendRequestRepository,
{
    async fn load(&self, uid: &UserId) -> Result<Profile, Error> {
        self.profile_repo
            .find_profile(uid)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::record_not_found(format!("no profile exists for {uid}")))
    }
}

#[async_trait]
impl<P, Q> ProfileCommand for ProfileService<P, Q>
where
    P: ProfileRepository,
    Q: FriendRequestRepository,
{
    async fn ensure_profile(&self, caller: &Caller, email: &str) -> Result<Profile, Error> {
        let uid = caller.require()?;
        if let Some(existing) = self
            .profile_repo
            .find_profile(uid)
            .await
            .map_err(map_profile_error)?
        {
            return Ok(existing);
        }
        let profile = Profile::new(uid.clone(), email.trim());
        self.profile_repo
            .save_profile(&profile)
            .await
            .map_err(map_profile_error)?;
        info!(%uid, "profile created");
        Ok(profile)
    }

    async fn update_profile(
        &self,
        caller: &Caller,
        request: UpdateProfileRequest,
    ) -> Result<Profile, Error> {
        let uid = caller.require()?;
        let name = validate_name("name", &request.name)?;
        let surname = validate_name("surname", &request.surname)?;

        let mut profile = self.load(uid).await?;
        profile.name = name;
        profile.surname = surname;
        self.profile_repo
            .save_profile(&profile)
            .await
            .map_err(map_profile_error)?;
        Ok(profile)
    }

    async fn register_username(&self, caller: &Caller, username: &str) -> Result<Profile, Error> {
        let uid = caller.require()?;
        let username = Username::new(username)
            .map_err(|err| Error::invalid_input(format!("invalid username: {err}")))?;
        self.profile_repo
            .claim_username(uid, &username)
            .await
            .map_err(map_profile_error)?;
        info!(%uid, %username, "username registered");
        self.load(uid).await
    }
}

#[async_trait]
impl<P, Q> ProfileQuery for ProfileService<P, Q>
where
    P: ProfileRepository,
    Q: FriendRequestRepository,
{
    async fn current_profile(&self, caller: &Caller) -> Result<Profile, Error> {
        let uid = caller.require()?;
        self.load(uid).await
    }

    async fn search_by_username(
        &self,
        caller: &Caller,
        prefix: &str,
    ) -> Result<Vec<UserSearchHit>, Error> {
        let uid = caller.require()?;
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Err(Error::invalid_input("search text must not be empty"));
        }
        if prefix.chars().count() > USERNAME_MAX {
            return Err(Error::invalid_input(format!(
                "search text must be at most {USERNAME_MAX} characters"
            )));
        }

        let matches = self
            .profile_repo
            .find_by_username_prefix(&prefix, SEARCH_LIMIT + 1)
            .await
            .map_err(map_profile_error)?;
        let friends = self
            .profile_repo
            .friend_uids(uid)
            .await
            .map_err(map_profile_error)?;
        let sent = self
            .request_repo
            .query(&RequestFilter::outgoing(uid.clone()))
            .await
            .map_err(map_request_error)?;

        Ok(matches
            .into_iter()
            .filter(|profile| &profile.uid != uid)
            .take(SEARCH_LIMIT)
            .map(|profile| {
                let relationship = relationship_status(
                    &profile.uid,
                    &friends,
                    sent.iter().map(|request| &request.to_uid),
                );
                UserSearchHit {
                    user: Friend::from(profile),
                    relationship,
                }
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "profile_service_tests.rs"]
mod tests;
