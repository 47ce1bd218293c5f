//! In-memory profile store with a unique username index.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{Profile, UserId, Username};

#[derive(Default)]
struct ProfileState {
    profiles: HashMap<UserId, Profile>,
    usernames: BTreeMap<Username, UserId>,
    failing_friend_writes: HashSet<UserId>,
}

impl ProfileState {
    fn profile_mut(&mut self, uid: &UserId) -> Result<&mut Profile, ProfileRepositoryError> {
        self.profiles
            .get_mut(uid)
            .ok_or_else(|| ProfileRepositoryError::missing(uid.as_str()))
    }

    fn check_friend_write(&self, uid: &UserId) -> Result<(), ProfileRepositoryError> {
        if self.failing_friend_writes.contains(uid) {
            Err(ProfileRepositoryError::connection(format!(
                "write to friends of {uid} failed"
            )))
        } else {
            Ok(())
        }
    }
}

/// Profile store holding every profile document in process memory.
///
/// Usernames and friend sets change only through their dedicated operations;
/// [`ProfileRepository::save_profile`] keeps whatever the store already holds
/// for them.
#[derive(Clone, Default)]
pub struct InMemoryProfileStore {
    state: Arc<Mutex<ProfileState>>,
}

impl InMemoryProfileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make friend-set writes against `uid`'s profile fail until cleared.
    #[cfg(any(test, feature = "test-support"))]
    pub fn fail_friend_writes_for(&self, uid: &UserId) {
        lock(&self.state).failing_friend_writes.insert(uid.clone());
    }

    /// Clear every injected friend-set failure.
    #[cfg(any(test, feature = "test-support"))]
    pub fn clear_failures(&self) {
        lock(&self.state).failing_friend_writes.clear();
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileStore {
    async fn find_profile(&self, uid: &UserId) -> Result<Option<Profile>, ProfileRepositoryError> {
        Ok(lock(&self.state).profiles.get(uid).cloned())
    }

    async fn find_profiles(&self, uids: &[UserId]) -> Result<Vec<Profile>, ProfileRepositoryError> {
        let state = lock(&self.state);
        Ok(uids
            .iter()
            .filter_map(|uid| state.profiles.get(uid).cloned())
            .collect())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        let mut state = lock(&self.state);
        let mut next = profile.clone();
        if let Some(stored) = state.profiles.get(&profile.uid) {
            next.username = stored.username.clone();
            next.friends = stored.friends.clone();
        } else {
            next.username = None;
            next.friends.clear();
        }
        state.profiles.insert(next.uid.clone(), next);
        Ok(())
    }

    async fn friend_uids(&self, uid: &UserId) -> Result<Vec<UserId>, ProfileRepositoryError> {
        Ok(lock(&self.state)
            .profiles
            .get(uid)
            .map(|profile| profile.friends.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn add_friend_uid(
        &self,
        uid: &UserId,
        other: &UserId,
    ) -> Result<(), ProfileRepositoryError> {
        let mut state = lock(&self.state);
        state.check_friend_write(uid)?;
        state.profile_mut(uid)?.friends.insert(other.clone());
        Ok(())
    }

    async fn remove_friend_uid(
        &self,
        uid: &UserId,
        other: &UserId,
    ) -> Result<(), ProfileRepositoryError> {
        let mut state = lock(&self.state);
        state.check_friend_write(uid)?;
        state.profile_mut(uid)?.friends.remove(other);
        Ok(())
    }

    async fn claim_username(
        &self,
        uid: &UserId,
        username: &Username,
    ) -> Result<(), ProfileRepositoryError> {
        let mut state = lock(&self.state);
        match state.usernames.get(username) {
            Some(owner) if owner == uid => return Ok(()),
            Some(_) => return Err(ProfileRepositoryError::username_taken(username.as_str())),
            None => {}
        }
        let previous = state.profile_mut(uid)?.username.replace(username.clone());
        if let Some(previous) = previous {
            state.usernames.remove(&previous);
        }
        state.usernames.insert(username.clone(), uid.clone());
        Ok(())
    }

    async fn find_by_username_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<Profile>, ProfileRepositoryError> {
        let state = lock(&self.state);
        Ok(state
            .usernames
            .iter()
            .filter(|(name, _)| name.as_str().starts_with(prefix))
            .filter_map(|(_, uid)| state.profiles.get(uid).cloned())
            .take(limit)
            .collect())
    }
}
