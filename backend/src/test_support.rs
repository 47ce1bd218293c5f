//! Test utilities for the readtrack crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`, via the
//! `test-support` feature).

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{FixtureCatalogSource, ProfileRepository};
use crate::domain::{
    BookPayload, CatalogService, FriendsService, Profile, ProfileService, ShelfService, UserId,
    Username, VolumeId,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::ws::state::WsState;
use crate::outbound::memory::{
    InMemoryAccountStore, InMemoryFriendRequestStore, InMemoryProfileStore, InMemoryShelfStore,
};

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock frozen at [`fixture_timestamp`].
    pub fn fixed() -> Self {
        Self::new(fixture_timestamp())
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Instant used by fixtures: 2024-05-01T09:30:00Z.
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Parse a fixture uid.
///
/// # Panics
/// When `raw` is not a valid [`UserId`].
#[expect(clippy::expect_used, reason = "fixture helpers fail loudly on bad literals")]
pub fn uid(raw: &str) -> UserId {
    UserId::new(raw).expect("fixture uid")
}

/// Parse a fixture volume id.
///
/// # Panics
/// When `raw` is not a valid [`VolumeId`].
#[expect(clippy::expect_used, reason = "fixture helpers fail loudly on bad literals")]
pub fn volume(raw: &str) -> VolumeId {
    VolumeId::new(raw).expect("fixture volume id")
}

/// Minimal book payload with an optional total.
pub fn payload(title: &str, page_count: Option<u32>) -> BookPayload {
    BookPayload {
        title: title.to_owned(),
        authors: vec!["Test Author".to_owned()],
        page_count,
        ..BookPayload::default()
    }
}

/// In-memory stores wired into the real services, for handler and
/// behaviour tests.
pub struct InMemoryBackend {
    /// Clock shared by every service.
    pub clock: Arc<MutableClock>,
    /// Shelf records.
    pub shelves: Arc<InMemoryShelfStore>,
    /// Profiles and friend sets.
    pub profiles: Arc<InMemoryProfileStore>,
    /// Friend requests.
    pub requests: Arc<InMemoryFriendRequestStore>,
    /// Accounts for sign-up and login.
    pub accounts: Arc<InMemoryAccountStore>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Empty stores and a frozen clock.
    pub fn new() -> Self {
        Self {
            clock: Arc::new(MutableClock::fixed()),
            shelves: Arc::new(InMemoryShelfStore::new()),
            profiles: Arc::new(InMemoryProfileStore::new()),
            requests: Arc::new(InMemoryFriendRequestStore::new()),
            accounts: Arc::new(InMemoryAccountStore::new()),
        }
    }

    /// Shelf service over the shelf store.
    pub fn shelf_service(&self) -> ShelfService<InMemoryShelfStore> {
        ShelfService::new(Arc::clone(&self.shelves), self.clock.clone())
    }

    /// Friends service over the profile and request stores.
    pub fn friends_service(&self) -> FriendsService<InMemoryProfileStore, InMemoryFriendRequestStore> {
        FriendsService::new(
            Arc::clone(&self.profiles),
            Arc::clone(&self.requests),
            self.clock.clone(),
        )
    }

    /// Profile service over the profile and request stores.
    pub fn profile_service(&self) -> ProfileService<InMemoryProfileStore, InMemoryFriendRequestStore> {
        ProfileService::new(Arc::clone(&self.profiles), Arc::clone(&self.requests))
    }

    /// Handler state backed by these stores and an empty catalogue.
    pub fn http_state(&self) -> HttpState {
        let shelf = Arc::new(self.shelf_service());
        let friends = Arc::new(self.friends_service());
        let profile = Arc::new(self.profile_service());
        HttpState {
            login: self.accounts.clone(),
            profile: profile.clone(),
            profile_query: profile,
            shelf: shelf.clone(),
            shelf_query: shelf,
            friends: friends.clone(),
            friends_query: friends,
            catalog: Arc::new(CatalogService::new(Arc::new(FixtureCatalogSource))),
        }
    }

    /// WebSocket state backed by the shelf store.
    pub fn ws_state(&self) -> WsState {
        WsState::new(Arc::new(self.shelf_service()))
    }

    /// Store a profile directly, optionally claiming a username.
    ///
    /// # Panics
    /// When the store rejects the write.
    #[expect(clippy::expect_used, reason = "fixture helpers fail loudly on setup errors")]
    pub async fn seed_profile(&self, raw_uid: &str, username: Option<&str>) -> Profile {
        let id = uid(raw_uid);
        let profile = Profile::new(id.clone(), format!("{raw_uid}@example.com"));
        self.profiles.save_profile(&profile).await.expect("seed profile");
        if let Some(name) = username {
            let name = Username::new(name).expect("fixture username");
            self.profiles
                .claim_username(&id, &name)
                .await
                .expect("seed username");
        }
        self.profiles
            .find_profile(&id)
            .await
            .expect("read seeded profile")
            .expect("seeded profile present")
    }
}
