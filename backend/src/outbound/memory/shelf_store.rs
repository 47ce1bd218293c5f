//! In-memory shelf store with live observation.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use super::lock;
use crate::domain::ports::{
    BookSubscription, ShelfRepository, ShelfRepositoryError, ShelfSubscription,
};
use crate::domain::{ReadingStatus, ReleaseGuard, Subscription, UserBook, UserId, VolumeId};

type BookKey = (UserId, VolumeId);
type StatusKey = (UserId, ReadingStatus);

#[derive(Default)]
struct ShelfState {
    books: HashMap<UserId, BTreeMap<VolumeId, UserBook>>,
    book_watchers: HashMap<BookKey, watch::Sender<Option<UserBook>>>,
    status_watchers: HashMap<StatusKey, watch::Sender<Vec<UserBook>>>,
    unavailable: bool,
}

impl ShelfState {
    fn check_available(&self) -> Result<(), ShelfRepositoryError> {
        if self.unavailable {
            Err(ShelfRepositoryError::connection("shelf store offline"))
        } else {
            Ok(())
        }
    }

    fn book(&self, uid: &UserId, volume: &VolumeId) -> Option<UserBook> {
        self.books.get(uid).and_then(|shelf| shelf.get(volume)).cloned()
    }

    /// Books with `status`, most recently updated first, ties by volume id.
    fn by_status(&self, uid: &UserId, status: ReadingStatus) -> Vec<UserBook> {
        let mut books: Vec<UserBook> = self
            .books
            .get(uid)
            .map(|shelf| {
                shelf
                    .values()
                    .filter(|book| book.status == status)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        books.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        books
    }

    fn publish(&self, uid: &UserId, volume: &VolumeId) {
        if let Some(sender) = self.book_watchers.get(&(uid.clone(), volume.clone())) {
            sender.send_replace(self.book(uid, volume));
        }
        for status in ReadingStatus::ALL {
            if let Some(sender) = self.status_watchers.get(&(uid.clone(), status)) {
                sender.send_replace(self.by_status(uid, status));
            }
        }
    }
}

/// Shelf store holding every user's books in process memory.
#[derive(Clone, Default)]
pub struct InMemoryShelfStore {
    state: Arc<Mutex<ShelfState>>,
}

impl InMemoryShelfStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live watch channels, by book and by status.
    pub fn active_watch_count(&self) -> usize {
        let state = lock(&self.state);
        state.book_watchers.len() + state.status_watchers.len()
    }

    /// Make every subsequent call fail with a connection error.
    #[cfg(any(test, feature = "test-support"))]
    pub fn set_unavailable(&self, unavailable: bool) {
        lock(&self.state).unavailable = unavailable;
    }

    fn release_book_watch(state: Weak<Mutex<ShelfState>>, key: BookKey) -> ReleaseGuard {
        ReleaseGuard::new(move || {
            let Some(state) = state.upgrade() else { return };
            let mut state = lock(&state);
            if state
                .book_watchers
                .get(&key)
                .is_some_and(|sender| sender.receiver_count() == 0)
            {
                state.book_watchers.remove(&key);
                debug!(uid = %key.0, volume = %key.1, "book watch released");
            }
        })
    }

    fn release_status_watch(state: Weak<Mutex<ShelfState>>, key: StatusKey) -> ReleaseGuard {
        ReleaseGuard::new(move || {
            let Some(state) = state.upgrade() else { return };
            let mut state = lock(&state);
            if state
                .status_watchers
                .get(&key)
                .is_some_and(|sender| sender.receiver_count() == 0)
            {
                state.status_watchers.remove(&key);
                debug!(uid = %key.0, status = %key.1, "status watch released");
            }
        })
    }
}

#[async_trait]
impl ShelfRepository for InMemoryShelfStore {
    async fn find(
        &self,
        uid: &UserId,
        volume: &VolumeId,
    ) -> Result<Option<UserBook>, ShelfRepositoryError> {
        let state = lock(&self.state);
        state.check_available()?;
        Ok(state.book(uid, volume))
    }

    async fn save(&self, uid: &UserId, book: &UserBook) -> Result<(), ShelfRepositoryError> {
        let mut state = lock(&self.state);
        state.check_available()?;
        state
            .books
            .entry(uid.clone())
            .or_default()
            .insert(book.id.clone(), book.clone());
        state.publish(uid, &book.id);
        Ok(())
    }

    async fn delete(&self, uid: &UserId, volume: &VolumeId) -> Result<(), ShelfRepositoryError> {
        let mut state = lock(&self.state);
        state.check_available()?;
        let removed = state
            .books
            .get_mut(uid)
            .and_then(|shelf| shelf.remove(volume))
            .is_some();
        if removed {
            state.publish(uid, volume);
        }
        Ok(())
    }

    async fn list_by_status(
        &self,
        uid: &UserId,
        status: ReadingStatus,
    ) -> Result<Vec<UserBook>, ShelfRepositoryError> {
        let state = lock(&self.state);
        state.check_available()?;
        Ok(state.by_status(uid, status))
    }

    async fn watch(
        &self,
        uid: &UserId,
        volume: &VolumeId,
    ) -> Result<BookSubscription, ShelfRepositoryError> {
        let mut state = lock(&self.state);
        state.check_available()?;
        let key = (uid.clone(), volume.clone());
        let current = state.book(uid, volume);
        let receiver = state
            .book_watchers
            .entry(key.clone())
            .or_insert_with(|| watch::Sender::new(current))
            .subscribe();
        let guard = Self::release_book_watch(Arc::downgrade(&self.state), key);
        Ok(Subscription::new(receiver, guard))
    }

    async fn watch_by_status(
        &self,
        uid: &UserId,
        status: ReadingStatus,
    ) -> Result<ShelfSubscription, ShelfRepositoryError> {
        let mut state = lock(&self.state);
        state.check_available()?;
        let key = (uid.clone(), status);
        let current = state.by_status(uid, status);
        let receiver = state
            .status_watchers
            .entry(key.clone())
            .or_insert_with(|| watch::Sender::new(current))
            .subscribe();
        let guard = Self::release_status_watch(Arc::downgrade(&self.state), key);
        Ok(Subscription::new(receiver, guard))
    }
}
