//! Port for per-user shelf storage.
//!
//! The shelf store keeps one [`UserBook`] document per `(uid, volume)` pair and
//! pushes changes to live observers. Adapters wrap a document database; the
//! in-memory adapter in [`crate::outbound::memory`] backs development and
//! tests.

use async_trait::async_trait;

use crate::domain::{ReadingStatus, Subscription, UserBook, UserId, VolumeId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by shelf store adapters.
    pub enum ShelfRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "shelf store connection failed: {message}",
        /// A read or write failed during execution.
        Query { message: String } =>
            "shelf store query failed: {message}",
    }
}

/// Live value of one shelf record, absent when no record exists.
pub type BookSubscription = Subscription<Option<UserBook>>;

/// Live ordered listing of one shelf.
pub type ShelfSubscription = Subscription<Vec<UserBook>>;

/// Port for shelf document storage.
///
/// # Ordering
///
/// Listings, both one-shot and live, are ordered most recently updated
/// first, ties broken by volume id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShelfRepository: Send + Sync {
    /// Fetch one record.
    async fn find(
        &self,
        uid: &UserId,
        volume: &VolumeId,
    ) -> Result<Option<UserBook>, ShelfRepositoryError>;

    /// Insert or replace the record keyed by `book.id`.
    async fn save(&self, uid: &UserId, book: &UserBook) -> Result<(), ShelfRepositoryError>;

    /// Delete a record. Deleting an absent record succeeds.
    async fn delete(&self, uid: &UserId, volume: &VolumeId) -> Result<(), ShelfRepositoryError>;

    /// Records currently on the `status` shelf.
    async fn list_by_status(
        &self,
        uid: &UserId,
        status: ReadingStatus,
    ) -> Result<Vec<UserBook>, ShelfRepositoryError>;

    /// Observe one record.
    async fn watch(
        &self,
        uid: &UserId,
        volume: &VolumeId,
    ) -> Result<BookSubscription, ShelfRepositoryError>;

    /// Observe the ordered listing of the `status` shelf.
    async fn watch_by_status(
        &self,
        uid: &UserId,
        status: ReadingStatus,
    ) -> Result<ShelfSubscription, ShelfRepositoryError>;
}
