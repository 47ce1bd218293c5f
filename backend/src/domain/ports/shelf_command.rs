//! Driving ports for shelf use-cases.
//!
//! Inbound adapters call [`ShelfCommand`] to change a user's shelves and
//! [`ShelfQuery`] to read or observe them. Every operation takes the
//! [`Caller`]; anonymous callers are rejected before any store access.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    BookPayload, Caller, Error, ReadingStatus, ShelfChanges, Subscription, UserBook, VolumeId,
};

use super::{BookSubscription, ShelfSubscription};

/// Live status of one volume on the caller's shelves.
pub type StatusSubscription = Subscription<Option<UserBook>, Option<ReadingStatus>>;

/// Request to select a status button for a volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStatusRequest {
    /// Target volume.
    pub volume: VolumeId,
    /// Status the user selected.
    pub status: ReadingStatus,
    /// Book details, required when the volume is not shelved yet.
    pub payload: Option<BookPayload>,
    /// Total page count, when the caller knows it.
    pub page_count: Option<u32>,
}

/// Request to update status and progress in one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertBookRequest {
    /// Target volume.
    pub volume: VolumeId,
    /// Requested changes.
    pub changes: ShelfChanges,
}

/// Result of [`ShelfCommand::set_exclusive_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "book", rename_all = "snake_case")]
pub enum ShelfOutcome {
    /// The status was already active, so the book left the shelf.
    Removed,
    /// The record was written.
    Saved(UserBook),
}

impl ShelfOutcome {
    /// Status the volume holds after the operation.
    pub fn status(&self) -> Option<ReadingStatus> {
        match self {
            Self::Removed => None,
            Self::Saved(book) => Some(book.status),
        }
    }
}

/// Shelf mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShelfCommand: Send + Sync {
    /// Toggle a status button: select it, or remove the book when it is
    /// already the active status.
    async fn set_exclusive_status(
        &self,
        caller: &Caller,
        request: SetStatusRequest,
    ) -> Result<ShelfOutcome, Error>;

    /// Combined status and progress update with page clamping.
    async fn upsert_status_book(
        &self,
        caller: &Caller,
        request: UpsertBookRequest,
    ) -> Result<UserBook, Error>;

    /// Remove a volume from every shelf. Idempotent.
    async fn remove_from_shelf(&self, caller: &Caller, volume: &VolumeId) -> Result<(), Error>;

    /// Add time spent reading to a shelved volume.
    async fn record_reading_time(
        &self,
        caller: &Caller,
        volume: &VolumeId,
        seconds: u64,
    ) -> Result<UserBook, Error>;
}

/// Shelf reads and live observation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShelfQuery: Send + Sync {
    /// One shelved record; `record_not_found` when absent.
    async fn user_book(&self, caller: &Caller, volume: &VolumeId) -> Result<UserBook, Error>;

    /// Records on one shelf, most recently updated first.
    async fn list_shelf(
        &self,
        caller: &Caller,
        status: ReadingStatus,
    ) -> Result<Vec<UserBook>, Error>;

    /// Observe the status of one volume.
    async fn observe_status(
        &self,
        caller: &Caller,
        volume: &VolumeId,
    ) -> Result<StatusSubscription, Error>;

    /// Observe the full record of one volume.
    async fn observe_user_book(
        &self,
        caller: &Caller,
        volume: &VolumeId,
    ) -> Result<BookSubscription, Error>;

    /// Observe one shelf listing.
    async fn observe_shelf(
        &self,
        caller: &Caller,
        status: ReadingStatus,
    ) -> Result<ShelfSubscription, Error>;
}
