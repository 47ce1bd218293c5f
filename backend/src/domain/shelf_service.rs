//! Shelf domain service.
//!
//! Implements [`ShelfCommand`] and [`ShelfQuery`] on top of a
//! [`ShelfRepository`]. The decisions themselves live in
//! [`crate::domain::shelf`]; this service resolves the caller, loads the
//! current record, applies the plan and maps store failures.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    BookSubscription, SetStatusRequest, ShelfCommand, ShelfOutcome, ShelfQuery, ShelfRepository,
    ShelfRepositoryError, ShelfSubscription, StatusSubscription, UpsertBookRequest,
};
use crate::domain::{
    Caller, Error, PageCountPolicy, ReadingStatus, ShelfDecision, UserBook, UserId, VolumeId,
    add_reading_time, plan_exclusive_status, plan_upsert,
};

fn map_repository_error(error: ShelfRepositoryError) -> Error {
    match error {
        ShelfRepositoryError::Connection { message } => {
            Error::backend_unavailable(format!("shelf store unavailable: {message}"))
        }
        ShelfRepositoryError::Query { message } => {
            Error::internal(format!("shelf store error: {message}"))
        }
    }
}

/// Shelf service implementing the shelf driving ports.
#[derive(Clone)]
pub struct ShelfService<R> {
    shelf_repo: Arc<R>,
    clock: Arc<dyn Clock>,
    page_count_policy: PageCountPolicy,
}

impl<R> ShelfService<R> {
    /// Create a service with the default [`PageCountPolicy`].
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use readtrack::domain::ShelfService;
    /// # use readtrack::outbound::memory::InMemoryShelfStore;
    /// let service = ShelfService::new(Arc::new(InMemoryShelfStore::default()), Arc::new(DefaultClock));
    /// # let _ = service;
    /// ```
    pub fn new(shelf_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            shelf_repo,
            clock,
            page_count_policy: PageCountPolicy::default(),
        }
    }

    /// Replace the policy applied when an update supplies a page total.
    #[must_use]
    pub fn with_page_count_policy(mut self, policy: PageCountPolicy) -> Self {
        self.page_count_policy = policy;
        self
    }
}

impl<R> ShelfService<R>
where
    R: ShelfRepository,
{
    async fn current(&self, uid: &UserId, volume: &VolumeId) -> Result<Option<UserBook>, Error> {
        self.shelf_repo
            .find(uid, volume)
            .await
            .map_err(map_repository_error)
    }

    async fn store(&self, uid: &UserId, book: &UserBook) -> Result<(), Error> {
        self.shelf_repo
            .save(uid, book)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> ShelfCommand for ShelfService<R>
where
    R: ShelfRepository,
{
    async fn set_exclusive_status(
        &self,
        caller: &Caller,
        request: SetStatusRequest,
    ) -> Result<ShelfOutcome, Error> {
        let uid = caller.require()?;
        let current = self.current(uid, &request.volume).await?;
        let decision = plan_exclusive_status(
            current.as_ref(),
            &request.volume,
            request.status,
            request.payload.as_ref(),
            request.page_count,
            self.page_count_policy,
            self.clock.utc(),
        )?;

        match decision {
            ShelfDecision::Remove => {
                self.shelf_repo
                    .delete(uid, &request.volume)
                    .await
                    .map_err(map_repository_error)?;
                debug!(%uid, volume = %request.volume, status = %request.status, "status toggled off");
                Ok(ShelfOutcome::Removed)
            }
            ShelfDecision::Upsert(book) => {
                self.store(uid, &book).await?;
                debug!(%uid, volume = %book.id, status = %book.status, "status selected");
                Ok(ShelfOutcome::Saved(book))
            }
        }
    }

    async fn upsert_status_book(
        &self,
        caller: &Caller,
        request: UpsertBookRequest,
    ) -> Result<UserBook, Error> {
        let uid = caller.require()?;
        let current = self.current(uid, &request.volume).await?;
        let book = plan_upsert(
            current.as_ref(),
            &request.volume,
            &request.changes,
            self.page_count_policy,
            self.clock.utc(),
        )?;
        self.store(uid, &book).await?;
        Ok(book)
    }

    async fn remove_from_shelf(&self, caller: &Caller, volume: &VolumeId) -> Result<(), Error> {
        let uid = caller.require()?;
        self.shelf_repo
            .delete(uid, volume)
            .await
            .map_err(map_repository_error)
    }

    async fn record_reading_time(
        &self,
        caller: &Caller,
        volume: &VolumeId,
        seconds: u64,
    ) -> Result<UserBook, Error> {
        let uid = caller.require()?;
        let current = self
            .current(uid, volume)
            .await?
            .ok_or_else(|| Error::record_not_found(format!("{volume} is not on your shelves")))?;
        let book = add_reading_time(&current, seconds, self.clock.utc())?;
        self.store(uid, &book).await?;
        Ok(book)
    }
}

#[async_trait]
impl<R> ShelfQuery for ShelfService<R>
where
    R: ShelfRepository,
{
    async fn user_book(&self, caller: &Caller, volume: &VolumeId) -> Result<UserBook, Error> {
        let uid = caller.require()?;
        self.current(uid, volume)
            .await?
            .ok_or_else(|| Error::record_not_found(format!("{volume} is not on your shelves")))
    }

    async fn list_shelf(
        &self,
        caller: &Caller,
        status: ReadingStatus,
    ) -> Result<Vec<UserBook>, Error> {
        let uid = caller.require()?;
        self.shelf_repo
            .list_by_status(uid, status)
            .await
            .map_err(map_repository_error)
    }

    async fn observe_status(
        &self,
        caller: &Caller,
        volume: &VolumeId,
    ) -> Result<StatusSubscription, Error> {
        let book = self.observe_user_book(caller, volume).await?;
        Ok(book.map(|current| current.as_ref().map(|book| book.status)))
    }

    async fn observe_user_book(
        &self,
        caller: &Caller,
        volume: &VolumeId,
    ) -> Result<BookSubscription, Error> {
        let uid = caller.require()?;
        self.shelf_repo
            .watch(uid, volume)
            .await
            .map_err(map_repository_error)
    }

    async fn observe_shelf(
        &self,
        caller: &Caller,
        status: ReadingStatus,
    ) -> Result<ShelfSubscription, Error> {
        let uid = caller.require()?;
        self.shelf_repo
            .watch_by_status(uid, status)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "shelf_service_tests.rs"]
mod tests;
