//! Driving port for catalogue browsing.

use async_trait::async_trait;

use crate::domain::{Error, VolumeId};

use super::{CatalogPage, CatalogQuery, Volume};

/// Catalogue search and lookup for presentation clients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Run a search.
    async fn search(&self, query: &CatalogQuery) -> Result<CatalogPage, Error>;

    /// Look up one volume; `record_not_found` when the catalogue does not
    /// know it.
    async fn volume(&self, id: &VolumeId) -> Result<Volume, Error>;
}
