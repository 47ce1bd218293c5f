//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use readtrack::domain::ports::{CatalogLookup, FixtureCatalogSource};
use readtrack::domain::{CatalogService, DuplicateRequestPolicy, PageCountPolicy};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) page_count_policy: PageCountPolicy,
    pub(crate) duplicate_policy: DuplicateRequestPolicy,
    pub(crate) catalog: Arc<dyn CatalogLookup>,
}

impl ServerConfig {
    /// Construct a server configuration with default policies and an empty
    /// catalogue.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            page_count_policy: PageCountPolicy::default(),
            duplicate_policy: DuplicateRequestPolicy::default(),
            catalog: Arc::new(CatalogService::new(Arc::new(FixtureCatalogSource))),
        }
    }

    /// How a completion treats a stored total page count.
    #[must_use]
    pub fn with_page_count_policy(mut self, policy: PageCountPolicy) -> Self {
        self.page_count_policy = policy;
        self
    }

    /// Whether a second pending request between the same users is refused.
    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicateRequestPolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Replace the catalogue used by the browse endpoints.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogLookup>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(
            dead_code,
            reason = "Exercised by server tests; retained for fixture access"
        )
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
