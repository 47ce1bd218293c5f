//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on driving ports, so
//! they can be exercised with fixtures or mocks without any I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CatalogLookup, FriendsCommand, FriendsQuery, LoginService, ProfileCommand, ProfileQuery,
    ShelfCommand, ShelfQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account sign-up and sign-in.
    pub login: Arc<dyn LoginService>,
    /// Own-profile edits and username registration.
    pub profile: Arc<dyn ProfileCommand>,
    /// Profile reads and username search.
    pub profile_query: Arc<dyn ProfileQuery>,
    /// Shelf mutations.
    pub shelf: Arc<dyn ShelfCommand>,
    /// Shelf reads and observations.
    pub shelf_query: Arc<dyn ShelfQuery>,
    /// Friend request and friendship mutations.
    pub friends: Arc<dyn FriendsCommand>,
    /// Friend listings and relationship lookups.
    pub friends_query: Arc<dyn FriendsQuery>,
    /// Catalogue search and lookup.
    pub catalog: Arc<dyn CatalogLookup>,
}
