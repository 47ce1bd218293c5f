//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`CatalogSource`]) are implemented by
//! outbound adapters; driving ports (`*Command`, `*Query`, [`CatalogLookup`],
//! [`LoginService`]) are implemented by domain services and called by inbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod catalog_lookup;
mod catalog_source;
mod friend_request_repository;
mod friends_command;
mod login_service;
mod profile_command;
mod profile_repository;
mod shelf_command;
mod shelf_repository;

#[cfg(test)]
pub use catalog_lookup::MockCatalogLookup;
pub use catalog_lookup::CatalogLookup;
#[cfg(test)]
pub use catalog_source::MockCatalogSource;
pub use catalog_source::{
    CATALOG_DEFAULT_RESULTS, CATALOG_MAX_RESULTS, CatalogPage, CatalogQuery,
    CatalogQueryValidationError, CatalogSource, CatalogSourceError, FixtureCatalogSource, Volume,
};
#[cfg(test)]
pub use friend_request_repository::MockFriendRequestRepository;
pub use friend_request_repository::{FriendRequestRepository, FriendRequestRepositoryError};
#[cfg(test)]
pub use friends_command::{MockFriendsCommand, MockFriendsQuery};
pub use friends_command::{FriendsCommand, FriendsQuery, SendFriendRequest};
pub use login_service::{FIXTURE_UID, FixtureLoginService, LoginService};
#[cfg(test)]
pub use profile_command::{MockProfileCommand, MockProfileQuery};
pub use profile_command::{
    PROFILE_NAME_MAX, ProfileCommand, ProfileQuery, UpdateProfileRequest, UserSearchHit,
};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use shelf_command::{MockShelfCommand, MockShelfQuery};
pub use shelf_command::{
    SetStatusRequest, ShelfCommand, ShelfOutcome, ShelfQuery, StatusSubscription,
    UpsertBookRequest,
};
#[cfg(test)]
pub use shelf_repository::MockShelfRepository;
pub use shelf_repository::{
    BookSubscription, ShelfRepository, ShelfRepositoryError, ShelfSubscription,
};
