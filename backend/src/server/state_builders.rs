//! Builders for HTTP and WebSocket state over the in-memory stores.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use readtrack::domain::{FriendsService, ProfileService, ShelfService};
use readtrack::inbound::http::state::HttpState;
use readtrack::inbound::ws::state::WsState;
use readtrack::outbound::memory::{
    InMemoryAccountStore, InMemoryFriendRequestStore, InMemoryProfileStore, InMemoryShelfStore,
};

use super::ServerConfig;

/// Store handles shared by every service of one server instance.
struct Stores {
    shelves: Arc<InMemoryShelfStore>,
    profiles: Arc<InMemoryProfileStore>,
    requests: Arc<InMemoryFriendRequestStore>,
    accounts: Arc<InMemoryAccountStore>,
}

impl Stores {
    fn new() -> Self {
        Self {
            shelves: Arc::new(InMemoryShelfStore::new()),
            profiles: Arc::new(InMemoryProfileStore::new()),
            requests: Arc::new(InMemoryFriendRequestStore::new()),
            accounts: Arc::new(InMemoryAccountStore::new()),
        }
    }
}

/// Build the shared HTTP and WebSocket state from the configured policies.
///
/// Both states share one shelf service so a status written over HTTP reaches
/// the WebSocket observers of the same store.
pub(super) fn build_states(config: &ServerConfig) -> (HttpState, WsState) {
    let stores = Stores::new();
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let shelf = Arc::new(
        ShelfService::new(Arc::clone(&stores.shelves), Arc::clone(&clock))
            .with_page_count_policy(config.page_count_policy),
    );
    let friends = Arc::new(
        FriendsService::new(
            Arc::clone(&stores.profiles),
            Arc::clone(&stores.requests),
            clock,
        )
        .with_duplicate_policy(config.duplicate_policy),
    );
    let profile = Arc::new(ProfileService::new(
        Arc::clone(&stores.profiles),
        Arc::clone(&stores.requests),
    ));

    let http_state = HttpState {
        login: stores.accounts,
        profile: profile.clone(),
        profile_query: profile,
        shelf: shelf.clone(),
        shelf_query: shelf.clone(),
        friends: friends.clone(),
        friends_query: friends,
        catalog: Arc::clone(&config.catalog),
    };
    (http_state, WsState::new(shelf))
}
