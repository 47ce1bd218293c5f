//! In-memory adapters for the document store ports.
//!
//! These back the development server and the behaviour tests. Each store
//! guards its state with one mutex so every write is atomic with respect to
//! other callers, and live observers are fed through `tokio::sync::watch`
//! channels that are pruned once the last subscription drops.

mod account_store;
mod friend_request_store;
mod profile_store;
mod shelf_store;

use std::sync::{Mutex, MutexGuard};

pub use account_store::InMemoryAccountStore;
pub use friend_request_store::InMemoryFriendRequestStore;
pub use profile_store::InMemoryProfileStore;
pub use shelf_store::InMemoryShelfStore;

/// Lock a store mutex, recovering the state if a writer panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
