//! Shared WebSocket adapter state.
//!
//! The live feed depends on the shelf query port only, so tests can drive it
//! with in-memory stores.

use std::sync::Arc;

use crate::domain::ports::ShelfQuery;

/// Dependency bundle for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    /// Source of shelf status subscriptions.
    pub shelf_query: Arc<dyn ShelfQuery>,
}

impl WsState {
    /// Construct state from an explicit port implementation.
    pub fn new(shelf_query: Arc<dyn ShelfQuery>) -> Self {
        Self { shelf_query }
    }
}
