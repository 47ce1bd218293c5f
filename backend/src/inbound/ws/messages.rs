//! Wire-level message definitions for the WebSocket adapter.
//!
//! Subscription values are turned into these payloads before being serialised
//! to JSON and sent to connected clients.

use serde::Serialize;

use crate::domain::{ReadingStatus, VolumeId};

/// Outbound frames pushed on the shelf feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FeedMessage {
    /// The observed volume's status changed. `status` is `null` once the
    /// book left every shelf.
    #[serde(rename_all = "camelCase")]
    ShelfStatus {
        /// Observed volume.
        volume_id: VolumeId,
        /// Current status.
        status: Option<ReadingStatus>,
    },
}

impl FeedMessage {
    /// Status frame for `volume_id`.
    pub fn shelf_status(volume_id: VolumeId, status: Option<ReadingStatus>) -> Self {
        Self::ShelfStatus { volume_id, status }
    }
}
