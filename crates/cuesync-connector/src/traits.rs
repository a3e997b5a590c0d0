//! Port traits for remote playlist backends and video sources.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::ids::{ItemId, PlaylistId};
use crate::quota::OpKind;
use crate::types::{PlaylistEntry, VideoEntry};

/// Interface to a remote ordered playlist backend.
///
/// Implementations own transport, paging, and per-call quota deduction.
/// The reconciliation engine only sees complete listings and single-item
/// mutations; it never pages or retries itself.
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Lists every item of a playlist in remote order.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - The playlist to read
    async fn list_items(&self, playlist_id: &PlaylistId) -> StoreResult<Vec<PlaylistEntry>>;

    /// Inserts a new item at the entry's position, shifting successors.
    ///
    /// Returns the placement record assigned by the remote system, when
    /// the backend reports one.
    ///
    /// # Arguments
    ///
    /// * `entry` - Video, playlist, and position of the new item
    async fn insert_item(&self, entry: &PlaylistEntry) -> StoreResult<Option<PlaylistEntry>>;

    /// Moves an existing item to the entry's position.
    ///
    /// # Arguments
    ///
    /// * `entry` - Placement id, video, playlist, and new position
    async fn update_item(&self, entry: &PlaylistEntry) -> StoreResult<Option<PlaylistEntry>>;

    /// Deletes the item with the given placement id.
    ///
    /// # Arguments
    ///
    /// * `item_id` - Placement id of the item to remove
    async fn delete_item(&self, item_id: &ItemId) -> StoreResult<()>;

    /// Returns the quota cost of one call of the given kind.
    ///
    /// Cost is a property of the remote API, so the table lives with the
    /// backend. The default matches the metered API this engine was built
    /// against: reads cost 1 unit per page, every mutation costs 50.
    fn cost_of(&self, kind: OpKind) -> u64 {
        match kind {
            OpKind::Get => 1,
            OpKind::Insert | OpKind::Delete | OpKind::Update => 50,
        }
    }
}

/// A source of candidate videos.
///
/// A source is bound to one channel or one source playlist when it is
/// constructed; fetching takes no further addressing.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Fetches all candidate videos from this source, in source order.
    async fn fetch_videos(&self) -> StoreResult<Vec<VideoEntry>>;
}
