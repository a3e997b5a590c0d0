//! Value types exchanged with remote playlist backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, PlaylistId, VideoId};

/// A placement record: one video's slot within one playlist.
///
/// At rest the positions of all entries in one playlist form the dense
/// range `0..count`. The item id is absent on entries that have not been
/// inserted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Placement id assigned by the remote system. Absent before insertion.
    #[serde(default)]
    pub item_id: Option<ItemId>,
    /// The video occupying the slot.
    pub video_id: VideoId,
    /// The playlist owning the slot.
    pub playlist_id: PlaylistId,
    /// Zero-based position within the playlist.
    #[serde(default)]
    pub position: Option<u64>,
    /// Video title when the backend supplies it. Logging only.
    #[serde(default)]
    pub title: Option<String>,
}

impl PlaylistEntry {
    /// Creates an entry for a video in a playlist, with no placement data.
    pub fn new(video_id: impl Into<VideoId>, playlist_id: impl Into<PlaylistId>) -> Self {
        Self {
            item_id: None,
            video_id: video_id.into(),
            playlist_id: playlist_id.into(),
            position: None,
            title: None,
        }
    }

    /// Sets the placement id.
    pub fn with_item_id(mut self, item_id: impl Into<ItemId>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    /// Sets the position.
    pub fn with_position(mut self, position: u64) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A candidate video fetched from a source, before selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEntry {
    /// The video's identifier.
    pub video_id: VideoId,
    /// The video's title, as reported by the source.
    pub title: String,
    /// Description text, when available.
    #[serde(default)]
    pub description: Option<String>,
    /// Publication timestamp, when available.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl VideoEntry {
    /// Creates a video entry.
    pub fn new(video_id: impl Into<VideoId>, title: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            description: None,
            published_at: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the publication timestamp.
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}
