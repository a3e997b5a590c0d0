//! Declarative description of one playlist sync.

use serde::{Deserialize, Serialize};

use cuesync_connector::{ChannelId, PlaylistId};

/// One sync job: where candidate videos come from, which season to keep,
/// and which playlist receives the result.
///
/// Tasks are handed to the engine already parsed; loading them from
/// config files is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTask {
    /// The playlist the lineup is written to.
    pub target_playlist_id: PlaylistId,
    /// Playlists to pull candidate videos from.
    #[serde(default)]
    pub source_playlist_ids: Vec<PlaylistId>,
    /// Channels to pull candidate videos from.
    #[serde(default)]
    pub source_channel_ids: Vec<ChannelId>,
    /// Season to keep; absent keeps every classified video.
    #[serde(default)]
    pub season: Option<u32>,
    /// Title pattern overriding the default season/episode regex.
    #[serde(default)]
    pub title_pattern: Option<String>,
}

impl SyncTask {
    /// A task targeting one playlist, with no sources yet.
    pub fn new(target_playlist_id: impl Into<PlaylistId>) -> Self {
        Self {
            target_playlist_id: target_playlist_id.into(),
            source_playlist_ids: Vec::new(),
            source_channel_ids: Vec::new(),
            season: None,
            title_pattern: None,
        }
    }

    /// Adds a source playlist.
    pub fn with_source_playlist(mut self, id: impl Into<PlaylistId>) -> Self {
        self.source_playlist_ids.push(id.into());
        self
    }

    /// Adds a source channel.
    pub fn with_source_channel(mut self, id: impl Into<ChannelId>) -> Self {
        self.source_channel_ids.push(id.into());
        self
    }

    /// Restricts the lineup to one season.
    pub fn with_season(mut self, season: u32) -> Self {
        self.season = Some(season);
        self
    }

    /// Overrides the title classification pattern.
    pub fn with_title_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.title_pattern = Some(pattern.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let task = SyncTask::new("pl-target")
            .with_source_playlist("pl-src")
            .with_source_channel("ch-1")
            .with_season(2)
            .with_title_pattern(r"(?P<season>\d+)x(?P<episode>\d+)");

        assert_eq!(task.target_playlist_id.as_str(), "pl-target");
        assert_eq!(task.source_playlist_ids.len(), 1);
        assert_eq!(task.source_channel_ids.len(), 1);
        assert_eq!(task.season, Some(2));
        assert!(task.title_pattern.is_some());
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let json = r#"{"target_playlist_id":"pl-9"}"#;
        let task: SyncTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.target_playlist_id.as_str(), "pl-9");
        assert!(task.source_playlist_ids.is_empty());
        assert!(task.source_channel_ids.is_empty());
        assert_eq!(task.season, None);
        assert_eq!(task.title_pattern, None);
    }
}
