//! Building a desired sequence from fetched source videos.
//!
//! Pure functions: merge the batches fetched from every source, classify
//! titles, filter to the task's season, and order by episode. The result
//! is the id sequence handed to the reconciler.

use std::collections::HashSet;

use cuesync_connector::{VideoEntry, VideoId};

use crate::episodes::{EpisodeExtractor, EpisodeInfo};
use crate::task::SyncTask;

/// Merges per-source batches into one deduplicated list, first
/// occurrence of a video id winning.
pub fn collect_videos(batches: Vec<Vec<VideoEntry>>) -> Vec<VideoEntry> {
    let mut seen: HashSet<VideoId> = HashSet::new();
    let mut merged = Vec::new();
    for batch in batches {
        for video in batch {
            if seen.insert(video.video_id.clone()) {
                merged.push(video);
            } else {
                tracing::debug!(video_id = %video.video_id, "Dropping duplicate source video");
            }
        }
    }
    merged
}

/// Selects and orders the videos for a task's season.
///
/// Titles are classified with the task's pattern override when one is
/// set; an invalid override logs a warning and falls back to the default
/// pattern. Unclassified videos are dropped. A task without a season
/// keeps every classified video. The survivors are sorted by episode
/// ascending, input order breaking ties, and returned as ids.
pub fn season_lineup(videos: &[VideoEntry], task: &SyncTask) -> Vec<VideoId> {
    let extractor = match &task.title_pattern {
        Some(pattern) => EpisodeExtractor::with_pattern(pattern).unwrap_or_else(|err| {
            tracing::warn!(
                pattern = %pattern,
                error = %err,
                "Invalid title pattern override, falling back to default"
            );
            EpisodeExtractor::new()
        }),
        None => EpisodeExtractor::new(),
    };

    let mut classified: Vec<(&VideoEntry, EpisodeInfo)> = videos
        .iter()
        .map(|video| (video, extractor.extract(&video.title)))
        .filter(|(video, info)| {
            if !info.is_classified() {
                tracing::debug!(
                    video_id = %video.video_id,
                    title = %video.title,
                    "Title not classified, excluding"
                );
                return false;
            }
            match task.season {
                Some(season) => info.season == Some(season),
                None => true,
            }
        })
        .collect();

    classified.sort_by_key(|(_, info)| info.episode);
    let lineup: Vec<VideoId> = classified
        .into_iter()
        .map(|(video, _)| video.video_id.clone())
        .collect();
    tracing::info!(
        target = %task.target_playlist_id,
        season = task.season,
        candidates = videos.len(),
        selected = lineup.len(),
        "Season lineup selected"
    );
    lineup
}
