//! Desired playlist orderings.

use std::collections::HashMap;

use cuesync_connector::VideoId;

/// The target arrangement of a playlist: an ordered, duplicate-free list
/// of video ids.
///
/// Duplicates in the input are dropped, first occurrence wins, so index
/// and membership lookups are unambiguous during planning.
#[derive(Debug, Clone, Default)]
pub struct DesiredSequence {
    ids: Vec<VideoId>,
    index: HashMap<VideoId, usize>,
}

impl DesiredSequence {
    /// Builds a sequence from raw ids, dropping later duplicates.
    pub fn new(ids: &[VideoId]) -> Self {
        let mut ordered = Vec::with_capacity(ids.len());
        let mut index = HashMap::with_capacity(ids.len());
        for id in ids {
            if index.contains_key(id) {
                tracing::debug!(video_id = %id, "Dropping duplicate desired id");
                continue;
            }
            index.insert(id.clone(), ordered.len());
            ordered.push(id.clone());
        }
        Self {
            ids: ordered,
            index,
        }
    }

    /// Target index of a video id, if it is desired.
    pub fn index_of(&self, id: &VideoId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns true if the video id is part of the sequence.
    pub fn contains(&self, id: &VideoId) -> bool {
        self.index.contains_key(id)
    }

    /// The ids in target order.
    pub fn ids(&self) -> &[VideoId] {
        &self.ids
    }

    /// Number of distinct desired ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is desired.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
