//! In-memory mirror of a remote playlist's item-to-position mapping.

use cuesync_connector::{ItemId, PlaylistEntry, PlaylistId, VideoId};

use crate::desired::DesiredSequence;

/// One simulated slot: a placement record plus the index its video holds
/// in the desired sequence, if any.
#[derive(Debug, Clone)]
struct SimEntry {
    item: PlaylistEntry,
    target_position: Option<usize>,
}

/// Simulates a playlist so the planner can ask what real position an
/// insert or move would land on, without touching the remote system.
///
/// The simulator owns its entries exclusively. Every mutating call
/// renumbers positions back to the dense range `0..len`, mirroring how
/// the remote system shifts neighbors on insert, delete, and move. As
/// long as simulated mutations are emitted as actions in the same order,
/// replaying the actions against the real backend reproduces the
/// simulated end state.
#[derive(Debug)]
pub struct PositionSimulator {
    playlist_id: PlaylistId,
    desired: DesiredSequence,
    entries: Vec<SimEntry>,
}

impl PositionSimulator {
    /// Builds a simulator over the current items of `playlist_id`.
    ///
    /// Items are ordered by their reported position, items without one
    /// sorting last in input order, then renumbered densely. Each entry
    /// is tagged with the index of its video id in `desired`. Items
    /// missing a playlist id inherit `playlist_id`.
    pub fn new(
        playlist_id: PlaylistId,
        items: Vec<PlaylistEntry>,
        desired: &DesiredSequence,
    ) -> Self {
        let mut entries: Vec<SimEntry> = items
            .into_iter()
            .map(|mut item| {
                if item.playlist_id.is_empty() {
                    item.playlist_id = playlist_id.clone();
                }
                let target_position = desired.index_of(&item.video_id);
                SimEntry {
                    item,
                    target_position,
                }
            })
            .collect();
        entries.sort_by_key(|e| e.item.position.unwrap_or(u64::MAX));

        let mut sim = Self {
            playlist_id,
            desired: desired.clone(),
            entries,
        };
        sim.renumber();
        sim
    }

    /// The playlist this simulator mirrors.
    pub fn playlist_id(&self) -> &PlaylistId {
        &self.playlist_id
    }

    /// Number of simulated entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the simulated playlist is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Simulates inserting `video_id` so it ends up at desired index
    /// `target`.
    ///
    /// The slot chosen is just before the first entry whose own target is
    /// at or past `target`; with no such entry the video is appended.
    /// Returns the real position assigned, which can differ from `target`
    /// while earlier inserts and deletes are still pending. Returns
    /// `None`, mutating nothing, when the video is not part of the
    /// desired sequence.
    pub fn insert(&mut self, video_id: &VideoId, target: usize) -> Option<u64> {
        if self.desired.index_of(video_id).is_none() {
            tracing::debug!(video_id = %video_id, "Insert skipped, video is not desired");
            return None;
        }

        let insert_at = self.slot_for(target);
        let item = PlaylistEntry::new(video_id.clone(), self.playlist_id.clone())
            .with_position(insert_at as u64);
        self.entries.insert(
            insert_at,
            SimEntry {
                item,
                target_position: Some(target),
            },
        );
        self.renumber();
        Some(insert_at as u64)
    }

    /// Removes the first entry holding `video_id`. Returns whether an
    /// entry was removed.
    pub fn remove_by_video_id(&mut self, video_id: &VideoId) -> bool {
        match self
            .entries
            .iter()
            .position(|e| &e.item.video_id == video_id)
        {
            Some(idx) => {
                self.entries.remove(idx);
                self.renumber();
                true
            }
            None => false,
        }
    }

    /// Removes the entry with the given placement id. Returns whether an
    /// entry was removed.
    ///
    /// Placement ids disambiguate duplicates of the same video.
    pub fn remove_by_item_id(&mut self, item_id: &ItemId) -> bool {
        match self
            .entries
            .iter()
            .position(|e| e.item.item_id.as_ref() == Some(item_id))
        {
            Some(idx) => {
                self.entries.remove(idx);
                self.renumber();
                true
            }
            None => false,
        }
    }

    /// Moves the entry holding `video_id` so it ends up at desired index
    /// `target`, as remove followed by reinsert.
    ///
    /// Returns the real position assigned, or `None`, mutating nothing,
    /// when the video has no entry.
    pub fn update_position(&mut self, video_id: &VideoId, target: usize) -> Option<u64> {
        let idx = self
            .entries
            .iter()
            .position(|e| &e.item.video_id == video_id)?;
        let mut entry = self.entries.remove(idx);
        self.renumber();

        let insert_at = self.slot_for(target);
        entry.target_position = Some(target);
        entry.item.position = Some(insert_at as u64);
        self.entries.insert(insert_at, entry);
        self.renumber();
        Some(insert_at as u64)
    }

    /// Returns true if the entry currently sits at its target index.
    ///
    /// Entries are matched by placement id when the argument carries one,
    /// else by video id. Unknown entries are never at target.
    pub fn is_at_target(&self, entry: &PlaylistEntry) -> bool {
        match self.find_index(entry) {
            Some(idx) => self.entries[idx]
                .target_position
                .is_some_and(|target| target == idx),
            None => false,
        }
    }

    /// Current simulated position of the entry, or `None` when it is not
    /// in the simulator.
    pub fn position_of(&self, entry: &PlaylistEntry) -> Option<u64> {
        self.find_index(entry).map(|idx| idx as u64)
    }

    /// Ordered snapshot of the simulated playlist, positions dense.
    pub fn ordered_view(&self) -> Vec<PlaylistEntry> {
        self.entries.iter().map(|e| e.item.clone()).collect()
    }

    fn find_index(&self, entry: &PlaylistEntry) -> Option<usize> {
        match &entry.item_id {
            Some(item_id) => self
                .entries
                .iter()
                .position(|e| e.item.item_id.as_ref() == Some(item_id)),
            None => self
                .entries
                .iter()
                .position(|e| e.item.video_id == entry.video_id),
        }
    }

    /// Index just before the first entry whose target is at or past
    /// `target`; the end of the list when no entry qualifies.
    fn slot_for(&self, target: usize) -> usize {
        self.entries
            .iter()
            .position(|e| e.target_position.is_some_and(|t| t >= target))
            .unwrap_or(self.entries.len())
    }

    /// Writes the current list order back into every entry's position.
    fn renumber(&mut self) {
        for (idx, entry) in self.entries.iter_mut().enumerate() {
            entry.item.position = Some(idx as u64);
        }
    }
}
