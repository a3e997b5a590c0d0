//! Shared test support: a stateful in-memory playlist store.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use cuesync_connector::{
    ItemId, OpKind, PlaylistEntry, PlaylistId, PlaylistStore, QuotaPool, StoreError, StoreResult,
    VideoId,
};

/// Page size the fake reports, matching the real API's listing pages.
const PAGE_SIZE: usize = 50;

/// In-memory `PlaylistStore` mirroring remote position semantics:
/// inserts shift successors, deletes compact, updates move, and every
/// mutation leaves positions dense. Charges an injected [`QuotaPool`]
/// the way a real backend does: one unit per listing page, fifty per
/// mutation. Individual videos can be set up to fail their calls.
pub struct InMemoryStore {
    playlist_id: PlaylistId,
    items: Mutex<Vec<PlaylistEntry>>,
    quota: Arc<QuotaPool>,
    next_item_id: AtomicU64,
    fail_videos: Mutex<HashSet<VideoId>>,
    fail_listing: AtomicBool,
    list_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl InMemoryStore {
    #[must_use]
    pub fn new(playlist_id: &str, quota: Arc<QuotaPool>) -> Self {
        Self {
            playlist_id: PlaylistId::new(playlist_id),
            items: Mutex::new(Vec::new()),
            quota,
            next_item_id: AtomicU64::new(1),
            fail_videos: Mutex::new(HashSet::new()),
            fail_listing: AtomicBool::new(false),
            list_calls: AtomicUsize::new(0),
            insert_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// Seeds the playlist with `(video_id, position)` pairs, assigning
    /// item ids the way the remote system would.
    #[must_use]
    pub fn with_items(self, seed: &[(&str, u64)]) -> Self {
        {
            let mut items = self.items.lock().unwrap();
            for (video_id, position) in seed {
                let n = self.next_item_id.fetch_add(1, Ordering::SeqCst);
                items.push(
                    PlaylistEntry::new(*video_id, self.playlist_id.clone())
                        .with_item_id(format!("item-{n}"))
                        .with_position(*position),
                );
            }
            items.sort_by_key(|e| e.position.unwrap_or(u64::MAX));
            for (idx, entry) in items.iter_mut().enumerate() {
                entry.position = Some(idx as u64);
            }
        }
        self
    }

    /// Makes inserts and updates of `video_id` fail with a transport
    /// error.
    #[must_use]
    pub fn with_failing_video(self, video_id: &str) -> Self {
        self.fail_videos
            .lock()
            .unwrap()
            .insert(VideoId::new(video_id));
        self
    }

    /// Makes listing fail with a transport error.
    #[must_use]
    pub fn with_failing_listing(self) -> Self {
        self.fail_listing.store(true, Ordering::SeqCst);
        self
    }

    /// The playlist's video ids in current order.
    pub fn ordered_video_ids(&self) -> Vec<String> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.video_id.as_str().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.insert_calls() + self.update_calls() + self.delete_calls()
    }

    fn charge(&self, kind: OpKind) -> StoreResult<()> {
        let cost = self.cost_of(kind);
        if self.quota.deduct_if_available(cost) {
            Ok(())
        } else {
            Err(StoreError::quota_exhausted(cost, self.quota.remaining()))
        }
    }

    fn fails(&self, video_id: &VideoId) -> bool {
        self.fail_videos.lock().unwrap().contains(video_id)
    }

    fn renumber(items: &mut [PlaylistEntry]) {
        for (idx, entry) in items.iter_mut().enumerate() {
            entry.position = Some(idx as u64);
        }
    }
}

#[async_trait]
impl PlaylistStore for InMemoryStore {
    async fn list_items(&self, playlist_id: &PlaylistId) -> StoreResult<Vec<PlaylistEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(StoreError::transport("listing failed"));
        }
        if playlist_id != &self.playlist_id {
            return Err(StoreError::not_found(format!("playlist {playlist_id}")));
        }
        let items = self.items.lock().unwrap().clone();
        let pages = items.len().div_ceil(PAGE_SIZE).max(1);
        for _ in 0..pages {
            self.charge(OpKind::Get)?;
        }
        Ok(items)
    }

    async fn insert_item(&self, entry: &PlaylistEntry) -> StoreResult<Option<PlaylistEntry>> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fails(&entry.video_id) {
            return Err(StoreError::transport(format!(
                "injected failure for {}",
                entry.video_id
            )));
        }
        self.charge(OpKind::Insert)?;

        let mut items = self.items.lock().unwrap();
        let at = (entry.position.unwrap_or(items.len() as u64) as usize).min(items.len());
        let n = self.next_item_id.fetch_add(1, Ordering::SeqCst);
        let assigned = entry.clone().with_item_id(format!("item-{n}"));
        items.insert(at, assigned.clone());
        Self::renumber(&mut items);
        Ok(Some(items[at].clone()))
    }

    async fn update_item(&self, entry: &PlaylistEntry) -> StoreResult<Option<PlaylistEntry>> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fails(&entry.video_id) {
            return Err(StoreError::transport(format!(
                "injected failure for {}",
                entry.video_id
            )));
        }
        self.charge(OpKind::Update)?;

        let item_id = entry
            .item_id
            .as_ref()
            .ok_or_else(|| StoreError::invalid_response("update without item id"))?;
        let mut items = self.items.lock().unwrap();
        let Some(idx) = items
            .iter()
            .position(|e| e.item_id.as_ref() == Some(item_id))
        else {
            return Err(StoreError::not_found(format!("item {item_id}")));
        };
        let mut moved = items.remove(idx);
        let at = (entry.position.unwrap_or(items.len() as u64) as usize).min(items.len());
        moved.position = entry.position;
        items.insert(at, moved);
        Self::renumber(&mut items);
        Ok(Some(items[at].clone()))
    }

    async fn delete_item(&self, item_id: &ItemId) -> StoreResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.charge(OpKind::Delete)?;

        let mut items = self.items.lock().unwrap();
        let Some(idx) = items
            .iter()
            .position(|e| e.item_id.as_ref() == Some(item_id))
        else {
            return Err(StoreError::not_found(format!("item {item_id}")));
        };
        items.remove(idx);
        Self::renumber(&mut items);
        Ok(())
    }
}

/// Installs a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
