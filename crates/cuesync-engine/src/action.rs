//! Planned mutations against a remote playlist.
//!
//! The planner emits [`PlannedAction`] values; the executor drains them in
//! emission order. Keeping actions as plain data lets a whole plan be
//! built, inspected, and costed before any I/O happens. Execution never
//! returns an error: every per-action failure is folded into an
//! [`ActionOutcome`] so one bad call cannot abort the rest of a batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cuesync_connector::{
    ItemId, OpKind, PlaylistEntry, PlaylistId, PlaylistStore, StoreError, VideoId,
};

/// Contract violations caught when an action is constructed.
///
/// These are programming errors in the caller, not runtime states: an
/// action missing a required identifier could never execute, so it is
/// rejected before it enters a plan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    /// A delete or update was built from an entry without a placement id.
    #[error("action requires a placement id (video {video_id})")]
    MissingItemId {
        /// The video whose entry lacked a placement id.
        video_id: VideoId,
    },

    /// The video id was empty.
    #[error("action requires a non-empty video id")]
    EmptyVideoId,

    /// The playlist id was empty.
    #[error("action requires a non-empty playlist id")]
    EmptyPlaylistId,
}

/// One pending mutation, closed over everything needed to execute it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlannedAction {
    /// Remove a placement from the playlist.
    Delete {
        /// Placement id to delete.
        item_id: ItemId,
        /// Video occupying the placement, for logging.
        video_id: VideoId,
        /// Position the item held when the plan was computed.
        original_position: Option<u64>,
    },
    /// Insert a video at a position, shifting successors.
    Insert {
        /// Video to insert.
        video_id: VideoId,
        /// Playlist to insert into.
        playlist_id: PlaylistId,
        /// Position the new item should land on.
        target_position: u64,
    },
    /// Move an existing item to a new position.
    Update {
        /// Placement id to move.
        item_id: ItemId,
        /// Video occupying the placement.
        video_id: VideoId,
        /// Playlist owning the placement.
        playlist_id: PlaylistId,
        /// Position the item should end up at.
        target_position: u64,
    },
}

impl PlannedAction {
    /// Builds a delete for an existing entry.
    ///
    /// Fails when the entry carries no placement id: without one the
    /// remote item cannot be addressed.
    pub fn delete(entry: &PlaylistEntry) -> Result<Self, ActionError> {
        let item_id = entry
            .item_id
            .clone()
            .ok_or_else(|| ActionError::MissingItemId {
                video_id: entry.video_id.clone(),
            })?;
        Ok(Self::Delete {
            item_id,
            video_id: entry.video_id.clone(),
            original_position: entry.position,
        })
    }

    /// Builds an insert of `video_id` at `target_position`.
    pub fn insert(
        video_id: VideoId,
        playlist_id: PlaylistId,
        target_position: u64,
    ) -> Result<Self, ActionError> {
        if video_id.is_empty() {
            return Err(ActionError::EmptyVideoId);
        }
        if playlist_id.is_empty() {
            return Err(ActionError::EmptyPlaylistId);
        }
        Ok(Self::Insert {
            video_id,
            playlist_id,
            target_position,
        })
    }

    /// Builds a move of an existing entry to `target_position`.
    pub fn update(entry: &PlaylistEntry, target_position: u64) -> Result<Self, ActionError> {
        let item_id = entry
            .item_id
            .clone()
            .ok_or_else(|| ActionError::MissingItemId {
                video_id: entry.video_id.clone(),
            })?;
        if entry.video_id.is_empty() {
            return Err(ActionError::EmptyVideoId);
        }
        if entry.playlist_id.is_empty() {
            return Err(ActionError::EmptyPlaylistId);
        }
        Ok(Self::Update {
            item_id,
            video_id: entry.video_id.clone(),
            playlist_id: entry.playlist_id.clone(),
            target_position,
        })
    }

    /// The quota cost kind of this action.
    pub fn cost_kind(&self) -> OpKind {
        match self {
            Self::Delete { .. } => OpKind::Delete,
            Self::Insert { .. } => OpKind::Insert,
            Self::Update { .. } => OpKind::Update,
        }
    }

    /// Human-readable summary for logs and reports.
    pub fn describe(&self) -> String {
        match self {
            Self::Delete {
                item_id,
                video_id,
                original_position,
            } => {
                let position = original_position
                    .map_or_else(|| "unknown".to_string(), |p| p.to_string());
                format!(
                    "Delete: video_id={video_id}, original_position={position}, item_id={item_id}"
                )
            }
            Self::Insert {
                video_id,
                playlist_id,
                target_position,
            } => format!(
                "Insert: video_id={video_id}, target_position={target_position}, playlist_id={playlist_id}"
            ),
            Self::Update {
                item_id,
                video_id,
                target_position,
                ..
            } => format!(
                "Update: video_id={video_id}, target_position={target_position}, item_id={item_id}"
            ),
        }
    }

    /// Executes the action against the store.
    ///
    /// In dry-run mode no I/O happens; the intended effect is logged and
    /// recorded as simulated. Otherwise the matching port method is
    /// called, with failures captured in the outcome: a quota-denied call
    /// becomes a skip, a delete of an already-absent item counts as
    /// executed, everything else failing becomes a failed outcome.
    pub async fn execute(&self, store: &dyn PlaylistStore, dry_run: bool) -> ActionOutcome {
        let description = self.describe();
        let kind = self.cost_kind();

        if dry_run {
            tracing::info!(action = %description, "Dry run, no call issued");
            return ActionOutcome::simulated(kind, description);
        }

        let result = match self {
            Self::Delete {
                item_id, video_id, ..
            } => match store.delete_item(item_id).await {
                Err(StoreError::NotFound { .. }) => {
                    tracing::debug!(
                        item_id = %item_id,
                        video_id = %video_id,
                        "Item already absent, delete treated as executed"
                    );
                    Ok(())
                }
                other => other,
            },
            Self::Insert {
                video_id,
                playlist_id,
                target_position,
            } => {
                let entry = PlaylistEntry::new(video_id.clone(), playlist_id.clone())
                    .with_position(*target_position);
                store.insert_item(&entry).await.map(|_| ())
            }
            Self::Update {
                item_id,
                video_id,
                playlist_id,
                target_position,
            } => {
                let entry = PlaylistEntry::new(video_id.clone(), playlist_id.clone())
                    .with_item_id(item_id.clone())
                    .with_position(*target_position);
                store.update_item(&entry).await.map(|_| ())
            }
        };

        match result {
            Ok(()) => {
                tracing::info!(action = %description, "Action executed");
                ActionOutcome::executed(kind, description)
            }
            Err(err @ StoreError::QuotaExhausted { .. }) => {
                tracing::warn!(action = %description, error = %err, "Action skipped, quota denied");
                ActionOutcome::skipped(kind, description, err.to_string())
            }
            Err(err) => {
                tracing::error!(
                    action = %description,
                    error = %err,
                    error_code = err.error_code(),
                    "Action failed"
                );
                ActionOutcome::failed(kind, description, format!("{err} ({})", err.error_code()))
            }
        }
    }
}

/// How one action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// The call was made and the remote system accepted it.
    Executed,
    /// The call was made and failed; later actions still ran.
    Failed,
    /// The call was never made because quota denied it.
    Skipped,
}

/// Record of one action's execution, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Cost kind of the action.
    pub kind: OpKind,
    /// The action's description at execution time.
    pub description: String,
    /// How the action ended.
    pub status: ActionStatus,
    /// Error message when the action failed or was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// When the action was executed.
    pub executed_at: DateTime<Utc>,
}

impl ActionOutcome {
    /// Records a successfully executed action.
    pub fn executed(kind: OpKind, description: String) -> Self {
        Self {
            kind,
            description,
            status: ActionStatus::Executed,
            error: None,
            dry_run: false,
            executed_at: Utc::now(),
        }
    }

    /// Records a dry-run action that issued no call.
    pub fn simulated(kind: OpKind, description: String) -> Self {
        Self {
            kind,
            description,
            status: ActionStatus::Executed,
            error: None,
            dry_run: true,
            executed_at: Utc::now(),
        }
    }

    /// Records a failed action.
    pub fn failed(kind: OpKind, description: String, error: String) -> Self {
        Self {
            kind,
            description,
            status: ActionStatus::Failed,
            error: Some(error),
            dry_run: false,
            executed_at: Utc::now(),
        }
    }

    /// Records an action skipped for lack of quota.
    pub fn skipped(kind: OpKind, description: String, error: String) -> Self {
        Self {
            kind,
            description,
            status: ActionStatus::Skipped,
            error: Some(error),
            dry_run: false,
            executed_at: Utc::now(),
        }
    }

    /// Whether the action went through (or would have, in a dry run).
    pub fn is_executed(&self) -> bool {
        matches!(self.status, ActionStatus::Executed)
    }

    /// Whether the action failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, ActionStatus::Failed)
    }

    /// Whether the action was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, ActionStatus::Skipped)
    }
}
