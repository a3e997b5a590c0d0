//! Error types for reconciliation runs.
//!
//! Only conditions that abort a whole run live here. Failures of single
//! planned actions are captured as outcomes, not errors; see
//! [`crate::action::ActionOutcome`].

use thiserror::Error;

use cuesync_connector::{PlaylistId, StoreError};

use crate::action::ActionError;

/// Result type for reconciliation runs.
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal conditions that abort a reconciliation run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The target playlist id was empty.
    #[error("target playlist id is empty")]
    EmptyPlaylistId,

    /// Reading the current playlist state failed.
    #[error("failed to read playlist {playlist_id}: {source}")]
    StateRead {
        /// The playlist that could not be read.
        playlist_id: PlaylistId,
        #[source]
        source: StoreError,
    },

    /// The plan's aggregate cost exceeds the remaining quota.
    #[error("insufficient quota: plan costs {required} units, {remaining} remaining")]
    QuotaExhausted {
        /// Units the full plan would cost.
        required: u64,
        /// Units left in the pool.
        remaining: u64,
    },

    /// A planned action was structurally invalid.
    #[error(transparent)]
    InvalidAction(#[from] ActionError),
}
