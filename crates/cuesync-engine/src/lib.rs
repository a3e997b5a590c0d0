//! Playlist reconciliation engine.
//!
//! Given the current items of a remote playlist and a desired ordering
//! of video ids, this crate computes the minimal sequence of delete,
//! insert, and move actions that transforms one into the other, and
//! applies it through a [`PlaylistStore`](cuesync_connector::PlaylistStore)
//! under a quota budget.
//!
//! The pieces, leaves first:
//!
//! - [`simulator::PositionSimulator`] mirrors the remote position
//!   semantics in memory so the planner can record the real position
//!   every action will land on.
//! - [`desired::DesiredSequence`] is the deduplicated target ordering.
//! - [`action::PlannedAction`] is the closed set of mutation intents.
//! - [`planner::plan_changes`] diffs current against desired into an
//!   ordered [`planner::ChangePlan`].
//! - [`executor::PlaylistReconciler`] gates the plan on aggregate quota
//!   cost and drains it with per-action failure isolation, producing a
//!   [`report::RunReport`].
//!
//! The selection side ([`episodes`], [`selection`], [`task`]) turns
//! fetched source videos into the desired ordering for a season.

pub mod action;
pub mod desired;
pub mod episodes;
pub mod error;
pub mod executor;
pub mod planner;
pub mod report;
pub mod selection;
pub mod simulator;
pub mod task;

pub use action::{ActionError, ActionOutcome, ActionStatus, PlannedAction};
pub use desired::DesiredSequence;
pub use episodes::{DEFAULT_SEASON_EPISODE_PATTERN, EpisodeExtractor, EpisodeInfo};
pub use error::{EngineError, EngineResult};
pub use executor::PlaylistReconciler;
pub use planner::{ChangePlan, plan_changes};
pub use report::RunReport;
pub use selection::{collect_videos, season_lineup};
pub use simulator::PositionSimulator;
pub use task::SyncTask;
