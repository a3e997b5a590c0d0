//! Quota-gated execution of change plans.

use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use cuesync_connector::{PlaylistId, PlaylistStore, QuotaPool, VideoId};

use crate::action::ActionOutcome;
use crate::desired::DesiredSequence;
use crate::error::{EngineError, EngineResult};
use crate::planner::{ChangePlan, plan_changes};
use crate::report::RunReport;

/// Phases a reconciliation run moves through, in order. None is ever
/// revisited; a failed individual action stays in `Executing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunPhase {
    Idle,
    ReadingState,
    Planning,
    QuotaCheck,
    Executing,
    Aborted,
    Completed,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::ReadingState => "reading_state",
            Self::Planning => "planning",
            Self::QuotaCheck => "quota_check",
            Self::Executing => "executing",
            Self::Aborted => "aborted",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// Reconciles remote playlists against desired orderings.
///
/// One reconciler can serve many runs; each run owns its simulator and
/// plan exclusively, so runs against independent playlists may proceed
/// concurrently sharing the one [`QuotaPool`].
pub struct PlaylistReconciler<S: PlaylistStore> {
    store: Arc<S>,
    quota: Arc<QuotaPool>,
    dry_run: bool,
}

impl<S: PlaylistStore> PlaylistReconciler<S> {
    /// Creates a reconciler over a store and a quota pool.
    pub fn new(store: Arc<S>, quota: Arc<QuotaPool>) -> Self {
        Self {
            store,
            quota,
            dry_run: false,
        }
    }

    /// Enables or disables dry-run mode for subsequent runs.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether runs execute in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn enter_phase(&self, from: RunPhase, to: RunPhase) -> RunPhase {
        tracing::debug!(from = %from, to = %to, "Run phase transition");
        to
    }

    /// Reads current state and computes the plan without executing it.
    ///
    /// Useful for previewing what a run would do; the listing still
    /// charges its Get cost inside the store.
    pub async fn plan(
        &self,
        playlist_id: &PlaylistId,
        desired_ids: &[VideoId],
    ) -> EngineResult<ChangePlan> {
        if playlist_id.is_empty() {
            return Err(EngineError::EmptyPlaylistId);
        }
        let desired = DesiredSequence::new(desired_ids);
        let current = self.store.list_items(playlist_id).await.map_err(|source| {
            EngineError::StateRead {
                playlist_id: playlist_id.clone(),
                source,
            }
        })?;
        Ok(plan_changes(playlist_id, current, &desired)?)
    }

    /// Runs a full reconciliation of `playlist_id` toward `desired_ids`.
    ///
    /// Duplicate desired ids are dropped, first occurrence wins. The
    /// aggregate plan cost is gated against the quota pool before any
    /// action executes; an insufficient pool aborts the run with nothing
    /// applied. Actions then execute strictly in plan order, each failure
    /// recorded in the report without stopping the rest.
    #[instrument(skip(self, desired_ids), fields(playlist_id = %playlist_id, dry_run = self.dry_run))]
    pub async fn reconcile(
        &self,
        playlist_id: &PlaylistId,
        desired_ids: &[VideoId],
    ) -> EngineResult<RunReport> {
        let started_at = Utc::now();
        let mut phase = RunPhase::Idle;

        if playlist_id.is_empty() {
            tracing::error!("No target playlist id given, aborting");
            return Err(EngineError::EmptyPlaylistId);
        }
        let desired = DesiredSequence::new(desired_ids);

        phase = self.enter_phase(phase, RunPhase::ReadingState);
        let current = self.store.list_items(playlist_id).await.map_err(|source| {
            tracing::error!(error = %source, "Failed to read current playlist state");
            EngineError::StateRead {
                playlist_id: playlist_id.clone(),
                source,
            }
        })?;
        tracing::info!(count = current.len(), "Current playlist state read");

        phase = self.enter_phase(phase, RunPhase::Planning);
        let plan = plan_changes(playlist_id, current, &desired)?;

        phase = self.enter_phase(phase, RunPhase::QuotaCheck);
        let plan_cost: u64 = plan
            .actions
            .iter()
            .map(|action| self.store.cost_of(action.cost_kind()))
            .sum();
        if !self.quota.can_execute(plan_cost) {
            let remaining = self.quota.remaining();
            self.enter_phase(phase, RunPhase::Aborted);
            tracing::error!(
                required = plan_cost,
                remaining,
                "Aggregate plan cost exceeds remaining quota, aborting run"
            );
            return Err(EngineError::QuotaExhausted {
                required: plan_cost,
                remaining,
            });
        }

        phase = self.enter_phase(phase, RunPhase::Executing);
        let mut outcomes: Vec<ActionOutcome> = Vec::with_capacity(plan.actions.len());
        for action in &plan.actions {
            let outcome = action.execute(self.store.as_ref(), self.dry_run).await;
            outcomes.push(outcome);
        }

        self.enter_phase(phase, RunPhase::Completed);
        let report = RunReport::new(&plan, plan_cost, self.dry_run, outcomes, started_at);
        tracing::info!(
            planned = report.planned_total(),
            executed = report.executed,
            failed = report.failed,
            skipped = report.skipped,
            simulated = report.simulated,
            cost = report.plan_cost,
            "Reconciliation run finished"
        );
        Ok(report)
    }
}
