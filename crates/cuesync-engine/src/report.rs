//! Run summaries for reconciliation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cuesync_connector::PlaylistId;

use crate::action::ActionOutcome;
use crate::planner::ChangePlan;

/// Summary of one reconciliation run: what was planned, what it cost,
/// and how each action ended. Serializable for audit output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// The playlist that was reconciled.
    pub playlist_id: PlaylistId,
    /// Whether the run was a dry run.
    pub dry_run: bool,
    /// Deletions the plan contained.
    pub planned_deletes: usize,
    /// Insertions the plan contained.
    pub planned_inserts: usize,
    /// Moves the plan contained.
    pub planned_updates: usize,
    /// Aggregate quota cost of the full plan.
    pub plan_cost: u64,
    /// Actions that went through.
    pub executed: usize,
    /// Actions that failed against the remote system.
    pub failed: usize,
    /// Actions skipped for lack of quota.
    pub skipped: usize,
    /// Actions simulated without I/O (dry run).
    pub simulated: usize,
    /// Per-action outcomes, in execution order.
    pub outcomes: Vec<ActionOutcome>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Builds a report from a consumed plan and its outcomes.
    pub fn new(
        plan: &ChangePlan,
        plan_cost: u64,
        dry_run: bool,
        outcomes: Vec<ActionOutcome>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let simulated = outcomes.iter().filter(|o| o.dry_run).count();
        let executed = outcomes
            .iter()
            .filter(|o| o.is_executed() && !o.dry_run)
            .count();
        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        let skipped = outcomes.iter().filter(|o| o.is_skipped()).count();

        Self {
            playlist_id: plan.playlist_id.clone(),
            dry_run,
            planned_deletes: plan.delete_count(),
            planned_inserts: plan.insert_count(),
            planned_updates: plan.update_count(),
            plan_cost,
            executed,
            failed,
            skipped,
            simulated,
            outcomes,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Total number of planned actions.
    pub fn planned_total(&self) -> usize {
        self.planned_deletes + self.planned_inserts + self.planned_updates
    }

    /// Whether every planned action went through.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}
