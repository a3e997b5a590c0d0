//! Quota accounting for metered remote APIs.
//!
//! Every call to the remote system consumes units from a fixed budget.
//! A [`QuotaPool`] is created per run (or per process, shared by handle)
//! and decremented as calls are made; it is never replenished while a
//! reconciliation is in flight.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Default budget, matching the daily allowance of the metered API this
/// engine was built against.
pub const DEFAULT_QUOTA_BUDGET: u64 = 8_000;

/// Kinds of metered calls, used to look up per-call cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Read one page of items.
    Get,
    /// Insert a new item.
    Insert,
    /// Remove an existing item.
    Delete,
    /// Move an existing item to a new position.
    Update,
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Get => "get",
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Update => "update",
        };
        write!(f, "{s}")
    }
}

/// A consumable budget of quota units.
///
/// Checks and decrements are atomic, so one pool can be shared across
/// concurrent reconciliations of independent playlists.
#[derive(Debug)]
pub struct QuotaPool {
    budget: u64,
    remaining: AtomicU64,
}

impl QuotaPool {
    /// Creates a pool holding `budget` units.
    pub fn new(budget: u64) -> Self {
        Self {
            budget,
            remaining: AtomicU64::new(budget),
        }
    }

    /// The budget the pool started with.
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Units currently left in the pool.
    pub fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::SeqCst)
    }

    /// Returns true if `cost` units could be deducted right now.
    ///
    /// Read-only. For gating a whole batch before starting it; individual
    /// calls should use [`deduct_if_available`](Self::deduct_if_available).
    #[must_use]
    pub fn can_execute(&self, cost: u64) -> bool {
        self.remaining() >= cost
    }

    /// Deducts `cost` units, failing when the pool cannot cover them.
    pub fn deduct(&self, cost: u64) -> StoreResult<()> {
        if self.deduct_if_available(cost) {
            Ok(())
        } else {
            Err(StoreError::quota_exhausted(cost, self.remaining()))
        }
    }

    /// Atomically deducts `cost` units if the pool can cover them.
    ///
    /// Returns false, leaving the pool untouched, when it cannot.
    #[must_use]
    pub fn deduct_if_available(&self, cost: u64) -> bool {
        loop {
            let current = self.remaining.load(Ordering::SeqCst);
            if current < cost {
                tracing::debug!(cost, remaining = current, "Quota denied");
                return false;
            }
            if self
                .remaining
                .compare_exchange(current, current - cost, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                tracing::debug!(cost, remaining = current - cost, "Quota deducted");
                return true;
            }
        }
    }
}

impl Default for QuotaPool {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTA_BUDGET)
    }
}
