//! Receipt delivery counters and the analytics projection

use super::transaction::{EmailStatus, Transaction};

/// Number of recent sends shown in the analytics view
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// Running log of delivery workflow transitions
///
/// The counters are bumped as transitions happen and are never recomputed
/// from the store or decremented. `pending` therefore counts how many sends
/// ever entered the pending state, not how many are pending now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmailCounters {
    /// Send attempts started (one per attempt)
    pub sent: u64,
    /// Transitions into `Pending`
    pub pending: u64,
    /// Transitions into `Delivered`
    pub delivered: u64,
    /// Transitions into `Failed`
    pub failed: u64,
}

impl EmailCounters {
    /// Record one observed transition into `status`
    ///
    /// `sent` moves with the pending step only, so each attempt counts once.
    pub fn record(&mut self, status: EmailStatus) {
        match status {
            EmailStatus::Pending => {
                self.sent += 1;
                self.pending += 1;
            }
            EmailStatus::Delivered => self.delivered += 1,
            EmailStatus::Failed => self.failed += 1,
            EmailStatus::NotSent => {}
        }
    }

    /// Attempts that have resolved either way
    pub fn resolved(&self) -> u64 {
        self.delivered + self.failed
    }
}

/// Read-only analytics projection over the store
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsView {
    pub counters: EmailCounters,
    /// Records with a send attempt, newest first, at most
    /// [`RECENT_ACTIVITY_LIMIT`]
    pub recent: Vec<Transaction>,
}
