//! Session configuration

use crate::cli::ViewType;
use crate::core::DeliveryConfig;
use std::path::PathBuf;

/// Everything a batch session needs besides its input and output
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionConfig {
    /// Latency and success rate of simulated delivery
    pub delivery: DeliveryConfig,
    /// Send a receipt for every recorded transaction
    pub send_receipts: bool,
    /// Recipient used instead of each buyer's pre-filled email
    pub recipient: Option<String>,
    /// Directory receipt CSVs are exported into
    pub receipts_dir: Option<PathBuf>,
    /// View written to the output once processing finishes
    pub view: ViewType,
    /// Seed for reproducible delivery outcomes
    pub seed: Option<u64>,
}

/// Tally of what a session did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Submissions stored as transactions
    pub recorded: usize,
    /// Submissions that could not be read or failed validation
    pub rejected: usize,
    /// Sends that ended `Delivered`
    pub delivered: usize,
    /// Sends that ended `Failed`
    pub failed: usize,
    /// Sends refused before reaching the gateway
    pub not_sent: usize,
    /// Receipt files written
    pub exported: usize,
}
