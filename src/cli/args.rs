use crate::core::DeliveryConfig;
use crate::session::SessionConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Record buy-to-sell land transactions and deliver their receipts
#[derive(Parser, Debug)]
#[command(name = "landtrade-ledger")]
#[command(about = "Record buy-to-sell land transactions and deliver their receipts", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing form submissions
    #[arg(value_name = "INPUT", help = "Path to the submissions CSV file")]
    pub input_file: PathBuf,

    /// View written to stdout once processing finishes
    #[arg(
        long = "view",
        value_name = "VIEW",
        default_value = "records",
        help = "Output view: 'records' for the full listing or 'analytics' for delivery counters"
    )]
    pub view: ViewType,

    /// Send a receipt for every recorded transaction
    #[arg(long = "send", help = "Send a receipt for every recorded transaction")]
    pub send: bool,

    /// Recipient used instead of each buyer's own email
    #[arg(
        long = "recipient",
        value_name = "EMAIL",
        help = "Send every receipt to this address instead of the buyer's email"
    )]
    pub recipient: Option<String>,

    /// Directory receipts are exported into
    #[arg(
        long = "receipts-dir",
        value_name = "DIR",
        help = "Export every receipt as PWAN-Receipt-<id>.csv into this directory"
    )]
    pub receipts_dir: Option<PathBuf>,

    /// Simulated delivery latency in milliseconds
    #[arg(
        long = "latency-ms",
        value_name = "MILLIS",
        default_value_t = 2000,
        help = "Simulated delivery latency in milliseconds"
    )]
    pub latency_ms: u64,

    /// Probability that a simulated send is delivered
    #[arg(
        long = "success-rate",
        value_name = "RATE",
        default_value_t = 0.8,
        help = "Probability in [0, 1] that a simulated send is delivered"
    )]
    pub success_rate: f64,

    /// Seed for reproducible delivery outcomes
    #[arg(long = "seed", value_name = "SEED", help = "Seed for reproducible delivery outcomes")]
    pub seed: Option<u64>,

    /// Default log filter when RUST_LOG is not set
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "warn",
        help = "Log level (error, warn, info, debug, trace); RUST_LOG takes precedence"
    )]
    pub log_level: String,
}

/// Views that can be written to stdout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum ViewType {
    #[default]
    Records,
    Analytics,
}

impl CliArgs {
    /// Build the session configuration from CLI arguments
    ///
    /// An out-of-range success rate falls back to the default with a warning.
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            delivery: DeliveryConfig::new(Duration::from_millis(self.latency_ms), self.success_rate),
            send_receipts: self.send,
            recipient: self.recipient.clone(),
            receipts_dir: self.receipts_dir.clone(),
            view: self.view,
            seed: self.seed,
        }
    }
}
