//! Land Trade Ledger CLI
//!
//! Command-line interface for recording buy-to-sell land transactions from a
//! CSV file of form submissions and delivering their receipts.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- submissions.csv > records.csv
//! cargo run -- --send --latency-ms 0 --seed 7 --view analytics submissions.csv
//! cargo run -- --receipts-dir receipts submissions.csv
//! RUST_LOG=debug cargo run -- --send submissions.csv
//! ```
//!
//! The selected view is written to stdout as CSV. Logs and notifications
//! go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, output not writable, etc.)

use landtrade_ledger::cli;
use landtrade_ledger::session::Session;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let session = Session::new(args.to_session_config());

    // Output goes to stdout
    let mut output = std::io::stdout();
    if let Err(e) = session.run(&args.input_file, &mut output).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
