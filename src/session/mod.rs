//! Batch session orchestration
//!
//! A `Session` drives one `ReceiptDesk` through a whole submissions file:
//!
//! 1. Every row is submitted; rows that fail to parse or validate are logged
//!    and skipped
//! 2. With `send_receipts`, a receipt is generated and sent for every record.
//!    All sends are started first and then resolved together, so their
//!    latencies overlap
//! 3. With `receipts_dir`, every receipt is exported as a CSV file
//! 4. The selected view is written to the output
//!
//! Only an unreadable input, an unwritable receipts directory or a failed
//! output write end the session with an error.

mod config;

pub use config::{SessionConfig, SessionSummary};

use crate::cli::ViewType;
use crate::core::{
    Clock, DeliveryGateway, LedgerState, Notifier, PendingSend, ReceiptDesk, SimulatedGateway,
    SystemClock, TracingNotifier,
};
use crate::io::{write_analytics_csv, write_receipt_file, write_records_csv, SubmissionReader};
use crate::types::{EmailStatus, LedgerError};
use futures::future::join_all;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// One batch run over a submissions file
///
/// # Examples
///
/// ```no_run
/// use landtrade_ledger::session::{Session, SessionConfig};
/// use std::path::Path;
///
/// # async fn run() -> Result<(), landtrade_ledger::types::LedgerError> {
/// let session = Session::new(SessionConfig::default());
/// let mut output = std::io::stdout();
/// session.run(Path::new("submissions.csv"), &mut output).await?;
/// # Ok(())
/// # }
/// ```
pub struct Session {
    config: SessionConfig,
    desk: ReceiptDesk,
}

impl Session {
    /// Create a session on the system clock, logging notifications and
    /// delivering through a `SimulatedGateway`
    pub fn new(config: SessionConfig) -> Self {
        let gateway: Arc<dyn DeliveryGateway> = match config.seed {
            Some(seed) => Arc::new(SimulatedGateway::with_seed(config.delivery.clone(), seed)),
            None => Arc::new(SimulatedGateway::new(config.delivery.clone())),
        };
        Self::with_collaborators(config, Arc::new(SystemClock), Arc::new(TracingNotifier), gateway)
    }

    /// Create a session with explicit collaborators
    pub fn with_collaborators(
        config: SessionConfig,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        gateway: Arc<dyn DeliveryGateway>,
    ) -> Self {
        let desk = ReceiptDesk::new(LedgerState::new(clock, notifier), gateway);
        Self { config, desk }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The desk this session drives
    pub fn desk(&self) -> &ReceiptDesk {
        &self.desk
    }

    /// Process `input_path` and write the configured view to `output`
    ///
    /// # Errors
    ///
    /// * `LedgerError::FileNotFound` / `LedgerError::IoError` - the input
    ///   cannot be opened, a receipt file cannot be written, or the output
    ///   cannot be written
    ///
    /// Bad rows and refused sends are logged with `tracing::warn!` and
    /// counted in the returned summary.
    pub async fn run(
        &self,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<SessionSummary, LedgerError> {
        let mut summary = SessionSummary::default();

        self.record_submissions(input_path, &mut summary).await?;

        if self.config.send_receipts {
            self.send_receipts(&mut summary).await?;
        }

        if let Some(dir) = &self.config.receipts_dir {
            summary.exported = self.export_receipts(dir).await?;
        }

        let written = match self.config.view {
            ViewType::Records => write_records_csv(&self.desk.records().await, output),
            ViewType::Analytics => write_analytics_csv(&self.desk.analytics().await, output),
        };
        written.map_err(|message| LedgerError::IoError { message })?;

        tracing::info!(
            recorded = summary.recorded,
            rejected = summary.rejected,
            delivered = summary.delivered,
            failed = summary.failed,
            exported = summary.exported,
            "session finished"
        );

        Ok(summary)
    }

    async fn record_submissions(
        &self,
        input_path: &Path,
        summary: &mut SessionSummary,
    ) -> Result<(), LedgerError> {
        let reader = SubmissionReader::new(input_path)?;

        // Line 1 is the header
        for (line, result) in (2u64..).zip(reader) {
            let submitted = match result {
                Ok(form) => self.desk.submit(form).await.map(|_| ()),
                Err(e) => Err(e),
            };

            match submitted {
                Ok(()) => summary.recorded += 1,
                Err(e) => {
                    tracing::warn!(line, error = %e, "submission skipped");
                    summary.rejected += 1;
                }
            }
        }

        Ok(())
    }

    async fn send_receipts(&self, summary: &mut SessionSummary) -> Result<(), LedgerError> {
        let mut pending: Vec<PendingSend> = Vec::new();

        for record in self.desk.records().await {
            self.desk.generate_receipt(&record.id).await?;
            if let Some(recipient) = &self.config.recipient {
                self.desk.set_receipt_email(recipient.as_str()).await;
            }

            match self.desk.begin_send().await {
                Ok(Some(send)) => pending.push(send),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(id = %record.id, error = %e, "receipt not sent");
                    summary.not_sent += 1;
                }
            }
        }

        for outcome in join_all(pending.into_iter().map(PendingSend::resolve)).await {
            match outcome? {
                EmailStatus::Delivered => summary.delivered += 1,
                _ => summary.failed += 1,
            }
        }

        Ok(())
    }

    async fn export_receipts(&self, dir: &Path) -> Result<usize, LedgerError> {
        std::fs::create_dir_all(dir).map_err(|e| LedgerError::IoError {
            message: format!("Failed to create directory '{}': {}", dir.display(), e),
        })?;

        let mut exported = 0;
        for record in self.desk.records().await {
            self.desk.generate_receipt(&record.id).await?;
            if let Some(export) = self.desk.export_receipt().await? {
                let path = write_receipt_file(dir, &export)?;
                tracing::debug!(path = %path.display(), "receipt written");
                exported += 1;
            }
        }

        Ok(exported)
    }
}
