//! Async controller around the ledger state
//!
//! `ReceiptDesk` shares one `LedgerState` behind a `tokio::sync::Mutex` and
//! owns the delivery gateway. The lock is held only while an action handler
//! runs, never across the gateway's latency, so other actions (including
//! sends for other records) proceed while a receipt is in flight.

use crate::core::ledger::{LedgerState, SendTicket};
use crate::core::traits::DeliveryGateway;
use crate::io::receipt::ReceiptExport;
use crate::types::{
    AnalyticsView, EmailCounters, EmailStatus, LedgerError, Receipt, Transaction,
    TransactionForm, TransactionId,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to the ledger and its delivery gateway
///
/// Cloning is cheap; every clone drives the same state.
#[derive(Clone)]
pub struct ReceiptDesk {
    state: Arc<Mutex<LedgerState>>,
    gateway: Arc<dyn DeliveryGateway>,
}

/// A send that has entered `Pending` and is waiting on the gateway
pub struct PendingSend {
    desk: ReceiptDesk,
    ticket: SendTicket,
}

impl PendingSend {
    pub fn transaction_id(&self) -> &TransactionId {
        self.ticket.transaction_id()
    }

    /// Wait for the gateway and record the outcome
    pub async fn resolve(self) -> Result<EmailStatus, LedgerError> {
        let outcome = self.desk.gateway.send(&self.ticket.message).await;
        self.desk.state.lock().await.complete_send(self.ticket, outcome)
    }
}

impl ReceiptDesk {
    pub fn new(state: LedgerState, gateway: Arc<dyn DeliveryGateway>) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            gateway,
        }
    }

    /// Record a submission, returning a copy of the stored record
    pub async fn submit(&self, form: TransactionForm) -> Result<Transaction, LedgerError> {
        self.state.lock().await.submit(form).cloned()
    }

    /// Select a record for its receipt
    pub async fn generate_receipt(&self, id: &TransactionId) -> Result<Receipt, LedgerError> {
        self.state.lock().await.generate_receipt(id)
    }

    /// Overwrite the recipient field
    pub async fn set_receipt_email(&self, email: impl Into<String>) {
        self.state.lock().await.set_receipt_email(email);
    }

    /// Export the selected receipt, `None` when nothing is selected
    pub async fn export_receipt(&self) -> Result<Option<ReceiptExport>, LedgerError> {
        self.state.lock().await.export_receipt()
    }

    /// Move the selected record to `Pending` without waiting for delivery
    ///
    /// Returns `Ok(None)` when nothing is selected.
    pub async fn begin_send(&self) -> Result<Option<PendingSend>, LedgerError> {
        let ticket = self.state.lock().await.begin_send()?;
        Ok(ticket.map(|ticket| PendingSend {
            desk: self.clone(),
            ticket,
        }))
    }

    /// Send the selected receipt and wait for the outcome
    ///
    /// Returns `Ok(None)` when nothing is selected.
    pub async fn send_receipt(&self) -> Result<Option<EmailStatus>, LedgerError> {
        match self.begin_send().await? {
            Some(pending) => pending.resolve().await.map(Some),
            None => Ok(None),
        }
    }

    /// Status of the selected record
    pub async fn receipt_status(&self) -> Option<EmailStatus> {
        self.state.lock().await.receipt_status()
    }

    /// Snapshot of all records in insertion order
    pub async fn records(&self) -> Vec<Transaction> {
        self.state.lock().await.records().to_vec()
    }

    pub async fn counters(&self) -> EmailCounters {
        self.state.lock().await.counters()
    }

    pub async fn analytics(&self) -> AnalyticsView {
        self.state.lock().await.analytics()
    }
}
