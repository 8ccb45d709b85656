//! Land Trade Ledger Library
//! # Overview
//!
//! This library records buy-to-sell land purchase transactions, produces a
//! receipt for each one, and tracks simulated receipt delivery by email.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transaction, Receipt, EmailStatus, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::validation`] - Form and recipient checks
//!   - [`core::ledger`] - Application state and its action handlers
//!   - [`core::desk`] - Async controller shared with in-flight sends
//!   - [`core::gateway`] - Simulated receipt delivery
//!   - [`core::transaction_store`] - Append-only record storage
//! - [`io`] - Submissions CSV input, receipt export and view output
//! - [`session`] - Batch run over a submissions file
//!
//! # Delivery Workflow
//!
//! Each record carries an email status:
//!
//! - **Not Sent**: No send has been attempted
//! - **Pending**: A send is in flight
//! - **Delivered**: The last send succeeded
//! - **Failed**: The last send failed; sending again is allowed
//!
//! # Analytics
//!
//! The ledger counts every send attempt (`sent`, `pending`) and every
//! outcome (`delivered`, `failed`), and lists the ten most recent records
//! that have had a send.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod session;
pub mod types;

pub use core::{LedgerState, ReceiptDesk, TransactionStore};
pub use io::{write_analytics_csv, write_records_csv};
pub use session::{Session, SessionConfig, SessionSummary};
pub use types::{
    EmailStatus, LedgerError, Receipt, Transaction, TransactionForm, TransactionId,
    ValidationError,
};
