//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Transaction records, identifiers, statuses and the raw form
//! - `receipt`: Receipt view and outgoing receipt message
//! - `analytics`: Delivery counters and the analytics projection
//! - `money`: Naira amount formatting
//! - `error`: Error types for the ledger

pub mod analytics;
pub mod error;
pub mod money;
pub mod receipt;
pub mod transaction;

pub use analytics::{AnalyticsView, EmailCounters, RECENT_ACTIVITY_LIMIT};
pub use error::{DeliveryError, LedgerError, ValidationError};
pub use money::{format_naira, parse_naira};
pub use receipt::{Receipt, ReceiptMessage};
pub use transaction::{
    EmailStatus, TradePercentage, Transaction, TransactionForm, TransactionId,
};
