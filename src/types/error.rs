//! Error types for the land trade ledger
//!
//! This module defines all error types that can occur while recording
//! transactions and delivering receipts.
//!
//! # Error Categories
//!
//! - **Validation Errors**: user-correctable form problems that block an action
//! - **Delivery Errors**: failures reported by a delivery gateway (recorded as a
//!   `Failed` status, never propagated)
//! - **Ledger Errors**: store invariants, workflow guards, file and CSV I/O

use super::transaction::{EmailStatus, TransactionId};
use thiserror::Error;

/// Rejection reasons for a submitted form or a recipient address
///
/// Each variant renders as the blocking message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was empty
    #[error("Please fill in all required fields (missing {field})")]
    MissingField {
        /// Name of the first empty field
        field: &'static str,
    },

    /// The email address does not look like `local@domain.tld`
    #[error("Please enter a valid email address")]
    InvalidEmail {
        /// The rejected address
        email: String,
    },

    /// The amount is not a number or not strictly positive
    #[error("Please enter a valid positive amount")]
    InvalidAmount {
        /// The rejected amount text
        amount: String,
    },

    /// The trade percentage is not one of the offered values
    #[error("Please select a valid trade percentage")]
    InvalidTradePercentage {
        /// The rejected percentage text
        value: String,
    },
}

/// Failure reported by a delivery gateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The message was not accepted for delivery
    #[error("Delivery rejected: {0}")]
    Rejected(String),

    /// The gateway itself failed before an outcome was known
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Form or recipient validation failed
    ///
    /// Recoverable: the action is blocked and nothing is mutated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No record with this identifier exists
    #[error("Transaction {id} not found")]
    TransactionNotFound {
        /// The missing identifier
        id: TransactionId,
    },

    /// A record with this identifier is already stored
    #[error("Duplicate transaction ID {id}")]
    DuplicateTransaction {
        /// The duplicated identifier
        id: TransactionId,
    },

    /// A receipt send is already in flight for this record
    #[error("A receipt for transaction {id} is already being sent")]
    SendInProgress {
        /// The record with a pending send
        id: TransactionId,
    },

    /// The requested status change is not an edge of the delivery workflow
    #[error("Transaction {id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// The record being updated
        id: TransactionId,
        /// Current status
        from: EmailStatus,
        /// Requested status
        to: EmailStatus,
    },

    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents a batch session from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// In batch mode the offending row is skipped and processing continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a TransactionNotFound error
    pub fn transaction_not_found(id: &TransactionId) -> Self {
        LedgerError::TransactionNotFound { id: id.clone() }
    }

    /// Create a DuplicateTransaction error
    pub fn duplicate_transaction(id: &TransactionId) -> Self {
        LedgerError::DuplicateTransaction { id: id.clone() }
    }

    /// Create a SendInProgress error
    pub fn send_in_progress(id: &TransactionId) -> Self {
        LedgerError::SendInProgress { id: id.clone() }
    }

    /// Create an InvalidStatusTransition error
    pub fn invalid_status_transition(
        id: &TransactionId,
        from: EmailStatus,
        to: EmailStatus,
    ) -> Self {
        LedgerError::InvalidStatusTransition {
            id: id.clone(),
            from,
            to,
        }
    }

    /// Create a ParseError error
    pub fn parse_error(line: Option<u64>, message: impl Into<String>) -> Self {
        LedgerError::ParseError {
            line,
            message: message.into(),
        }
    }
}
