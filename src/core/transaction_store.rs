//! Append-only transaction storage
//!
//! This module provides the TransactionStore component that keeps every
//! recorded transaction in insertion order, with an index for lookups by
//! identifier.
//!
//! # Mutation
//!
//! Records are never removed or edited. The only mutable field is the email
//! status, and only along the edges allowed by
//! [`EmailStatus::can_transition_to`].
//!
//! # Duplicate Handling
//!
//! Identifiers must be unique. Inserting a record whose identifier is already
//! stored is rejected and the store is left unchanged.

use crate::types::{EmailStatus, LedgerError, Transaction, TransactionId};
use std::collections::HashMap;

/// Transaction store
///
/// Maintains the records in a Vec (insertion order) plus a HashMap from
/// identifier to position.
#[derive(Debug, Default)]
pub struct TransactionStore {
    /// Records in insertion order
    transactions: Vec<Transaction>,

    /// Position of each record in `transactions`
    index: HashMap<TransactionId, usize>,
}

impl TransactionStore {
    /// Create a new empty transaction store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    ///
    /// # Returns
    ///
    /// * `Ok(&Transaction)` - The stored record
    /// * `Err(LedgerError::DuplicateTransaction)` - If the identifier is taken
    pub fn append(&mut self, tx: Transaction) -> Result<&Transaction, LedgerError> {
        if self.index.contains_key(&tx.id) {
            return Err(LedgerError::duplicate_transaction(&tx.id));
        }

        let position = self.transactions.len();
        self.index.insert(tx.id.clone(), position);
        self.transactions.push(tx);
        Ok(&self.transactions[position])
    }

    /// Look up a record by identifier
    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.index.get(id).map(|&position| &self.transactions[position])
    }

    /// Move a record's email status along a workflow edge
    ///
    /// # Returns
    ///
    /// * `Ok(previous)` - The status before the change
    /// * `Err(LedgerError::TransactionNotFound)` - If the identifier is unknown
    /// * `Err(LedgerError::InvalidStatusTransition)` - If the edge is not allowed
    pub(crate) fn set_status(
        &mut self,
        id: &TransactionId,
        status: EmailStatus,
    ) -> Result<EmailStatus, LedgerError> {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id))?;
        let tx = &mut self.transactions[position];

        if !tx.email_status.can_transition_to(status) {
            return Err(LedgerError::invalid_status_transition(
                id,
                tx.email_status,
                status,
            ));
        }

        let previous = tx.email_status;
        tx.email_status = status;
        Ok(previous)
    }

    /// All records in insertion order
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Records with a send attempt, newest first, at most `limit`
    pub fn recent_activity(&self, limit: usize) -> Vec<Transaction> {
        let mut sent: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|tx| tx.email_status != EmailStatus::NotSent)
            .collect();
        sent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sent.into_iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
