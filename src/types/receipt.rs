//! Receipt view and outgoing receipt message types

use super::money::format_naira;
use super::transaction::{EmailStatus, Transaction, TransactionId};

/// Human-readable summary of one transaction
///
/// Built from a stored record when a receipt is generated. Rendering it as
/// text or CSV lives in [`crate::io::receipt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub id: TransactionId,
    pub full_name: String,
    pub state: String,
    pub email: String,
    pub date: String,
    /// Amount as displayed, e.g. `₦500,000`
    pub amount: String,
    pub trade_percentage: String,
    pub pbo_name: String,
    pub status: EmailStatus,
}

impl From<&Transaction> for Receipt {
    fn from(tx: &Transaction) -> Self {
        Receipt {
            id: tx.id.clone(),
            full_name: tx.full_name.clone(),
            state: tx.state.clone(),
            email: tx.email.clone(),
            date: tx.date.clone(),
            amount: format_naira(tx.amount),
            trade_percentage: tx.trade_percentage.to_string(),
            pbo_name: tx.pbo_name.clone(),
            status: tx.email_status,
        }
    }
}

/// A receipt addressed to one recipient, handed to a delivery gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptMessage {
    /// Record the receipt belongs to
    pub transaction_id: TransactionId,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}
