//! Transaction-related types for the land trade ledger
//!
//! This module defines the stored transaction record, its identifier, the
//! email delivery status, the fixed set of trade percentages, and the raw form
//! a transaction is created from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Transaction identifier
///
/// Derived from the creation timestamp (milliseconds since the Unix epoch)
/// rendered as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(String);

impl TransactionId {
    /// Build an identifier from a creation timestamp
    pub fn from_millis(timestamp: i64) -> Self {
        TransactionId(timestamp.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        TransactionId(value)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        TransactionId(value.to_string())
    }
}

/// Email delivery status of a transaction's receipt
///
/// `NotSent` is the initial state. A send attempt moves the record to
/// `Pending`, which then resolves to exactly one of `Delivered` or `Failed`.
/// Terminal states may re-enter `Pending` when the user sends again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmailStatus {
    /// No send has been attempted
    #[default]
    NotSent,

    /// A send is in flight
    Pending,

    /// The last send was delivered
    Delivered,

    /// The last send failed
    Failed,
}

impl EmailStatus {
    /// Whether the delivery workflow allows moving from `self` to `next`
    pub fn can_transition_to(self, next: EmailStatus) -> bool {
        use EmailStatus::*;
        matches!(
            (self, next),
            (NotSent | Delivered | Failed, Pending) | (Pending, Delivered | Failed)
        )
    }

    /// Whether a send attempt has resolved
    pub fn is_terminal(self) -> bool {
        matches!(self, EmailStatus::Delivered | EmailStatus::Failed)
    }

    /// Label shown in listings
    pub fn label(self) -> &'static str {
        match self {
            EmailStatus::NotSent => "Not Sent",
            EmailStatus::Pending => "Pending",
            EmailStatus::Delivered => "Delivered",
            EmailStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Share of the resale proceeds agreed for a buy-to-sell trade
///
/// Only the values in [`TradePercentage::ALL`] (10% to 50% in steps of 5) are
/// offered, so construction goes through `FromStr` or `new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TradePercentage(u8);

impl TradePercentage {
    /// Every percentage a trade may be recorded with
    pub const ALL: [u8; 9] = [10, 15, 20, 25, 30, 35, 40, 45, 50];

    /// Create a percentage if it is one of the offered values
    pub fn new(percent: u8) -> Option<Self> {
        Self::ALL.contains(&percent).then_some(TradePercentage(percent))
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl fmt::Display for TradePercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl FromStr for TradePercentage {
    type Err = String;

    /// Accepts `"20%"` or `"20"`, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
        digits
            .parse::<u8>()
            .ok()
            .and_then(TradePercentage::new)
            .ok_or_else(|| format!("'{}' is not an offered trade percentage", s))
    }
}

/// Stored transaction record
///
/// Created once per accepted submission. Every field except `email_status`
/// is fixed at creation; the status is only changed by the delivery workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Unique identifier derived from `timestamp`
    pub id: TransactionId,

    /// Buyer's full name
    pub full_name: String,

    /// State or province of the land
    pub state: String,

    /// Transaction date as entered (ISO `YYYY-MM-DD` from the form)
    pub date: String,

    /// Amount paid, strictly positive
    pub amount: Decimal,

    /// Buyer's email address
    pub email: String,

    /// Agreed trade percentage
    pub trade_percentage: TradePercentage,

    /// Referring agent (PBO/Lead)
    pub pbo_name: String,

    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,

    /// Receipt delivery status
    pub email_status: EmailStatus,
}

/// Raw transaction form fields
///
/// Holds exactly what the user typed; nothing is parsed until validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub full_name: String,
    pub state: String,
    pub date: String,
    pub amount: String,
    pub email: String,
    pub trade_percentage: String,
    pub pbo_name: String,
}

impl TransactionForm {
    /// An empty form with the date defaulted to `today`
    pub fn blank(today: NaiveDate) -> Self {
        TransactionForm {
            date: today.format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }
}
