//! CSV format handling for submissions and ledger views
//!
//! This module centralizes all tabular CSV concerns, providing:
//! - SubmissionRow structure for deserializing form submissions
//! - Conversion from submission rows to raw forms
//! - Records listing and analytics view serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{format_naira, AnalyticsView, Transaction, TransactionForm};
use chrono::{DateTime, SecondsFormat, Utc};
use csv::Writer;
use serde::Deserialize;
use std::io::Write;

/// CSV row structure for deserialization
///
/// Matches the submissions CSV with columns:
/// full_name, state, date, amount, email, trade_percentage, pbo_name.
/// Every column is optional so a short row still reaches validation, which
/// reports the missing field the same way the form would.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SubmissionRow {
    pub full_name: Option<String>,
    pub state: Option<String>,
    pub date: Option<String>,
    pub amount: Option<String>,
    pub email: Option<String>,
    pub trade_percentage: Option<String>,
    pub pbo_name: Option<String>,
}

impl From<SubmissionRow> for TransactionForm {
    fn from(row: SubmissionRow) -> Self {
        TransactionForm {
            full_name: row.full_name.unwrap_or_default(),
            state: row.state.unwrap_or_default(),
            date: row.date.unwrap_or_default(),
            amount: row.amount.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
            trade_percentage: row.trade_percentage.unwrap_or_default(),
            pbo_name: row.pbo_name.unwrap_or_default(),
        }
    }
}

/// Render a timestamp in milliseconds as RFC 3339 UTC to the second
pub fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| millis.to_string())
}

/// Write the records listing in insertion order
///
/// Columns: receipt_id, date, full_name, pbo_name, state, amount,
/// trade_percentage, email, email_status
pub fn write_records_csv(records: &[Transaction], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "receipt_id",
            "date",
            "full_name",
            "pbo_name",
            "state",
            "amount",
            "trade_percentage",
            "email",
            "email_status",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for tx in records {
        writer
            .write_record(&[
                tx.id.to_string(),
                tx.date.clone(),
                tx.full_name.clone(),
                tx.pbo_name.clone(),
                tx.state.clone(),
                format_naira(tx.amount),
                tx.trade_percentage.to_string(),
                tx.email.clone(),
                tx.email_status.to_string(),
            ])
            .map_err(|e| format!("Failed to write transaction record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write the analytics view
///
/// A `counter,value` table, a blank line, then the recent activity table
/// with columns: receipt_id, full_name, amount, email_status, timestamp
pub fn write_analytics_csv(view: &AnalyticsView, output: &mut dyn Write) -> Result<(), String> {
    {
        let mut writer = Writer::from_writer(&mut *output);
        writer
            .write_record(["counter", "value"])
            .map_err(|e| format!("Failed to write CSV header: {}", e))?;

        let counters = [
            ("sent", view.counters.sent),
            ("pending", view.counters.pending),
            ("delivered", view.counters.delivered),
            ("failed", view.counters.failed),
        ];
        for (name, value) in counters {
            writer
                .write_record([name, value.to_string().as_str()])
                .map_err(|e| format!("Failed to write counter: {}", e))?;
        }

        writer
            .flush()
            .map_err(|e| format!("Failed to flush output: {}", e))?;
    }

    writeln!(output).map_err(|e| format!("Failed to write output: {}", e))?;

    let mut writer = Writer::from_writer(output);
    writer
        .write_record(["receipt_id", "full_name", "amount", "email_status", "timestamp"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for tx in &view.recent {
        writer
            .write_record(&[
                tx.id.to_string(),
                tx.full_name.clone(),
                format_naira(tx.amount),
                tx.email_status.to_string(),
                format_timestamp(tx.timestamp),
            ])
            .map_err(|e| format!("Failed to write activity record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
