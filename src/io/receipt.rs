//! Receipt rendering, CSV export and parsing
//!
//! A receipt is rendered two ways:
//! - as a CSV document for download (`render_receipt_csv`), one transaction
//!   per file named `PWAN-Receipt-<id>.csv`
//! - as plain text for the email body (`render_receipt_text`)
//!
//! The CSV keeps the fixed title and closing lines around a block of
//! `label,value` rows. The rows go through the csv writer, so values that
//! contain commas (the formatted amount, names) are quoted and
//! `parse_receipt_csv` can read them back.

use crate::types::{parse_naira, LedgerError, Receipt, TradePercentage, TransactionId};
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const RECEIPT_TITLE: &str = "PWAN MAX LAND BUY TO SELL - TRANSACTION RECEIPT";
const CLOSING_LINES: [&str; 2] = [
    "Thank you for your investment in our Buy to Sell trade.",
    "Your money is growing and you are becoming more wealthy.",
];

const LABEL_ID: &str = "Receipt ID:";
const LABEL_DATE: &str = "Date:";
const LABEL_NAME: &str = "Buyer Name:";
const LABEL_PBO: &str = "PBO/Lead:";
const LABEL_STATE: &str = "State:";
const LABEL_AMOUNT: &str = "Amount (₦):";
const LABEL_PERCENTAGE: &str = "Trade Percentage:";

/// A rendered receipt ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptExport {
    pub file_name: String,
    pub contents: String,
}

/// Fields recovered from an exported receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReceipt {
    pub id: TransactionId,
    pub date: String,
    pub full_name: String,
    pub pbo_name: String,
    pub state: String,
    pub amount: Decimal,
    pub trade_percentage: TradePercentage,
}

/// File name of an exported receipt
pub fn receipt_file_name(id: &TransactionId) -> String {
    format!("PWAN-Receipt-{}.csv", id)
}

/// Render the downloadable CSV document for a receipt
pub fn render_receipt_csv(receipt: &Receipt) -> Result<String, LedgerError> {
    let mut buffer = Vec::new();
    writeln!(buffer, "{}", RECEIPT_TITLE)?;
    writeln!(buffer)?;

    {
        let mut writer = WriterBuilder::new().from_writer(&mut buffer);
        let rows = [
            (LABEL_ID, receipt.id.as_str()),
            (LABEL_DATE, receipt.date.as_str()),
            (LABEL_NAME, receipt.full_name.as_str()),
            (LABEL_PBO, receipt.pbo_name.as_str()),
            (LABEL_STATE, receipt.state.as_str()),
            (LABEL_AMOUNT, receipt.amount.as_str()),
            (LABEL_PERCENTAGE, receipt.trade_percentage.as_str()),
        ];
        for (label, value) in rows {
            writer.write_record([label, value])?;
        }
        writer.flush()?;
    }

    writeln!(buffer)?;
    for line in CLOSING_LINES {
        writeln!(buffer, "{}", line)?;
    }

    String::from_utf8(buffer).map_err(|e| LedgerError::IoError {
        message: e.to_string(),
    })
}

/// Render a receipt as an export artifact
pub fn export_receipt(receipt: &Receipt) -> Result<ReceiptExport, LedgerError> {
    Ok(ReceiptExport {
        file_name: receipt_file_name(&receipt.id),
        contents: render_receipt_csv(receipt)?,
    })
}

/// Read the labelled fields back out of an exported receipt
pub fn parse_receipt_csv(contents: &str) -> Result<ParsedReceipt, LedgerError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut id = None;
    let mut date = None;
    let mut full_name = None;
    let mut pbo_name = None;
    let mut state = None;
    let mut amount = None;
    let mut trade_percentage = None;

    for record in reader.records() {
        let record = record?;
        if record.len() != 2 {
            continue;
        }
        let value = record[1].to_string();
        match &record[0] {
            LABEL_ID => id = Some(TransactionId::from(value)),
            LABEL_DATE => date = Some(value),
            LABEL_NAME => full_name = Some(value),
            LABEL_PBO => pbo_name = Some(value),
            LABEL_STATE => state = Some(value),
            LABEL_AMOUNT => {
                amount = Some(parse_naira(&value).ok_or_else(|| {
                    LedgerError::parse_error(None, format!("Invalid receipt amount '{}'", value))
                })?)
            }
            LABEL_PERCENTAGE => {
                trade_percentage = Some(
                    TradePercentage::from_str(&value)
                        .map_err(|e| LedgerError::parse_error(None, e))?,
                )
            }
            _ => {}
        }
    }

    let missing = |label: &str| LedgerError::parse_error(None, format!("Receipt has no '{}' row", label));
    Ok(ParsedReceipt {
        id: id.ok_or_else(|| missing(LABEL_ID))?,
        date: date.ok_or_else(|| missing(LABEL_DATE))?,
        full_name: full_name.ok_or_else(|| missing(LABEL_NAME))?,
        pbo_name: pbo_name.ok_or_else(|| missing(LABEL_PBO))?,
        state: state.ok_or_else(|| missing(LABEL_STATE))?,
        amount: amount.ok_or_else(|| missing(LABEL_AMOUNT))?,
        trade_percentage: trade_percentage.ok_or_else(|| missing(LABEL_PERCENTAGE))?,
    })
}

/// Render the human-readable receipt used as an email body
pub fn render_receipt_text(receipt: &Receipt) -> String {
    format!(
        "TRANSACTION RECEIPT\n\
         Receipt #: {id}\n\
         \n\
         Name: {name}\n\
         State: {state}\n\
         Email: {email}\n\
         Date: {date}\n\
         Amount: {amount}\n\
         Trade Percentage: {pct}\n\
         PBO/Lead: {pbo}\n\
         \n\
         Thank you for your transaction with PWAN MAX\n\
         System generated receipt\n\
         \n\
         www.pwanmax.com\n\
         pwanmaxtradeinfo@gmail.com\n",
        id = receipt.id,
        name = receipt.full_name,
        state = receipt.state,
        email = receipt.email,
        date = receipt.date,
        amount = receipt.amount,
        pct = receipt.trade_percentage,
        pbo = receipt.pbo_name,
    )
}

/// Save an exported receipt into `dir`, returning the written path
pub fn write_receipt_file(dir: &Path, export: &ReceiptExport) -> Result<PathBuf, LedgerError> {
    let path = dir.join(&export.file_name);
    std::fs::write(&path, export.contents.as_bytes())?;
    Ok(path)
}
