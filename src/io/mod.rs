//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - Submission rows, records listing and analytics output
//! - `sync_reader` - Synchronous submissions reader with iterator interface
//! - `receipt` - Receipt CSV export, parsing and text rendering

pub mod csv_format;
pub mod receipt;
pub mod sync_reader;

pub use csv_format::{write_analytics_csv, write_records_csv, SubmissionRow};
pub use receipt::{
    parse_receipt_csv, receipt_file_name, render_receipt_csv, render_receipt_text,
    write_receipt_file, ParsedReceipt, ReceiptExport,
};
pub use sync_reader::SubmissionReader;
