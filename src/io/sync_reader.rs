//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over form submissions from a CSV file.
//! Delegates row conversion to the csv_format module.
//!
//! # Iterator Interface
//!
//! SubmissionReader implements the Iterator trait, yielding
//! `Result<TransactionForm, LedgerError>` for each CSV row:
//!
//! ```no_run
//! use landtrade_ledger::io::sync_reader::SubmissionReader;
//! use std::path::Path;
//!
//! let reader = SubmissionReader::new(Path::new("submissions.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(form) => println!("Submission from {}", form.full_name),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Malformed rows are yielded as Err variants carrying the line number
//!
//! Rows are not validated here; a row with empty or bad fields becomes a
//! form that validation will reject.

use crate::io::csv_format::SubmissionRow;
use crate::types::{LedgerError, TransactionForm};
use csv::{DeserializeRecordsIntoIter, ReaderBuilder, Trim};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

/// Synchronous submissions reader
pub struct SubmissionReader {
    rows: DeserializeRecordsIntoIter<File, SubmissionRow>,
}

impl SubmissionReader {
    /// Open a submissions CSV file
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (short rows reach validation)
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Returns
    ///
    /// * `Ok(SubmissionReader)` if the file opened successfully
    /// * `Err(LedgerError::FileNotFound)` if there is no such file
    /// * `Err(LedgerError::IoError)` for any other open failure
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LedgerError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LedgerError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), e),
            },
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            rows: reader.into_deserialize(),
        })
    }
}

impl Iterator for SubmissionReader {
    type Item = Result<TransactionForm, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(row.map(TransactionForm::from).map_err(LedgerError::from))
    }
}
