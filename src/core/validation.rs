//! Form and recipient validation
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. every required field is non-empty (the date is optional)
//! 2. the email matches `^[^\s@]+@[^\s@]+\.[^\s@]+$`
//! 3. the amount is a number strictly greater than zero
//! 4. the trade percentage is one of the offered values
//!
//! Validation is pure. Surfacing the message is up to the caller.

use crate::types::{TradePercentage, TransactionForm, ValidationError};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Form fields after validation, ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm {
    pub full_name: String,
    pub state: String,
    pub date: String,
    pub amount: Decimal,
    pub email: String,
    pub trade_percentage: TradePercentage,
    pub pbo_name: String,
}

/// Whether `email` passes the syntactic email check
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

/// Check a recipient address for a receipt send
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            email: email.to_string(),
        })
    }
}

/// Parse a positive amount the way a numeric form input is read
///
/// Accepts plain decimals and scientific notation with surrounding
/// whitespace. Zero, negatives, non-numbers and magnitudes `Decimal` cannot
/// represent are rejected.
pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    let invalid = || ValidationError::InvalidAmount {
        amount: raw.to_string(),
    };

    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| invalid())?;

    if amount > Decimal::ZERO {
        Ok(amount)
    } else {
        Err(invalid())
    }
}

/// Validate a raw form
///
/// Text fields are carried over verbatim; only the amount and percentage are
/// parsed.
pub fn validate_form(form: &TransactionForm) -> Result<ValidatedForm, ValidationError> {
    let required = [
        ("full_name", &form.full_name),
        ("state", &form.state),
        ("amount", &form.amount),
        ("email", &form.email),
        ("trade_percentage", &form.trade_percentage),
        ("pbo_name", &form.pbo_name),
    ];
    if let Some((field, _)) = required
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
    {
        return Err(ValidationError::MissingField { field });
    }

    validate_email(&form.email)?;
    let amount = parse_amount(&form.amount)?;
    let trade_percentage = TradePercentage::from_str(&form.trade_percentage).map_err(|_| {
        ValidationError::InvalidTradePercentage {
            value: form.trade_percentage.clone(),
        }
    })?;

    Ok(ValidatedForm {
        full_name: form.full_name.clone(),
        state: form.state.clone(),
        date: form.date.clone(),
        amount,
        email: form.email.clone(),
        trade_percentage,
        pbo_name: form.pbo_name.clone(),
    })
}
