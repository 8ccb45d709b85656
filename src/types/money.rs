//! Naira amount formatting
//!
//! Amounts are displayed as `₦` followed by the integer part grouped in
//! thousands and any significant fractional digits, e.g. `₦1,250.5`.
//! Nothing is rounded, so a displayed amount parses back to the stored value.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Currency glyph prefixed to every displayed amount
pub const NAIRA: char = '₦';

/// Format an amount with thousands separators and the naira glyph
pub fn format_naira(amount: Decimal) -> String {
    let normalized = amount.normalize();
    let text = normalized.abs().to_string();
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if normalized.is_sign_negative() && !normalized.is_zero() {
        "-"
    } else {
        ""
    };

    match fraction {
        Some(fraction) => format!("{}{}{}.{}", sign, NAIRA, grouped, fraction),
        None => format!("{}{}{}", sign, NAIRA, grouped),
    }
}

/// Parse an amount produced by [`format_naira`]
///
/// The glyph and separators are optional, so plain decimals parse too.
pub fn parse_naira(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let digits: String = unsigned
        .trim_start_matches(NAIRA)
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let value = Decimal::from_str(&digits).ok()?;
    Some(if negative { -value } else { value })
}
