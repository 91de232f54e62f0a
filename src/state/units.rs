//! Amount and timestamp conversion between chain and display form.

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::U256;
use chrono::{DateTime, TimeZone};
use thiserror::Error;

/// Decimals of the chain's fixed-point amount representation.
pub const ETHER_DECIMALS: usize = 18;

/// Why a decimal amount could not be converted to wei.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount must not be negative")]
    Negative,

    #[error("'{0}' is not a decimal number")]
    Malformed(String),

    #[error("at most {max} decimal places are supported, got {got}")]
    TooPrecise { got: usize, max: usize },

    #[error("amount out of range: {0}")]
    OutOfRange(String),
}

/// Convert a human-unit decimal string (e.g. `"1.5"`) to wei.
pub fn parse_amount(input: &str) -> Result<U256, AmountError> {
    let amount = input.trim();
    if amount.is_empty() {
        return Err(AmountError::Empty);
    }
    if amount.starts_with('-') {
        return Err(AmountError::Negative);
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(AmountError::Malformed(amount.to_string()));
    }
    if fraction.len() > ETHER_DECIMALS {
        return Err(AmountError::TooPrecise {
            got: fraction.len(),
            max: ETHER_DECIMALS,
        });
    }

    let normalized = match (whole.is_empty(), fraction.is_empty()) {
        (_, true) => whole.to_string(),
        (true, false) => format!("0.{}", fraction),
        (false, false) => format!("{}.{}", whole, fraction),
    };

    parse_ether(&normalized).map_err(|e| AmountError::OutOfRange(e.to_string()))
}

/// Convert wei to a floating display value.
pub fn to_display_amount(wei: U256) -> f64 {
    format_ether(wei).parse().unwrap_or(f64::NAN)
}

/// Render seconds since epoch the way a browser's default locale does,
/// e.g. `11/14/2023, 10:13:20 PM`.
pub fn format_timestamp<Tz>(secs: Option<i64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match secs.and_then(|s| DateTime::from_timestamp(s, 0)) {
        Some(utc) => utc
            .with_timezone(tz)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
        None => "Invalid Date".to_string(),
    }
}
