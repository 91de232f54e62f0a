//! Display model for ledger transfer records.

use alloy::primitives::Address;
use chrono::TimeZone;
use serde::Serialize;

use crate::blockchain::RawTransfer;
use crate::state::units::{format_timestamp, to_display_amount};

/// A transfer as shown to the user. Rebuilt from the contract on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub address_from: Address,
    pub address_to: Address,
    /// Localized date-time string.
    pub timestamp: String,
    pub message: String,
    pub keyword: String,
    /// Amount in ether units.
    pub amount: f64,
}

impl Transaction {
    pub fn from_raw<Tz>(raw: &RawTransfer, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let secs = u64::try_from(raw.timestamp)
            .ok()
            .and_then(|s| i64::try_from(s).ok());

        Self {
            address_from: raw.sender,
            address_to: raw.receiver,
            timestamp: format_timestamp(secs, tz),
            message: raw.message.clone(),
            keyword: raw.keyword.clone(),
            amount: to_display_amount(raw.amount),
        }
    }
}
