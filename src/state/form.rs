//! Transfer form state and its validation.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::units::parse_amount;

/// Raw user input for a transfer. Nothing here is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub address_to: String,
    /// Decimal amount in ether units.
    pub amount: String,
    pub keyword: String,
    pub message: String,
}

/// One of the editable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    AddressTo,
    Amount,
    Keyword,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::AddressTo,
        FormField::Amount,
        FormField::Keyword,
        FormField::Message,
    ];

    /// Wire name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            FormField::AddressTo => "addressTo",
            FormField::Amount => "amount",
            FormField::Keyword => "keyword",
            FormField::Message => "message",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| format!("unknown form field '{}'", s))
    }
}

impl FormData {
    /// Overwrite a single field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::AddressTo => self.address_to = value,
            FormField::Amount => self.amount = value,
            FormField::Keyword => self.keyword = value,
            FormField::Message => self.message = value,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::AddressTo => &self.address_to,
            FormField::Amount => &self.amount,
            FormField::Keyword => &self.keyword,
            FormField::Message => &self.message,
        }
    }

    /// Check the recipient and amount, collecting every problem found.
    pub fn validate(&self) -> Result<TransferDraft, Vec<FieldError>> {
        let mut errors = Vec::new();

        let to = match self.address_to.trim() {
            "" => {
                errors.push(FieldError::new(FormField::AddressTo, "recipient is required"));
                None
            }
            raw => match raw.parse::<Address>() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    errors.push(FieldError::new(FormField::AddressTo, e.to_string()));
                    None
                }
            },
        };

        let amount = match parse_amount(&self.amount) {
            Ok(amount) => Some(amount),
            Err(e) => {
                errors.push(FieldError::new(FormField::Amount, e.to_string()));
                None
            }
        };

        match (to, amount) {
            (Some(to), Some(amount)) if errors.is_empty() => Ok(TransferDraft {
                to,
                amount,
                message: self.message.clone(),
                keyword: self.keyword.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// A validated transfer ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDraft {
    pub to: Address,
    /// Amount in wei.
    pub amount: U256,
    pub message: String,
    pub keyword: String,
}

/// A problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct FieldError {
    pub field: FormField,
    pub reason: String,
}

impl FieldError {
    fn new(field: FormField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormData {
        FormData {
            address_to: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".to_string(),
            amount: "1.5".to_string(),
            keyword: "coffee".to_string(),
            message: "thanks".to_string(),
        }
    }

    #[test]
    fn test_set_touches_only_named_field() {
        for field in FormField::ALL {
            let before = filled();
            let mut after = before.clone();
            after.set(field, "changed");

            for other in FormField::ALL {
                if other == field {
                    assert_eq!(after.get(other), "changed");
                } else {
                    assert_eq!(after.get(other), before.get(other));
                }
            }
        }
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in FormField::ALL {
            assert_eq!(field.name().parse::<FormField>().unwrap(), field);
        }
        assert!("amountTo".parse::<FormField>().is_err());
    }

    #[test]
    fn test_validate_success() {
        let draft = filled().validate().unwrap();
        assert_eq!(draft.amount, U256::from(1_500_000_000_000_000_000u128));
        assert_eq!(draft.keyword, "coffee");
        assert_eq!(draft.message, "thanks");
    }

    #[test]
    fn test_validate_reports_every_field() {
        let form = FormData {
            address_to: "0x1234".to_string(),
            amount: "one".to_string(),
            ..FormData::default()
        };
        let errors = form.validate().unwrap_err();
        let fields: Vec<FormField> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![FormField::AddressTo, FormField::Amount]);
    }

    #[test]
    fn test_empty_form_is_invalid() {
        let errors = FormData::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].to_string(), "addressTo: recipient is required");
        assert_eq!(errors[1].to_string(), "amount: amount is empty");
    }
}
