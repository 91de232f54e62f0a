//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and URLs before any RPC connection is attempted
//! - Validate value ranges (timeouts > 0, history limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;

use crate::config::schema::{AppConfig, WalletMode};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `chain.rpc_url`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.wallet.mode != WalletMode::None {
        if let Err(e) = config.chain.rpc_url.parse::<url::Url>() {
            errors.push(ValidationError::new(
                "chain.rpc_url",
                format!("invalid URL '{}': {}", config.chain.rpc_url, e),
            ));
        }

        match config.contract.address.parse::<Address>() {
            Ok(addr) if addr == Address::ZERO => {
                errors.push(ValidationError::new("contract.address", "must not be the zero address"));
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::new(
                "contract.address",
                format!("invalid address '{}': {}", config.contract.address, e),
            )),
        }
    }

    if config.wallet.mode == WalletMode::Local && config.wallet.private_key_env.trim().is_empty() {
        errors.push(ValidationError::new(
            "wallet.private_key_env",
            "required when wallet.mode = \"local\"",
        ));
    }

    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "chain.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("chain.poll_interval_ms", "must be greater than 0"));
    }
    if config.transfers.history_limit == 0 {
        errors.push(ValidationError::new("transfers.history_limit", "must be greater than 0"));
    }
    if config.transfers.gas_limit < 21_000 {
        errors.push(ValidationError::new(
            "transfers.gas_limit",
            "must cover the 21000 gas of a plain transfer",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
