//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::config::schema::ChainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

/// Errors that can occur talking to the wallet or the ledger contract.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Invalid private key format or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Contract call or decode failed.
    #[error("Contract error: {0}")]
    Contract(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// The wallet returned no accounts where at least one was required.
    #[error("Wallet returned no accounts")]
    NoAccounts,
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// A plain value transfer handed to the wallet (`eth_sendTransaction`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Sending account; the wallet's default account when absent.
    pub from: Option<Address>,
    pub to: Address,
    pub gas: u64,
    /// Amount in wei.
    pub value: U256,
}

/// One record as stored by the ledger contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransfer {
    pub sender: Address,
    pub receiver: Address,
    /// Amount in wei.
    pub amount: U256,
    pub message: String,
    /// Block timestamp, seconds since epoch.
    pub timestamp: U256,
    pub keyword: String,
}

/// Metadata written to the ledger alongside a value transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub receiver: Address,
    pub amount: U256,
    pub message: String,
    pub keyword: String,
}

/// Handle to a submitted contract call that has not been confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransfer {
    pub hash: TxHash,
}

/// A contract call mined at the required block depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub block_number: u64,
}
