//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the transfer
//! provider. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the transfer provider.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// JSON-RPC endpoint and confirmation settings.
    pub chain: ChainConfig,

    /// Which wallet backs the session.
    pub wallet: WalletConfig,

    /// Ledger contract binding.
    pub contract: ContractConfig,

    /// Persistent scalar store location.
    pub store: StoreConfig,

    /// Transfer and history settings.
    pub transfers: TransferConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations a ledger entry needs.
    pub confirmation_blocks: u32,

    /// Maximum time to wait for confirmation, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 2000,
        }
    }
}

/// How accounts are sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletMode {
    /// Accounts unlocked on the node (`eth_accounts`, `eth_sendTransaction`).
    Node,
    /// A local private key read from the environment.
    Local,
    /// No wallet available; every wallet operation degrades to an alert.
    None,
}

/// Wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    pub mode: WalletMode,

    /// Environment variable holding the hex private key (local mode).
    pub private_key_env: String,

    /// Whether the local account counts as already authorized at startup.
    pub pre_authorized: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            mode: WalletMode::Node,
            private_key_env: "TRANSFER_WALLET_PRIVATE_KEY".to_string(),
            pre_authorized: true,
        }
    }
}

/// Ledger contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractConfig {
    /// Deployed `Transactions` contract address.
    pub address: String,
}

/// Persistent scalar store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file backing the store. In-memory when unset.
    pub path: Option<String>,
}

/// Transfer settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Maximum number of history entries kept for display.
    pub history_limit: usize,

    /// Gas limit attached to the raw value transfer.
    pub gas_limit: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            history_limit: 20,
            gas_limit: 0x186A0,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
