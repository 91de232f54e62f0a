//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! AppConfig (RPC URL, wallet mode, contract address)
//!     → client.rs (RPC connection with timeouts, optional local signer)
//!     → wallet.rs (accounts, raw value transfers)
//!     → contract.rs (ledger reads, addToBlockchain, confirmation)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contract;
pub mod types;
pub mod wallet;

use std::sync::Arc;

pub use client::ChainClient;
pub use contract::{ContractClient, LedgerContract};
pub use types::{
    ChainError, ChainId, ChainResult, Confirmation, LedgerEntry, PendingTransfer,
    RawTransfer, TransferRequest,
};
pub use wallet::{ChainWallet, WalletProvider};

use crate::config::schema::{AppConfig, WalletMode};

/// A present wallet together with the contract client built on its signer.
#[derive(Debug, Clone)]
pub struct ChainAccess {
    pub wallet: Arc<dyn WalletProvider>,
    pub contract: Arc<dyn LedgerContract>,
}

impl ChainAccess {
    pub fn new(wallet: Arc<dyn WalletProvider>, contract: Arc<dyn LedgerContract>) -> Self {
        Self { wallet, contract }
    }

    /// Build the wallet and contract described by `config`.
    ///
    /// Returns `Ok(None)` when no wallet is configured, which the provider
    /// treats like a missing injected wallet.
    pub async fn from_config(config: &AppConfig) -> ChainResult<Option<Self>> {
        let (client, wallet) = match config.wallet.mode {
            WalletMode::None => {
                tracing::info!("No wallet configured");
                return Ok(None);
            }
            WalletMode::Node => {
                let client = ChainClient::connect(config.chain.clone(), None).await?;
                (client.clone(), ChainWallet::node(client))
            }
            WalletMode::Local => {
                let signer = wallet::signer_from_env(&config.wallet.private_key_env)?;
                let address = signer.address();
                let client = ChainClient::connect(config.chain.clone(), Some(signer)).await?;
                (
                    client.clone(),
                    ChainWallet::local(client, address, config.wallet.pre_authorized),
                )
            }
        };

        let contract = ContractClient::from_address_str(client, &config.contract.address)?;

        Ok(Some(Self::new(Arc::new(wallet), Arc::new(contract))))
    }
}
