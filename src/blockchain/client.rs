//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint, optionally with a local signing wallet
//! - Query chain state (chain id, block number, receipts)
//! - Submit transactions built by the wallet
//! - Handle timeouts and network errors gracefully

use std::borrow::Cow;
use std::future::IntoFuture;
use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::json_rpc::RpcRecv;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use tokio::time::timeout;

use crate::blockchain::types::{ChainConfig, ChainError, ChainId, ChainResult};

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct ChainClient {
    /// Type-erased provider; carries the wallet filler in local mode.
    provider: DynProvider,
    /// Configuration.
    config: ChainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a new chain client.
    ///
    /// # Arguments
    /// * `config` - Chain configuration
    /// * `signer` - Local signer; `None` leaves signing to the node
    ///
    /// # Returns
    /// A new client, or an error if the RPC URL is invalid. An unreachable
    /// endpoint is not an error here.
    pub async fn connect(config: ChainConfig, signer: Option<PrivateKeySigner>) -> ChainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);

        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(url)
                .erased(),
            None => ProviderBuilder::new().connect_http(url).erased(),
        };

        let client = Self {
            provider,
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Chain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Chain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Run an RPC future under the configured timeout.
    pub async fn with_timeout<F, T, E>(&self, op: &'static str, fut: F) -> ChainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(op, error = %e, "RPC error");
                Err(ChainError::Rpc(format!("{} failed: {}", op, e)))
            }
            Err(_) => {
                tracing::warn!(op, "RPC timeout");
                Err(ChainError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> ChainResult<ChainId> {
        self.with_timeout("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> ChainResult<u64> {
        self.with_timeout("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    /// Accounts the node manages (`eth_accounts`).
    pub async fn get_accounts(&self) -> ChainResult<Vec<Address>> {
        self.with_timeout("eth_accounts", self.provider.get_accounts())
            .await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> ChainResult<Option<TransactionReceipt>> {
        self.with_timeout(
            "eth_getTransactionReceipt",
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await
    }

    /// Submit a transaction; returns its hash without waiting for inclusion.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> ChainResult<TxHash> {
        let pending = self
            .with_timeout("eth_sendTransaction", self.provider.send_transaction(tx))
            .await?;
        Ok(*pending.tx_hash())
    }

    /// Issue a parameterless JSON-RPC request.
    pub async fn request<R: RpcRecv>(&self, method: &'static str) -> ChainResult<R> {
        self.with_timeout(method, self.provider.raw_request::<(), R>(Cow::Borrowed(method), ()))
            .await
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Get the number of confirmation blocks required.
    pub fn confirmation_blocks(&self) -> u32 {
        self.config.confirmation_blocks
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
