//! Wallet provider: account discovery and raw value transfers.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::{ChainError, ChainResult, TransferRequest};
use crate::observability::metrics;

/// Default environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "TRANSFER_WALLET_PRIVATE_KEY";

/// The wallet capabilities the transaction provider relies on.
#[async_trait]
pub trait WalletProvider: Send + Sync + std::fmt::Debug {
    /// Already-authorized accounts, without prompting (`eth_accounts`).
    async fn accounts(&self) -> ChainResult<Vec<Address>>;

    /// Ask for account access (`eth_requestAccounts`).
    async fn request_accounts(&self) -> ChainResult<Vec<Address>>;

    /// Submit a plain value transfer (`eth_sendTransaction`).
    async fn send_transaction(&self, request: TransferRequest) -> ChainResult<TxHash>;
}

/// Parse a hex-encoded private key (with or without 0x prefix).
///
/// The key is never logged.
pub fn signer_from_private_key(private_key_hex: &str) -> ChainResult<PrivateKeySigner> {
    let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

    key_hex
        .parse()
        .map_err(|e| ChainError::Wallet(format!("Invalid private key format: {}", e)))
}

/// Load a signer from the named environment variable.
pub fn signer_from_env(var: &str) -> ChainResult<PrivateKeySigner> {
    let private_key = std::env::var(var).map_err(|_| {
        ChainError::Wallet(format!("Environment variable {} not set", var))
    })?;

    signer_from_private_key(&private_key)
}

#[derive(Debug)]
enum AccountSource {
    /// The node owns the accounts.
    Node,
    /// A local key; exposed only once authorized.
    Local {
        address: Address,
        authorized: AtomicBool,
    },
}

/// JSON-RPC backed wallet.
#[derive(Debug, Clone)]
pub struct ChainWallet {
    client: ChainClient,
    source: Arc<AccountSource>,
}

impl ChainWallet {
    /// Wallet whose accounts are unlocked on the node.
    pub fn node(client: ChainClient) -> Self {
        Self {
            client,
            source: Arc::new(AccountSource::Node),
        }
    }

    /// Wallet around a local key. `client` must carry the same signer.
    pub fn local(client: ChainClient, address: Address, pre_authorized: bool) -> Self {
        tracing::info!(
            address = %address,
            chain_id = client.config().chain_id,
            "Local wallet initialized"
        );

        Self {
            client,
            source: Arc::new(AccountSource::Local {
                address,
                authorized: AtomicBool::new(pre_authorized),
            }),
        }
    }
}

#[async_trait]
impl WalletProvider for ChainWallet {
    async fn accounts(&self) -> ChainResult<Vec<Address>> {
        let result = match self.source.as_ref() {
            AccountSource::Node => self.client.get_accounts().await,
            AccountSource::Local { address, authorized } => {
                if authorized.load(Ordering::SeqCst) {
                    Ok(vec![*address])
                } else {
                    Ok(Vec::new())
                }
            }
        };
        metrics::record_wallet_request("eth_accounts", result.is_ok());
        result
    }

    async fn request_accounts(&self) -> ChainResult<Vec<Address>> {
        let result = match self.source.as_ref() {
            AccountSource::Node => {
                match self.client.request::<Vec<Address>>("eth_requestAccounts").await {
                    Ok(accounts) => Ok(accounts),
                    // Dev nodes usually lack eth_requestAccounts; their
                    // accounts are unlocked already.
                    Err(ChainError::Rpc(e)) => {
                        tracing::debug!(error = %e, "eth_requestAccounts unsupported, using eth_accounts");
                        self.client.get_accounts().await
                    }
                    Err(e) => Err(e),
                }
            }
            AccountSource::Local { address, authorized } => {
                authorized.store(true, Ordering::SeqCst);
                Ok(vec![*address])
            }
        };
        metrics::record_wallet_request("eth_requestAccounts", result.is_ok());
        result
    }

    async fn send_transaction(&self, request: TransferRequest) -> ChainResult<TxHash> {
        if let AccountSource::Local { authorized, .. } = self.source.as_ref() {
            if !authorized.load(Ordering::SeqCst) {
                metrics::record_wallet_request("eth_sendTransaction", false);
                tracing::warn!("Refusing to sign for a local wallet that was never connected");
                return Err(ChainError::NoAccounts);
            }
        }

        let mut tx = TransactionRequest::default()
            .with_to(request.to)
            .with_value(request.value)
            .with_gas_limit(request.gas);
        if let Some(from) = request.from {
            tx = tx.with_from(from);
        }

        let result = self.client.send_transaction(tx).await;
        metrics::record_wallet_request("eth_sendTransaction", result.is_ok());

        let hash = result?;
        tracing::info!(
            tx_hash = %hash,
            to = %request.to,
            value = %request.value,
            "Value transfer submitted"
        );
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::ChainConfig;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    async fn offline_client() -> ChainClient {
        let config = ChainConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 2,
            ..ChainConfig::default()
        };
        ChainClient::connect(config, None).await.unwrap()
    }

    #[test]
    fn test_signer_from_private_key() {
        let signer = signer_from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(
            signer.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_signer_with_0x_prefix() {
        let signer = signer_from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(
            signer.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let result = signer_from_private_key("invalid_key");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_missing_env_var() {
        let result = signer_from_env("TRANSFER_PROVIDER_TEST_UNSET_KEY");
        assert!(result.unwrap_err().to_string().contains("not set"));
    }

    #[tokio::test]
    async fn test_local_wallet_requires_authorization() {
        let address = signer_from_private_key(TEST_PRIVATE_KEY).unwrap().address();
        let wallet = ChainWallet::local(offline_client().await, address, false);

        assert!(wallet.accounts().await.unwrap().is_empty());
        assert_eq!(wallet.request_accounts().await.unwrap(), vec![address]);
        assert_eq!(wallet.accounts().await.unwrap(), vec![address]);
    }

    #[tokio::test]
    async fn test_pre_authorized_local_wallet() {
        let address = signer_from_private_key(TEST_PRIVATE_KEY).unwrap().address();
        let wallet = ChainWallet::local(offline_client().await, address, true);
        assert_eq!(wallet.accounts().await.unwrap(), vec![address]);
    }

    #[tokio::test]
    async fn test_node_wallet_surfaces_rpc_failure() {
        let wallet = ChainWallet::node(offline_client().await);
        assert!(wallet.accounts().await.is_err());
    }

    #[tokio::test]
    async fn test_unauthorized_local_wallet_refuses_to_send() {
        let address = signer_from_private_key(TEST_PRIVATE_KEY).unwrap().address();
        let wallet = ChainWallet::local(offline_client().await, address, false);
        let request = TransferRequest {
            from: None,
            to: Address::repeat_byte(0x22),
            gas: 21_000,
            value: alloy::primitives::U256::from(1u64),
        };

        // Rejected locally; an attempt on the offline RPC would be Rpc or Timeout.
        let err = wallet.send_transaction(request).await.unwrap_err();
        assert!(matches!(err, ChainError::NoAccounts));
    }

    #[tokio::test]
    async fn test_node_request_accounts_falls_back_then_fails() {
        let wallet = ChainWallet::node(offline_client().await);
        let err = wallet.request_accounts().await.unwrap_err();
        assert!(matches!(err, ChainError::Rpc(_) | ChainError::Timeout(_)));
    }
}
