//! The transaction state provider.
//!
//! Owns the UI-facing state (connected account, form, history, loading flag)
//! and drives the wallet and ledger contract to change it.
//!
//! # Data Flow
//! ```text
//! initialize()
//!     → check_if_wallet_is_connected() → eth_accounts → get_all_transactions()
//!     → check_if_transactions_exists() → getTransactionCount → scalar store
//!
//! send_transaction()
//!     → validate form → eth_sendTransaction (value)
//!     → addToBlockchain (record) → loading → confirm → refresh count
//!     → ProviderEvent::TransferCompleted
//! ```
//!
//! # Design Decisions
//! - Collaborators are injected; `None` for chain access means no wallet
//! - Calls are awaited one after another, never concurrently
//! - State lives in a `watch` channel so embedders can subscribe to it
//! - No retries; the user re-triggers a failed action

use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, watch};

use crate::blockchain::{ChainAccess, ChainError, Confirmation, LedgerEntry, TransferRequest};
use crate::config::schema::TransferConfig;
use crate::observability::metrics;
use crate::state::form::{FieldError, FormData, FormField};
use crate::state::transaction::Transaction;
use crate::store::{ScalarStore, StoreError, TRANSACTION_COUNT_KEY};

/// Alert shown whenever an operation needs a wallet and there is none.
pub const MISSING_WALLET_ALERT: &str = "Please install MetaMask";

const EVENT_CAPACITY: usize = 16;

/// Errors surfaced by provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Wallet or contract call failed. The message stays generic; the
    /// underlying [`ChainError`] is available as the source.
    #[error("No ethereum object")]
    Chain(#[from] ChainError),

    #[error("Failed to cache transaction count")]
    Store(#[from] StoreError),

    #[error("Invalid transfer form: {}", join_errors(.0))]
    InvalidForm(Vec<FieldError>),
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// User-facing alerts (the browser `alert()` of a web front end).
pub trait Notifier: Send + Sync + std::fmt::Debug {
    fn alert(&self, message: &str);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        tracing::warn!(alert = message, "User alert");
    }
}

/// Snapshot of everything the embedding UI reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextValue {
    pub current_account: Option<Address>,
    pub form_data: FormData,
    pub transactions: Vec<Transaction>,
    pub is_loading: bool,
    /// Cached on-chain record count, if known.
    pub transaction_count: Option<u64>,
}

/// Notable state transitions, broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountConnected(Address),
    HistoryRefreshed { entries: usize },
    /// A send finished; embedders refresh their view in response.
    TransferCompleted {
        ledger_hash: TxHash,
        transaction_count: u64,
    },
    TransferFailed { reason: String },
}

/// Outcome of a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    /// Hash of the raw value transfer.
    pub transfer_hash: TxHash,
    /// Hash of the `addToBlockchain` call.
    pub ledger_hash: TxHash,
    pub block_number: u64,
    pub transaction_count: u64,
}

/// Transaction state provider.
#[derive(Debug)]
pub struct TransactionProvider {
    access: Option<ChainAccess>,
    store: Arc<dyn ScalarStore>,
    notifier: Arc<dyn Notifier>,
    settings: TransferConfig,
    state: watch::Sender<ContextValue>,
    events: broadcast::Sender<ProviderEvent>,
}

impl TransactionProvider {
    /// Create a provider. The cached transaction count is read from `store`.
    pub fn new(access: Option<ChainAccess>, store: Arc<dyn ScalarStore>) -> Self {
        let transaction_count = store
            .get(TRANSACTION_COUNT_KEY)
            .and_then(|v| v.parse::<u64>().ok());

        let (state, _) = watch::channel(ContextValue {
            transaction_count,
            ..ContextValue::default()
        });
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            access,
            store,
            notifier: Arc::new(LogNotifier),
            settings: TransferConfig::default(),
            state,
            events,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_settings(mut self, settings: TransferConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Startup sequence: wallet check, then transaction count. Failures are
    /// logged and do not stop the sequence.
    pub async fn initialize(&self) {
        if let Err(e) = self.check_if_wallet_is_connected().await {
            tracing::warn!(error = %e, "Wallet connection check failed");
        }
        if let Err(e) = self.check_if_transactions_exists().await {
            tracing::warn!(error = %e, "Transaction count check failed");
        }
    }

    /// Ask the wallet for account access and remember the first account.
    pub async fn connect_wallet(&self) -> Result<(), ProviderError> {
        let Some(access) = &self.access else {
            self.notifier.alert(MISSING_WALLET_ALERT);
            return Ok(());
        };

        let accounts = access
            .wallet
            .request_accounts()
            .await
            .map_err(|e| chain_failure("connect_wallet", e))?;

        match accounts.first() {
            Some(&account) => self.set_account(account),
            None => tracing::warn!("Wallet granted access to no accounts"),
        }
        Ok(())
    }

    /// Pick up an already-authorized account without prompting, and load
    /// its history.
    pub async fn check_if_wallet_is_connected(&self) -> Result<(), ProviderError> {
        let Some(access) = &self.access else {
            self.notifier.alert(MISSING_WALLET_ALERT);
            return Ok(());
        };

        let accounts = access
            .wallet
            .accounts()
            .await
            .map_err(|e| chain_failure("check_if_wallet_is_connected", e))?;

        match accounts.first() {
            Some(&account) => {
                self.set_account(account);
                if let Err(e) = self.get_all_transactions().await {
                    tracing::warn!(error = %e, "History refresh after connect failed");
                }
            }
            None => tracing::info!("No accounts found"),
        }
        Ok(())
    }

    /// Copy the on-chain record count into the scalar store.
    pub async fn check_if_transactions_exists(&self) -> Result<(), ProviderError> {
        let Some(access) = &self.access else {
            return Ok(());
        };

        let count = access
            .contract
            .get_transaction_count()
            .await
            .map_err(|e| chain_failure("check_if_transactions_exists", e))?;

        self.store
            .set(TRANSACTION_COUNT_KEY, &count.to_string())
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to persist transaction count");
                ProviderError::from(e)
            })?;

        let count = saturating_u64(count);
        self.state.send_modify(|s| s.transaction_count = Some(count));
        tracing::debug!(count, "Transaction count cached");
        Ok(())
    }

    /// Replace the displayed history with the first `history_limit` records.
    pub async fn get_all_transactions(&self) -> Result<(), ProviderError> {
        let Some(access) = &self.access else {
            self.notifier.alert(MISSING_WALLET_ALERT);
            return Ok(());
        };

        let records = access
            .contract
            .get_all_transactions()
            .await
            .map_err(|e| chain_failure("get_all_transactions", e))?;

        let transactions: Vec<Transaction> = records
            .iter()
            .take(self.settings.history_limit)
            .map(|raw| Transaction::from_raw(raw, &chrono::Local))
            .collect();
        let entries = transactions.len();

        tracing::debug!(available = records.len(), entries, "Transfer history loaded");
        metrics::record_history_size(entries);

        self.state.send_modify(|s| s.transactions = transactions);
        let _ = self.events.send(ProviderEvent::HistoryRefreshed { entries });
        Ok(())
    }

    /// Merge one field into the form. No validation happens here.
    pub fn handle_change(&self, value: impl Into<String>, field: FormField) {
        let value = value.into();
        self.state.send_modify(|s| s.form_data.set(field, value));
    }

    /// Send the amount in the form to its recipient and record the transfer
    /// on the ledger contract.
    ///
    /// Returns `Ok(None)` when no wallet is available. If confirmation fails,
    /// `is_loading` stays set; the `TransferFailed` event lets embedders
    /// recover.
    pub async fn send_transaction(&self) -> Result<Option<SendReceipt>, ProviderError> {
        let Some(access) = &self.access else {
            tracing::warn!("No ethereum object");
            return Ok(None);
        };

        let (form, from) = {
            let state = self.state.borrow();
            (state.form_data.clone(), state.current_account)
        };

        let draft = form.validate().map_err(|errors| {
            let err = ProviderError::InvalidForm(errors);
            tracing::error!(error = %err, "Transfer rejected");
            metrics::record_transfer("invalid");
            err
        })?;

        let transfer_hash = access
            .wallet
            .send_transaction(TransferRequest {
                from,
                to: draft.to,
                gas: self.settings.gas_limit,
                value: draft.amount,
            })
            .await
            .map_err(|e| self.transfer_failure("eth_sendTransaction", e))?;

        let pending = access
            .contract
            .add_to_blockchain(
                from,
                LedgerEntry {
                    receiver: draft.to,
                    amount: draft.amount,
                    message: draft.message,
                    keyword: draft.keyword,
                },
            )
            .await
            .map_err(|e| self.transfer_failure("addToBlockchain", e))?;

        self.set_loading(true);
        tracing::info!("Loading - {}", pending.hash);

        let Confirmation { block_number } = access
            .contract
            .confirm(pending)
            .await
            .map_err(|e| self.transfer_failure("confirm", e))?;

        tracing::info!("Success - {}", pending.hash);
        self.set_loading(false);

        let count = access
            .contract
            .get_transaction_count()
            .await
            .map_err(|e| chain_failure("getTransactionCount", e))?;
        let transaction_count = saturating_u64(count);
        self.state
            .send_modify(|s| s.transaction_count = Some(transaction_count));

        metrics::record_transfer("success");
        let _ = self.events.send(ProviderEvent::TransferCompleted {
            ledger_hash: pending.hash,
            transaction_count,
        });

        Ok(Some(SendReceipt {
            transfer_hash,
            ledger_hash: pending.hash,
            block_number,
            transaction_count,
        }))
    }

    /// Current state.
    pub fn snapshot(&self) -> ContextValue {
        self.state.borrow().clone()
    }

    pub fn current_account(&self) -> Option<Address> {
        self.state.borrow().current_account
    }

    pub fn form_data(&self) -> FormData {
        self.state.borrow().form_data.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.borrow().transactions.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn transaction_count(&self) -> Option<u64> {
        self.state.borrow().transaction_count
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<ContextValue> {
        self.state.subscribe()
    }

    /// Receive provider events emitted from now on.
    pub fn events(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }

    fn set_account(&self, account: Address) {
        tracing::info!(account = %account, "Wallet connected");
        self.state.send_modify(|s| s.current_account = Some(account));
        let _ = self.events.send(ProviderEvent::AccountConnected(account));
    }

    fn set_loading(&self, loading: bool) {
        self.state.send_modify(|s| s.is_loading = loading);
    }

    fn transfer_failure(&self, op: &'static str, e: ChainError) -> ProviderError {
        metrics::record_transfer("failed");
        let _ = self.events.send(ProviderEvent::TransferFailed {
            reason: e.to_string(),
        });
        chain_failure(op, e)
    }
}

fn chain_failure(op: &'static str, e: ChainError) -> ProviderError {
    tracing::error!(op, error = %e, "Chain call failed");
    ProviderError::Chain(e)
}

fn saturating_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_cached_count_loaded_from_store() {
        let store = MemoryStore::new();
        store.set(TRANSACTION_COUNT_KEY, "7").unwrap();
        let provider = TransactionProvider::new(None, Arc::new(store));
        assert_eq!(provider.transaction_count(), Some(7));
    }

    #[test]
    fn test_garbage_cached_count_ignored() {
        let store = MemoryStore::new();
        store.set(TRANSACTION_COUNT_KEY, "seven").unwrap();
        let provider = TransactionProvider::new(None, Arc::new(store));
        assert_eq!(provider.transaction_count(), None);
    }

    #[test]
    fn test_handle_change_is_synchronous_merge() {
        let provider = TransactionProvider::new(None, Arc::new(MemoryStore::new()));
        provider.handle_change("0.5", FormField::Amount);
        provider.handle_change("hello", FormField::Message);

        let form = provider.form_data();
        assert_eq!(form.amount, "0.5");
        assert_eq!(form.message, "hello");
        assert_eq!(form.address_to, "");
        assert_eq!(form.keyword, "");
    }

    #[test]
    fn test_subscribers_see_changes() {
        let provider = TransactionProvider::new(None, Arc::new(MemoryStore::new()));
        let mut rx = provider.subscribe();
        provider.handle_change("kw", FormField::Keyword);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().form_data.keyword, "kw");
    }

    #[test]
    fn test_generic_error_keeps_source() {
        let err = ProviderError::from(ChainError::Timeout(10));
        assert_eq!(err.to_string(), "No ethereum object");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "RPC timeout after 10 seconds");
    }
}
