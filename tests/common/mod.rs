//! Shared mocks for integration testing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, B256, TxHash, U256};
use async_trait::async_trait;

use transfer_provider::blockchain::{
    ChainAccess, ChainError, ChainResult, Confirmation, LedgerContract, LedgerEntry,
    PendingTransfer, RawTransfer, TransferRequest, WalletProvider,
};
use transfer_provider::state::Notifier;

/// Wallet with scripted accounts that records every transfer.
#[derive(Debug, Default)]
pub struct MockWallet {
    pub authorized: Mutex<Vec<Address>>,
    pub grantable: Vec<Address>,
    pub fail_requests: bool,
    pub fail_sends: bool,
    pub sent: Mutex<Vec<TransferRequest>>,
}

impl MockWallet {
    pub fn authorized(accounts: Vec<Address>) -> Self {
        Self {
            authorized: Mutex::new(accounts.clone()),
            grantable: accounts,
            ..Self::default()
        }
    }

    pub fn grantable(accounts: Vec<Address>) -> Self {
        Self {
            grantable: accounts,
            ..Self::default()
        }
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn accounts(&self) -> ChainResult<Vec<Address>> {
        if self.fail_requests {
            return Err(ChainError::Rpc("eth_accounts failed".into()));
        }
        Ok(self.authorized.lock().unwrap().clone())
    }

    async fn request_accounts(&self) -> ChainResult<Vec<Address>> {
        if self.fail_requests {
            return Err(ChainError::Rpc("user rejected the request".into()));
        }
        *self.authorized.lock().unwrap() = self.grantable.clone();
        Ok(self.grantable.clone())
    }

    async fn send_transaction(&self, request: TransferRequest) -> ChainResult<TxHash> {
        if self.fail_sends {
            return Err(ChainError::Rpc("insufficient funds".into()));
        }
        self.sent.lock().unwrap().push(request);
        Ok(B256::repeat_byte(0xaa))
    }
}

/// Ledger contract backed by a vector of records.
#[derive(Debug, Default)]
pub struct MockContract {
    pub records: Mutex<Vec<RawTransfer>>,
    pub count: AtomicU64,
    pub fail_reads: bool,
    pub fail_count: bool,
    pub fail_add: bool,
    pub fail_confirm: bool,
    pub entries: Mutex<Vec<(Option<Address>, LedgerEntry)>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl MockContract {
    pub fn with_records(records: Vec<RawTransfer>) -> Self {
        let count = records.len() as u64;
        Self {
            records: Mutex::new(records),
            count: AtomicU64::new(count),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl LedgerContract for MockContract {
    async fn get_all_transactions(&self) -> ChainResult<Vec<RawTransfer>> {
        self.log("getAllTransactions");
        if self.fail_reads {
            return Err(ChainError::Rpc("execution reverted".into()));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn get_transaction_count(&self) -> ChainResult<U256> {
        self.log("getTransactionCount");
        if self.fail_reads || self.fail_count {
            return Err(ChainError::Rpc("execution reverted".into()));
        }
        Ok(U256::from(self.count.load(Ordering::SeqCst)))
    }

    async fn add_to_blockchain(
        &self,
        from: Option<Address>,
        entry: LedgerEntry,
    ) -> ChainResult<PendingTransfer> {
        self.log("addToBlockchain");
        if self.fail_add {
            return Err(ChainError::Rpc("addToBlockchain reverted".into()));
        }
        self.entries.lock().unwrap().push((from, entry));
        Ok(PendingTransfer {
            hash: B256::repeat_byte(0xbb),
        })
    }

    async fn confirm(&self, _pending: PendingTransfer) -> ChainResult<Confirmation> {
        self.log("confirm");
        if self.fail_confirm {
            return Err(ChainError::Reverted("out of gas".into()));
        }
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(Confirmation { block_number: 42 })
    }
}

/// Notifier that keeps every alert.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

pub fn access(wallet: Arc<MockWallet>, contract: Arc<MockContract>) -> ChainAccess {
    ChainAccess::new(wallet, contract)
}

/// `n` records with increasing timestamps and amounts of `i` ether.
#[allow(dead_code)]
pub fn records(n: usize) -> Vec<RawTransfer> {
    (0..n)
        .map(|i| RawTransfer {
            sender: Address::repeat_byte(0x11),
            receiver: Address::repeat_byte(0x22),
            amount: U256::from(i as u64) * U256::from(10u64).pow(U256::from(18u64)),
            message: format!("message {}", i),
            timestamp: U256::from(1_700_000_000u64 + i as u64),
            keyword: format!("kw{}", i),
        })
        .collect()
}
