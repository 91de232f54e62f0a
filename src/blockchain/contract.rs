//! Ledger contract client: transfer history reads and record writes.
//!
//! # Responsibilities
//! - Bind the `Transactions` contract ABI
//! - Read the stored transfer records and their count
//! - Submit `addToBlockchain` and monitor its confirmation

use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use alloy::sol;
use async_trait::async_trait;
use tokio::time::{interval, timeout};

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::{
    ChainError, ChainResult, Confirmation, LedgerEntry, PendingTransfer, RawTransfer,
};
use crate::observability::metrics;

sol! {
    #[sol(rpc)]
    contract Transactions {
        struct TransferStruct {
            address sender;
            address receiver;
            uint amount;
            string message;
            uint256 timestamp;
            string keyword;
        }

        function addToBlockchain(address payable receiver, uint amount, string memory message, string memory keyword) public;
        function getAllTransactions() public view returns (TransferStruct[] memory);
        function getTransactionCount() public view returns (uint256);
    }
}

impl From<Transactions::TransferStruct> for RawTransfer {
    fn from(t: Transactions::TransferStruct) -> Self {
        Self {
            sender: t.sender,
            receiver: t.receiver,
            amount: t.amount,
            message: t.message,
            timestamp: t.timestamp,
            keyword: t.keyword,
        }
    }
}

/// Read and write entry points of the ledger contract.
#[async_trait]
pub trait LedgerContract: Send + Sync + std::fmt::Debug {
    /// Every stored record, in contract order.
    async fn get_all_transactions(&self) -> ChainResult<Vec<RawTransfer>>;

    /// Number of stored records.
    async fn get_transaction_count(&self) -> ChainResult<U256>;

    /// Submit `addToBlockchain`; returns before the call is mined.
    async fn add_to_blockchain(
        &self,
        from: Option<Address>,
        entry: LedgerEntry,
    ) -> ChainResult<PendingTransfer>;

    /// Wait until a submitted call is confirmed. Reverts and timeouts are errors.
    async fn confirm(&self, pending: PendingTransfer) -> ChainResult<Confirmation>;
}

/// `LedgerContract` over JSON-RPC.
#[derive(Debug, Clone)]
pub struct ContractClient {
    client: ChainClient,
    address: Address,
}

impl ContractClient {
    /// Bind the contract at `address` using the client's (signing) provider.
    pub fn new(client: ChainClient, address: Address) -> Self {
        tracing::info!(contract = %address, "Ledger contract bound");
        Self { client, address }
    }

    /// Parse the address first; used when it comes straight from config.
    pub fn from_address_str(client: ChainClient, address: &str) -> ChainResult<Self> {
        let address: Address = address
            .parse()
            .map_err(|e| ChainError::Contract(format!("Invalid contract address: {}", e)))?;
        Ok(Self::new(client, address))
    }

    fn instance(&self) -> Transactions::TransactionsInstance<DynProvider> {
        Transactions::new(self.address, self.client.provider().clone())
    }
}

#[async_trait]
impl LedgerContract for ContractClient {
    async fn get_all_transactions(&self) -> ChainResult<Vec<RawTransfer>> {
        let instance = self.instance();
        let call = instance.getAllTransactions();
        let result = self.client.with_timeout("getAllTransactions", call.call()).await;
        metrics::record_contract_call("getAllTransactions", result.is_ok());

        let records: Vec<RawTransfer> = result?.into_iter().map(RawTransfer::from).collect();
        tracing::debug!(count = records.len(), "Fetched transfer records");
        Ok(records)
    }

    async fn get_transaction_count(&self) -> ChainResult<U256> {
        let instance = self.instance();
        let call = instance.getTransactionCount();
        let result = self.client.with_timeout("getTransactionCount", call.call()).await;
        metrics::record_contract_call("getTransactionCount", result.is_ok());
        result
    }

    async fn add_to_blockchain(
        &self,
        from: Option<Address>,
        entry: LedgerEntry,
    ) -> ChainResult<PendingTransfer> {
        let instance = self.instance();
        let mut call = instance.addToBlockchain(entry.receiver, entry.amount, entry.message, entry.keyword);
        if let Some(from) = from {
            call = call.from(from);
        }

        let result = self.client.with_timeout("addToBlockchain", call.send()).await;
        metrics::record_contract_call("addToBlockchain", result.is_ok());

        Ok(PendingTransfer {
            hash: *result?.tx_hash(),
        })
    }

    async fn confirm(&self, pending: PendingTransfer) -> ChainResult<Confirmation> {
        let config = self.client.config();
        let required_confirmations = self.client.confirmation_blocks();
        let timeout_secs = config.confirmation_timeout_secs;
        let poll_interval = Duration::from_millis(config.poll_interval_ms);
        let tx_hash = pending.hash;

        let result: Result<ChainResult<Confirmation>, _> = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Err(ChainError::Reverted(format!("{} reverted", tx_hash)));
                }

                let current_block = self.client.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                // The inclusion block itself counts as the first confirmation.
                let confirmations = (current_block.saturating_sub(tx_block) + 1) as u32;

                if confirmations >= required_confirmations {
                    return Ok(Confirmation {
                        block_number: tx_block,
                    });
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(ChainError::ConfirmationTimeout(timeout_secs)),
        }
    }
}
