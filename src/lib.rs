//! Wallet-backed transfer provider for an EVM ledger contract.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod state;
pub mod store;

pub use blockchain::ChainAccess;
pub use config::AppConfig;
pub use state::TransactionProvider;
