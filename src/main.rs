//! transfer-provider CLI
//!
//! Drives a [`TransactionProvider`] from the command line: connect a wallet,
//! send a transfer with its ledger record, and print history. State is
//! printed as JSON on stdout; logs go to stderr.
//!
//! ```text
//! config file ──▶ ChainAccess (wallet + contract) ──┐
//!                 scalar store ─────────────────────┼──▶ TransactionProvider
//!                 console notifier ─────────────────┘         │
//!                                                             ▼
//!                                                      JSON on stdout
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use transfer_provider::config::load_config;
use transfer_provider::observability::logging::init_logging;
use transfer_provider::state::{FormField, Notifier, ProviderEvent};
use transfer_provider::store::open_store;
use transfer_provider::{ChainAccess, TransactionProvider};

#[derive(Parser)]
#[command(name = "transfer-provider")]
#[command(about = "Connect a wallet, send transfers and browse the ledger history", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "transfer-provider.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the provider state after startup
    Status,
    /// Request account access from the wallet
    Connect,
    /// Reload and print the transfer history
    History,
    /// Refresh the cached on-chain transaction count
    Count,
    /// Send a transfer and record it on the ledger
    Send {
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Amount in ether, e.g. 0.05
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        keyword: String,
        #[arg(long, default_value = "")]
        message: String,
    },
}

/// Alerts go straight to the terminal.
#[derive(Debug)]
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.observability);

    tracing::info!(
        rpc_url = %config.chain.rpc_url,
        wallet_mode = ?config.wallet.mode,
        contract = %config.contract.address,
        "Configuration loaded"
    );

    let access = ChainAccess::from_config(&config).await?;
    let store = open_store(&config.store)?;
    let provider = TransactionProvider::new(access, store)
        .with_notifier(Arc::new(ConsoleNotifier))
        .with_settings(config.transfers.clone());

    for output in run(&provider, cli.command).await? {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

/// Run one subcommand and collect what it prints. Only `status` runs the
/// full startup sequence; every other command does its own reads.
async fn run(
    provider: &TransactionProvider,
    command: Commands,
) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let mut output = Vec::new();

    match command {
        Commands::Status => {
            provider.initialize().await;
            output.push(serde_json::to_value(provider.snapshot())?);
        }
        Commands::Connect => {
            provider.connect_wallet().await?;
            output.push(serde_json::to_value(provider.snapshot())?);
        }
        Commands::History => {
            provider.get_all_transactions().await?;
            output.push(serde_json::to_value(provider.transactions())?);
        }
        Commands::Count => {
            provider.check_if_transactions_exists().await?;
            output.push(serde_json::json!({
                "transactionCount": provider.transaction_count(),
            }));
        }
        Commands::Send {
            to,
            amount,
            keyword,
            message,
        } => {
            // Pick up an authorized account so the transfer has a sender.
            if let Err(e) = provider.check_if_wallet_is_connected().await {
                tracing::warn!(error = %e, "Wallet connection check failed");
            }

            provider.handle_change(to, FormField::AddressTo);
            provider.handle_change(amount, FormField::Amount);
            provider.handle_change(keyword, FormField::Keyword);
            provider.handle_change(message, FormField::Message);

            let mut events = provider.events();
            if let Some(receipt) = provider.send_transaction().await? {
                output.push(serde_json::to_value(receipt)?);
            }

            while let Ok(event) = events.try_recv() {
                if let ProviderEvent::TransferCompleted { .. } = event {
                    // Start over from a clean read of the chain.
                    provider.initialize().await;
                    output.push(serde_json::to_value(provider.snapshot())?);
                }
            }
        }
    }

    Ok(output)
}
