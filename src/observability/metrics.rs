//! Metrics collection.
//!
//! # Metrics
//! - `wallet_requests_total` (counter): wallet provider calls by method, outcome
//! - `contract_calls_total` (counter): ledger contract calls by method, outcome
//! - `transfers_total` (counter): send attempts by outcome
//! - `transfer_history_size` (gauge): entries currently displayed
//!
//! # Design Decisions
//! - No exporter is installed here; without a recorder every call is a no-op
//! - Labels are static strings to keep cardinality bounded

/// Record a wallet provider request (`eth_accounts`, `eth_sendTransaction`, ...).
pub fn record_wallet_request(method: &'static str, success: bool) {
    ::metrics::counter!(
        "wallet_requests_total",
        "method" => method,
        "outcome" => outcome(success)
    )
    .increment(1);
}

/// Record a ledger contract call.
pub fn record_contract_call(method: &'static str, success: bool) {
    ::metrics::counter!(
        "contract_calls_total",
        "method" => method,
        "outcome" => outcome(success)
    )
    .increment(1);
}

/// Record the end state of a send attempt.
pub fn record_transfer(outcome: &'static str) {
    ::metrics::counter!("transfers_total", "outcome" => outcome).increment(1);
}

/// Record how many history entries are on display.
pub fn record_history_size(size: usize) {
    ::metrics::gauge!("transfer_history_size").set(size as f64);
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}
