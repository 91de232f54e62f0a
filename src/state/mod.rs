//! Transaction state: the provider, its form, and the display model.

pub mod form;
pub mod provider;
pub mod transaction;
pub mod units;

pub use form::{FieldError, FormData, FormField, TransferDraft};
pub use provider::{
    ContextValue, LogNotifier, Notifier, ProviderError, ProviderEvent, SendReceipt,
    TransactionProvider, MISSING_WALLET_ALERT,
};
pub use transaction::Transaction;
pub use units::{parse_amount, to_display_amount, AmountError};
