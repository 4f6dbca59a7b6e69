use thiserror::Error;

use crate::gateway_api::payment_objects::{PaymentMethod, TransactionNotification};

#[derive(Debug, Clone, Error)]
pub enum TransactionLookupError {
    #[error("Payment provider is unavailable: {0}")]
    Unavailable(String),
    #[error("Transaction {0} is unknown to the payment provider")]
    TransactionNotFound(String),
    #[error("Status query failed. Error {status_code}. {message}")]
    QueryError { status_code: String, message: String },
    #[error("Payment provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Queries the payment provider for the authoritative state of a transaction.
///
/// Callback bodies are never trusted for financial decisions; the reconciler always asks the provider directly.
#[allow(async_fn_in_trait)]
pub trait TransactionStatusLookup {
    async fn fetch_transaction_status(
        &self,
        method: PaymentMethod,
        order_id: &str,
    ) -> Result<TransactionNotification, TransactionLookupError>;
}
