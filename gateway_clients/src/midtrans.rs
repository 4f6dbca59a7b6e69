use std::sync::Arc;

use callback_engine::{
    traits::{TransactionLookupError, TransactionStatusLookup},
    PaymentMethod,
    TransactionNotification,
};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client,
    Url,
};

use crate::{config::MidtransConfig, ClientError};

/// Client for the Midtrans core API "get status" endpoint.
///
/// Virtual account and GoPay transactions are both looked up on the same endpoint; the payment method is only used
/// for logging.
#[derive(Debug, Clone)]
pub struct MidtransApi {
    config: MidtransConfig,
    base_url: Url,
    client: Arc<Client>,
}

impl MidtransApi {
    pub fn new(config: MidtransConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.status_url).map_err(|e| {
            ClientError::Initialization(format!("Invalid Midtrans status URL {}. {e}", config.status_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Initialization(format!("Invalid Midtrans status URL {}", config.status_url)));
        }
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Initialization(e.to_string()))?;
        Ok(Self { config, base_url, client: Arc::new(client) })
    }

    /// `{status_url}/{order_id}/status`, with the order id percent-encoded as a single path segment.
    pub fn status_url(&self, order_id: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::RequestError(format!("Cannot append a path to {}", self.base_url)))?
            .pop_if_empty()
            .push(order_id)
            .push("status");
        Ok(url)
    }

    pub async fn get_transaction_status(&self, order_id: &str) -> Result<TransactionNotification, ClientError> {
        let url = self.status_url(order_id)?;
        trace!("💳️ Fetching transaction status: {url}");
        let response = self
            .client
            .get(url)
            // Midtrans authenticates with the server key as the username and an empty password
            .basic_auth(self.config.server_key.reveal(), Some(""))
            .send()
            .await
            .map_err(|e| ClientError::RequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("💳️ Status query successful. {}", response.status());
            response.json::<TransactionNotification>().await.map_err(|e| ClientError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ClientError::RequestError(e.to_string()))?;
            Err(ClientError::QueryError { status, message })
        }
    }
}

impl TransactionStatusLookup for MidtransApi {
    async fn fetch_transaction_status(
        &self,
        method: PaymentMethod,
        order_id: &str,
    ) -> Result<TransactionNotification, TransactionLookupError> {
        debug!("💳️ Fetching {method} transaction {order_id} from Midtrans");
        let trx = self.get_transaction_status(order_id).await.map_err(|e| match e {
            e if e.is_not_found() => TransactionLookupError::TransactionNotFound(order_id.to_string()),
            ClientError::JsonError(s) => TransactionLookupError::InvalidResponse(s),
            ClientError::QueryError { status, message } => {
                TransactionLookupError::QueryError { status_code: status.to_string(), message }
            },
            e => TransactionLookupError::Unavailable(e.to_string()),
        })?;
        check_status_response(trx, order_id)
    }
}

/// Midtrans answers most errors with HTTP 200 and puts the real result in the body's `status_code`.
fn check_status_response(
    trx: TransactionNotification,
    order_id: &str,
) -> Result<TransactionNotification, TransactionLookupError> {
    match trx.status_code.as_str() {
        code if code.starts_with('2') && code.len() == 3 => Ok(trx),
        "404" => Err(TransactionLookupError::TransactionNotFound(order_id.to_string())),
        _ => Err(TransactionLookupError::QueryError { status_code: trx.status_code, message: trx.status_message }),
    }
}
