//! Midtrans payment notifications.
//!
//! Midtrans only inspects the status code of the response: a 2xx acknowledges the notification, anything else makes
//! Midtrans redeliver it later. Responses therefore never carry a body.

use actix_web::{error::JsonPayloadError, http::header::ContentType, web, HttpRequest, HttpResponse};
use callback_engine::{
    traits::{PaymentStorefront, TransactionStatusLookup},
    PaymentReconciliationApi,
    ReconciliationOutcome,
    TransactionNotification,
};
use log::*;

use crate::{config::ServerOptions, errors::ServerError, helpers::get_remote_ip, route};

/// Body parse failures are answered with an empty 400 response.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        warn!("💳️ Could not parse payment notification to {}. {err}", req.path());
        ServerError::NotificationRejected(err.to_string()).into()
    })
}

route!(transaction_update => Post "/transaction-update" impl TransactionStatusLookup, PaymentStorefront);
pub async fn transaction_update<L, S>(
    req: HttpRequest,
    body: web::Json<TransactionNotification>,
    api: web::Data<PaymentReconciliationApi<L, S>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    L: TransactionStatusLookup,
    S: PaymentStorefront,
{
    let notification = body.into_inner();
    let remote_ip = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded);
    debug!(
        "💳️ Received payment notification from {remote_ip:?} for task {} (trx {}, {})",
        notification.order_id, notification.transaction_id, notification.transaction_status
    );
    match api.process_notification(&notification).await {
        Ok(ReconciliationOutcome::Pending) => {
            debug!("💳️ Transaction {} is pending. Acknowledged.", notification.transaction_id);
        },
        Ok(ReconciliationOutcome::AlreadySettled) => {
            info!("💳️ Payment task {} was already settled. Acknowledged.", notification.order_id);
        },
        Ok(ReconciliationOutcome::NoTransition(status)) => {
            let trx = &notification.transaction_id;
            info!("💳️ Transaction {trx} is {status}. Payment task {} left as is.", notification.order_id);
        },
        Ok(ReconciliationOutcome::Updated(states)) => {
            let states = states.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" → ");
            info!("💳️ Payment task {} updated: {states}", notification.order_id);
        },
        Err(e) => {
            warn!("💳️ Payment notification for task {} was not processed. {e}", notification.order_id);
            return Err(e.into());
        },
    }
    Ok(HttpResponse::Ok().insert_header(ContentType::json()).finish())
}
