//! # Midtrans notification signature
//!
//! Midtrans signs every HTTP notification so that the receiver can reject forged callbacks. The signature is
//!
//! ```text
//!    hex( SHA512( order_id + status_code + gross_amount + server_key ) )
//! ```
//!
//! where `+` is plain string concatenation and the hex encoding is lowercase. The server key is the merchant's
//! secret, shared only between Midtrans and the gateway.
//!
//! The check must run before the gateway makes any outbound call on behalf of the notification.

use gateway_common::Secret;
use sha2::{Digest, Sha512};
use thiserror::Error;

use crate::gateway_api::payment_objects::TransactionNotification;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("The notification did not carry a signature")]
    MissingSignature,
    #[error("The notification signature does not match its contents")]
    Mismatch,
}

pub fn notification_signature(order_id: &str, status_code: &str, gross_amount: &str, server_key: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_notification_signature(
    notification: &TransactionNotification,
    server_key: &Secret<String>,
) -> Result<(), SignatureError> {
    if notification.signature_key.is_empty() {
        return Err(SignatureError::MissingSignature);
    }
    let expected = notification_signature(
        &notification.order_id,
        &notification.status_code,
        &notification.gross_amount,
        server_key.reveal(),
    );
    if Secret::new(expected).matches(&notification.signature_key) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}
