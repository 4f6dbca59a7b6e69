//! Midtrans payment notification objects.
//!
//! The same shape is used for the body of an incoming notification and for the response of the Midtrans
//! "get status" endpoint. Midtrans sends every field as a string; missing fields are treated as empty.
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storefront_types::TaskId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionNotification {
    /// Timestamp of the transaction in ISO 8601 format, GMT+7.
    #[serde(alias = "transactionTime")]
    pub transaction_time: String,
    #[serde(alias = "transactionStatus")]
    pub transaction_status: String,
    /// Transaction id assigned by the payment provider.
    #[serde(alias = "transactionId")]
    pub transaction_id: String,
    #[serde(alias = "statusMessage")]
    pub status_message: String,
    #[serde(alias = "statusCode")]
    pub status_code: String,
    /// SHA-512 over `order_id`, `status_code`, `gross_amount` and the server key.
    #[serde(alias = "signatureKey")]
    pub signature_key: String,
    #[serde(alias = "settlementTime")]
    pub settlement_time: String,
    #[serde(alias = "paymentType")]
    pub payment_type: String,
    /// Despite the name, this is the id of the storefront *payment task*, not of the order.
    #[serde(alias = "orderId")]
    pub order_id: String,
    #[serde(alias = "merchantId")]
    pub merchant_id: String,
    /// Total amount in IDR, e.g. "10000.00".
    #[serde(alias = "grossAmount")]
    pub gross_amount: String,
    /// Result of the Midtrans fraud detection system: `accept`, `challenge` or `deny`. Absent for most e-wallets.
    #[serde(alias = "fraudStatus", skip_serializing_if = "String::is_empty")]
    pub fraud_status: String,
    pub currency: String,
}

impl TransactionNotification {
    pub fn task_id(&self) -> TaskId {
        TaskId::from(self.order_id.as_str())
    }

    pub fn status(&self) -> TransactionStatus {
        self.transaction_status.parse().unwrap_or(TransactionStatus::Unknown)
    }

    pub fn fraud_status(&self) -> Option<FraudStatus> {
        let status = self.fraud_status.trim();
        (!status.is_empty()).then(|| FraudStatus::from(status))
    }

    pub fn payment_method(&self) -> Result<PaymentMethod, UnsupportedPaymentMethod> {
        self.payment_type.parse()
    }
}

//--------------------------------------   TransactionStatus   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Authorized,
    /// Card payments: the funds have been captured. Equivalent to success for virtual accounts.
    Capture,
    /// The funds have been settled. Equivalent to success for e-wallets.
    Settlement,
    Deny,
    Cancel,
    Refund,
    PartialRefund,
    Chargeback,
    PartialChargeback,
    Expire,
    Failure,
    Unknown,
}

impl TransactionStatus {
    /// Statuses that mean the customer paid.
    pub fn is_paid(&self) -> bool {
        matches!(self, TransactionStatus::Capture | TransactionStatus::Settlement)
    }

    /// Statuses that mean the payment will never complete.
    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Expire | TransactionStatus::Failure | TransactionStatus::Cancel | TransactionStatus::Deny
        )
    }
}

impl FromStr for TransactionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "authorized" => Ok(Self::Authorized),
            "capture" => Ok(Self::Capture),
            "settlement" => Ok(Self::Settlement),
            "deny" => Ok(Self::Deny),
            "cancel" => Ok(Self::Cancel),
            "refund" => Ok(Self::Refund),
            "partial_refund" => Ok(Self::PartialRefund),
            "chargeback" => Ok(Self::Chargeback),
            "partial_chargeback" => Ok(Self::PartialChargeback),
            "expire" => Ok(Self::Expire),
            "failure" => Ok(Self::Failure),
            _ => Err(()),
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Authorized => "authorized",
            TransactionStatus::Capture => "capture",
            TransactionStatus::Settlement => "settlement",
            TransactionStatus::Deny => "deny",
            TransactionStatus::Cancel => "cancel",
            TransactionStatus::Refund => "refund",
            TransactionStatus::PartialRefund => "partial_refund",
            TransactionStatus::Chargeback => "chargeback",
            TransactionStatus::PartialChargeback => "partial_chargeback",
            TransactionStatus::Expire => "expire",
            TransactionStatus::Failure => "failure",
            TransactionStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

//--------------------------------------      FraudStatus      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FraudStatus {
    Accept,
    Challenge,
    Deny,
    Other(String),
}

impl FraudStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FraudStatus::Accept)
    }
}

impl From<&str> for FraudStatus {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "accept" => FraudStatus::Accept,
            "challenge" => FraudStatus::Challenge,
            "deny" => FraudStatus::Deny,
            other => FraudStatus::Other(other.to_string()),
        }
    }
}

impl Display for FraudStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FraudStatus::Accept => write!(f, "accept"),
            FraudStatus::Challenge => write!(f, "challenge"),
            FraudStatus::Deny => write!(f, "deny"),
            FraudStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

//--------------------------------------     PaymentMethod     ---------------------------------------------------------
/// The payment methods the gateway knows how to reconcile.
///
/// Adding a method means adding a variant here and teaching the status lookup backend about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// Bank transfer to a virtual account number.
    VirtualAccount,
    /// GoPay e-wallet.
    Gopay,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported payment method: '{0}'")]
pub struct UnsupportedPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnsupportedPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank_transfer" => Ok(Self::VirtualAccount),
            "gopay" => Ok(Self::Gopay),
            s => Err(UnsupportedPaymentMethod(s.to_string())),
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::VirtualAccount => write!(f, "bank_transfer"),
            PaymentMethod::Gopay => write!(f, "gopay"),
        }
    }
}
