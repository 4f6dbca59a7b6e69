//! # Webhook gateway public API
//!
//! Each integration gets its own API, so that a deployment only needs the backends for the callbacks it serves.
//!
//! * [`reconciliation_api`] reconciles Midtrans payment notifications with the storefront's payment tasks. It needs a
//!   [`TransactionStatusLookup`](crate::traits::TransactionStatusLookup) backend as well as task and order backends.
//! * [`task_status_api`] applies MileApp courier progress to picking, packing, shipping and delivery tasks.
//! * [`stock_api`] forwards Shoptree stock levels and product availability to the inventory service.
//!
//! The `*_objects` modules hold the callback payloads of each integration.
//!
//! # API usage
//!
//! ```rust,ignore
//! use callback_engine::{PaymentReconciliationApi, TransactionNotification};
//! // MidtransApi implements TransactionStatusLookup, StorefrontClient implements TaskManagement + OrderManagement
//! let api = PaymentReconciliationApi::new(midtrans, storefront, server_key);
//! let outcome = api.process_notification(&notification).await?;
//! ```

pub mod errors;
pub mod payment_objects;
pub mod reconciliation_api;
pub mod stock_api;
pub mod stock_objects;
pub mod task_objects;
pub mod task_status_api;
