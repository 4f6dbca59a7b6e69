//! HTTP clients for the services the webhook gateway talks to.
//!
//! * [`MidtransApi`] fetches the authoritative status of a payment transaction.
//! * [`StorefrontClient`] calls the storefront task, order and inventory services.
//!
//! Both are cheap to clone; the underlying connection pool is shared.
mod config;
mod error;
mod midtrans;
mod storefront;

pub use config::{MidtransConfig, StorefrontConfig};
pub use error::ClientError;
pub use midtrans::MidtransApi;
pub use storefront::StorefrontClient;
