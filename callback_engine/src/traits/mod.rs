//! # Backend contracts
//!
//! The gateway owns no data. Every callback is translated into calls against the internal storefront services and,
//! for payments, against the payment provider. The traits in this module define those calls so that the gateway APIs
//! can be driven by the real HTTP clients in production and by in-memory or mock backends in tests.
//!
//! * [`TaskManagement`] reads and updates order tasks (picking, packing, shipping, delivery, payment).
//! * [`OrderManagement`] reads orders.
//! * [`InventoryManagement`] pushes stock levels and product availability.
//! * [`TransactionStatusLookup`] asks the payment provider for the authoritative state of a transaction.
//!
//! [`PaymentStorefront`] bundles the storefront capabilities the payment reconciler needs.
mod inventory_management;
mod order_management;
mod task_management;
mod transaction_lookup;

pub use inventory_management::{InventoryApiError, InventoryManagement};
pub use order_management::{OrderApiError, OrderManagement};
pub use task_management::{TaskApiError, TaskManagement};
pub use transaction_lookup::{TransactionLookupError, TransactionStatusLookup};

pub trait PaymentStorefront: TaskManagement + OrderManagement {}

impl<T: TaskManagement + OrderManagement> PaymentStorefront for T {}
