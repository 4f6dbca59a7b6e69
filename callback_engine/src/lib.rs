//! Callback Engine
//!
//! The core of the storefront webhook gateway. It receives already-parsed callbacks from MileApp, Shoptree and
//! Midtrans, validates them, and turns them into calls against the internal storefront services. It is
//! transport-agnostic: the HTTP server and the outbound HTTP clients live in other crates.
//!
//! The library is divided into:
//! 1. Backend contracts ([`mod@traits`]). The storefront task, order and inventory services and the payment provider's
//!    status lookup are all expressed as traits, so that the gateway APIs can run against real clients or in-memory
//!    test doubles.
//! 2. The gateway APIs (`gateway_api`). [`PaymentReconciliationApi`] holds the payment reconciliation decision logic;
//!    [`TaskStatusApi`] and [`StockApi`] are simpler validate-and-forward pipelines.
//!
//! The engine keeps no state between callbacks.
pub mod helpers;
pub mod storefront_types;
pub mod traits;

mod gateway_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use gateway_api::{
    errors::{FailureKind, ReconciliationError, StockUpdateError, TaskStatusError},
    payment_objects,
    payment_objects::{FraudStatus, PaymentMethod, TransactionNotification, TransactionStatus},
    reconciliation_api::{
        PaymentReconciliationApi,
        ReconciliationOptions,
        ReconciliationOutcome,
        DEFAULT_RECONCILIATION_DEADLINE,
    },
    stock_api::StockApi,
    stock_objects,
    stock_objects::{InventoryRequestError, ProductStatusRequest, StockUpdateRequest},
    task_objects,
    task_objects::{CourierTaskType, TaskRequestError, TaskStatusRequest},
    task_status_api::{TaskStatusApi, TaskStatusOutcome},
};
