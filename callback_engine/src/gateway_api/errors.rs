use std::time::Duration;

use thiserror::Error;

use crate::{
    gateway_api::{stock_objects::InventoryRequestError, task_objects::TaskRequestError},
    helpers::SignatureError,
    storefront_types::{OrderId, OrderState, OrderTaskState, OrderTaskType, TaskId},
    traits::{InventoryApiError, OrderApiError, TaskApiError, TransactionLookupError},
};

/// How the caller of a gateway API should treat a failure. The HTTP layer maps these onto status codes; providers
/// redeliver the callback on any non-2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The callback itself is unacceptable, or refers to something that can no longer change.
    Rejected,
    /// A dependency or the gateway's own configuration failed.
    Internal,
}

#[derive(Debug, Error)]
pub enum ReconciliationError {
    #[error("Invalid notification signature. {0}")]
    InvalidSignature(#[from] SignatureError),
    #[error("Unsupported payment method: '{0}'")]
    UnsupportedPaymentMethod(String),
    #[error("Could not fetch the transaction status from the payment provider. {0}")]
    TransactionLookupFailed(#[from] TransactionLookupError),
    #[error("Could not fetch order tasks. {0}")]
    TaskLookupFailed(TaskApiError),
    #[error("No payment task is associated with task {0}")]
    PaymentTaskNotFound(TaskId),
    #[error("Could not fetch order. {0}")]
    OrderLookupFailed(#[from] OrderApiError),
    #[error("Order {order_id} is already {state}")]
    OrderAlreadyConcluded { order_id: OrderId, state: OrderState },
    #[error("Could not mark task {task_id} as {state}. {source}")]
    TaskUpdateFailed { task_id: TaskId, state: OrderTaskState, source: TaskApiError },
    #[error("The notification could not be processed within {0:?}")]
    DeadlineExceeded(Duration),
}

impl ReconciliationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            // Provider lookups are answered with a rejection so that Midtrans retries the notification later.
            Self::InvalidSignature(_) | Self::TransactionLookupFailed(_) | Self::OrderAlreadyConcluded { .. } => {
                FailureKind::Rejected
            },
            Self::UnsupportedPaymentMethod(_)
            | Self::TaskLookupFailed(_)
            | Self::PaymentTaskNotFound(_)
            | Self::OrderLookupFailed(_)
            | Self::TaskUpdateFailed { .. }
            | Self::DeadlineExceeded(_) => FailureKind::Internal,
        }
    }
}

#[derive(Debug, Error)]
pub enum TaskStatusError {
    #[error("{0}")]
    InvalidRequest(#[from] TaskRequestError),
    #[error("Could not fetch order tasks. {0}")]
    TaskLookupFailed(TaskApiError),
    #[error("Order {order_id} has no {task_type} task")]
    TaskNotFound { order_id: OrderId, task_type: OrderTaskType },
    #[error("Could not update task {task_id}. {source}")]
    TaskUpdateFailed { task_id: TaskId, source: TaskApiError },
}

impl TaskStatusError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidRequest(_) => FailureKind::Rejected,
            Self::TaskLookupFailed(_) | Self::TaskNotFound { .. } | Self::TaskUpdateFailed { .. } => {
                FailureKind::Internal
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum StockUpdateError {
    #[error("{0}")]
    InvalidRequest(#[from] InventoryRequestError),
    #[error("Could not update stock for variant {product_variant_id}. {source}")]
    StockUpdateFailed { product_variant_id: String, source: InventoryApiError },
    #[error("Could not update status for variant {product_variant_id}. {source}")]
    StatusUpdateFailed { product_variant_id: String, source: InventoryApiError },
}

impl StockUpdateError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidRequest(_) => FailureKind::Rejected,
            Self::StockUpdateFailed { .. } | Self::StatusUpdateFailed { .. } => FailureKind::Internal,
        }
    }
}
