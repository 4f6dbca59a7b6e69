use thiserror::Error;

use crate::storefront_types::{OrderTask, OrderTaskUpdate, TaskQuery};

#[derive(Debug, Clone, Error)]
pub enum TaskApiError {
    #[error("Task service is unavailable: {0}")]
    Unavailable(String),
    #[error("Task service rejected the request. {0}")]
    Rejected(String),
    #[error("Task service returned an invalid response: {0}")]
    InvalidResponse(String),
}

#[allow(async_fn_in_trait)]
pub trait TaskManagement {
    /// Fetch every task that belongs to the order identified by `query`.
    async fn fetch_order_tasks(&self, query: &TaskQuery) -> Result<Vec<OrderTask>, TaskApiError>;
    /// Move a task into a new state. The task service is responsible for propagating the change to the order.
    async fn update_order_task(&self, update: &OrderTaskUpdate) -> Result<(), TaskApiError>;
}
