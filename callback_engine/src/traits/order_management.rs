use thiserror::Error;

use crate::storefront_types::{Order, OrderId};

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Order service is unavailable: {0}")]
    Unavailable(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Order service rejected the request. {0}")]
    Rejected(String),
    #[error("Order service returned an invalid response: {0}")]
    InvalidResponse(String),
}

#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Order, OrderApiError>;
}
