use thiserror::Error;

use crate::storefront_types::{ProductStatusUpdate, StockUpdate};

#[derive(Debug, Clone, Error)]
pub enum InventoryApiError {
    #[error("Inventory service is unavailable: {0}")]
    Unavailable(String),
    #[error("Inventory service rejected the request. {0}")]
    Rejected(String),
}

#[allow(async_fn_in_trait)]
pub trait InventoryManagement {
    /// Overwrite the stock level of a product variant at a store.
    async fn update_stock(&self, update: &StockUpdate) -> Result<(), InventoryApiError>;
    /// Enable or disable a product variant at a store.
    async fn update_product_status(&self, update: &ProductStatusUpdate) -> Result<(), InventoryApiError>;
}
