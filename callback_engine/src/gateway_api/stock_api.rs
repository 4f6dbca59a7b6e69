//! `StockApi` forwards Shoptree stock and product status changes to the inventory service.
//!
//! Items in a callback are handled one at a time, in the order received. The first invalid item or failed update
//! stops processing, so earlier items in the same batch stay applied.

use std::fmt::Debug;

use log::*;

use crate::{
    gateway_api::{
        errors::StockUpdateError,
        stock_objects::{ProductStatusRequest, StockUpdateRequest},
    },
    traits::InventoryManagement,
};

pub struct StockApi<B> {
    db: B,
}

impl<B> Debug for StockApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StockApi")
    }
}

impl<B> StockApi<B>
where B: InventoryManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn backend(&self) -> &B {
        &self.db
    }

    /// Returns the number of items forwarded to the inventory service.
    pub async fn update_stock(&self, items: &[StockUpdateRequest]) -> Result<usize, StockUpdateError> {
        for item in items {
            let ctx = format!("[shoptree_variant_id: {}] [shoptree_location_id: {}]", item.product_variant_id, item.location_id);
            let update = item.to_stock_update().map_err(|e| {
                warn!("📦️ Rejected stock update. {e}. {ctx} [reference_type: {}]", item.reference_type);
                StockUpdateError::from(e)
            })?;
            self.db.update_stock(&update).await.map_err(|e| {
                error!("📦️ Failed to update stock in the inventory service. {e}. {ctx}");
                StockUpdateError::StockUpdateFailed { product_variant_id: update.product_variant_id.clone(), source: e }
            })?;
            info!("📦️ Stock for {} at {} set to {}. {ctx}", update.product_variant_id, update.store_id, update.quantity);
        }
        debug!("📦️ Processed {} stock updates", items.len());
        Ok(items.len())
    }

    /// Returns the number of items forwarded to the inventory service.
    pub async fn update_product_status(&self, items: &[ProductStatusRequest]) -> Result<usize, StockUpdateError> {
        for item in items {
            let ctx = format!("[shoptree_variant_id: {}] [shoptree_location_id: {}]", item.product_variant_id, item.location_id);
            let update = item.to_status_update().map_err(|e| {
                warn!("📦️ Rejected product status update. {e}. {ctx}");
                StockUpdateError::from(e)
            })?;
            self.db.update_product_status(&update).await.map_err(|e| {
                error!("📦️ Failed to update product status in the inventory service. {e}. {ctx}");
                StockUpdateError::StatusUpdateFailed { product_variant_id: update.product_variant_id.clone(), source: e }
            })?;
            info!("📦️ Product {} at {} is now {:?}. {ctx}", update.product_variant_id, update.store_id, update.status);
        }
        debug!("📦️ Processed {} product status updates", items.len());
        Ok(items.len())
    }
}
