//! Shoptree inventory callbacks.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storefront_types::{ProductStatus, ProductStatusUpdate, StockUpdate, UpdateSource};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryRequestError {
    #[error("reference id is required")]
    ReferenceIdRequired,
    #[error("reference type is required")]
    ReferenceTypeRequired,
    #[error("location id is required")]
    LocationIdRequired,
    #[error("product variant id is required")]
    ProductVariantIdRequired,
    #[error("in stock is required")]
    InStockRequired,
    #[error("quantity changed is required")]
    QuantityChangedRequired,
    #[error("enabled is required")]
    EnabledRequired,
    #[error("invalid reference type")]
    InvalidReferenceType(String),
    #[error("invalid in stock value")]
    InvalidInStock(String),
}

/// The stock movements Shoptree reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceType {
    Order,
    InternalOrder,
    PurchaseOrder,
    TransferOrder,
    StockTake,
    StockAdjustment,
    Preparation,
    Separation,
    OrderModifier,
    OrderComposite,
    OrderModifierComposite,
}

impl std::str::FromStr for ReferenceType {
    type Err = InventoryRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(Self::Order),
            "internal_order" => Ok(Self::InternalOrder),
            "purchase_order" => Ok(Self::PurchaseOrder),
            "transfer_order" => Ok(Self::TransferOrder),
            "stock_take" => Ok(Self::StockTake),
            "stock_adjustment" => Ok(Self::StockAdjustment),
            "preparation" => Ok(Self::Preparation),
            "separation" => Ok(Self::Separation),
            "order_modifier" => Ok(Self::OrderModifier),
            "order_composite" => Ok(Self::OrderComposite),
            "order_modifier_composite" => Ok(Self::OrderModifierComposite),
            other => Err(InventoryRequestError::InvalidReferenceType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockUpdateRequest {
    pub reference_id: String,
    pub reference_type: String,
    pub location_id: String,
    pub product_variant_id: String,
    /// Stock level after the movement. Shoptree sends a JSON number, which must nonetheless be whole.
    pub in_stock: Option<f64>,
    pub quantity_changed: Option<f64>,
}

impl StockUpdateRequest {
    pub fn validate(&self) -> Result<(), InventoryRequestError> {
        use InventoryRequestError::*;
        match self {
            r if r.reference_id.is_empty() => Err(ReferenceIdRequired),
            r if r.reference_type.is_empty() => Err(ReferenceTypeRequired),
            r if r.location_id.is_empty() => Err(LocationIdRequired),
            r if r.product_variant_id.is_empty() => Err(ProductVariantIdRequired),
            r if r.in_stock.is_none() => Err(InStockRequired),
            r if r.quantity_changed.is_none() => Err(QuantityChangedRequired),
            _ => Ok(()),
        }
    }

    /// Validates the item and converts it into the inventory service's stock update.
    pub fn to_stock_update(&self) -> Result<StockUpdate, InventoryRequestError> {
        self.validate()?;
        self.reference_type.parse::<ReferenceType>()?;
        let in_stock = self.in_stock.unwrap_or_default();
        if in_stock.fract() != 0.0 || !in_stock.is_finite() || in_stock.abs() > f64::from(i32::MAX) {
            return Err(InventoryRequestError::InvalidInStock(in_stock.to_string()));
        }
        Ok(StockUpdate {
            store_id: self.location_id.clone(),
            product_variant_id: self.product_variant_id.clone(),
            quantity: in_stock as i32,
            source: UpdateSource::External,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductStatusRequest {
    pub location_id: String,
    pub product_variant_id: String,
    pub enabled: Option<bool>,
}

impl ProductStatusRequest {
    pub fn validate(&self) -> Result<(), InventoryRequestError> {
        use InventoryRequestError::*;
        match self {
            r if r.location_id.is_empty() => Err(LocationIdRequired),
            r if r.product_variant_id.is_empty() => Err(ProductVariantIdRequired),
            r if r.enabled.is_none() => Err(EnabledRequired),
            _ => Ok(()),
        }
    }

    pub fn to_status_update(&self) -> Result<ProductStatusUpdate, InventoryRequestError> {
        self.validate()?;
        Ok(ProductStatusUpdate {
            store_id: self.location_id.clone(),
            product_variant_id: self.product_variant_id.clone(),
            status: ProductStatus::from(self.enabled.unwrap_or_default()),
            source: UpdateSource::External,
        })
    }
}
