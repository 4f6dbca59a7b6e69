//! Shoptree inventory callbacks.
//!
//! Shoptree sends stock movements and product availability changes in batches. Items are forwarded to the inventory
//! service one at a time, and the first failure ends the batch.

use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use callback_engine::{traits::InventoryManagement, ProductStatusRequest, StockApi, StockUpdateRequest};
use log::*;

use crate::{config::ServerOptions, data_objects::JsonResponse, errors::ServerError, helpers::get_remote_ip, route};

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        warn!("📦️ Could not parse Shoptree callback to {}. {err}", req.path());
        ServerError::InvalidCallbackPayload.into()
    })
}

route!(stock_update => Post "/stock-update" impl InventoryManagement);
pub async fn stock_update<B: InventoryManagement>(
    req: HttpRequest,
    body: web::Json<Vec<StockUpdateRequest>>,
    api: web::Data<StockApi<B>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let remote_ip = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded);
    let items = body.into_inner();
    trace!("📦️ Received stock update callback with {} items from {remote_ip:?}", items.len());
    let count = api.update_stock(&items).await?;
    debug!("📦️ Forwarded {count} stock updates");
    Ok(HttpResponse::Ok().json(JsonResponse::success("success")))
}

route!(product_status_update => Post "/product-status-update" impl InventoryManagement);
pub async fn product_status_update<B: InventoryManagement>(
    req: HttpRequest,
    body: web::Json<Vec<ProductStatusRequest>>,
    api: web::Data<StockApi<B>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let remote_ip = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded);
    let items = body.into_inner();
    trace!("📦️ Received product status callback with {} items from {remote_ip:?}", items.len());
    let count = api.update_product_status(&items).await?;
    debug!("📦️ Forwarded {count} product status updates");
    Ok(HttpResponse::Ok().json(JsonResponse::success("success")))
}
