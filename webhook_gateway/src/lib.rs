//! # Webhook gateway server
//! This crate hosts the HTTP server for the storefront webhook gateway. It is responsible for:
//! * Receiving task progress callbacks from MileApp and applying them to order tasks.
//! * Receiving stock level and product status callbacks from Shoptree and forwarding them to the inventory service.
//! * Receiving payment notifications from Midtrans and reconciling them with the order's payment task.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/`: Returns the service name and version.
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/mileapp/status/{task-type}`: MileApp task status callbacks.
//! * `/shoptree/stock-update` and `/shoptree/product-status-update`: Shoptree inventory callbacks.
//! * `/midtrans/transaction-update`: Midtrans payment notifications.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod middleware;
pub mod midtrans_routes;
pub mod mileapp_routes;
pub mod routes;
pub mod server;
pub mod shoptree_routes;

#[cfg(test)]
mod endpoint_tests;
