use std::sync::Arc;

use callback_engine::{
    storefront_types::{Order, OrderId, OrderTask, OrderTaskUpdate, ProductStatusUpdate, StockUpdate, TaskQuery},
    traits::{
        InventoryApiError,
        InventoryManagement,
        OrderApiError,
        OrderManagement,
        TaskApiError,
        TaskManagement,
    },
};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{config::StorefrontConfig, ClientError};

/// JSON-over-HTTP client for the storefront's task, order and inventory services.
#[derive(Clone)]
pub struct StorefrontClient {
    config: StorefrontConfig,
    client: Arc<Client>,
}

#[derive(Deserialize)]
struct TasksResponse {
    #[serde(default)]
    tasks: Vec<OrderTask>,
}

#[derive(Deserialize)]
struct OrderResponse {
    order: Order,
}

#[derive(Serialize)]
struct OrderRequest<'a> {
    order_id: &'a OrderId,
}

impl StorefrontClient {
    pub fn new(config: StorefrontConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.api_key.reveal().as_str())
            .map_err(|e| ClientError::Initialization(e.to_string()))?;
        headers.insert("x-api-key", val);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    pub async fn rpc<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        let url = self.url(path);
        trace!("Sending storefront request: {url}");
        let response =
            self.client.post(url).json(body).send().await.map_err(|e| ClientError::RequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("Storefront request successful. {}", response.status());
            response.json::<T>().await.map_err(|e| ClientError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ClientError::RequestError(e.to_string()))?;
            Err(ClientError::QueryError { status, message })
        }
    }
}

impl From<ClientError> for TaskApiError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::JsonError(s) => TaskApiError::InvalidResponse(s),
            ClientError::QueryError { status, message } => TaskApiError::Rejected(format!("{status}. {message}")),
            e => TaskApiError::Unavailable(e.to_string()),
        }
    }
}

impl From<ClientError> for InventoryApiError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::QueryError { status, message } => InventoryApiError::Rejected(format!("{status}. {message}")),
            e => InventoryApiError::Unavailable(e.to_string()),
        }
    }
}

fn order_error(e: ClientError, order_id: &OrderId) -> OrderApiError {
    match e {
        e if e.is_not_found() => OrderApiError::OrderNotFound(order_id.clone()),
        ClientError::JsonError(s) => OrderApiError::InvalidResponse(s),
        ClientError::QueryError { status, message } => OrderApiError::Rejected(format!("{status}. {message}")),
        e => OrderApiError::Unavailable(e.to_string()),
    }
}

impl TaskManagement for StorefrontClient {
    async fn fetch_order_tasks(&self, query: &TaskQuery) -> Result<Vec<OrderTask>, TaskApiError> {
        debug!("Fetching order tasks for {query}");
        let response = self.rpc::<TasksResponse, _>("/task/get-order-task", query).await?;
        debug!("Fetched {} tasks for {query}", response.tasks.len());
        Ok(response.tasks)
    }

    async fn update_order_task(&self, update: &OrderTaskUpdate) -> Result<(), TaskApiError> {
        debug!("Updating task {} to {}", update.task_id, update.state);
        let _ = self.rpc::<Value, _>("/task/update-order-task", update).await?;
        Ok(())
    }
}

impl OrderManagement for StorefrontClient {
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Order, OrderApiError> {
        debug!("Fetching order {order_id}");
        let response = self
            .rpc::<OrderResponse, _>("/order/get", &OrderRequest { order_id })
            .await
            .map_err(|e| order_error(e, order_id))?;
        Ok(response.order)
    }
}

impl InventoryManagement for StorefrontClient {
    async fn update_stock(&self, update: &StockUpdate) -> Result<(), InventoryApiError> {
        let _ = self.rpc::<Value, _>("/inventory/update-stock", update).await?;
        Ok(())
    }

    async fn update_product_status(&self, update: &ProductStatusUpdate) -> Result<(), InventoryApiError> {
        let _ = self.rpc::<Value, _>("/inventory/update-status", update).await?;
        Ok(())
    }
}
