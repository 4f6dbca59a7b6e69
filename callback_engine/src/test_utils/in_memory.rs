//! In-memory backends for exercising the gateway APIs without a storefront or a payment provider.
use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use crate::{
    gateway_api::payment_objects::{PaymentMethod, TransactionNotification},
    storefront_types::{Order, OrderId, OrderTask, OrderTaskUpdate, ProductStatusUpdate, StockUpdate, TaskQuery},
    traits::{
        InventoryApiError,
        InventoryManagement,
        OrderApiError,
        OrderManagement,
        TaskApiError,
        TaskManagement,
        TransactionLookupError,
        TransactionStatusLookup,
    },
};

#[derive(Debug, Default)]
struct StorefrontState {
    tasks: Vec<OrderTask>,
    orders: Vec<Order>,
    task_updates: Vec<OrderTaskUpdate>,
    stock_updates: Vec<StockUpdate>,
    status_updates: Vec<ProductStatusUpdate>,
    calls: usize,
    fail_updates: bool,
}

/// A task, order and inventory service backed by vectors. Clones share the same state.
///
/// Task updates are recorded and applied, so a second notification for the same task sees the new state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorefront {
    state: Arc<Mutex<StorefrontState>>,
}

impl InMemoryStorefront {
    fn lock(&self) -> MutexGuard<'_, StorefrontState> {
        self.state.lock().expect("Storefront state lock poisoned")
    }

    pub fn add_task(&self, task: OrderTask) {
        self.lock().tasks.push(task);
    }

    pub fn add_order(&self, order: Order) {
        let mut state = self.lock();
        state.orders.retain(|o| o.order_id != order.order_id);
        state.orders.push(order);
    }

    pub fn task(&self, task_id: &str) -> Option<OrderTask> {
        self.lock().tasks.iter().find(|t| t.task_id.as_str() == task_id).cloned()
    }

    /// When set, every update (task, stock and product status) fails with a `Rejected` error.
    pub fn fail_updates(&self, fail: bool) {
        self.lock().fail_updates = fail;
    }

    pub fn updates(&self) -> Vec<OrderTaskUpdate> {
        self.lock().task_updates.clone()
    }

    pub fn stock_updates(&self) -> Vec<StockUpdate> {
        self.lock().stock_updates.clone()
    }

    pub fn status_updates(&self) -> Vec<ProductStatusUpdate> {
        self.lock().status_updates.clone()
    }

    /// The number of calls made against this backend, successful or not.
    pub fn call_count(&self) -> usize {
        self.lock().calls
    }
}

impl TaskManagement for InMemoryStorefront {
    async fn fetch_order_tasks(&self, query: &TaskQuery) -> Result<Vec<OrderTask>, TaskApiError> {
        let mut state = self.lock();
        state.calls += 1;
        let order_id = match query {
            TaskQuery::OrderId(id) => Some(id.clone()),
            TaskQuery::TaskId(id) => state.tasks.iter().find(|t| &t.task_id == id).map(|t| t.order_id.clone()),
        };
        let tasks = match order_id {
            Some(id) => state.tasks.iter().filter(|t| t.order_id == id).cloned().collect(),
            None => vec![],
        };
        Ok(tasks)
    }

    async fn update_order_task(&self, update: &OrderTaskUpdate) -> Result<(), TaskApiError> {
        let mut state = self.lock();
        state.calls += 1;
        if state.fail_updates {
            return Err(TaskApiError::Rejected(format!("update of task {} refused", update.task_id)));
        }
        state.task_updates.push(update.clone());
        if let Some(task) = state.tasks.iter_mut().find(|t| t.task_id == update.task_id) {
            task.state = update.state;
        }
        Ok(())
    }
}

impl OrderManagement for InMemoryStorefront {
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Order, OrderApiError> {
        let mut state = self.lock();
        state.calls += 1;
        state
            .orders
            .iter()
            .find(|o| &o.order_id == order_id)
            .cloned()
            .ok_or_else(|| OrderApiError::OrderNotFound(order_id.clone()))
    }
}

impl InventoryManagement for InMemoryStorefront {
    async fn update_stock(&self, update: &StockUpdate) -> Result<(), InventoryApiError> {
        let mut state = self.lock();
        state.calls += 1;
        if state.fail_updates {
            return Err(InventoryApiError::Rejected(format!("stock update for {} refused", update.product_variant_id)));
        }
        state.stock_updates.push(update.clone());
        Ok(())
    }

    async fn update_product_status(&self, update: &ProductStatusUpdate) -> Result<(), InventoryApiError> {
        let mut state = self.lock();
        state.calls += 1;
        if state.fail_updates {
            return Err(InventoryApiError::Rejected(format!("status update for {} refused", update.product_variant_id)));
        }
        state.status_updates.push(update.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct LookupState {
    response: Option<Result<TransactionNotification, TransactionLookupError>>,
    requests: Vec<(PaymentMethod, String)>,
    delay: Option<Duration>,
}

/// A payment provider that answers every status query with the same canned response.
///
/// Without a configured response, every query fails with `TransactionNotFound`.
#[derive(Debug, Clone, Default)]
pub struct StaticTransactionLookup {
    state: Arc<Mutex<LookupState>>,
}

impl StaticTransactionLookup {
    fn lock(&self) -> MutexGuard<'_, LookupState> {
        self.state.lock().expect("Lookup state lock poisoned")
    }

    pub fn returning(trx: TransactionNotification) -> Self {
        let lookup = Self::default();
        lookup.set_response(Ok(trx));
        lookup
    }

    pub fn failing() -> Self {
        let lookup = Self::default();
        lookup.set_response(Err(TransactionLookupError::Unavailable("connection refused".into())));
        lookup
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        self.lock().delay = Some(delay);
        self
    }

    pub fn set_response(&self, response: Result<TransactionNotification, TransactionLookupError>) {
        self.lock().response = Some(response);
    }

    pub fn requests(&self) -> Vec<(PaymentMethod, String)> {
        self.lock().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }
}

impl TransactionStatusLookup for StaticTransactionLookup {
    async fn fetch_transaction_status(
        &self,
        method: PaymentMethod,
        order_id: &str,
    ) -> Result<TransactionNotification, TransactionLookupError> {
        let (response, delay) = {
            let mut state = self.lock();
            state.requests.push((method, order_id.to_string()));
            (state.response.clone(), state.delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response.unwrap_or_else(|| Err(TransactionLookupError::TransactionNotFound(order_id.to_string())))
    }
}
