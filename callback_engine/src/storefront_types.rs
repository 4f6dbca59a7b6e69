//! Types exchanged with the internal storefront services (task, order and inventory).
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

//--------------------------------------        TaskId        ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------        OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------     OrderTaskType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderTaskType {
    Picking,
    Packing,
    Shipping,
    Delivery,
    Payment,
    #[default]
    #[serde(other)]
    Unspecified,
}

impl Display for OrderTaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderTaskType::Unspecified => write!(f, "unspecified"),
            OrderTaskType::Picking => write!(f, "picking"),
            OrderTaskType::Packing => write!(f, "packing"),
            OrderTaskType::Shipping => write!(f, "shipping"),
            OrderTaskType::Delivery => write!(f, "delivery"),
            OrderTaskType::Payment => write!(f, "payment"),
        }
    }
}

impl FromStr for OrderTaskType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "picking" => Ok(Self::Picking),
            "packing" => Ok(Self::Packing),
            "shipping" => Ok(Self::Shipping),
            "delivery" => Ok(Self::Delivery),
            "payment" => Ok(Self::Payment),
            s => Err(ConversionError(format!("Invalid task type: {s}"))),
        }
    }
}

//--------------------------------------     OrderTaskState    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderTaskState {
    Pending,
    Ongoing,
    Success,
    Failed,
    #[default]
    #[serde(other)]
    Unspecified,
}

impl Display for OrderTaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderTaskState::Unspecified => write!(f, "unspecified"),
            OrderTaskState::Pending => write!(f, "pending"),
            OrderTaskState::Ongoing => write!(f, "ongoing"),
            OrderTaskState::Success => write!(f, "success"),
            OrderTaskState::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for OrderTaskState {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "ongoing" => Ok(Self::Ongoing),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid task state: {s}"))),
        }
    }
}

//--------------------------------------       OrderState      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    /// The order has been placed and is waiting for payment.
    Pending,
    /// Payment has been received in full.
    Paid,
    /// The order is being picked, packed or delivered.
    Processing,
    /// The order was cancelled by the customer or by an operator.
    Cancelled,
    /// The order has been delivered.
    Done,
    #[default]
    #[serde(other)]
    Unspecified,
}

impl OrderState {
    /// Once an order reaches one of these states, payment callbacks must not touch its tasks any more.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Paid | OrderState::Cancelled | OrderState::Done)
    }
}

impl Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderState::Unspecified => write!(f, "unspecified"),
            OrderState::Pending => write!(f, "pending"),
            OrderState::Paid => write!(f, "paid"),
            OrderState::Processing => write!(f, "processing"),
            OrderState::Cancelled => write!(f, "cancelled"),
            OrderState::Done => write!(f, "done"),
        }
    }
}

impl FromStr for OrderState {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "processing" => Ok(Self::Processing),
            "cancelled" => Ok(Self::Cancelled),
            "done" => Ok(Self::Done),
            s => Err(ConversionError(format!("Invalid order state: {s}"))),
        }
    }
}

//--------------------------------------       OrderTask       ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTask {
    pub task_id: TaskId,
    pub order_id: OrderId,
    #[serde(default)]
    pub task_type: OrderTaskType,
    #[serde(default)]
    pub state: OrderTaskState,
}

impl OrderTask {
    pub fn new(task_id: TaskId, order_id: OrderId, task_type: OrderTaskType, state: OrderTaskState) -> Self {
        Self { task_id, order_id, task_type, state }
    }
}

/// Selects which tasks the task service should return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskQuery {
    /// All tasks belonging to the same order as the given task.
    TaskId(TaskId),
    /// All tasks of the given order.
    OrderId(OrderId),
}

impl Display for TaskQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskQuery::TaskId(id) => write!(f, "task {id}"),
            TaskQuery::OrderId(id) => write!(f, "order {id}"),
        }
    }
}

//--------------------------------------     OrderTaskUpdate   ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTaskUpdate {
    pub task_id: TaskId,
    pub state: OrderTaskState,
    /// Free-form details the order service copies onto the order, e.g. the driver's name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_data: BTreeMap<String, String>,
}

impl OrderTaskUpdate {
    pub fn new(task_id: TaskId, state: OrderTaskState) -> Self {
        Self { task_id, state, additional_data: BTreeMap::new() }
    }

    pub fn with_data<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.additional_data.insert(key.into(), value.into());
        self
    }
}

//--------------------------------------          Order        ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    #[serde(default)]
    pub state: OrderState,
}

//--------------------------------------        Inventory      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateSource {
    /// Changes reported by a third-party system rather than by storefront staff.
    #[default]
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Enabled,
    Disabled,
}

impl From<bool> for ProductStatus {
    fn from(enabled: bool) -> Self {
        if enabled {
            ProductStatus::Enabled
        } else {
            ProductStatus::Disabled
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub store_id: String,
    pub product_variant_id: String,
    pub quantity: i32,
    pub source: UpdateSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStatusUpdate {
    pub store_id: String,
    pub product_variant_id: String,
    pub status: ProductStatus,
    pub source: UpdateSource,
}
