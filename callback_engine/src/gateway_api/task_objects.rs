//! MileApp task status callbacks.
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storefront_types::{OrderId, OrderTaskState, OrderTaskType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskRequestError {
    #[error("unsupported task type: {0}")]
    UnsupportedTaskType(String),
    #[error("taskRefId is required")]
    TaskRefIdRequired,
    #[error("order number is required")]
    OrderNumberRequired,
    #[error("taskStatus is required")]
    TaskStatusRequired,
    #[error("taskStatus is invalid")]
    InvalidTaskStatus(String),
}

/// The task types MileApp reports on. Payment tasks are never driven by MileApp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourierTaskType(OrderTaskType);

impl CourierTaskType {
    pub fn task_type(&self) -> OrderTaskType {
        self.0
    }
}

impl FromStr for CourierTaskType {
    type Err = TaskRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "picking" => Ok(Self(OrderTaskType::Picking)),
            "packing" => Ok(Self(OrderTaskType::Packing)),
            "shipping" => Ok(Self(OrderTaskType::Shipping)),
            "delivery" => Ok(Self(OrderTaskType::Delivery)),
            other => Err(TaskRequestError::UnsupportedTaskType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourierTaskStatus {
    Ongoing,
    Done,
}

impl CourierTaskStatus {
    /// MileApp splits pickup and drop-off into one job with two statuses, while the storefront tracks them as two
    /// tasks. Either status completes the task it refers to.
    pub fn task_state(&self) -> OrderTaskState {
        OrderTaskState::Success
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserVar {
    #[serde(rename = "orderNumber")]
    pub order_number: String,
    pub receiver: String,
    #[serde(rename = "receiverName")]
    pub receiver_name: String,
    #[serde(rename = "driverPhone")]
    pub driver_phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignedTo {
    pub full_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStatusRequest {
    #[serde(rename = "taskRefId")]
    pub task_ref_id: String,
    #[serde(rename = "taskStatus")]
    pub task_status: String,
    #[serde(rename = "UserVar")]
    pub user_var: UserVar,
    #[serde(rename = "assignedTo")]
    pub assigned_to: AssignedTo,
}

impl TaskStatusRequest {
    /// Checks the required fields in the order MileApp integrators expect to see errors in.
    pub fn validate(&self) -> Result<CourierTaskStatus, TaskRequestError> {
        if self.task_ref_id.is_empty() {
            return Err(TaskRequestError::TaskRefIdRequired);
        }
        if self.user_var.order_number.is_empty() {
            return Err(TaskRequestError::OrderNumberRequired);
        }
        match self.task_status.as_str() {
            "" => Err(TaskRequestError::TaskStatusRequired),
            "ongoing" => Ok(CourierTaskStatus::Ongoing),
            "done" => Ok(CourierTaskStatus::Done),
            other => Err(TaskRequestError::InvalidTaskStatus(other.to_string())),
        }
    }

    pub fn order_id(&self) -> OrderId {
        OrderId::from(self.user_var.order_number.as_str())
    }
}
