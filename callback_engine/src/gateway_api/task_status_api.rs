//! `TaskStatusApi` applies MileApp courier progress to the storefront's order tasks.

use std::fmt::Debug;

use log::*;

use crate::{
    gateway_api::{
        errors::TaskStatusError,
        task_objects::{CourierTaskStatus, CourierTaskType, TaskStatusRequest},
    },
    storefront_types::{OrderTaskState, OrderTaskType, OrderTaskUpdate, TaskQuery},
    traits::TaskManagement,
};

/// What happened to the task referenced by a courier callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatusOutcome {
    /// The task had already succeeded. MileApp sometimes sends the same callback twice.
    AlreadyCompleted,
    Updated(OrderTaskUpdate),
}

pub struct TaskStatusApi<B> {
    db: B,
}

impl<B> Debug for TaskStatusApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TaskStatusApi")
    }
}

impl<B> TaskStatusApi<B>
where B: TaskManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn backend(&self) -> &B {
        &self.db
    }

    pub async fn process_task_status(
        &self,
        task_type: CourierTaskType,
        request: &TaskStatusRequest,
    ) -> Result<TaskStatusOutcome, TaskStatusError> {
        let status = request.validate()?;
        let order_id = request.order_id();
        let task_type = task_type.task_type();
        let ctx = format!(
            "[taskRefId: {}] [taskStatus: {}] [orderNumber: {}] [taskType: {task_type}]",
            request.task_ref_id, request.task_status, request.user_var.order_number
        );
        let tasks = self.db.fetch_order_tasks(&TaskQuery::OrderId(order_id.clone())).await.map_err(|e| {
            error!("🚚️ Failed to get order tasks. {e}. {ctx}");
            TaskStatusError::TaskLookupFailed(e)
        })?;
        let task = tasks.into_iter().find(|t| t.task_type == task_type).ok_or_else(|| {
            error!("🚚️ Order {order_id} has no {task_type} task. {ctx}");
            TaskStatusError::TaskNotFound { order_id: order_id.clone(), task_type }
        })?;

        if task.state == OrderTaskState::Success {
            info!("🚚️ Order task {} is already marked successful, ignoring. {ctx}", task.task_id);
            return Ok(TaskStatusOutcome::AlreadyCompleted);
        }

        let mut update = OrderTaskUpdate::new(task.task_id.clone(), status.task_state());
        match (task.task_type, status) {
            (OrderTaskType::Shipping, CourierTaskStatus::Ongoing) => {
                update = update
                    .with_data("driver_name", request.assigned_to.full_name.as_str())
                    .with_data("driver_phone", request.user_var.driver_phone.as_str());
            },
            (OrderTaskType::Delivery, CourierTaskStatus::Done) => {
                update = update
                    .with_data("receiver_role", request.user_var.receiver.as_str())
                    .with_data("receiver_name", request.user_var.receiver_name.as_str());
            },
            _ => {},
        }

        self.db.update_order_task(&update).await.map_err(|e| {
            error!("🚚️ Failed to update order task {}. {e}. {ctx}", task.task_id);
            TaskStatusError::TaskUpdateFailed { task_id: task.task_id.clone(), source: e }
        })?;
        info!("🚚️ Task {} marked as {}. {ctx}", task.task_id, update.state);
        Ok(TaskStatusOutcome::Updated(update))
    }
}
