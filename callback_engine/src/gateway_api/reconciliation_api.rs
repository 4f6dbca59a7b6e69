//! Reconciles Midtrans payment notifications with the storefront's payment tasks.
//!
//! The flow for a single notification is:
//! 1. Verify the notification signature. Nothing else happens for forged notifications.
//! 2. Acknowledge `pending` notifications straight away. Midtrans notifies again once the transaction concludes.
//! 3. Resolve the payment method. Methods we cannot reconcile are an operational gap, not a client error.
//! 4. Fetch the transaction status from Midtrans. From here on, only that response is trusted.
//! 5. Find the payment task, and skip tasks that already succeeded (notifications may be delivered more than once).
//! 6. Refuse to touch tasks whose order has already concluded.
//! 7. Move the task to `success` or `failed` depending on the authoritative transaction status.
//!
//! There is no local retry. Every failure is reported back to the caller, and Midtrans redelivers notifications that
//! were not acknowledged with a 2xx response.
//!
//! Two duplicate notifications arriving at the same moment can both pass the idempotency check before either update
//! lands. The task service's update is assumed to tolerate that.
use std::{fmt::Debug, time::Duration};

use gateway_common::Secret;
use log::*;

use crate::{
    gateway_api::{
        errors::ReconciliationError,
        payment_objects::{TransactionNotification, TransactionStatus},
    },
    helpers::verify_notification_signature,
    storefront_types::{OrderTask, OrderTaskState, OrderTaskType, OrderTaskUpdate, TaskQuery},
    traits::{OrderManagement, TaskManagement, TransactionStatusLookup},
};

pub const DEFAULT_RECONCILIATION_DEADLINE: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy)]
pub struct ReconciliationOptions {
    /// Upper bound on the time spent on the provider lookup and the storefront calls for one notification.
    pub deadline: Duration,
    /// When true, a capture/settlement that the fraud detection system did not accept stops after marking the task
    /// as failed. When false, the task is marked as failed and then as successful, which is how the storefront has
    /// always behaved.
    pub fraud_short_circuit: bool,
}

impl Default for ReconciliationOptions {
    fn default() -> Self {
        Self { deadline: DEFAULT_RECONCILIATION_DEADLINE, fraud_short_circuit: false }
    }
}

/// What the reconciler did with a notification that was processed without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// The transaction is still pending. Nothing was looked up.
    Pending,
    /// The payment task had already succeeded.
    AlreadySettled,
    /// The authoritative status does not call for a task transition.
    NoTransition(TransactionStatus),
    /// The payment task was moved through these states, in order.
    Updated(Vec<OrderTaskState>),
}

pub struct PaymentReconciliationApi<L, S> {
    lookup: L,
    storefront: S,
    server_key: Secret<String>,
    options: ReconciliationOptions,
}

impl<L, S> Debug for PaymentReconciliationApi<L, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentReconciliationApi")
    }
}

impl<L, S> PaymentReconciliationApi<L, S> {
    pub fn new(lookup: L, storefront: S, server_key: Secret<String>) -> Self {
        Self { lookup, storefront, server_key, options: ReconciliationOptions::default() }
    }

    pub fn with_options(mut self, options: ReconciliationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ReconciliationOptions {
        &self.options
    }

    pub fn storefront(&self) -> &S {
        &self.storefront
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }
}

impl<L, S> PaymentReconciliationApi<L, S>
where
    L: TransactionStatusLookup,
    S: TaskManagement + OrderManagement,
{
    /// Process a single payment notification under the configured deadline.
    ///
    /// If the deadline elapses, the in-flight provider or storefront call is dropped and
    /// [`ReconciliationError::DeadlineExceeded`] is returned.
    pub async fn process_notification(
        &self,
        notification: &TransactionNotification,
    ) -> Result<ReconciliationOutcome, ReconciliationError> {
        let deadline = self.options.deadline;
        match tokio::time::timeout(deadline, self.reconcile(notification)).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "💳️ Notification for task {} (trx {}) did not complete within {deadline:?}",
                    notification.order_id, notification.transaction_id
                );
                Err(ReconciliationError::DeadlineExceeded(deadline))
            },
        }
    }

    async fn reconcile(
        &self,
        notification: &TransactionNotification,
    ) -> Result<ReconciliationOutcome, ReconciliationError> {
        let ctx = log_context(notification);
        verify_notification_signature(notification, &self.server_key).map_err(|e| {
            warn!("💳️ Invalid callback signature. {e}. {ctx}");
            ReconciliationError::from(e)
        })?;

        if notification.status() == TransactionStatus::Pending {
            debug!("💳️ Transaction is pending. Waiting for the next notification. {ctx}");
            return Ok(ReconciliationOutcome::Pending);
        }

        let method = notification.payment_method().map_err(|e| {
            error!("💳️ {e}. The gateway cannot reconcile this payment method. {ctx}");
            ReconciliationError::UnsupportedPaymentMethod(e.0)
        })?;

        // Only the notification's identifiers are used beyond this point. The transaction fetched from Midtrans
        // drives every decision.
        let trx = self.lookup.fetch_transaction_status(method, &notification.order_id).await.map_err(|e| {
            warn!("💳️ Failed to get transaction from Midtrans. {e}. {ctx}");
            ReconciliationError::from(e)
        })?;

        let task_id = notification.task_id();
        let tasks = self.storefront.fetch_order_tasks(&TaskQuery::TaskId(task_id.clone())).await.map_err(|e| {
            error!("💳️ Could not fetch tasks. {e}. {ctx}");
            ReconciliationError::TaskLookupFailed(e)
        })?;
        let task = payment_task(tasks).ok_or_else(|| {
            error!("💳️ There is no payment task associated with task {task_id}. {ctx}");
            ReconciliationError::PaymentTaskNotFound(task_id.clone())
        })?;

        if task.state == OrderTaskState::Success {
            info!("💳️ Payment task {} is already marked successful, ignoring. {ctx}", task.task_id);
            return Ok(ReconciliationOutcome::AlreadySettled);
        }

        let order = self.storefront.fetch_order(&task.order_id).await.map_err(|e| {
            error!("💳️ Could not fetch order {}. {e}. {ctx}", task.order_id);
            ReconciliationError::from(e)
        })?;
        if order.state.is_terminal() {
            warn!("💳️ Order {} is already {}. The notification will not be applied. {ctx}", order.order_id, order.state);
            return Err(ReconciliationError::OrderAlreadyConcluded { order_id: order.order_id, state: order.state });
        }

        let status = trx.status();
        let fraud = trx.fraud_status();
        debug!(
            "💳️ Authoritative transaction status: {status} (code {}, fraud status {}). {ctx}",
            trx.status_code,
            fraud.as_ref().map(|f| f.to_string()).unwrap_or_else(|| "none".into())
        );
        let transitions = match status {
            s if s.is_paid() => match fraud {
                Some(f) if !f.is_accepted() => {
                    if self.options.fraud_short_circuit {
                        vec![OrderTaskState::Failed]
                    } else {
                        warn!(
                            "💳️ Fraud status '{f}' on a {s} transaction. The task is marked as failed and then as \
                             successful. Set GATEWAY_MIDTRANS_FRAUD_SHORT_CIRCUIT to stop after the failure. {ctx}"
                        );
                        vec![OrderTaskState::Failed, OrderTaskState::Success]
                    }
                },
                _ => vec![OrderTaskState::Success],
            },
            s if s.is_failed() => vec![OrderTaskState::Failed],
            s => {
                info!("💳️ Transaction status {s} requires no task update. {ctx}");
                return Ok(ReconciliationOutcome::NoTransition(s));
            },
        };

        for state in &transitions {
            self.update_task(&task, *state, &ctx).await?;
        }
        info!("💳️ Successfully processed transaction status update. {ctx}");
        Ok(ReconciliationOutcome::Updated(transitions))
    }

    async fn update_task(&self, task: &OrderTask, state: OrderTaskState, ctx: &str) -> Result<(), ReconciliationError> {
        debug!("💳️ Updating task {} to {state}. {ctx}", task.task_id);
        let update = OrderTaskUpdate::new(task.task_id.clone(), state);
        self.storefront.update_order_task(&update).await.map_err(|e| {
            error!("💳️ Failed to mark task {} as {state}. {e}. {ctx}", task.task_id);
            ReconciliationError::TaskUpdateFailed { task_id: task.task_id.clone(), state, source: e }
        })?;
        info!("💳️ Task {} marked as {state}", task.task_id);
        Ok(())
    }
}

fn payment_task(tasks: Vec<OrderTask>) -> Option<OrderTask> {
    tasks.into_iter().find(|t| t.task_type == OrderTaskType::Payment)
}

fn log_context(notification: &TransactionNotification) -> String {
    let payload = serde_json::to_string(notification).unwrap_or_else(|e| format!("{e}"));
    format!(
        "[task_id: {}] [transaction_id: {}] [signature: {}] [payload: {payload}]",
        notification.order_id, notification.transaction_id, notification.signature_key
    )
}
