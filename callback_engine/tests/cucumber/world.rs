use callback_engine::{
    helpers::notification_signature,
    test_utils::{InMemoryStorefront, StaticTransactionLookup},
    PaymentReconciliationApi,
    ReconciliationError,
    ReconciliationOptions,
    ReconciliationOutcome,
    TransactionNotification,
};
use cucumber::World;
use gateway_common::Secret;

pub const SERVER_KEY: &str = "SB-Mid-server-cucumber";

#[derive(Default, Debug, World)]
pub struct PaymentWorld {
    pub storefront: InMemoryStorefront,
    pub lookup: StaticTransactionLookup,
    pub options: ReconciliationOptions,
    pub result: Option<Result<ReconciliationOutcome, ReconciliationError>>,
}

impl PaymentWorld {
    pub fn api(&self) -> PaymentReconciliationApi<StaticTransactionLookup, InMemoryStorefront> {
        PaymentReconciliationApi::new(self.lookup.clone(), self.storefront.clone(), Secret::new(SERVER_KEY.to_string()))
            .with_options(self.options)
    }

    pub fn result(&self) -> &Result<ReconciliationOutcome, ReconciliationError> {
        self.result.as_ref().expect("No notification has been processed")
    }
}

pub fn signed_notification(task_id: &str, payment_type: &str, status: &str) -> TransactionNotification {
    let mut notification = TransactionNotification {
        order_id: task_id.into(),
        status_code: "200".into(),
        gross_amount: "25000.00".into(),
        payment_type: payment_type.into(),
        transaction_status: status.into(),
        transaction_id: format!("trx-{task_id}"),
        currency: "IDR".into(),
        ..Default::default()
    };
    notification.signature_key = notification_signature(
        &notification.order_id,
        &notification.status_code,
        &notification.gross_amount,
        SERVER_KEY,
    );
    notification
}
