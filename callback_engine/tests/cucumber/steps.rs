use callback_engine::{
    storefront_types::{Order, OrderId, OrderState, OrderTask, OrderTaskState, OrderTaskType, TaskId},
    traits::TransactionLookupError,
    FailureKind,
    ReconciliationOutcome,
    TransactionNotification,
};
use cucumber::{given, then, when};

use crate::cucumber::{world::signed_notification, PaymentWorld};

#[given(expr = "order {word} is {word} with a {word} task {word} in state {word}")]
async fn order_with_task(
    world: &mut PaymentWorld,
    order_id: String,
    order_state: String,
    task_type: String,
    task_id: String,
    task_state: String,
) {
    let order_id = OrderId::from(order_id);
    let order_state = order_state.parse::<OrderState>().expect("Not a valid order state");
    let task_type = task_type.parse::<OrderTaskType>().expect("Not a valid task type");
    let task_state = task_state.parse::<OrderTaskState>().expect("Not a valid task state");
    world.storefront.add_order(Order { order_id: order_id.clone(), state: order_state });
    world.storefront.add_task(OrderTask::new(TaskId::from(task_id), order_id, task_type, task_state));
}

#[given(expr = "Midtrans reports transaction {word} as {word}")]
async fn provider_status(world: &mut PaymentWorld, task_id: String, status: String) {
    provider_status_with_fraud(world, task_id, status, String::new()).await;
}

#[given(expr = "Midtrans reports transaction {word} as {word} with fraud status {word}")]
async fn provider_status_with_fraud(world: &mut PaymentWorld, task_id: String, status: String, fraud: String) {
    let trx = TransactionNotification {
        order_id: task_id,
        status_code: "200".into(),
        transaction_status: status,
        fraud_status: fraud,
        ..Default::default()
    };
    world.lookup.set_response(Ok(trx));
}

#[given("Midtrans is unavailable")]
async fn provider_unavailable(world: &mut PaymentWorld) {
    world.lookup.set_response(Err(TransactionLookupError::Unavailable("connection reset".into())));
}

#[given("fraud rejections stop after marking the task as failed")]
async fn fraud_short_circuit(world: &mut PaymentWorld) {
    world.options.fraud_short_circuit = true;
}

#[given("the task service refuses updates")]
async fn refuse_updates(world: &mut PaymentWorld) {
    world.storefront.fail_updates(true);
}

#[when(expr = "a {word} notification for task {word} arrives with status {word}")]
async fn notification_arrives(world: &mut PaymentWorld, payment_type: String, task_id: String, status: String) {
    let notification = signed_notification(&task_id, &payment_type, &status);
    world.result = Some(world.api().process_notification(&notification).await);
}

#[when(expr = "a {word} notification for task {word} arrives with status {word} and a forged signature")]
async fn forged_notification_arrives(world: &mut PaymentWorld, payment_type: String, task_id: String, status: String) {
    let mut notification = signed_notification(&task_id, &payment_type, &status);
    notification.gross_amount = "1.00".into();
    world.result = Some(world.api().process_notification(&notification).await);
}

#[then("the notification is acknowledged")]
async fn acknowledged(world: &mut PaymentWorld) {
    assert!(world.result().is_ok(), "Expected success, got {:?}", world.result());
}

#[then("the notification is rejected")]
async fn rejected(world: &mut PaymentWorld) {
    match world.result() {
        Err(e) => assert_eq!(e.kind(), FailureKind::Rejected, "Unexpected error: {e}"),
        Ok(outcome) => panic!("Expected a rejection, got {outcome:?}"),
    }
}

#[then("the notification fails")]
async fn fails(world: &mut PaymentWorld) {
    match world.result() {
        Err(e) => assert_eq!(e.kind(), FailureKind::Internal, "Unexpected error: {e}"),
        Ok(outcome) => panic!("Expected an internal failure, got {outcome:?}"),
    }
}

#[then("the payment task was already settled")]
async fn already_settled(world: &mut PaymentWorld) {
    assert!(matches!(world.result(), Ok(ReconciliationOutcome::AlreadySettled)), "{:?}", world.result());
}

#[then(expr = "task {word} is marked {string}")]
async fn task_updates(world: &mut PaymentWorld, task_id: String, states: String) {
    let expected = states
        .split(',')
        .map(|s| s.trim().parse::<OrderTaskState>().expect("Not a valid task state"))
        .collect::<Vec<_>>();
    let updates = world
        .storefront
        .updates()
        .into_iter()
        .filter(|u| u.task_id.as_str() == task_id)
        .map(|u| u.state)
        .collect::<Vec<_>>();
    assert_eq!(updates, expected);
}

#[then("no task is updated")]
async fn no_updates(world: &mut PaymentWorld) {
    assert!(world.storefront.updates().is_empty(), "Unexpected updates: {:?}", world.storefront.updates());
}

#[then("Midtrans is not queried")]
async fn not_queried(world: &mut PaymentWorld) {
    assert_eq!(world.lookup.call_count(), 0);
}

#[then("the storefront is not contacted")]
async fn storefront_untouched(world: &mut PaymentWorld) {
    assert_eq!(world.storefront.call_count(), 0);
}
