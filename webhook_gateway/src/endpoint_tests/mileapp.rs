use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use callback_engine::{
    storefront_types::{OrderId, OrderTask, OrderTaskState, OrderTaskType, TaskId, TaskQuery},
    traits::TaskApiError,
    TaskStatusApi,
};
use gateway_common::Secret;

use super::{
    helpers::{json_post, send_request, MILEAPP_KEY},
    mocks::MockStorefront,
};
use crate::server::mileapp_scope;

const SHIPPING_ONGOING: &str = r#"{
    "taskRefId": "ref-1",
    "taskStatus": "ongoing",
    "UserVar": { "orderNumber": "O1", "driverPhone": "08123456789" },
    "assignedTo": { "full_name": "Budi" }
}"#;

const DELIVERY_DONE: &str = r#"{
    "taskRefId": "ref-2",
    "taskStatus": "done",
    "UserVar": { "orderNumber": "O1", "receiver": "security", "receiverName": "Andi" },
    "assignedTo": { "full_name": "Budi" }
}"#;

const SUCCESS: &str = r#"{"success":true,"message":"success"}"#;

fn failure(message: &str) -> String {
    format!(r#"{{"success":false,"message":"{message}"}}"#)
}

fn order_tasks(shipping: OrderTaskState) -> Vec<OrderTask> {
    vec![
        OrderTask::new(TaskId::from("T1"), OrderId::from("O1"), OrderTaskType::Payment, OrderTaskState::Success),
        OrderTask::new(TaskId::from("T2"), OrderId::from("O1"), OrderTaskType::Shipping, shipping),
        OrderTask::new(TaskId::from("T3"), OrderId::from("O1"), OrderTaskType::Delivery, OrderTaskState::Pending),
    ]
}

fn configure(storefront: MockStorefront) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(mileapp_scope::<MockStorefront>(Secret::new(MILEAPP_KEY.to_string())))
            .app_data(web::Data::new(TaskStatusApi::new(storefront)));
    }
}

fn callback(task_type: &str, body: &str) -> TestRequest {
    json_post(&format!("/mileapp/status/{task_type}"), body).insert_header(("x-api-key", MILEAPP_KEY))
}

/// A storefront that must not be contacted at all.
fn untouched() -> MockStorefront {
    let mut storefront = MockStorefront::new();
    storefront.expect_fetch_order_tasks().never();
    storefront.expect_update_order_task().never();
    storefront
}

#[actix_web::test]
async fn shipping_ongoing_records_the_driver() {
    let _ = env_logger::try_init().ok();
    let mut storefront = MockStorefront::new();
    storefront
        .expect_fetch_order_tasks()
        .withf(|q| *q == TaskQuery::OrderId(OrderId::from("O1")))
        .times(1)
        .returning(|_| Ok(order_tasks(OrderTaskState::Pending)));
    storefront
        .expect_update_order_task()
        .withf(|u| {
            u.task_id == TaskId::from("T2") &&
                u.state == OrderTaskState::Success &&
                u.additional_data.get("driver_name").map(String::as_str) == Some("Budi") &&
                u.additional_data.get("driver_phone").map(String::as_str) == Some("08123456789")
        })
        .times(1)
        .returning(|_| Ok(()));
    let (status, body) = send_request(callback("shipping", SHIPPING_ONGOING), configure(storefront)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, SUCCESS);
}

#[actix_web::test]
async fn delivery_done_records_the_receiver() {
    let _ = env_logger::try_init().ok();
    let mut storefront = MockStorefront::new();
    storefront.expect_fetch_order_tasks().returning(|_| Ok(order_tasks(OrderTaskState::Success)));
    storefront
        .expect_update_order_task()
        .withf(|u| {
            u.task_id == TaskId::from("T3") &&
                u.additional_data.get("receiver_role").map(String::as_str) == Some("security") &&
                u.additional_data.get("receiver_name").map(String::as_str) == Some("Andi") &&
                !u.additional_data.contains_key("driver_name")
        })
        .times(1)
        .returning(|_| Ok(()));
    let (status, body) = send_request(callback("delivery", DELIVERY_DONE), configure(storefront)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, SUCCESS);
}

#[actix_web::test]
async fn duplicate_callbacks_are_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut storefront = MockStorefront::new();
    storefront.expect_fetch_order_tasks().times(1).returning(|_| Ok(order_tasks(OrderTaskState::Success)));
    storefront.expect_update_order_task().never();
    let (status, body) = send_request(callback("shipping", SHIPPING_ONGOING), configure(storefront)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, SUCCESS);
}

#[actix_web::test]
async fn header_checks() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/mileapp/status/shipping").set_payload(SHIPPING_ONGOING);
    let (status, body) = send_request(req, configure(untouched())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("content-type is required"));

    let req = TestRequest::post()
        .uri("/mileapp/status/shipping")
        .insert_header(("Content-Type", "text/plain"))
        .insert_header(("x-api-key", MILEAPP_KEY))
        .set_payload(SHIPPING_ONGOING);
    let (status, body) = send_request(req, configure(untouched())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("invalid content-type"));

    let req = json_post("/mileapp/status/shipping", SHIPPING_ONGOING);
    let (status, body) = send_request(req, configure(untouched())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("x-api-key is required"));

    let req = json_post("/mileapp/status/shipping", SHIPPING_ONGOING).insert_header(("x-api-key", "wrong-key"));
    let (status, body) = send_request(req, configure(untouched())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("invalid x-api-key"));
}

#[actix_web::test]
async fn unsupported_task_type() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(callback("payment", SHIPPING_ONGOING), configure(untouched())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("unsupported task type: payment"));
}

#[actix_web::test]
async fn invalid_payloads() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(callback("shipping", "{not json"), configure(untouched())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("invalid request data"));

    let cases = [
        (r#"{"taskStatus":"ongoing","UserVar":{"orderNumber":"O1"}}"#, "taskRefId is required"),
        (r#"{"taskRefId":"ref-1","taskStatus":"ongoing"}"#, "order number is required"),
        (r#"{"taskRefId":"ref-1","UserVar":{"orderNumber":"O1"}}"#, "taskStatus is required"),
        (r#"{"taskRefId":"ref-1","taskStatus":"cancelled","UserVar":{"orderNumber":"O1"}}"#, "taskStatus is invalid"),
    ];
    for (payload, message) in cases {
        let (status, body) = send_request(callback("packing", payload), configure(untouched())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{message}");
        assert_eq!(body, failure(message));
    }
}

#[actix_web::test]
async fn missing_task_is_an_internal_error() {
    let _ = env_logger::try_init().ok();
    let mut storefront = MockStorefront::new();
    storefront.expect_fetch_order_tasks().returning(|_| Ok(vec![]));
    storefront.expect_update_order_task().never();
    let (status, body) = send_request(callback("picking", SHIPPING_ONGOING), configure(storefront)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, failure("failed to update order task"));
}

#[actix_web::test]
async fn storefront_failures() {
    let _ = env_logger::try_init().ok();
    let mut storefront = MockStorefront::new();
    storefront.expect_fetch_order_tasks().returning(|_| Err(TaskApiError::Unavailable("connection refused".into())));
    let (status, body) = send_request(callback("shipping", SHIPPING_ONGOING), configure(storefront)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, failure("failed to update order task"));

    let mut storefront = MockStorefront::new();
    storefront.expect_fetch_order_tasks().returning(|_| Ok(order_tasks(OrderTaskState::Pending)));
    storefront.expect_update_order_task().returning(|_| Err(TaskApiError::Rejected("422. bad state".into())));
    let (status, body) = send_request(callback("shipping", SHIPPING_ONGOING), configure(storefront)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, failure("failed to update order task"));
}

#[actix_web::test]
async fn only_post_is_allowed() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/mileapp/status/shipping").insert_header(("x-api-key", MILEAPP_KEY));
    let (status, _) = send_request(req, configure(untouched())).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
