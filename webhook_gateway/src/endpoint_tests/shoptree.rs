use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use callback_engine::{
    storefront_types::{ProductStatus, UpdateSource},
    traits::InventoryApiError,
    StockApi,
};
use gateway_common::Secret;
use mockall::Sequence;

use super::{
    helpers::{json_post, send_request, SHOPTREE_KEY},
    mocks::MockStorefront,
};
use crate::server::shoptree_scope;

const STOCK_PATH: &str = "/shoptree/stock-update";
const STATUS_PATH: &str = "/shoptree/product-status-update";

const STOCK_UPDATES: &str = r#"[
    {"reference_id":"SO-1","reference_type":"order","location_id":"LOC-1","product_variant_id":"PV-1","in_stock":12,"quantity_changed":-1},
    {"reference_id":"ST-7","reference_type":"stock_take","location_id":"LOC-1","product_variant_id":"PV-2","in_stock":0,"quantity_changed":-3}
]"#;

const STATUS_UPDATES: &str = r#"[
    {"location_id":"LOC-1","product_variant_id":"PV-1","enabled":false},
    {"location_id":"LOC-2","product_variant_id":"PV-1","enabled":true}
]"#;

const SUCCESS: &str = r#"{"success":true,"message":"success"}"#;

fn failure(message: &str) -> String {
    format!(r#"{{"success":false,"message":"{message}"}}"#)
}

fn configure(storefront: MockStorefront) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(shoptree_scope::<MockStorefront>(Secret::new(SHOPTREE_KEY.to_string())))
            .app_data(web::Data::new(StockApi::new(storefront)));
    }
}

fn callback(path: &str, body: &str) -> TestRequest {
    json_post(path, body).insert_header(("X-Client-Api-Key", SHOPTREE_KEY))
}

fn untouched() -> MockStorefront {
    let mut storefront = MockStorefront::new();
    storefront.expect_update_stock().never();
    storefront.expect_update_product_status().never();
    storefront
}

#[actix_web::test]
async fn stock_updates_are_forwarded_in_order() {
    let _ = env_logger::try_init().ok();
    let mut storefront = MockStorefront::new();
    let mut seq = Sequence::new();
    storefront
        .expect_update_stock()
        .withf(|u| {
            u.store_id == "LOC-1" && u.product_variant_id == "PV-1" && u.quantity == 12 && u.source == UpdateSource::External
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    storefront
        .expect_update_stock()
        .withf(|u| u.product_variant_id == "PV-2" && u.quantity == 0)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    let (status, body) = send_request(callback(STOCK_PATH, STOCK_UPDATES), configure(storefront)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, SUCCESS);
}

#[actix_web::test]
async fn product_status_updates_are_forwarded() {
    let _ = env_logger::try_init().ok();
    let mut storefront = MockStorefront::new();
    storefront
        .expect_update_product_status()
        .withf(|u| u.store_id == "LOC-1" && u.status == ProductStatus::Disabled)
        .times(1)
        .returning(|_| Ok(()));
    storefront
        .expect_update_product_status()
        .withf(|u| u.store_id == "LOC-2" && u.status == ProductStatus::Enabled)
        .times(1)
        .returning(|_| Ok(()));
    let (status, body) = send_request(callback(STATUS_PATH, STATUS_UPDATES), configure(storefront)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, SUCCESS);
}

#[actix_web::test]
async fn header_checks() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri(STOCK_PATH).insert_header(("X-Client-Api-Key", SHOPTREE_KEY));
    let (status, body) = send_request(req.set_payload(STOCK_UPDATES), configure(untouched())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("content type is required"));

    let req = TestRequest::post()
        .uri(STATUS_PATH)
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .insert_header(("X-Client-Api-Key", SHOPTREE_KEY))
        .set_payload(STATUS_UPDATES);
    let (status, body) = send_request(req, configure(untouched())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("content type should be application/json"));

    let (status, body) = send_request(json_post(STOCK_PATH, STOCK_UPDATES), configure(untouched())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("x client api key is required"));

    let req = json_post(STATUS_PATH, STATUS_UPDATES).insert_header(("X-Client-Api-Key", "not-the-key"));
    let (status, body) = send_request(req, configure(untouched())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("invalid x client api key"));
}

#[actix_web::test]
async fn only_post_is_allowed() {
    let _ = env_logger::try_init().ok();
    for path in [STOCK_PATH, STATUS_PATH] {
        let req = TestRequest::get().uri(path).insert_header(("X-Client-Api-Key", SHOPTREE_KEY));
        let (status, _) = send_request(req, configure(untouched())).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{path}");
    }
}

#[actix_web::test]
async fn invalid_stock_items() {
    let _ = env_logger::try_init().ok();
    let cases = [
        (r#"[{"reference_type":"order","location_id":"L","product_variant_id":"P","in_stock":1,"quantity_changed":1}]"#, "reference id is required"),
        (r#"[{"reference_id":"R","location_id":"L","product_variant_id":"P","in_stock":1,"quantity_changed":1}]"#, "reference type is required"),
        (r#"[{"reference_id":"R","reference_type":"order","product_variant_id":"P","in_stock":1,"quantity_changed":1}]"#, "location id is required"),
        (r#"[{"reference_id":"R","reference_type":"order","location_id":"L","in_stock":1,"quantity_changed":1}]"#, "product variant id is required"),
        (r#"[{"reference_id":"R","reference_type":"order","location_id":"L","product_variant_id":"P","quantity_changed":1}]"#, "in stock is required"),
        (r#"[{"reference_id":"R","reference_type":"order","location_id":"L","product_variant_id":"P","in_stock":1}]"#, "quantity changed is required"),
        (r#"[{"reference_id":"R","reference_type":"refund","location_id":"L","product_variant_id":"P","in_stock":1,"quantity_changed":1}]"#, "invalid reference type"),
        (r#"[{"reference_id":"R","reference_type":"order","location_id":"L","product_variant_id":"P","in_stock":1.5,"quantity_changed":1}]"#, "invalid in stock value"),
    ];
    for (payload, message) in cases {
        let (status, body) = send_request(callback(STOCK_PATH, payload), configure(untouched())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{message}");
        assert_eq!(body, failure(message));
    }
    let (status, body) = send_request(callback(STOCK_PATH, r#"{"in_stock": 1}"#), configure(untouched())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("invalid request data"));
}

#[actix_web::test]
async fn invalid_status_items() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        send_request(callback(STATUS_PATH, r#"[{"location_id":"L","product_variant_id":"P"}]"#), configure(untouched()))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("enabled is required"));
}

#[actix_web::test]
async fn the_first_failure_stops_the_batch() {
    let _ = env_logger::try_init().ok();
    let mut storefront = MockStorefront::new();
    storefront
        .expect_update_stock()
        .withf(|u| u.product_variant_id == "PV-1")
        .times(1)
        .returning(|_| Err(InventoryApiError::Unavailable("connection refused".into())));
    storefront.expect_update_stock().withf(|u| u.product_variant_id == "PV-2").never();
    let (status, body) = send_request(callback(STOCK_PATH, STOCK_UPDATES), configure(storefront)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, failure("failed to update stock"));

    let mut storefront = MockStorefront::new();
    storefront
        .expect_update_product_status()
        .times(1)
        .returning(|_| Err(InventoryApiError::Rejected("400. unknown variant".into())));
    let (status, body) = send_request(callback(STATUS_PATH, STATUS_UPDATES), configure(storefront)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, failure("failed to update product variant status"));
}
