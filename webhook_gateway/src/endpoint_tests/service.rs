use actix_web::{http::StatusCode, test::TestRequest};

use super::helpers::send_request;
use crate::routes::{health, version};

#[actix_web::test]
async fn version_banner() {
    let req = TestRequest::get().uri("/");
    let (status, body) = send_request(req, |cfg| {
        cfg.service(version);
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, format!("webhook-gateway at version, {}", env!("CARGO_PKG_VERSION")));
}

#[actix_web::test]
async fn health_check() {
    let req = TestRequest::get().uri("/health");
    let (status, _) = send_request(req, |cfg| {
        cfg.service(health);
    })
    .await;
    assert_eq!(status, StatusCode::OK);
}
