use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web::{self, ServiceConfig},
    App,
};
use log::debug;

use crate::config::ServerOptions;

pub const MILEAPP_KEY: &str = "mileapp-test-key";
pub const SHOPTREE_KEY: &str = "shoptree-test-key";
pub const MIDTRANS_SERVER_KEY: &str = "SB-Mid-server-test-key";

/// Sends a request to an app set up by `configure` and returns the status code and body.
///
/// Errors raised by middleware are rendered into a response here, the same way the server does it.
pub async fn send_request<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new().app_data(web::Data::new(ServerOptions::default())).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let body = test::read_body(res).await;
            (status, String::from_utf8_lossy(&body).into_owned())
        },
        Err(e) => {
            let res = e.error_response();
            let status = res.status();
            let body = res.into_body().try_into_bytes().unwrap();
            (status, String::from_utf8_lossy(&body).into_owned())
        },
    }
}

pub fn json_post(path: &str, body: &str) -> TestRequest {
    TestRequest::post()
        .uri(path)
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body.to_string())
}
