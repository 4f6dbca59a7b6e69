//! MileApp courier task callbacks.
//!
//! MileApp reports progress on the picking, packing, shipping and delivery tasks of an order. Every response is a
//! [`JsonResponse`].

use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use callback_engine::{
    traits::TaskManagement,
    CourierTaskType,
    TaskStatusApi,
    TaskStatusError,
    TaskStatusOutcome,
    TaskStatusRequest,
};
use log::*;

use crate::{config::ServerOptions, data_objects::JsonResponse, errors::ServerError, helpers::get_remote_ip, route};

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        warn!("🚚️ Could not parse MileApp callback to {}. {err}", req.path());
        ServerError::InvalidCallbackPayload.into()
    })
}

route!(task_status => Post "/status/{task_type}" impl TaskManagement);
pub async fn task_status<B: TaskManagement>(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<TaskStatusRequest>,
    api: web::Data<TaskStatusApi<B>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let remote_ip = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded);
    let task_type = path.into_inner();
    trace!("🚚️ Received {task_type} status callback from {remote_ip:?}");
    let task_type = task_type.parse::<CourierTaskType>().map_err(|e| {
        warn!("🚚️ Rejected MileApp callback. {e}");
        TaskStatusError::from(e)
    })?;
    let request = body.into_inner();
    match api.process_task_status(task_type, &request).await? {
        TaskStatusOutcome::AlreadyCompleted => {
            debug!("🚚️ Duplicate callback for task ref {}", request.task_ref_id);
        },
        TaskStatusOutcome::Updated(update) => {
            debug!("🚚️ Callback for task ref {} applied to task {}", request.task_ref_id, update.task_id);
        },
    }
    Ok(HttpResponse::Ok().json(JsonResponse::success("success")))
}
