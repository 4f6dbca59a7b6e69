use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use callback_engine::{FailureKind, ReconciliationError, StockUpdateError, TaskStatusError};
use thiserror::Error;

use crate::data_objects::JsonResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    /// A callback failed the header checks. The message is returned to the caller as is.
    #[error("{0}")]
    HeaderRejected(String),
    /// A Midtrans notification failed the header checks or could not be parsed.
    #[error("Payment notification rejected. {0}")]
    NotificationRejected(String),
    #[error("invalid request data")]
    InvalidCallbackPayload,
    #[error("Could not process payment notification. {0}")]
    PaymentNotification(#[from] ReconciliationError),
    #[error("Could not process task status callback. {0}")]
    TaskStatus(#[from] TaskStatusError),
    #[error("Could not process inventory callback. {0}")]
    Inventory(#[from] StockUpdateError),
}

impl ServerError {
    /// The message that is sent back to the caller. Backend failures are reported with a generic message.
    pub fn public_message(&self) -> String {
        match self {
            Self::HeaderRejected(msg) => msg.clone(),
            Self::InvalidCallbackPayload => self.to_string(),
            Self::TaskStatus(TaskStatusError::InvalidRequest(e)) => e.to_string(),
            Self::TaskStatus(_) => "failed to update order task".into(),
            Self::Inventory(StockUpdateError::InvalidRequest(e)) => e.to_string(),
            Self::Inventory(StockUpdateError::StockUpdateFailed { .. }) => "failed to update stock".into(),
            Self::Inventory(StockUpdateError::StatusUpdateFailed { .. }) => {
                "failed to update product variant status".into()
            },
            _ => "internal server error".into(),
        }
    }

    /// Midtrans only looks at the status code of the response, so payment notifications get an empty body.
    fn has_empty_body(&self) -> bool {
        matches!(self, Self::NotificationRejected(_) | Self::PaymentNotification(_))
    }
}

fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::Rejected => StatusCode::BAD_REQUEST,
        FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::HeaderRejected(_) => StatusCode::BAD_REQUEST,
            Self::NotificationRejected(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCallbackPayload => StatusCode::BAD_REQUEST,
            Self::PaymentNotification(e) => status_for(e.kind()),
            Self::TaskStatus(e) => status_for(e.kind()),
            Self::Inventory(e) => status_for(e.kind()),
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        response.insert_header(ContentType::json());
        if self.has_empty_body() {
            response.finish()
        } else {
            response.json(JsonResponse::failure(self.public_message()))
        }
    }
}
