//! HTTP error response mapping.

use std::any::Any;
use std::error::Error as _;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smartmon_domain::error::MonitorError;

/// Message returned for every storage failure; details stay in the logs.
pub const STORAGE_FAILURE_MESSAGE: &str = "Database execution exception.";

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

/// Every failure an API handler can return.
#[derive(Debug)]
pub enum ApiError {
    /// A failure produced by the application layer.
    Domain(MonitorError),
    /// The request could not be decoded (bad JSON, bad query string, …).
    Rejected { status: StatusCode, message: String },
}

impl From<MonitorError> for ApiError {
    fn from(err: MonitorError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            Self::Domain(MonitorError::Validation(err)) => {
                tracing::debug!(error = %err, "rejected invalid input");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(MonitorError::NotFound(err)) => {
                tracing::debug!(error = %err, "lookup failed");
                (StatusCode::FORBIDDEN, err.to_string())
            }
            Self::Domain(MonitorError::Conflict(err)) => {
                tracing::warn!(error = %err, "name conflict");
                (StatusCode::FORBIDDEN, err.to_string())
            }
            Self::Domain(MonitorError::Storage(err)) => {
                tracing::error!(error = %err, source = ?err.source(), "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    STORAGE_FAILURE_MESSAGE.to_string(),
                )
            }
            Self::Rejected { status, message } => {
                tracing::debug!(%status, %message, "request rejected by extractor");
                (status, message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Turn a handler panic into a `500` carrying the panic message.
pub(crate) fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unhandled error".to_string()
    };
    tracing::error!(%message, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody { message }),
    )
        .into_response()
}
