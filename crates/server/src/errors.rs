use std::any::Any;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::bootstrap::ConnectError;
use sea_orm::DbErr;
use serde::Serialize;
use service::ServiceError;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

pub const DATABASE_ERROR: &str = "A database error occurred. Please try again later.";
pub const INTERNAL_ERROR: &str = "An unexpected error occurred. Please try again later.";

pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Error body returned by every endpoint: `{"error": .., "detail": ..}`.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub detail: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, detail: impl Into<String>) -> Self {
        Self { status, error: error.to_string(), detail: detail.into() }
    }

    pub fn validation(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", detail)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(m) => Self::validation(m),
            ServiceError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, "Not Found", m),
            ServiceError::Conflict(m) => Self::new(StatusCode::BAD_REQUEST, "Bad Request", m),
            ServiceError::Db(e) => {
                error!(error = %e, "database error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", DATABASE_ERROR)
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(_) => Self::new(StatusCode::BAD_REQUEST, "Bad Request", rejection.body_text()),
            JsonRejection::JsonDataError(_) => Self::validation(rejection.body_text()),
            other => Self::new(other.status(), "Bad Request", other.body_text()),
        }
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

/// Turn a handler panic into the generic 500 body; the payload is only logged.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!(panic = message, "request handler panicked");
    JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", INTERNAL_ERROR).into_response()
}

pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("storage unavailable: {0}")]
    Storage(#[from] ConnectError),
    #[error("cannot bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
    #[error("closing database failed: {0}")]
    Close(#[from] DbErr),
}
