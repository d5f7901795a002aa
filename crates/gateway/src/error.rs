//! Unified error handling with Sentry integration.
//!
//! All route handlers return `Result<T, AppError>`. Client errors become a
//! JSON `{"msg": ...}` body. Server errors are captured to Sentry and logged,
//! then answered with a fixed plain-text 500 that carries no detail. The detail
//! rides along in a [`FailureReport`] response extension so the activity
//! middleware can record it.

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use webstore_core::{IdError, OrderError};

use crate::db::StoreError;

/// Body of every server-error response.
pub const INTERNAL_ERROR_BODY: &str = "Something went wrong!";

/// JSON body of the form `{"msg": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub msg: String,
}

impl Message {
    #[must_use]
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Failure detail attached to a 500 response for the activity log.
#[derive(Debug, Clone)]
pub struct FailureReport(pub String);

/// Application-level error type for the gateway.
#[derive(Debug, Error)]
pub enum AppError {
    /// Path segment is not a valid document identifier.
    #[error("Invalid ObjectId format: {raw}")]
    InvalidId {
        raw: String,
        #[source]
        source: IdError,
    },

    /// Order submission failed the shape check.
    #[error("Invalid order data: {0}")]
    InvalidOrder(String),

    /// Request body is not JSON, or not the shape the route stores.
    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    /// No document has the requested identifier.
    #[error("Document not found")]
    NotFound,

    /// Store operation failed.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        Self::InvalidOrder(err.to_string())
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId { .. } | Self::InvalidOrder(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidBody(_) | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message for client errors.
    const fn client_message(&self) -> Option<&'static str> {
        match self {
            Self::InvalidId { .. } => Some("Invalid ObjectId format"),
            Self::InvalidOrder(_) => Some("Invalid order data"),
            Self::NotFound => Some("Document not found"),
            Self::InvalidBody(_) | Self::Store(_) | Self::Internal(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self.client_message() {
            Some(msg) => (status, Json(Message::new(msg))).into_response(),
            None => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );
                failure_response(self.to_string())
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// The 500 response, carrying `detail` for the activity log only.
fn failure_response(detail: String) -> Response {
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response();
    response.extensions_mut().insert(FailureReport(detail));
    response
}

/// Convert a handler panic into the standard 500 response.
///
/// Installed through `tower_http::catch_panic::CatchPanicLayer::custom`.
#[allow(clippy::needless_pass_by_value)] // signature fixed by CatchPanicLayer
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_else(|| "handler panicked".to_string());

    tracing::error!(error = %detail, "Handler panicked");
    failure_response(detail)
}
