//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `CorsLayer` (all origins allowed)
//! 3. `TraceLayer` (request tracing)
//! 4. Activity middleware (one `Request:` line per request, `Error:` on failure)
//! 5. `CatchPanicLayer` (panics become the standard 500)
//!
//! # Extractors
//!
//! - [`Collection`] - binds the `{collectionName}` segment to the store
//! - [`ValidDocumentId`] - parses the `{id}` segment, rejecting with 400
//! - [`JsonBody`] - request body as JSON, empty body as `{}`

pub mod activity;
pub mod collection;
pub mod document_id;
pub mod json_body;

pub use activity::activity_middleware;
pub use collection::{COLLECTION_PARAM, Collection};
pub use document_id::{ID_PARAM, ValidDocumentId};
pub use json_body::JsonBody;

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::AppError;

/// Read one named segment of the matched route.
async fn path_param<S>(parts: &mut Parts, state: &S, key: &str) -> Result<String, AppError>
where
    S: Send + Sync,
{
    let Path(mut params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|e| AppError::Internal(e.body_text()))?;

    params
        .remove(key)
        .ok_or_else(|| AppError::Internal(format!("route has no {{{key}}} segment")))
}
