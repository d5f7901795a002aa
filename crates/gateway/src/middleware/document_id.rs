//! Identifier validation for document-scoped routes.

use axum::{extract::FromRequestParts, http::request::Parts};
use webstore_core::DocumentId;

use super::path_param;
use crate::error::AppError;
use crate::state::AppState;

/// Route segment holding the document identifier.
pub const ID_PARAM: &str = "id";

/// Extractor for a well-formed `{id}` segment.
///
/// Rejects with 400 `{"msg":"Invalid ObjectId format"}` before the handler
/// runs, so a malformed identifier never reaches the store.
#[derive(Debug, Clone, Copy)]
pub struct ValidDocumentId(pub DocumentId);

impl FromRequestParts<AppState> for ValidDocumentId {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = path_param(parts, state, ID_PARAM).await?;

        DocumentId::parse(&raw).map(Self).map_err(|source| {
            state
                .activity()
                .log(format!("Invalid ObjectId format: {raw}"));
            AppError::InvalidId { raw, source }
        })
    }
}
