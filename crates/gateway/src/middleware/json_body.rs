//! JSON request bodies.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};
use webstore_core::Document;

use crate::error::AppError;

/// Request body parsed as JSON.
///
/// An empty body reads as `{}`. Unlike `axum::Json`, the `Content-Type`
/// header is not checked. Malformed JSON is rejected as
/// `AppError::InvalidBody`, which answers with the generic 500.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl JsonBody {
    /// Interpret the body as a document.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidBody` unless the body is a JSON object.
    pub fn into_document(self) -> Result<Document, AppError> {
        to_document(self.0)
    }

    /// Interpret the body as one document or a batch of them.
    ///
    /// An object gives a batch of one. An array must hold at least one
    /// element, and every element must be an object.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidBody` for any other shape.
    pub fn into_documents(self) -> Result<Vec<Document>, AppError> {
        match self.0 {
            Value::Array(items) if items.is_empty() => Err(AppError::InvalidBody(
                "batch must contain at least one document".to_string(),
            )),
            Value::Array(items) => items.into_iter().map(to_document).collect(),
            other => to_document(other).map(|document| vec![document]),
        }
    }
}

fn to_document(value: Value) -> Result<Document, AppError> {
    Document::from_value(value).map_err(|e| AppError::InvalidBody(e.to_string()))
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidBody(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Value::Object(Map::new())));
        }

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| AppError::InvalidBody(e.to_string()))
    }
}
