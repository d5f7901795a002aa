//! Collection resolution.
//!
//! Collections are never declared up front. Any name resolves to a handle;
//! a name the store has never seen behaves as an empty collection.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use webstore_core::{Document, DocumentId};

use super::path_param;
use crate::db::{DocumentStore, StoreError};
use crate::error::AppError;
use crate::state::AppState;

/// Route segment naming the collection.
pub const COLLECTION_PARAM: &str = "collectionName";

/// A named collection bound to the shared store.
///
/// As an extractor it reads `{collectionName}` from the route and logs the
/// access. It never rejects a name.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(collection: Collection) -> Result<Json<Vec<Document>>> {
///     Ok(Json(collection.find_all().await?))
/// }
/// ```
#[derive(Clone)]
pub struct Collection {
    name: String,
    store: Arc<dyn DocumentStore>,
}

impl Collection {
    /// Bind `name` to `store`.
    #[must_use]
    pub fn resolve(store: &Arc<dyn DocumentStore>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store: Arc::clone(store),
        }
    }

    /// The collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every document in the collection.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    pub async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        self.store.find_all(&self.name).await
    }

    /// Insert one document and return it with its `_id`.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    pub async fn insert_one(&self, document: Document) -> Result<Document, StoreError> {
        self.store.insert_one(&self.name, document).await
    }

    /// Insert documents in order and return them with their `_id`s.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    pub async fn insert_many(&self, documents: Vec<Document>) -> Result<Vec<Document>, StoreError> {
        self.store.insert_many(&self.name, documents).await
    }

    /// Look up one document.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    pub async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        self.store.find_by_id(&self.name, id).await
    }

    /// Merge `fields` into one document; returns the matched count.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    pub async fn update_by_id(&self, id: DocumentId, fields: Document) -> Result<u64, StoreError> {
        self.store.update_by_id(&self.name, id, fields).await
    }

    /// Delete one document; returns the deleted count.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    pub async fn delete_by_id(&self, id: DocumentId) -> Result<u64, StoreError> {
        self.store.delete_by_id(&self.name, id).await
    }
}

impl FromRequestParts<AppState> for Collection {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let name = path_param(parts, state, COLLECTION_PARAM).await?;
        state
            .activity()
            .log(format!("Accessing collection: {name}"));

        Ok(Self::resolve(state.store(), name))
    }
}
