//! Document store access.
//!
//! Handlers never talk to a driver directly. They go through the
//! [`DocumentStore`] trait, held once in [`AppState`](crate::state::AppState):
//!
//! - [`mongo::MongoStore`] - MongoDB, used by the binary
//! - [`memory::InMemoryStore`] - process-local, used by tests
//!
//! Every method is a single store round-trip. Collections are addressed by
//! name and exist implicitly: reading an unknown collection returns no
//! documents, and the first insert creates it.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use thiserror::Error;
use webstore_core::{Document, DocumentId};

pub use memory::InMemoryStore;
pub use mongo::MongoStore;

/// Errors returned by a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The MongoDB driver reported a failure.
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A document could not be converted to or from BSON.
    #[error("Document conversion failed: {0}")]
    Conversion(String),

    /// An insert reused an existing `_id`.
    #[error("Duplicate key: _id {0} already exists in {1}")]
    DuplicateKey(String, String),

    /// An update tried to change a document's `_id`.
    #[error("Performing an update on the path '_id' would modify the immutable field '_id' in {0}")]
    ImmutableId(String),
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self::Conversion(err.to_string())
    }
}

/// Operations the gateway performs against a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in a collection, in natural order.
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Insert one document, assigning `_id` when absent.
    ///
    /// Returns the document as stored, including its `_id`.
    async fn insert_one(&self, collection: &str, document: Document)
    -> Result<Document, StoreError>;

    /// Insert documents in order, assigning `_id` to each when absent.
    ///
    /// Stops at the first failure; documents before it stay inserted.
    /// Returns the documents as stored.
    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<Document>, StoreError>;

    /// The document with the given identifier, if any.
    async fn find_by_id(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError>;

    /// Set each field of `fields` on the identified document.
    ///
    /// Returns how many documents matched (0 or 1).
    async fn update_by_id(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> Result<u64, StoreError>;

    /// Delete the identified document.
    ///
    /// Returns how many documents were deleted (0 or 1).
    async fn delete_by_id(&self, collection: &str, id: DocumentId) -> Result<u64, StoreError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
