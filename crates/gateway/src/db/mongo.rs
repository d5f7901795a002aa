//! MongoDB-backed document store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, doc, oid::ObjectId};
use mongodb::{Client, Collection, Database};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use webstore_core::{Document, DocumentId, ID_FIELD};

use super::{DocumentStore, StoreError};

/// Store backed by one MongoDB database.
///
/// The driver pools and multiplexes connections internally, so a single
/// instance is shared by every request.
#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect to MongoDB and verify the server responds.
    ///
    /// # Arguments
    ///
    /// * `uri` - MongoDB connection string (wrapped in `SecretString`)
    /// * `database` - Name of the database holding the collections
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Mongo` if the URI is invalid or the server does
    /// not answer a `ping`.
    pub async fn connect(uri: &SecretString, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri.expose_secret()).await?;
        let store = Self {
            db: client.database(database),
        };
        store.ping().await?;
        Ok(store)
    }

    fn collection(&self, name: &str) -> Collection<bson::Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let documents: Vec<bson::Document> = self
            .collection(collection)
            .find(doc! {})
            .await?
            .try_collect()
            .await?;

        Ok(documents.into_iter().map(from_bson).collect())
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<Document, StoreError> {
        let stored = prepare_insert(&document)?;
        self.collection(collection).insert_one(&stored).await?;
        Ok(from_bson(stored))
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        let stored = documents
            .iter()
            .map(prepare_insert)
            .collect::<Result<Vec<_>, _>>()?;

        self.collection(collection).insert_many(&stored).await?;
        Ok(stored.into_iter().map(from_bson).collect())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        let found = self
            .collection(collection)
            .find_one(id_filter(id))
            .await?;

        Ok(found.map(from_bson))
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> Result<u64, StoreError> {
        let fields = to_bson(&fields)?;
        let result = self
            .collection(collection)
            .update_one(id_filter(id), doc! { "$set": fields })
            .await?;

        Ok(result.matched_count)
    }

    async fn delete_by_id(&self, collection: &str, id: DocumentId) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)
            .delete_one(id_filter(id))
            .await?;

        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

fn id_filter(id: DocumentId) -> bson::Document {
    let mut filter = bson::Document::new();
    filter.insert(ID_FIELD, ObjectId::from(id));
    filter
}

/// BSON form of a new document, with a fresh `ObjectId` when `_id` is absent.
fn prepare_insert(document: &Document) -> Result<bson::Document, StoreError> {
    let mut stored = to_bson(document)?;
    if !stored.contains_key(ID_FIELD) {
        stored.insert(ID_FIELD, ObjectId::new());
    }
    Ok(stored)
}

/// Convert a JSON document to BSON for the driver.
fn to_bson(document: &Document) -> Result<bson::Document, StoreError> {
    Ok(bson::to_document(document.as_map())?)
}

/// Convert a stored document to JSON. `ObjectId`s become their hex string.
fn from_bson(document: bson::Document) -> Document {
    document
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect()
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(inner) => Value::Object(
            inner
                .into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::DateTime(at) => at
            .try_to_rfc3339_string()
            .map_or_else(|_| Bson::DateTime(at).into_relaxed_extjson(), Value::String),
        other => other.into_relaxed_extjson(),
    }
}
