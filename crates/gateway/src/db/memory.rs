//! Process-local document store.
//!
//! Follows the MongoDB behaviour the gateway depends on: collections appear on
//! first insert, documents keep insertion order, and updates merge fields into
//! the stored document. Mutations take a write lock, so concurrent writes to
//! one document apply one at a time.
//!
//! JSON cannot tell an `ObjectId` from a string, so each entry remembers
//! whether the store assigned its `_id`. Only assigned ids are found by
//! [`DocumentId`] lookups, as in MongoDB where a client-supplied hex string
//! never matches an `ObjectId` filter. The `_id` of a matched document is
//! immutable.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;
use webstore_core::{Document, DocumentId, ID_FIELD};

use super::{DocumentStore, StoreError};

#[derive(Debug, Clone)]
struct Entry {
    /// Set when the store generated the `_id`.
    object_id: Option<DocumentId>,
    document: Document,
}

/// In-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Vec<Entry>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

fn push_entry(
    entries: &mut Vec<Entry>,
    collection: &str,
    mut document: Document,
) -> Result<Document, StoreError> {
    let object_id = match document.get(ID_FIELD) {
        Some(supplied) => {
            let taken = entries
                .iter()
                .any(|e| e.object_id.is_none() && e.document.get(ID_FIELD) == Some(supplied));
            if taken {
                return Err(StoreError::DuplicateKey(
                    supplied.to_string(),
                    collection.to_owned(),
                ));
            }
            None
        }
        None => {
            let id = DocumentId::from(ObjectId::new());
            document.set_id(id);
            Some(id)
        }
    };

    entries.push(Entry {
        object_id,
        document: document.clone(),
    });
    Ok(document)
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|entries| entries.iter().map(|e| e.document.clone()).collect())
            .unwrap_or_default())
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let entries = collections.entry(collection.to_owned()).or_default();
        push_entry(entries, collection, document)
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let entries = collections.entry(collection.to_owned()).or_default();

        documents
            .into_iter()
            .map(|document| push_entry(entries, collection, document))
            .collect()
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|entries| entries.iter().find(|e| e.object_id == Some(id)))
            .map(|e| e.document.clone()))
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(collection)
            .and_then(|entries| entries.iter_mut().find(|e| e.object_id == Some(id)));

        let Some(entry) = target else {
            return Ok(0);
        };

        // A JSON value never equals the stored ObjectId
        if fields.get(ID_FIELD).is_some() {
            return Err(StoreError::ImmutableId(collection.to_owned()));
        }

        entry.document.merge(fields);
        Ok(1)
    }

    async fn delete_by_id(&self, collection: &str, id: DocumentId) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(entries) = collections.get_mut(collection) else {
            return Ok(0);
        };

        match entries.iter().position(|e| e.object_id == Some(id)) {
            Some(index) => {
                entries.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: serde_json::Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.find_all("nothing-here").await.unwrap().is_empty());
        assert_eq!(store.count("nothing-here").await, 0);
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let store = InMemoryStore::new();
        let inserted = store.insert_one("widgets", doc(json!({"a": 1}))).await.unwrap();

        let id = inserted.id().unwrap();
        let found = store.find_by_id("widgets", id).await.unwrap().unwrap();
        assert_eq!(found, inserted);
        assert_eq!(store.count("widgets").await, 1);
    }

    #[tokio::test]
    async fn test_insert_keeps_supplied_id_and_rejects_duplicates() {
        let store = InMemoryStore::new();
        store
            .insert_one("widgets", doc(json!({"_id": "custom", "a": 1})))
            .await
            .unwrap();

        let err = store
            .insert_one("widgets", doc(json!({"_id": "custom", "a": 2})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_, ref c) if c == "widgets"));
        assert_eq!(store.count("widgets").await, 1);
    }

    #[tokio::test]
    async fn test_supplied_hex_string_id_is_not_an_object_id() {
        let store = InMemoryStore::new();
        let assigned = store.insert_one("widgets", doc(json!({"a": 1}))).await.unwrap();
        let id = assigned.id().unwrap();

        // Same hex as a string: a different key, so no clash and no lookup hit
        let hex = id.to_hex();
        store
            .insert_one("widgets", doc(json!({"_id": hex, "b": 2})))
            .await
            .unwrap();

        let supplied: DocumentId = "65a1b2c3d4e5f60718293a4b".parse().unwrap();
        store
            .insert_one("widgets", doc(json!({"_id": supplied.to_hex()})))
            .await
            .unwrap();

        assert_eq!(store.find_by_id("widgets", supplied).await.unwrap(), None);
        assert_eq!(store.delete_by_id("widgets", supplied).await.unwrap(), 0);
        assert_eq!(
            store.find_by_id("widgets", id).await.unwrap(),
            Some(assigned)
        );
        assert_eq!(store.count("widgets").await, 3);
    }

    #[tokio::test]
    async fn test_insert_many_assigns_ids_in_order() {
        let store = InMemoryStore::new();
        let inserted = store
            .insert_many("widgets", vec![doc(json!({"a": 1})), doc(json!({"b": 2}))])
            .await
            .unwrap();

        assert_eq!(inserted.len(), 2);
        assert_ne!(inserted[0].id(), inserted[1].id());
        assert_eq!(store.find_all("widgets").await.unwrap(), inserted);
    }

    #[tokio::test]
    async fn test_insert_many_stops_at_first_duplicate() {
        let store = InMemoryStore::new();
        let err = store
            .insert_many(
                "widgets",
                vec![
                    doc(json!({"_id": "x"})),
                    doc(json!({"_id": "x"})),
                    doc(json!({"_id": "y"})),
                ],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateKey(..)));
        assert_eq!(store.count("widgets").await, 1);
    }

    #[tokio::test]
    async fn test_find_all_preserves_insertion_order() {
        let store = InMemoryStore::new();
        for n in 0..3 {
            store.insert_one("lessons", doc(json!({"n": n}))).await.unwrap();
        }

        let order: Vec<_> = store
            .find_all("lessons")
            .await
            .unwrap()
            .iter()
            .map(|d| d.get("n").cloned().unwrap())
            .collect();
        assert_eq!(order, vec![json!(0), json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = InMemoryStore::new();
        let inserted = store
            .insert_one("lessons", doc(json!({"topic": "math", "spaces": 5})))
            .await
            .unwrap();
        let id = inserted.id().unwrap();

        let matched = store
            .update_by_id("lessons", id, doc(json!({"spaces": 4})))
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let found = store.find_by_id("lessons", id).await.unwrap().unwrap();
        assert_eq!(found.get("topic"), Some(&json!("math")));
        assert_eq!(found.get("spaces"), Some(&json!(4)));
    }

    #[tokio::test]
    async fn test_update_rejects_id_change() {
        let store = InMemoryStore::new();
        let inserted = store.insert_one("lessons", doc(json!({"n": 1}))).await.unwrap();
        let id = inserted.id().unwrap();

        let err = store
            .update_by_id("lessons", id, doc(json!({"_id": "other", "n": 2})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ImmutableId(ref c) if c == "lessons"));

        let found = store.find_by_id("lessons", id).await.unwrap().unwrap();
        assert_eq!(found, inserted);

        // No match means nothing to reject
        let absent = DocumentId::from_bytes([9; 12]);
        assert_eq!(
            store
                .update_by_id("lessons", absent, doc(json!({"_id": "other"})))
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_match_nothing() {
        let store = InMemoryStore::new();
        let id = DocumentId::from_bytes([7; 12]);

        assert_eq!(store.update_by_id("x", id, Document::new()).await.unwrap(), 0);
        assert_eq!(store.delete_by_id("x", id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_once() {
        let store = InMemoryStore::new();
        let inserted = store.insert_one("x", doc(json!({}))).await.unwrap();
        let id = inserted.id().unwrap();

        assert_eq!(store.delete_by_id("x", id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id("x", id).await.unwrap(), 0);
        assert!(store.find_by_id("x", id).await.unwrap().is_none());
    }
}
