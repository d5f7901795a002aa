//! Schemaless documents.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::DocumentId;

/// Field holding a document's identifier.
pub const ID_FIELD: &str = "_id";

/// Errors that can occur when building a [`Document`] from JSON.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The JSON value is not an object.
    #[error("document must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// A single record in a collection: string keys mapped to JSON values.
///
/// Field order carries no meaning. The only field with special treatment is
/// [`ID_FIELD`], which the store assigns on insert when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a document from an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NotAnObject` unless the value is a JSON object.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(DocumentError::NotAnObject("null")),
            Value::Bool(_) => Err(DocumentError::NotAnObject("a boolean")),
            Value::Number(_) => Err(DocumentError::NotAnObject("a number")),
            Value::String(_) => Err(DocumentError::NotAnObject("a string")),
            Value::Array(_) => Err(DocumentError::NotAnObject("an array")),
        }
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// The parsed identifier, if `_id` holds a well-formed one.
    #[must_use]
    pub fn id(&self) -> Option<DocumentId> {
        self.get(ID_FIELD)
            .and_then(Value::as_str)
            .and_then(|s| DocumentId::parse(s).ok())
    }

    /// Overwrite `_id`.
    pub fn set_id(&mut self, id: DocumentId) {
        self.insert(ID_FIELD, Value::String(id.to_hex()));
    }

    /// Replace each field present in `fields`, leaving the others intact.
    pub fn merge(&mut self, fields: Self) {
        for (key, value) in fields.0 {
            self.0.insert(key, value);
        }
    }

    /// Borrow the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        Self::Object(document.0)
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Compact JSON, as written to the activity log.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
