//! Generic collection CRUD handlers.
//!
//! Each handler performs exactly one store operation on the collection named
//! in the path.

use axum::{Json, extract::State};
use tracing::instrument;
use webstore_core::Document;

use crate::error::{AppError, Message, Result};
use crate::middleware::{Collection, JsonBody, ValidDocumentId};
use crate::state::AppState;

/// `{"msg":"success"}` when exactly one document was affected, else `{"msg":"error"}`.
fn outcome(affected: u64) -> Json<Message> {
    Json(Message::new(if affected == 1 { "success" } else { "error" }))
}

/// List every document in a collection.
#[instrument(skip_all, fields(collection = %collection.name()))]
pub async fn index(
    State(state): State<AppState>,
    collection: Collection,
) -> Result<Json<Vec<Document>>> {
    let activity = state.activity();
    let documents = collection.find_all().await.inspect_err(|_| {
        activity.log(format!(
            "Error fetching from collection: {}",
            collection.name()
        ));
    })?;

    activity.log(format!("Fetched from collection: {}", collection.name()));
    Ok(Json(documents))
}

/// Insert the request body: one object, or an array of objects.
///
/// Responds with an array of every stored document.
#[instrument(skip_all, fields(collection = %collection.name()))]
pub async fn create(
    State(state): State<AppState>,
    collection: Collection,
    body: JsonBody,
) -> Result<Json<Vec<Document>>> {
    let activity = state.activity();
    let batch = body.0.is_array();
    let documents = body.into_documents()?;

    let inserted = collection.insert_many(documents).await.inspect_err(|_| {
        activity.log(format!(
            "Error inserting into collection: {}",
            collection.name()
        ));
    })?;

    activity.log(format!(
        "Inserted into collection: {} - Data: {}",
        collection.name(),
        describe_inserted(&inserted, batch)
    ));
    Ok(Json(inserted))
}

/// Compact JSON of the inserted data, in the shape the client sent it.
fn describe_inserted(inserted: &[Document], batch: bool) -> String {
    match inserted {
        [document] if !batch => document.to_string(),
        documents => serde_json::to_string(documents).unwrap_or_default(),
    }
}

/// Fetch one document by identifier.
#[instrument(skip_all, fields(collection = %collection.name()))]
pub async fn show(
    State(state): State<AppState>,
    collection: Collection,
    ValidDocumentId(id): ValidDocumentId,
) -> Result<Json<Document>> {
    let activity = state.activity();
    let found = collection.find_by_id(id).await.inspect_err(|_| {
        activity.log(format!(
            "Error fetching document from collection: {} - ID: {id}",
            collection.name()
        ));
    })?;

    let Some(document) = found else {
        activity.log(format!(
            "Document not found in collection: {} - ID: {id}",
            collection.name()
        ));
        return Err(AppError::NotFound);
    };

    activity.log(format!(
        "Fetched document from collection: {} - ID: {id}",
        collection.name()
    ));
    Ok(Json(document))
}

/// Merge the request body's fields into one document.
///
/// Any field may be set, including `_id`; the store decides what it accepts.
#[instrument(skip_all, fields(collection = %collection.name()))]
pub async fn update(
    State(state): State<AppState>,
    collection: Collection,
    ValidDocumentId(id): ValidDocumentId,
    body: JsonBody,
) -> Result<Json<Message>> {
    let activity = state.activity();
    let fields = body.into_document()?;

    let matched = collection.update_by_id(id, fields).await.inspect_err(|_| {
        activity.log(format!(
            "Error updating document in collection: {}",
            collection.name()
        ));
    })?;

    activity.log(format!(
        "Updated document in collection: {} - ID: {id}",
        collection.name()
    ));
    Ok(outcome(matched))
}

/// Delete one document.
#[instrument(skip_all, fields(collection = %collection.name()))]
pub async fn destroy(
    State(state): State<AppState>,
    collection: Collection,
    ValidDocumentId(id): ValidDocumentId,
) -> Result<Json<Message>> {
    let activity = state.activity();
    let deleted = collection.delete_by_id(id).await.inspect_err(|_| {
        activity.log(format!(
            "Error deleting from collection: {}",
            collection.name()
        ));
    })?;

    activity.log(format!(
        "Deleted from collection: {} - ID: {id}",
        collection.name()
    ));
    Ok(outcome(deleted))
}
