//! Integration tests for the Webstore gateway.
//!
//! The tests drive the real router (routes, extractors, middleware) in-process
//! through `tower::ServiceExt::oneshot`, backed by an in-memory store. No
//! MongoDB server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p webstore-integration-tests
//! ```
//!
//! # Helpers
//!
//! - [`TestApp`] - router plus handles on its store and activity log
//! - [`CountingStore`] - spy that counts store calls
//! - [`FailingStore`] - store whose every call fails
//! - [`PanickingStore`] - store whose every call panics

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};
use tower::ServiceExt;
use webstore_core::{Document, DocumentId};
use webstore_gateway::activity::ActivityLog;
use webstore_gateway::db::{DocumentStore, InMemoryStore, StoreError};
use webstore_gateway::state::AppState;

/// Largest response body the helpers will read.
const MAX_BODY: usize = 1024 * 1024;

/// A response reduced to what the tests inspect.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Body as UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    /// Body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("response is not JSON ({e}): {}", self.text()))
    }
}

/// The gateway router wired to a test store and a captured activity log.
pub struct TestApp {
    router: Router,
    activity: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl TestApp {
    /// App over a fresh in-memory store; also returns the store.
    #[must_use]
    pub fn in_memory() -> (Self, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let app = Self::with_store(Arc::clone(&store) as Arc<dyn DocumentStore>);
        (app, store)
    }

    /// App over any store, serving static files from a missing directory.
    #[must_use]
    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_store_and_static_dir(store, "does-not-exist")
    }

    /// App over any store, serving static files from `static_dir`.
    #[must_use]
    pub fn with_store_and_static_dir(
        store: Arc<dyn DocumentStore>,
        static_dir: impl AsRef<Path>,
    ) -> Self {
        let (activity, rx) = ActivityLog::channel();
        let state = AppState::new(store, activity);

        Self {
            router: webstore_gateway::app(state, static_dir),
            activity: Mutex::new(rx),
        }
    }

    /// Send a request, with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    /// Send a prepared request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), MAX_BODY).await.unwrap();

        TestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Activity lines written since the last call, timestamps stripped.
    pub async fn drain_activity(&self) -> Vec<String> {
        let mut rx = self.activity.lock().await;
        let mut lines = Vec::new();
        while let Ok(entry) = rx.try_recv() {
            let message = entry
                .split_once("] ")
                .map_or(entry.as_str(), |(_, message)| message)
                .to_string();
            lines.push(message);
        }
        lines
    }
}

/// Spy store: forwards to an inner store and counts every call.
pub struct CountingStore {
    inner: Arc<dyn DocumentStore>,
    calls: AtomicUsize,
}

impl CountingStore {
    #[must_use]
    pub fn new(inner: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.record();
        self.inner.find_all(collection).await
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<Document, StoreError> {
        self.record();
        self.inner.insert_one(collection, document).await
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        self.record();
        self.inner.insert_many(collection, documents).await
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        self.record();
        self.inner.find_by_id(collection, id).await
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> Result<u64, StoreError> {
        self.record();
        self.inner.update_by_id(collection, id, fields).await
    }

    async fn delete_by_id(&self, collection: &str, id: DocumentId) -> Result<u64, StoreError> {
        self.record();
        self.inner.delete_by_id(collection, id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.record();
        self.inner.ping().await
    }
}

/// Store whose every operation fails with the given detail.
pub struct FailingStore {
    detail: String,
}

impl FailingStore {
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    fn fail<T>(&self) -> Result<T, StoreError> {
        Err(StoreError::Conversion(self.detail.clone()))
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn find_all(&self, _collection: &str) -> Result<Vec<Document>, StoreError> {
        self.fail()
    }

    async fn insert_one(
        &self,
        _collection: &str,
        _document: Document,
    ) -> Result<Document, StoreError> {
        self.fail()
    }

    async fn insert_many(
        &self,
        _collection: &str,
        _documents: Vec<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        self.fail()
    }

    async fn find_by_id(
        &self,
        _collection: &str,
        _id: DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        self.fail()
    }

    async fn update_by_id(
        &self,
        _collection: &str,
        _id: DocumentId,
        _fields: Document,
    ) -> Result<u64, StoreError> {
        self.fail()
    }

    async fn delete_by_id(&self, _collection: &str, _id: DocumentId) -> Result<u64, StoreError> {
        self.fail()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.fail()
    }
}

/// Store whose every operation panics with the given message.
pub struct PanickingStore {
    message: &'static str,
}

impl PanickingStore {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }

    fn explode<T>(&self) -> T {
        std::panic::panic_any(self.message)
    }
}

#[async_trait]
impl DocumentStore for PanickingStore {
    async fn find_all(&self, _collection: &str) -> Result<Vec<Document>, StoreError> {
        self.explode()
    }

    async fn insert_one(
        &self,
        _collection: &str,
        _document: Document,
    ) -> Result<Document, StoreError> {
        self.explode()
    }

    async fn insert_many(
        &self,
        _collection: &str,
        _documents: Vec<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        self.explode()
    }

    async fn find_by_id(
        &self,
        _collection: &str,
        _id: DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        self.explode()
    }

    async fn update_by_id(
        &self,
        _collection: &str,
        _id: DocumentId,
        _fields: Document,
    ) -> Result<u64, StoreError> {
        self.explode()
    }

    async fn delete_by_id(&self, _collection: &str, _id: DocumentId) -> Result<u64, StoreError> {
        self.explode()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.explode()
    }
}
