//! Application state shared across handlers.

use std::sync::Arc;

use crate::activity::ActivityLog;
use crate::db::DocumentStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The store handle is created
/// once at startup and never replaced.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn DocumentStore>,
    activity: ActivityLog,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `store` - Document store every request goes through
    /// * `activity` - Activity log handle
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, activity: ActivityLog) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, activity }),
        }
    }

    /// Get the shared document store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.inner.store
    }

    /// Get the activity log.
    #[must_use]
    pub fn activity(&self) -> &ActivityLog {
        &self.inner.activity
    }
}
