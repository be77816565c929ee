//! Application state shared across handlers.

use std::sync::Arc;

use forum_store::Store;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Message and user store.
    store: Arc<dyn Store>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
