//! Shared application state for all routes.

use crate::store::Store;
use crate::uploads::FileStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub files: Arc<FileStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, files: FileStore) -> Self {
        AppState {
            store,
            files: Arc::new(files),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
