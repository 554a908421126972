use std::sync::Arc;

use crate::core::config::Settings;
use crate::services::storage::BlobStore;
use crate::store::ItemStore;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    store: Arc<dyn ItemStore>,
    storage: Option<Arc<dyn BlobStore>>,
}

impl AppState {
    pub(crate) fn new(
        settings: Settings,
        store: Arc<dyn ItemStore>,
        storage: Option<Arc<dyn BlobStore>>,
    ) -> Self {
        Self { inner: Arc::new(InnerState { settings, store, storage }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn store(&self) -> &dyn ItemStore {
        self.inner.store.as_ref()
    }

    pub(crate) fn storage(&self) -> Option<&dyn BlobStore> {
        self.inner.storage.as_deref()
    }
}
