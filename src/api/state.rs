//! HTTP application state

use std::sync::Arc;

use crate::event_store::{DetailSource, MemoryEventStore, PageSource};
use crate::types::PageLimits;

/// Shared application state for the download endpoints
pub struct AppState {
    /// Paginated event listing
    pub pages: Arc<dyn PageSource>,

    /// Per-event detail lookup
    pub details: Arc<dyn DetailSource>,

    /// Page size policy for `per_page`
    pub limits: PageLimits,
}

impl AppState {
    pub fn new(
        pages: Arc<dyn PageSource>,
        details: Arc<dyn DetailSource>,
        limits: PageLimits,
    ) -> Self {
        Self {
            pages,
            details,
            limits,
        }
    }

    /// State serving both capabilities from one in-memory store
    pub fn with_store(store: MemoryEventStore, limits: PageLimits) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store, limits)
    }
}
