//! Event Store Module
//!
//! The export pipeline reads events through two narrow capabilities:
//! - `PageSource`: lists event handles page by page behind an opaque cursor
//! - `DetailSource`: fetches the full body of a single event
//!
//! Two implementations ship with the crate:
//! - `MemoryEventStore`: events held in memory, offset-paginated
//! - `JsonlEventStore`: loads a `MemoryEventStore` from an events.jsonl export
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐ fetch_page  ┌─────────────┐ fetch_detail ┌─────────────┐
//! │   Walker   │────────────►│ PageSource  │              │ DetailSource│
//! │ (cursor)   │◄────────────│ (list)      │              │ (body)      │
//! └─────┬──────┘ Page        └─────────────┘              └──────▲──────┘
//!       │ RawEventRecord                                         │
//!       └────────────────────► Formatter ────────────────────────┘
//! ```

mod memory;
mod store;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::types::{Cursor, EventDetail, EventFilter, OrderBy, Page};

pub use memory::{MemoryEventStore, StoredEvent};
pub use store::{EventStoreConfig, JsonlEventStore};

/// Paginated listing of event handles
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page after `cursor` (`None` for the first page)
    async fn fetch_page(
        &self,
        filter: &EventFilter,
        order_by: OrderBy,
        cursor: Option<&Cursor>,
        limit: usize,
    ) -> Result<Page, SourceError>;
}

/// Full event body lookup
#[async_trait]
pub trait DetailSource: Send + Sync {
    /// Fetch one event; `SourceError::NotFound` when it no longer exists
    async fn fetch_detail(&self, project_id: u64, event_id: &str)
        -> Result<EventDetail, SourceError>;
}
