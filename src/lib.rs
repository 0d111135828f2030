//! Download Events
//!
//! Streams one condensed text line per error/event record from a paginated
//! event store, without loading the result set into memory.
//!
//! # Features
//!
//! - **Cursor Walk**: Lazy page-by-page listing, one page in memory at a time
//! - **Event Lines**: Level, shifted timestamp, client/server identity tag
//! - **Stack Traces**: Chained exceptions and current-thread frames
//! - **Streaming HTTP**: `text/plain` attachment written as it is rendered
//!
//! # Modules
//!
//! - `types`: Records, details, queries and pages
//! - `event_store`: Page/detail source traits plus in-memory and JSONL stores
//! - `walker`: PageCursor walker over a page source
//! - `formatter`: Event-to-line rendering
//! - `export`: Walker + formatter as one stream of lines
//! - `api`: Axum router and download endpoint
//! - `config`: Environment configuration for the server
//! - `utils`: Timestamp helpers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use futures::TryStreamExt;
//! use download_events::event_store::{EventStoreConfig, JsonlEventStore};
//! use download_events::{export_lines, EventQuery};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let store = Arc::new(JsonlEventStore::with_config(EventStoreConfig::new("events.jsonl")).load()?);
//! let lines: Vec<String> = export_lines(store.clone(), store, EventQuery::new(1))
//!     .try_collect()
//!     .await?;
//! print!("{}", lines.concat());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod event_store;
pub mod export;
pub mod formatter;
pub mod logging;
pub mod types;
pub mod utils;
pub mod walker;

// Re-export commonly used items at crate root
pub use error::{ExportError, ExportResult, SourceError, StacktraceError};
pub use event_store::{DetailSource, MemoryEventStore, PageSource, StoredEvent};
pub use export::export_lines;
pub use formatter::EventFormatter;
pub use types::{
    Cursor, DiagnosticPayload, EventDetail, EventFilter, EventQuery, FormattedLine, OrderBy, Page,
    PageLimits, RawEventRecord, Tag, TimeRange,
};
pub use walker::PageCursorWalker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
