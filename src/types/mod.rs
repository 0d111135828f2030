//! Data types for the event export pipeline
//!
//! This module contains the records, queries and pages passed between the
//! page source, the walker and the formatter.

mod event;
mod page;
mod query;

pub use event::{DiagnosticPayload, EventDetail, RawEventRecord, Tag};
pub use page::{Cursor, Page};
pub use query::{
    EventFilter, EventQuery, OrderBy, PageLimits, TimeRange, DEFAULT_PER_PAGE, MAX_PER_PAGE,
    MAX_TZ_OFFSET_MINUTES,
};

/// A single rendered output line, newline-terminated
pub type FormattedLine = String;
