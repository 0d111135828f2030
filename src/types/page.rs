//! Cursor and page types for paginated fetches

use super::RawEventRecord;

/// Opaque resume token for the page source
///
/// The pipeline never inspects it; it only hands the token returned by one
/// page fetch to the next one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of records returned by the page source
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<RawEventRecord>,
    /// Token for the following page
    pub next_cursor: Cursor,
    /// Whether another page follows this one
    pub has_more: bool,
}
