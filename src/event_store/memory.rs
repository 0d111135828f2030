//! In-memory event store with offset pagination

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use super::{DetailSource, PageSource};
use crate::error::SourceError;
use crate::types::{Cursor, EventDetail, EventFilter, OrderBy, Page, RawEventRecord};

/// An event as held by the store: listing handle plus full body
#[derive(Debug, Clone, Deserialize)]
pub struct StoredEvent {
    #[serde(flatten)]
    pub record: RawEventRecord,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(flatten)]
    pub detail: EventDetail,
}

impl StoredEvent {
    pub fn new(record: RawEventRecord, detail: EventDetail) -> Self {
        Self {
            record,
            environment: None,
            detail,
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Environment field, falling back to the `environment` tag
    fn environment(&self) -> Option<&str> {
        self.environment
            .as_deref()
            .or_else(|| self.detail.tag("environment"))
    }

    fn matches(&self, filter: &EventFilter) -> bool {
        if !filter.project_ids.contains(&self.record.project_id) {
            return false;
        }
        if let Some(ref environment) = filter.environment {
            if self.environment() != Some(environment.as_str()) {
                return false;
            }
        }
        if let Some(ref range) = filter.time_range {
            if !range.contains(&self.detail.datetime) {
                return false;
            }
        }
        if let Some(ref text) = filter.message_contains {
            let needle = text.to_lowercase();
            if !self.detail.message.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Event store backed by a vector, paginated by offset
///
/// The cursor is the decimal offset of the next page.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: Vec<StoredEvent>,
    /// (project_id, event_id) -> index into `events`
    index: HashMap<(u64, String), usize>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list of events
    pub fn from_events(events: impl IntoIterator<Item = StoredEvent>) -> Self {
        let mut store = Self::new();
        for event in events {
            store.insert(event);
        }
        store
    }

    /// Insert an event, replacing any event with the same id
    pub fn insert(&mut self, event: StoredEvent) {
        let key = (event.record.project_id, event.record.event_id.clone());
        match self.index.get(&key) {
            Some(&idx) => self.events[idx] = event,
            None => {
                self.index.insert(key, self.events.len());
                self.events.push(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn parse_offset(cursor: Option<&Cursor>) -> Result<usize, SourceError> {
        match cursor {
            None => Ok(0),
            Some(cursor) => cursor
                .as_str()
                .parse()
                .map_err(|_| SourceError::InvalidCursor(cursor.as_str().to_string())),
        }
    }
}

#[async_trait]
impl PageSource for MemoryEventStore {
    async fn fetch_page(
        &self,
        filter: &EventFilter,
        order_by: OrderBy,
        cursor: Option<&Cursor>,
        limit: usize,
    ) -> Result<Page, SourceError> {
        if filter.project_ids.is_empty() {
            return Err(SourceError::InvalidFilter(
                "at least one project id is required".to_string(),
            ));
        }
        let offset = Self::parse_offset(cursor)?;

        let mut matching: Vec<&StoredEvent> =
            self.events.iter().filter(|e| e.matches(filter)).collect();
        match order_by {
            // Stable, so events sharing a timestamp keep insertion order
            OrderBy::TimestampAscending => matching.sort_by_key(|e| e.detail.datetime),
        }

        let records: Vec<RawEventRecord> = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|e| e.record.clone())
            .collect();
        let next_offset = offset + records.len();

        Ok(Page {
            records,
            next_cursor: Cursor::new(next_offset.to_string()),
            has_more: next_offset < matching.len(),
        })
    }
}

#[async_trait]
impl DetailSource for MemoryEventStore {
    async fn fetch_detail(
        &self,
        project_id: u64,
        event_id: &str,
    ) -> Result<EventDetail, SourceError> {
        self.index
            .get(&(project_id, event_id.to_string()))
            .map(|&idx| self.events[idx].detail.clone())
            .ok_or_else(|| SourceError::NotFound {
                project_id,
                event_id: event_id.to_string(),
            })
    }
}
