//! Export query and page-fetch filter types

use chrono::{DateTime, Duration, Utc};

use crate::error::{ExportError, ExportResult};

/// Default number of events requested per page
pub const DEFAULT_PER_PAGE: usize = 100;

/// Default page-size ceiling
pub const MAX_PER_PAGE: usize = 100;

/// Largest accepted timezone offset, in minutes either side of UTC
pub const MAX_TZ_OFFSET_MINUTES: i64 = 24 * 60;

/// Page size policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_per_page: usize,
    pub max_per_page: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

impl PageLimits {
    /// Effective ceiling; never below the default page size
    pub fn ceiling(&self) -> usize {
        self.max_per_page.max(self.default_per_page)
    }

    /// Check a requested page size against the ceiling
    pub fn validate(&self, per_page: usize) -> ExportResult<usize> {
        let ceiling = self.ceiling();
        if per_page > ceiling {
            return Err(ExportError::InvalidParameter(format!(
                "Invalid per_page value. Cannot exceed {}.",
                ceiling
            )));
        }
        if per_page == 0 {
            return Err(ExportError::InvalidParameter(
                "Invalid per_page value. Must be at least 1.".to_string(),
            ));
        }
        Ok(per_page)
    }
}

/// Absolute UTC time range, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> ExportResult<Self> {
        if start > end {
            return Err(ExportError::InvalidParameter(
                "start must not be after end".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, datetime: &DateTime<Utc>) -> bool {
        *datetime >= self.start && *datetime <= self.end
    }
}

/// Sort order handed to the page source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    TimestampAscending,
}

/// Filter passed to every page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub project_ids: Vec<u64>,
    pub environment: Option<String>,
    pub time_range: Option<TimeRange>,
    /// Case-insensitive substring the event message must contain
    pub message_contains: Option<String>,
}

/// One export request, validated at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    project_id: u64,
    environment: Option<String>,
    time_range: Option<TimeRange>,
    tz_offset: Option<Duration>,
    message_contains: Option<String>,
    per_page: usize,
}

impl EventQuery {
    /// Query for every event of a project, default page size
    pub fn new(project_id: u64) -> Self {
        Self {
            project_id,
            environment: None,
            time_range: None,
            tz_offset: None,
            message_contains: None,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_time_range(mut self, range: TimeRange) -> Self {
        self.time_range = Some(range);
        self
    }

    pub fn with_message_contains(mut self, text: impl Into<String>) -> Self {
        self.message_contains = Some(text.into());
        self
    }

    /// Set the timezone offset in minutes
    ///
    /// Only valid for absolute-range queries, and at most
    /// [`MAX_TZ_OFFSET_MINUTES`] either way.
    pub fn with_tz_offset_minutes(mut self, minutes: i64) -> ExportResult<Self> {
        if self.time_range.is_none() {
            return Err(ExportError::InvalidParameter(
                "tzoffset requires start and end".to_string(),
            ));
        }
        let offset = Duration::try_minutes(minutes)
            .filter(|_| minutes.abs() <= MAX_TZ_OFFSET_MINUTES)
            .ok_or_else(|| {
                ExportError::InvalidParameter(format!(
                    "Invalid tzoffset value. Must be within {} minutes of UTC.",
                    MAX_TZ_OFFSET_MINUTES
                ))
            })?;
        self.tz_offset = Some(offset);
        Ok(self)
    }

    /// Set the page size, checked against `limits`
    pub fn with_per_page(mut self, per_page: usize, limits: &PageLimits) -> ExportResult<Self> {
        self.per_page = limits.validate(per_page)?;
        Ok(self)
    }

    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn tz_offset(&self) -> Option<Duration> {
        self.tz_offset
    }

    pub fn time_range(&self) -> Option<&TimeRange> {
        self.time_range.as_ref()
    }

    /// Exports are always requested oldest first
    pub fn order_by(&self) -> OrderBy {
        OrderBy::TimestampAscending
    }

    /// Build the filter for the page source
    pub fn filter(&self) -> EventFilter {
        EventFilter {
            project_ids: vec![self.project_id],
            environment: self.environment.clone(),
            time_range: self.time_range,
            message_contains: self.message_contains.clone(),
        }
    }
}
