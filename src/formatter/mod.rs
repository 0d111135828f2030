//! Event Formatter
//!
//! Turns one event into one text line:
//!
//! ```text
//! {Level} {timestamp} {identity?} --- {message}[\n{stacktrace}]\n
//! ```
//!
//! - `identity`: derived client/server tag, see [`identity_tag`]
//! - `stacktrace`: only for `error` events; a payload that cannot be decoded
//!   drops the stacktrace and keeps the line

mod identity;
mod stacktrace;

use chrono::Duration;
use tracing::warn;

use crate::error::ExportResult;
use crate::event_store::DetailSource;
use crate::types::{EventDetail, EventQuery, FormattedLine, RawEventRecord};
use crate::utils::format_line_timestamp;

pub use identity::identity_tag;
pub use stacktrace::derive_stacktrace;

/// Level whose events get a stacktrace
const ERROR_LEVEL: &str = "error";

/// Renders events for one export request
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFormatter {
    tz_offset: Option<Duration>,
}

impl EventFormatter {
    pub fn new(tz_offset: Option<Duration>) -> Self {
        Self { tz_offset }
    }

    /// Formatter using the query's timezone offset
    pub fn for_query(query: &EventQuery) -> Self {
        Self::new(query.tz_offset())
    }

    /// Fetch the detail for `record` and render it
    pub async fn render<D>(
        &self,
        details: &D,
        record: &RawEventRecord,
    ) -> ExportResult<FormattedLine>
    where
        D: DetailSource + ?Sized,
    {
        let detail = details
            .fetch_detail(record.project_id, &record.event_id)
            .await?;
        Ok(self.render_detail(&detail))
    }

    /// Render an already fetched event
    pub fn render_detail(&self, detail: &EventDetail) -> FormattedLine {
        let mut line = format!(
            "{} {}",
            normalize_level(&detail.level),
            format_line_timestamp(detail.datetime, self.tz_offset)
        );

        if let Some(identity) = identity_tag(detail) {
            line.push(' ');
            line.push_str(&identity);
        }

        line.push_str(" --- ");
        line.push_str(&detail.message);

        if let Some(stacktrace) = self.stacktrace(detail) {
            line.push('\n');
            line.push_str(&stacktrace);
        }

        line.push('\n');
        line
    }

    fn stacktrace(&self, detail: &EventDetail) -> Option<String> {
        if detail.level != ERROR_LEVEL {
            return None;
        }
        match derive_stacktrace(&detail.payload) {
            Ok(stacktrace) => stacktrace,
            Err(e) => {
                warn!(error = %e, message = %detail.message, "dropping stacktrace");
                None
            }
        }
    }
}

/// Capitalize a level name; `warning` shortens to `Warn`
pub fn normalize_level(level: &str) -> String {
    let mut chars = level.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    };

    if capitalized == "Warning" {
        "Warn".to_string()
    } else {
        capitalized
    }
}
