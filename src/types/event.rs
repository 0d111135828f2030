//! Event types for the export pipeline
//!
//! A page fetch yields lightweight [`RawEventRecord`] handles; the full
//! [`EventDetail`] is fetched separately per record. The diagnostic payload
//! is kept as raw JSON inside a tagged [`DiagnosticPayload`] so that a
//! malformed payload only costs the stacktrace, never the whole line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Prefix the backend puts on its built-in tag keys
const RESERVED_TAG_PREFIX: &str = "sentry:";

/// Handle returned by a page fetch
///
/// Carries just enough to request the full event detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEventRecord {
    pub event_id: String,
    pub project_id: u64,
    #[serde(default)]
    pub platform: Option<String>,
}

impl RawEventRecord {
    pub fn new(event_id: impl Into<String>, project_id: u64) -> Self {
        Self {
            event_id: event_id.into(),
            project_id,
            platform: None,
        }
    }

    /// Set the platform tag
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }
}

/// A single (key, value) tag pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    /// Create a tag, dropping the backend's reserved key prefix
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let key = match key.strip_prefix(RESERVED_TAG_PREFIX) {
            Some(stripped) => stripped.to_string(),
            None => key,
        };
        Self {
            key,
            value: value.into(),
        }
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // The backend exports tags as two-element arrays
        let (key, value) = <(String, String)>::deserialize(deserializer)?;
        Ok(Tag::new(key, value))
    }
}

/// Diagnostic payload attached to an event
///
/// The inner JSON is the `values` array of the payload; it is decoded
/// lazily when a stacktrace is derived.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DiagnosticPayload {
    #[default]
    None,
    /// Exceptions ordered innermost cause first
    ExceptionChain(Value),
    /// Per-thread captures; only the current thread is used
    ThreadSnapshot(Value),
}

/// Full event detail as returned by a detail fetch
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetail {
    pub level: String,
    pub message: String,
    pub datetime: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub payload: DiagnosticPayload,
}

impl EventDetail {
    /// Create a detail with no tags and no diagnostic payload
    pub fn new(level: impl Into<String>, message: impl Into<String>, datetime: DateTime<Utc>) -> Self {
        Self {
            level: level.into(),
            message: message.into(),
            datetime,
            tags: Vec::new(),
            payload: DiagnosticPayload::None,
        }
    }

    /// Append a tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(Tag::new(key, value));
        self
    }

    /// Attach an exception chain (`values` array, innermost first)
    pub fn with_exceptions(mut self, values: Value) -> Self {
        self.payload = DiagnosticPayload::ExceptionChain(values);
        self
    }

    /// Attach a thread snapshot (`values` array)
    pub fn with_threads(mut self, values: Value) -> Self {
        self.payload = DiagnosticPayload::ThreadSnapshot(values);
        self
    }

    /// Look up a tag; a repeated key resolves to its last value
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .rev()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    /// Parse an event from its JSON export form
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Wire shape of an exported event body
#[derive(Deserialize)]
struct EventDetailWire {
    level: String,
    #[serde(default)]
    message: String,
    datetime: DateTime<Utc>,
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    exception: Option<Value>,
    #[serde(default)]
    threads: Option<Value>,
}

fn payload_values(interface: Value) -> Value {
    match interface {
        Value::Object(mut map) => map.remove("values").unwrap_or(Value::Null),
        other => other,
    }
}

impl<'de> Deserialize<'de> for EventDetail {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = EventDetailWire::deserialize(deserializer)?;

        // An exception interface wins over threads when both are present
        let payload = match (wire.exception, wire.threads) {
            (Some(exception), _) if !exception.is_null() => {
                DiagnosticPayload::ExceptionChain(payload_values(exception))
            }
            (_, Some(threads)) if !threads.is_null() => {
                DiagnosticPayload::ThreadSnapshot(payload_values(threads))
            }
            _ => DiagnosticPayload::None,
        };

        Ok(Self {
            level: wire.level,
            message: wire.message,
            datetime: wire.datetime,
            tags: wire.tags,
            payload,
        })
    }
}
