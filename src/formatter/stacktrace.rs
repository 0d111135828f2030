//! Stacktrace text assembly from diagnostic payloads

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::StacktraceError;
use crate::types::DiagnosticPayload;

/// Prefix marking a summary as the cause of the one above it
const CAUSED_BY_PREFIX: &str = " ---> ";

/// Separator between the frame blocks of chained exceptions
const INNER_TRACE_END: &str = "   --- End of inner exception stack trace ---";

/// Shown in place of a null exception value
const NULL_VALUE: &str = "None";

#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(default)]
    module: Option<String>,
    #[serde(default)]
    function: Option<String>,
    #[serde(default)]
    abs_path: Option<String>,
    #[serde(default)]
    lineno: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct StackFrames {
    frames: Vec<Frame>,
}

#[derive(Debug, Deserialize)]
struct Exception {
    #[serde(rename = "type")]
    exception_type: String,
    /// Required key; `null` is allowed
    #[serde(deserialize_with = "nullable")]
    value: Option<String>,
    #[serde(default)]
    stacktrace: Option<StackFrames>,
}

/// Frames stay undecoded until the current thread is picked
#[derive(Debug, Deserialize)]
struct Thread {
    #[serde(default)]
    current: Option<bool>,
    #[serde(default)]
    stacktrace: Option<Value>,
}

fn nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

/// Build the stacktrace text for a payload
///
/// `Ok(None)` means the payload has nothing to show.
pub fn derive_stacktrace(payload: &DiagnosticPayload) -> Result<Option<String>, StacktraceError> {
    match payload {
        DiagnosticPayload::None => Ok(None),
        DiagnosticPayload::ExceptionChain(values) => {
            let exceptions: Vec<Exception> = Vec::<Exception>::deserialize(values)?;
            Ok(Some(format_exception_chain(&exceptions)))
        }
        DiagnosticPayload::ThreadSnapshot(values) => {
            let threads: Vec<Thread> = Vec::<Thread>::deserialize(values)?;
            format_current_thread(&threads)
        }
    }
}

/// Exceptions arrive innermost first; text is printed outermost first
fn format_exception_chain(exceptions: &[Exception]) -> String {
    let summaries: Vec<String> = exceptions
        .iter()
        .rev()
        .enumerate()
        .map(|(i, e)| {
            let prefix = if i == 0 { "" } else { CAUSED_BY_PREFIX };
            let value = e.value.as_deref().unwrap_or(NULL_VALUE);
            format!("{}{}: {}", prefix, e.exception_type, value)
        })
        .collect();

    let mut text = summaries.join("\n");
    for (i, exception) in exceptions.iter().rev().enumerate() {
        if i > 0 {
            text.push('\n');
            text.push_str(INNER_TRACE_END);
        }
        if let Some(ref stacktrace) = exception.stacktrace {
            text.push('\n');
            text.push_str(&format_frames(&stacktrace.frames));
        }
    }
    text
}

fn format_current_thread(threads: &[Thread]) -> Result<Option<String>, StacktraceError> {
    let stacktrace = match threads
        .iter()
        .find(|t| t.current.unwrap_or(false))
        .and_then(|t| t.stacktrace.as_ref())
    {
        Some(stacktrace) => StackFrames::deserialize(stacktrace)?,
        None => return Ok(None),
    };
    Ok(Some(format_frames(&stacktrace.frames)))
}

/// Frames are stored oldest call first and displayed newest call first
fn format_frames(frames: &[Frame]) -> String {
    frames
        .iter()
        .rev()
        .map(format_frame)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_frame(frame: &Frame) -> String {
    let mut line = String::new();
    if let (Some(module), Some(function)) = (&frame.module, &frame.function) {
        line.push_str(&format!("   at {}.{}", module, function));
    }
    if let (Some(abs_path), Some(lineno)) = (&frame.abs_path, frame.lineno) {
        line.push_str(&format!(" in {}:line {}", abs_path, lineno));
    }
    line
}
