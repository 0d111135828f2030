//! Utility functions and helpers
//!
//! This module contains timestamp parsing and formatting helpers.

pub mod time;

pub use time::{format_line_timestamp, parse_query_timestamp, QUERY_TIMESTAMP_FORMAT};
