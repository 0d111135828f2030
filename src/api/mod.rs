//! API module for HTTP endpoints
//!
//! This module serves the plain-text event download over HTTP.

pub mod http;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
