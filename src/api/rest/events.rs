//! Event download endpoint

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::error::{ExportError, ExportResult};
use crate::export::export_lines;
use crate::types::{EventQuery, PageLimits, TimeRange};
use crate::utils::parse_query_timestamp;

/// Download file name announced to the client
pub const DOWNLOAD_FILENAME: &str = "events.txt";

/// Query parameters for the download
///
/// Everything arrives as text so malformed numbers are reported as
/// parameter errors rather than extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct DownloadParams {
    /// Only events from this environment
    pub environment: Option<String>,
    /// Range start, e.g. `2023-01-01T00:00:00.000Z`
    pub start: Option<String>,
    /// Range end, same format as `start`
    pub end: Option<String>,
    /// Minutes added to every rendered timestamp; needs `start`/`end`
    pub tzoffset: Option<String>,
    /// Events per page fetch
    pub per_page: Option<String>,
    /// Only events whose message contains this text (case-insensitive)
    pub query: Option<String>,
}

impl DownloadParams {
    /// Validate the parameters into a query for `project_id`
    pub fn into_query(self, project_id: u64, limits: &PageLimits) -> ExportResult<EventQuery> {
        let mut query = EventQuery::new(project_id);

        if let Some(environment) = self.environment {
            query = query.with_environment(environment);
        }

        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                let range = TimeRange::new(
                    parse_query_timestamp("start", &start)?,
                    parse_query_timestamp("end", &end)?,
                )?;
                query = query.with_time_range(range);
            }
            (None, None) => {}
            _ => {
                return Err(ExportError::InvalidParameter(
                    "start and end must be given together".to_string(),
                ))
            }
        }

        if let Some(text) = self.query.filter(|q| !q.is_empty()) {
            query = query.with_message_contains(text);
        }

        if let Some(raw) = self.tzoffset {
            let minutes: i64 = raw.trim().parse().map_err(|_| {
                ExportError::InvalidParameter(format!("Invalid tzoffset parameter '{}'.", raw))
            })?;
            query = query.with_tz_offset_minutes(minutes)?;
        }

        let per_page = match self.per_page {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                ExportError::InvalidParameter("Invalid per_page parameter.".to_string())
            })?,
            None => limits.default_per_page,
        };
        query.with_per_page(per_page, limits)
    }
}

/// GET /api/projects/:project_id/simple-events/ - Stream events as text
///
/// Parameter errors are answered with 400 before the store is touched.
/// Once streaming has started, a failure ends the body early; the client
/// sees a truncated file.
pub async fn download_events(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<u64>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let query = match params.into_query(project_id, &state.limits) {
        Ok(query) => query,
        Err(e) => {
            warn!(project_id, error = %e, "rejected download request");
            return e.into_response();
        }
    };

    info!(
        project_id,
        per_page = query.per_page(),
        ranged = query.time_range().is_some(),
        "starting event download"
    );

    let lines = export_lines(state.pages.clone(), state.details.clone(), query);

    (
        [
            (header::CONTENT_TYPE, "text/plain".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME),
            ),
        ],
        Body::from_stream(lines),
    )
        .into_response()
}
