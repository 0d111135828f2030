//! Export pipeline
//!
//! Joins the walker and the formatter into one lazy stream of lines:
//! fetch page → fetch and render each record in order → next page. The
//! stream holds one page of records plus the line being rendered.

use std::sync::Arc;

use async_stream::stream;
use futures::{pin_mut, Stream, StreamExt};
use tracing::{info, warn};

use crate::error::ExportResult;
use crate::event_store::{DetailSource, PageSource};
use crate::formatter::EventFormatter;
use crate::types::{EventQuery, FormattedLine};
use crate::walker::PageCursorWalker;

/// Stream every event matching `query` as rendered lines
///
/// The first error (page fetch, detail fetch or vanished record) is yielded
/// and ends the stream; lines already yielded stand.
pub fn export_lines<P, D>(
    pages: Arc<P>,
    details: Arc<D>,
    query: EventQuery,
) -> impl Stream<Item = ExportResult<FormattedLine>> + Send
where
    P: PageSource + ?Sized + 'static,
    D: DetailSource + ?Sized + 'static,
{
    let formatter = EventFormatter::for_query(&query);
    let project_id = query.project_id();
    let records = PageCursorWalker::new(pages, &query).into_records();

    stream! {
        pin_mut!(records);
        let mut rendered = 0usize;

        while let Some(next) = records.next().await {
            let result = match next {
                Ok(record) => formatter.render(details.as_ref(), &record).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(line) => {
                    rendered += 1;
                    yield Ok(line);
                }
                Err(e) => {
                    warn!(project_id, rendered, error = %e, "export aborted");
                    yield Err(e);
                    return;
                }
            }
        }

        info!(project_id, rendered, "export finished");
    }
}
