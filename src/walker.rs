//! PageCursor Walker
//!
//! Walks a [`PageSource`] page by page, handing each page's cursor to the
//! next fetch. Pages are fetched lazily: the next request goes out only
//! after the consumer has pulled every record of the current page, so at
//! most one page of records is held at a time.

use std::sync::Arc;

use async_stream::try_stream;
use futures::{pin_mut, Stream, StreamExt};
use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::event_store::PageSource;
use crate::types::{Cursor, EventFilter, EventQuery, OrderBy, RawEventRecord};

/// Lazy cursor walk over one query's result set
pub struct PageCursorWalker<P: ?Sized> {
    source: Arc<P>,
    filter: EventFilter,
    order_by: OrderBy,
    limit: usize,
}

impl<P> PageCursorWalker<P>
where
    P: PageSource + ?Sized + 'static,
{
    pub fn new(source: Arc<P>, query: &EventQuery) -> Self {
        Self {
            source,
            filter: query.filter(),
            order_by: query.order_by(),
            limit: query.per_page(),
        }
    }

    /// Stream of pages, ending after the first page that reports no more
    ///
    /// Records are passed through in source order; nothing is sorted or
    /// deduplicated. A failed fetch ends the stream with that error.
    pub fn into_pages(self) -> impl Stream<Item = ExportResult<Vec<RawEventRecord>>> + Send {
        try_stream! {
            let mut cursor: Option<Cursor> = None;
            let mut page_number = 0usize;

            loop {
                let page = self
                    .source
                    .fetch_page(&self.filter, self.order_by, cursor.as_ref(), self.limit)
                    .await
                    .map_err(ExportError::from)?;
                page_number += 1;
                debug!(
                    page = page_number,
                    records = page.records.len(),
                    has_more = page.has_more,
                    "fetched page"
                );

                let has_more = page.has_more;
                let next_cursor = page.next_cursor;
                yield page.records;

                if !has_more {
                    break;
                }
                cursor = Some(next_cursor);
            }
        }
    }

    /// Stream of individual records across all pages
    pub fn into_records(self) -> impl Stream<Item = ExportResult<RawEventRecord>> + Send {
        try_stream! {
            let pages = self.into_pages();
            pin_mut!(pages);

            while let Some(page) = pages.next().await {
                for record in page? {
                    yield record;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::types::Page;
    use async_trait::async_trait;
    use futures::TryStreamExt;
    use std::sync::Mutex;

    /// Serves fixed pages and records every cursor it was asked for
    struct ScriptedPages {
        pages: Vec<Vec<&'static str>>,
        requests: Mutex<Vec<(Option<String>, usize)>>,
        fail_at: Option<usize>,
    }

    impl ScriptedPages {
        fn new(pages: Vec<Vec<&'static str>>) -> Self {
            Self {
                pages,
                requests: Mutex::new(Vec::new()),
                fail_at: None,
            }
        }

        fn requests(&self) -> Vec<(Option<String>, usize)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for ScriptedPages {
        async fn fetch_page(
            &self,
            _filter: &EventFilter,
            order_by: OrderBy,
            cursor: Option<&Cursor>,
            limit: usize,
        ) -> Result<Page, SourceError> {
            assert_eq!(order_by, OrderBy::TimestampAscending);
            self.requests
                .lock()
                .unwrap()
                .push((cursor.map(|c| c.as_str().to_string()), limit));

            let index: usize = cursor.map_or(0, |c| c.as_str().parse().unwrap());
            if self.fail_at == Some(index) {
                return Err(SourceError::Storage("backend unavailable".to_string()));
            }
            let records = self
                .pages
                .get(index)
                .map(|ids| ids.iter().map(|id| RawEventRecord::new(*id, 1)).collect())
                .unwrap_or_default();
            Ok(Page {
                records,
                next_cursor: Cursor::new((index + 1).to_string()),
                has_more: index + 1 < self.pages.len(),
            })
        }
    }

    fn ids(records: &[RawEventRecord]) -> Vec<&str> {
        records.iter().map(|r| r.event_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_walks_all_pages_in_order() {
        let source = Arc::new(ScriptedPages::new(vec![vec!["a", "b"], vec!["c"], vec!["d", "e"]]));
        let records: Vec<RawEventRecord> = PageCursorWalker::new(source.clone(), &EventQuery::new(1))
            .into_records()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(ids(&records), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(
            source.requests(),
            vec![
                (None, 100),
                (Some("1".to_string()), 100),
                (Some("2".to_string()), 100)
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_first_page_ends_walk() {
        let source = Arc::new(ScriptedPages::new(vec![vec![]]));
        let records: Vec<RawEventRecord> = PageCursorWalker::new(source.clone(), &EventQuery::new(1))
            .into_records()
            .try_collect()
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_no_read_ahead() {
        let source = Arc::new(ScriptedPages::new(vec![vec!["a", "b"], vec!["c"]]));
        let records = PageCursorWalker::new(source.clone(), &EventQuery::new(1)).into_records();
        pin_mut!(records);

        records.next().await.unwrap().unwrap();
        records.next().await.unwrap().unwrap();
        assert_eq!(source.requests().len(), 1);

        records.next().await.unwrap().unwrap();
        assert_eq!(source.requests().len(), 2);
        assert!(records.next().await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_ends_stream_after_earlier_records() {
        let mut scripted = ScriptedPages::new(vec![vec!["a"], vec!["b"]]);
        scripted.fail_at = Some(1);
        let records = PageCursorWalker::new(Arc::new(scripted), &EventQuery::new(1)).into_records();
        pin_mut!(records);

        assert_eq!(records.next().await.unwrap().unwrap().event_id, "a");
        assert!(matches!(
            records.next().await,
            Some(Err(ExportError::UpstreamFetchFailure(_)))
        ));
        assert!(records.next().await.is_none());
    }

    #[tokio::test]
    async fn test_page_size_is_forwarded() {
        let source = Arc::new(ScriptedPages::new(vec![vec!["a"]]));
        let query = EventQuery::new(1)
            .with_per_page(25, &crate::types::PageLimits::default())
            .unwrap();
        let _: Vec<Vec<RawEventRecord>> = PageCursorWalker::new(source.clone(), &query)
            .into_pages()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(source.requests(), vec![(None, 25)]);
    }
}
