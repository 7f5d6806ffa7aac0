//! Paginated resource fetcher
//!
//! Walks a [`PageSource`] from the first page to the last by following the
//! cursor embedded in each page's next link. Requests are issued one at a
//! time; retry and rate limiting belong to the source.

use super::cursor::extract_cursor;
use super::types::{
    FetchEvent, FetchObserver, FetchOutcome, PageSource, TracingObserver, TruncationPolicy,
    DEFAULT_CURSOR_PARAM,
};
use crate::error::{Error, Result};
use std::sync::Arc;

/// Collects every item behind a cursor-paginated listing
#[derive(Clone)]
pub struct PaginatedFetcher {
    cursor_param: String,
    policy: TruncationPolicy,
    observer: Arc<dyn FetchObserver>,
}

impl PaginatedFetcher {
    /// Create a fetcher using `page[cursor]`, the default truncation policy
    /// and a tracing observer
    pub fn new() -> Self {
        Self {
            cursor_param: DEFAULT_CURSOR_PARAM.to_string(),
            policy: TruncationPolicy::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Use a different cursor query parameter
    #[must_use]
    pub fn cursor_param(mut self, param: impl Into<String>) -> Self {
        self.cursor_param = param.into();
        self
    }

    /// Set the truncation policy
    #[must_use]
    pub fn policy(mut self, policy: TruncationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the observer
    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Fetch all pages from `source`
    ///
    /// `kind` only labels events and errors. Any page failure discards the
    /// items collected so far and returns the error.
    ///
    /// An empty cursor value (`page[cursor]=`) is handled like a missing one:
    /// it ends pagination under the truncation policy instead of requesting
    /// the first page again.
    pub async fn fetch_all<S>(&self, source: &S, kind: &str) -> Result<FetchOutcome>
    where
        S: PageSource + ?Sized,
    {
        let mut outcome = FetchOutcome::default();
        let mut cursor: Option<String> = None;

        loop {
            let page = match source.fetch_page(cursor.as_deref()).await {
                Ok(page) => page,
                Err(error) => {
                    self.observer.on_event(&FetchEvent::Failed {
                        kind,
                        page: outcome.pages + 1,
                        error: &error,
                    });
                    return Err(error);
                }
            };

            outcome.pages += 1;
            self.observer.on_event(&FetchEvent::PageFetched {
                kind,
                page: outcome.pages,
                items: page.items.len(),
            });
            let has_next = page.has_next();
            let next = page.next;
            outcome.items.extend(page.items);

            let Some(link) = next.filter(|_| has_next) else {
                break;
            };

            match extract_cursor(&link, &self.cursor_param) {
                Some(next_cursor) if !next_cursor.is_empty() => {
                    self.observer.on_event(&FetchEvent::FollowingCursor {
                        kind,
                        cursor: &next_cursor,
                    });
                    cursor = Some(next_cursor);
                }
                _ => {
                    self.observer
                        .on_event(&FetchEvent::LinkWithoutCursor { kind, link: &link });
                    if self.policy == TruncationPolicy::Error {
                        return Err(Error::PaginationTruncated {
                            kind: kind.to_string(),
                            link,
                        });
                    }
                    break;
                }
            }
        }

        self.observer.on_event(&FetchEvent::Finished {
            kind,
            pages: outcome.pages,
            items: outcome.items.len(),
        });
        Ok(outcome)
    }
}

impl Default for PaginatedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PaginatedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedFetcher")
            .field("cursor_param", &self.cursor_param)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
