//! Pagination types and traits
//!
//! Defines the page shape, the page-source capability, the fetch observer,
//! and the policy applied when a next link carries no cursor.

use crate::error::Result;
use crate::types::ResourceItem;
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

/// Query parameter that carries the cursor inside a next link
pub const DEFAULT_CURSOR_PARAM: &str = "page[cursor]";

/// One response from a listing endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Items in API order
    pub items: Vec<ResourceItem>,
    /// Link to the following page, possibly percent-encoded
    pub next: Option<String>,
}

impl Page {
    /// Create a page
    pub fn new(items: Vec<ResourceItem>, next: Option<String>) -> Self {
        Self { items, next }
    }

    /// Create a final page with no next link
    pub fn last(items: Vec<ResourceItem>) -> Self {
        Self { items, next: None }
    }

    /// Whether the page links to another page
    pub fn has_next(&self) -> bool {
        self.next.as_deref().is_some_and(|link| !link.is_empty())
    }
}

/// A capability that returns one page per call
///
/// `None` requests the first page; `Some(cursor)` requests the page the
/// cursor points at.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch a single page
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page>;
}

/// Everything collected by a completed fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    /// All items, in the order pages were fetched
    pub items: Vec<ResourceItem>,
    /// Number of pages fetched
    pub pages: usize,
}

impl FetchOutcome {
    /// Number of items collected
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items were collected
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What to do when a next link has no cursor parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncationPolicy {
    /// Treat it as the end of data and succeed
    #[default]
    Stop,
    /// Fail with `Error::PaginationTruncated`
    Error,
}

/// Progress reported by the fetcher while it walks the pages
#[derive(Debug, Clone, Copy)]
pub enum FetchEvent<'a> {
    /// A page was fetched and appended
    PageFetched {
        kind: &'a str,
        page: usize,
        items: usize,
    },
    /// About to request the page behind this cursor
    FollowingCursor { kind: &'a str, cursor: &'a str },
    /// A next link was present but had no usable cursor
    LinkWithoutCursor { kind: &'a str, link: &'a str },
    /// A page request failed; the fetch is abandoned
    Failed {
        kind: &'a str,
        page: usize,
        error: &'a crate::error::Error,
    },
    /// All pages were fetched
    Finished {
        kind: &'a str,
        pages: usize,
        items: usize,
    },
}

/// Receives fetch progress events
pub trait FetchObserver: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &FetchEvent<'_>);
}

/// Observer that writes events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn on_event(&self, event: &FetchEvent<'_>) {
        match *event {
            FetchEvent::PageFetched { kind, page, items } => {
                info!(kind, page, items, "Page {page}: Got {items} {kind}");
            }
            FetchEvent::FollowingCursor { kind, cursor } => {
                let preview: String = cursor.chars().take(20).collect();
                debug!(kind, "Fetching next page with cursor: {preview}...");
            }
            FetchEvent::LinkWithoutCursor { kind, link } => {
                warn!(kind, link, "Next link has no cursor, stopping pagination");
            }
            FetchEvent::Failed { kind, page, error } => {
                error!(kind, page, "Error getting {kind}: {error}");
            }
            FetchEvent::Finished { kind, pages, items } => {
                debug!(kind, pages, items, "Pagination complete");
            }
        }
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FetchObserver for NoopObserver {
    fn on_event(&self, _event: &FetchEvent<'_>) {}
}
