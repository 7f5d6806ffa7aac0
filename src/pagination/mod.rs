//! Pagination module
//!
//! Cursor pagination driven by next links.
//!
//! # Overview
//!
//! A [`PageSource`] returns one page per call. The [`PaginatedFetcher`]
//! starts without a cursor, pulls the cursor out of each next link and keeps
//! going until a page has no next link. Progress is reported to an injected
//! [`FetchObserver`].

mod cursor;
mod fetcher;
mod types;

pub use cursor::{decode_link, extract_cursor};
pub use fetcher::PaginatedFetcher;
pub use types::{
    FetchEvent, FetchObserver, FetchOutcome, NoopObserver, Page, PageSource, TracingObserver,
    TruncationPolicy, DEFAULT_CURSOR_PARAM,
};
