//! Scrape session state for one pagination run
//!
//! The session is the whole of the pagination state machine: where to go
//! next, how many pages have been consumed, and what has been collected.

use crate::item::{ItemRecord, PageResult};
use std::fmt;
use url::Url;

/// Why a session stopped fetching pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The last page had no next-link
    LastPage,
    /// A page yielded no items
    EmptyPage,
    /// The page cap was reached with more pages available
    PageCap,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::LastPage => "last page reached",
            StopReason::EmptyPage => "page without items",
            StopReason::PageCap => "page cap reached",
        };
        write!(f, "{}", s)
    }
}

/// Pagination progress of a single scrape
#[derive(Debug, Clone)]
pub struct ScrapeSession {
    /// 1-based number of the page about to be fetched
    page: u32,
    max_pages: u32,
    current_url: Option<Url>,
    items: Vec<ItemRecord>,
    pages_fetched: u32,
    delays_taken: u32,
    stop_reason: Option<StopReason>,
}

impl ScrapeSession {
    /// Starts a session at `first_url` that will fetch at most `max_pages`
    pub fn new(first_url: Url, max_pages: u32) -> Self {
        Self {
            page: 1,
            max_pages,
            current_url: Some(first_url),
            items: Vec::new(),
            pages_fetched: 0,
            delays_taken: 0,
            stop_reason: None,
        }
    }

    /// Returns the URL to fetch next, or None once the session is finished
    pub fn next_url(&self) -> Option<&Url> {
        if self.page > self.max_pages {
            return None;
        }
        self.current_url.as_ref()
    }

    /// Returns true if another page will be fetched
    pub fn has_next(&self) -> bool {
        self.next_url().is_some()
    }

    /// Folds one fetched page into the session
    ///
    /// Items are appended in page order. A page without items ends the
    /// session even if it carried a next-link.
    pub fn record_page(&mut self, result: PageResult) {
        self.pages_fetched += 1;

        if result.items.is_empty() {
            self.current_url = None;
            self.stop_reason = Some(StopReason::EmptyPage);
            return;
        }

        self.items.extend(result.items);
        self.current_url = result.next;
        self.page += 1;

        if self.current_url.is_none() {
            self.stop_reason = Some(StopReason::LastPage);
        } else if self.page > self.max_pages {
            self.stop_reason = Some(StopReason::PageCap);
        }
    }

    /// Counts a politeness delay taken between two fetches
    pub fn record_delay(&mut self) {
        self.delays_taken += 1;
    }

    /// The page number about to be fetched
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    pub fn delays_taken(&self) -> u32 {
        self.delays_taken
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Items collected so far, in source order
    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    /// Consumes the session, returning the collected items
    pub fn into_items(self) -> Vec<ItemRecord> {
        self.items
    }
}
