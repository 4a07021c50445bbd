//! Pagination controller - drives the fetcher across a profile's collect pages
//!
//! Pages are fetched strictly one after another, since each page's URL comes
//! from the previous page's paginator. The loop state lives in a
//! [`ScrapeSession`]; this module only owns the fetching and the pauses.

use crate::config::SourceConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::item::ItemRecord;
use crate::state::ScrapeSession;
use crate::{FetchError, FetchErrorKind};
use std::time::Duration;
use url::Url;

/// Walks a profile's collect listing page by page
#[derive(Debug, Clone)]
pub struct Paginator {
    fetcher: PageFetcher,
    base_url: Url,
    max_pages: u32,
    page_delay: Duration,
}

impl Paginator {
    /// Creates a paginator over `base_url` (scheme and host of the source)
    pub fn new(fetcher: PageFetcher, base_url: Url, max_pages: u32, page_delay: Duration) -> Self {
        Self {
            fetcher,
            base_url,
            max_pages,
            page_delay,
        }
    }

    /// Builds the fetcher and limits from the source configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Paginator)` - Ready to scrape
    /// * `Err(AppError)` - The base URL is malformed or the HTTP client could not be built
    pub fn from_config(config: &SourceConfig) -> crate::Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            crate::ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e))
        })?;
        let fetcher = PageFetcher::from_config(config)?;

        Ok(Self::new(
            fetcher,
            base_url,
            config.max_pages,
            Duration::from_millis(config.page_delay_ms),
        ))
    }

    /// URL of the first collect page, `{base}/people/{user_id}/collect`
    ///
    /// The id is percent-encoded as a single path segment.
    pub fn first_page_url(&self, user_id: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::transient(format!("cannot build a profile URL on {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["people", user_id, "collect"]);
        Ok(url)
    }

    /// Scrapes every page of a profile's collect listing
    ///
    /// Returns the items of all visited pages in source order. An empty list
    /// means the profile has no watched items or is not publicly visible.
    ///
    /// # Errors
    ///
    /// The first fetch failure aborts the scrape; items gathered before it
    /// are discarded.
    pub async fn scrape_all(&self, user_id: &str) -> Result<Vec<ItemRecord>, FetchError> {
        self.scrape_session(user_id)
            .await
            .map(ScrapeSession::into_items)
    }

    /// Runs a scrape and returns the finished session
    ///
    /// # Flow
    ///
    /// 1. Start at the first collect page, page counter 1
    /// 2. While there is a URL and the counter is within the cap:
    ///    a. Fetch and parse the page
    ///    b. Append its items
    ///    c. Stop if it had no items, otherwise follow its next-link
    ///    d. Pause before the next fetch, unless the loop is done
    ///
    /// A 404 on any page is returned as `NotFound` carrying `user_id`
    /// unchanged, not the encoded path segment.
    pub async fn scrape_session(&self, user_id: &str) -> Result<ScrapeSession, FetchError> {
        let first_url = self.first_page_url(user_id)?;
        let mut session = ScrapeSession::new(first_url, self.max_pages);

        tracing::info!("Starting scrape for user: {}", user_id);

        while let Some(url) = session.next_url().cloned() {
            tracing::debug!("Scraping page {}: {}", session.page(), url);

            // A missing profile is reported under the id the caller gave
            let page = self.fetcher.fetch_page(&url).await.map_err(|e| match e.kind {
                FetchErrorKind::NotFound => FetchError::not_found(user_id),
                _ => e,
            })?;
            let found = page.items.len();
            session.record_page(page);

            tracing::debug!(
                "Page {} yielded {} items ({} total)",
                session.pages_fetched(),
                found,
                session.items().len()
            );

            if session.has_next() {
                tokio::time::sleep(self.page_delay).await;
                session.record_delay();
            }
        }

        match session.stop_reason() {
            Some(reason) => tracing::info!(
                "Scraping finished ({}). Found {} items over {} pages.",
                reason,
                session.items().len(),
                session.pages_fetched()
            ),
            None => tracing::info!(
                "Scraping finished. Found {} items over {} pages.",
                session.items().len(),
                session.pages_fetched()
            ),
        }

        Ok(session)
    }
}
