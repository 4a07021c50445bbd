//! Crawler module for collect page fetching and pagination
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with error classification
//! - HTML parsing and item extraction
//! - The pagination loop with its page cap and politeness delay

mod fetcher;
mod paginator;
mod parser;

pub use fetcher::{build_http_client, PageFetcher};
pub use paginator::Paginator;
pub use parser::parse_collect_page;

use crate::config::SourceConfig;
use crate::item::ItemRecord;

/// Scrapes a user's whole collect listing with a fresh paginator
///
/// This is the main entry point for a one-off scrape. It will:
/// 1. Build the HTTP client from the source configuration
/// 2. Fetch and parse up to `max-pages` collect pages
/// 3. Return every item found, in source order
///
/// # Arguments
///
/// * `config` - The source configuration
/// * `user_id` - A validated, non-empty Douban user id
///
/// # Example
///
/// ```no_run
/// use douban_roast::config::load_config;
/// use douban_roast::crawler::scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("roast.toml"))?;
/// let items = scrape(&config.source, "ahbei").await?;
/// println!("{} movies", items.len());
/// # Ok(())
/// # }
/// ```
pub async fn scrape(config: &SourceConfig, user_id: &str) -> crate::Result<Vec<ItemRecord>> {
    let paginator = Paginator::from_config(config)?;
    Ok(paginator.scrape_all(user_id).await?)
}
