//! Output module for presenting scrape results
//!
//! This module handles:
//! - Rendering the scraped list as prompt-style bullets or JSON
//! - Summary statistics over the list

pub mod stats;

pub use stats::{compute_statistics, format_statistics, print_statistics, ScrapeStatistics};

use crate::item::ItemRecord;
use crate::roast::format_item_list;

/// How the scraped list is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One bullet per item, as sent to the model
    #[default]
    List,
    /// Pretty-printed JSON array of records
    Json,
}

/// Renders items in the requested format
///
/// # Returns
///
/// * `Ok(String)` - The rendered list
/// * `Err(serde_json::Error)` - JSON serialization failed
pub fn render_items(
    items: &[ItemRecord],
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::List => Ok(format_item_list(items)),
        OutputFormat::Json => serde_json::to_string_pretty(items),
    }
}
