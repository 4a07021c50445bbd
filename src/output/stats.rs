//! Statistics over a scraped watched list
//!
//! Printed after a scrape so the user can sanity-check what is about to be
//! sent for roasting.

use crate::item::{ItemRecord, Rating};
use std::collections::BTreeMap;

/// Scrape statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeStatistics {
    /// Total number of items scraped
    pub total_items: usize,

    /// Items carrying a star rating
    pub rated_items: usize,

    /// Items with a non-empty comment
    pub commented_items: usize,

    /// Count of items per star value
    pub by_stars: BTreeMap<u8, usize>,

    /// Mean star value over rated items
    pub average_rating: Option<f64>,
}

/// Computes statistics for a list of items
pub fn compute_statistics(items: &[ItemRecord]) -> ScrapeStatistics {
    let mut by_stars = BTreeMap::new();
    let mut star_sum = 0u32;

    for item in items {
        if let Rating::Stars(n) = item.rating {
            *by_stars.entry(n).or_insert(0) += 1;
            star_sum += u32::from(n);
        }
    }

    let rated_items: usize = by_stars.values().sum();
    let average_rating = if rated_items > 0 {
        Some(star_sum as f64 / rated_items as f64)
    } else {
        None
    };

    ScrapeStatistics {
        total_items: items.len(),
        rated_items,
        commented_items: items.iter().filter(|i| !i.comment.is_empty()).count(),
        by_stars,
        average_rating,
    }
}

/// Formats statistics for the terminal
pub fn format_statistics(stats: &ScrapeStatistics) -> String {
    let mut out = String::new();
    out.push_str("=== Scrape Statistics ===\n");
    out.push_str(&format!("  Items: {}\n", stats.total_items));
    out.push_str(&format!(
        "  Rated: {} | Commented: {}\n",
        stats.rated_items, stats.commented_items
    ));

    match stats.average_rating {
        Some(avg) => out.push_str(&format!("  Average rating: {:.2}/5\n", avg)),
        None => out.push_str("  Average rating: N/A\n"),
    }

    // Highest stars first
    for (stars, count) in stats.by_stars.iter().rev() {
        let percentage = (*count as f64 / stats.rated_items as f64) * 100.0;
        out.push_str(&format!(
            "  {} {:>3} ({:.1}%)\n",
            "★".repeat(usize::from(*stars)),
            count,
            percentage
        ));
    }

    out
}

/// Prints statistics to stderr
pub fn print_statistics(stats: &ScrapeStatistics) {
    eprint!("{}", format_statistics(stats));
}
