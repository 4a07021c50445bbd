//! State module for tracking scrape progress
//!
//! # Components
//!
//! - `ScrapeSession`: per-scrape pagination state (current URL, page counter, collected items)
//! - `StopReason`: why a session stopped following pages

mod session;

// Re-export main types
pub use session::{ScrapeSession, StopReason};
