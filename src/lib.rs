//! Douban-Roast: scrape a Douban watched list and have it roasted
//!
//! This crate walks the paginated "collect" listing of a Douban profile,
//! extracts one record per watched movie and hands the whole list to an
//! OpenAI-compatible text-generation endpoint for a humorous critique.

pub mod config;
pub mod crawler;
pub mod item;
pub mod output;
pub mod roast;
pub mod state;

use thiserror::Error;

/// Main error type for Douban-Roast operations
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Roast error: {0}")]
    Roast(#[from] roast::RoastError),

    #[error("Invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("No items found for user {0}")]
    NoItems(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classification of a failed page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// The profile does not exist (HTTP 404)
    NotFound,
    /// The profile is private or requires login (HTTP 403)
    Forbidden,
    /// Network, timeout, or any other HTTP failure
    Transient,
}

/// A page fetch failure, raised by the fetcher and propagated unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.kind, .detail))]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub detail: String,
}

impl FetchError {
    pub fn not_found(user_id: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::NotFound,
            detail: user_id.into(),
        }
    }

    pub fn forbidden() -> Self {
        Self {
            kind: FetchErrorKind::Forbidden,
            detail: String::new(),
        }
    }

    pub fn transient(detail: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transient,
            detail: detail.into(),
        }
    }
}

fn describe(kind: &FetchErrorKind, detail: &str) -> String {
    match kind {
        FetchErrorKind::NotFound => format!("User profile not found (404): {}", detail),
        FetchErrorKind::Forbidden => {
            "Access denied (403). The profile might be private or requires login.".to_string()
        }
        FetchErrorKind::Transient => format!("Failed to scrape Douban page: {}", detail),
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Environment variable {0} is not set")]
    MissingSecret(String),
}

/// Result type alias for Douban-Roast operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Checks the user id handed in by the caller and returns it trimmed
///
/// The id ends up as a path segment of the first page URL, so it must be
/// non-empty after trimming.
pub fn validate_user_id(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidUserId(raw.to_string()));
    }
    Ok(trimmed)
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{PageFetcher, Paginator};
pub use item::{ItemRecord, PageResult, Rating};
pub use state::ScrapeSession;
