//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests to the scraped source, including:
//! - Building the shared HTTP client with browser-like headers
//! - GET requests for collect pages
//! - Error classification into [`FetchErrorKind`](crate::FetchErrorKind)

use crate::config::SourceConfig;
use crate::crawler::parser::parse_collect_page;
use crate::item::PageResult;
use crate::FetchError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// Every request made with the client carries the configured user agent and
/// session cookie, and is bounded by the configured timeout.
///
/// # Example
///
/// ```no_run
/// use douban_roast::config::SourceConfig;
/// use douban_roast::crawler::build_http_client;
///
/// let config = SourceConfig {
///     base_url: "https://movie.douban.com".to_string(),
///     user_agent: "Mozilla/5.0".to_string(),
///     cookie: "bid=abc".to_string(),
///     timeout_secs: 20,
///     max_pages: 5,
///     page_delay_ms: 500,
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &SourceConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    if let Ok(cookie) = HeaderValue::from_str(config.cookie.trim()) {
        headers.insert(COOKIE, cookie);
    } else {
        tracing::warn!("Configured cookie is not a valid header value, sending none");
    }
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
    );

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches and parses collect pages with a shared client
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with its own client from the source configuration
    pub fn from_config(config: &SourceConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Fetches one collect page and extracts its items and next-link
    ///
    /// # Error Classification
    ///
    /// | Condition | Kind |
    /// |-----------|------|
    /// | HTTP 404 | NotFound (detail: profile id) |
    /// | HTTP 403 | Forbidden |
    /// | Other non-2xx status | Transient |
    /// | Timeout / connection error | Transient |
    /// | Body read failure | Transient |
    ///
    /// Nothing is retried; the first failure is returned.
    pub async fn fetch_page(&self, url: &Url) -> Result<PageResult, FetchError> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            let error = classify_send_error(&e);
            tracing::warn!("Error fetching page {}: {}", url, error.detail);
            error
        })?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::warn!("Profile page {} returned 404", url);
            return Err(FetchError::not_found(profile_id(url)));
        }

        if status == StatusCode::FORBIDDEN {
            tracing::warn!("Profile page {} returned 403", url);
            return Err(FetchError::forbidden());
        }

        if !status.is_success() {
            tracing::warn!("Page {} returned HTTP {}", url, status.as_u16());
            return Err(FetchError::transient(format!(
                "Request failed with status code {}",
                status.as_u16()
            )));
        }

        let body = response.text().await.map_err(|e| {
            tracing::warn!("Failed to read body of {}: {}", url, e);
            classify_send_error(&e)
        })?;

        parse_collect_page(&body, url).map_err(|e| {
            tracing::warn!("Failed to parse {}: {}", url, e);
            FetchError::transient(format!("HTML parse error for {}: {}", url, e))
        })
    }
}

/// Maps a reqwest failure onto a transient fetch error
fn classify_send_error(e: &reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::transient(format!("Request timeout: {}", e))
    } else if e.is_connect() {
        FetchError::transient(format!("Connection failed: {}", e))
    } else {
        FetchError::transient(e.to_string())
    }
}

/// Pulls the profile id out of a `/people/{id}/...` path
///
/// Falls back to the whole URL when the path has another shape.
fn profile_id(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| {
            segments
                .by_ref()
                .find(|segment| *segment == "people")
                .and_then(|_| segments.next())
        })
        .filter(|id| !id.is_empty())
        .map(|id| id.to_string())
        .unwrap_or_else(|| url.to_string())
}
