//! Records extracted from a collect page
//!
//! An [`ItemRecord`] is one watched movie; a [`PageResult`] is everything a
//! single page yielded, including the link to the following page.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Title used when the source carries none
pub const MISSING_TITLE: &str = "N/A";

static RATING_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rating([1-5])-t").expect("rating pattern is valid"));

/// Star rating given by the profile owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rating {
    /// 1 to 5 stars
    Stars(u8),
    /// The item was marked as watched without a rating
    NotAvailable,
}

impl Rating {
    /// Reads the rating out of a class attribute such as `rating4-t`
    ///
    /// Anything without a `rating{1-5}-t` token is `NotAvailable`.
    pub fn from_class(class: &str) -> Self {
        RATING_CLASS
            .captures(class)
            .and_then(|caps| caps.get(1))
            .and_then(|digit| digit.as_str().parse::<u8>().ok())
            .map_or(Rating::NotAvailable, Rating::Stars)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Stars(n) => write!(f, "{}/5", n),
            Rating::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rating::Stars(n) => serializer.serialize_u8(*n),
            Rating::NotAvailable => serializer.serialize_none(),
        }
    }
}

/// One watched entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    /// Primary title, without the alternate-language part
    pub title: String,

    /// Owner's rating
    pub rating: Rating,

    /// Short comment, empty when there is none
    pub comment: String,

    /// Date text as shown by the source
    pub date: String,
}

impl ItemRecord {
    /// Builds a record from raw anchor text, normalising the title
    pub fn new(
        raw_title: &str,
        rating: Rating,
        comment: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            title: primary_title(raw_title),
            rating,
            comment: comment.into(),
            date: date.into(),
        }
    }
}

/// Keeps the text before the first `/`, trimmed
///
/// Douban renders "中文名 / Original Title"; only the first part is kept.
/// An empty result falls back to [`MISSING_TITLE`].
pub fn primary_title(raw: &str) -> String {
    let first = raw.split('/').next().unwrap_or_default().trim();
    if first.is_empty() {
        MISSING_TITLE.to_string()
    } else {
        first.to_string()
    }
}

/// Everything one page yielded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    /// Records in page order
    pub items: Vec<ItemRecord>,

    /// Absolute URL of the following page
    pub next: Option<Url>,
}

impl PageResult {
    /// A page with nothing on it and nowhere to go
    pub fn empty() -> Self {
        Self::default()
    }
}
