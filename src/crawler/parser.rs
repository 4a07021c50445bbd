//! HTML parser for Douban collect pages
//!
//! This module turns the markup of one collect page into:
//! - the watched items (one per `div.item` card)
//! - the link to the following page, if the paginator shows one

use crate::item::{ItemRecord, PageResult, Rating};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Card holding one watched item
const ITEM_SELECTOR: &str = "div.item";
const TITLE_SELECTOR: &str = "li.title a";
const RATING_SELECTOR: &str = r#"span[class^="rating"]"#;
const COMMENT_SELECTOR: &str = "span.comment";
const DATE_SELECTOR: &str = "span.date";
const NEXT_SELECTOR: &str = "div.paginator span.next a";

/// Compiled selectors for a collect page
struct CollectSelectors {
    item: Selector,
    title: Selector,
    rating: Selector,
    comment: Selector,
    date: Selector,
    next: Selector,
}

impl CollectSelectors {
    fn new() -> Result<Self, String> {
        Ok(Self {
            item: compile(ITEM_SELECTOR)?,
            title: compile(TITLE_SELECTOR)?,
            rating: compile(RATING_SELECTOR)?,
            comment: compile(COMMENT_SELECTOR)?,
            date: compile(DATE_SELECTOR)?,
            next: compile(NEXT_SELECTOR)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, String> {
    Selector::parse(selector).map_err(|e| format!("invalid selector '{}': {:?}", selector, e))
}

/// Parses a collect page into items and the next-page link
///
/// # Extraction Rules
///
/// | Field | Source | Missing |
/// |-------|--------|---------|
/// | title | `li.title a`, text before the first `/` | `"N/A"` |
/// | rating | first `span[class^=rating]`, `rating{1-5}-t` | `NotAvailable` |
/// | comment | `span.comment` | `""` |
/// | date | `span.date` | `""` |
///
/// A page with no `div.item` cards is returned empty and without a
/// next-link, whatever else it contains.
///
/// # Arguments
///
/// * `html` - The page markup
/// * `base_url` - The URL the page was fetched from, for resolving the next-link
///
/// # Example
///
/// ```
/// use douban_roast::crawler::parse_collect_page;
/// use douban_roast::Rating;
/// use url::Url;
///
/// let html = r#"<div class="item">
///     <li class="title"><a href="/subject/1/">霸王别姬 / Farewell My Concubine</a></li>
///     <span class="rating5-t"></span><span class="date">2024-03-01</span>
/// </div>"#;
/// let base_url = Url::parse("https://movie.douban.com/people/ahbei/collect").unwrap();
/// let page = parse_collect_page(html, &base_url).unwrap();
/// assert_eq!(page.items[0].title, "霸王别姬");
/// assert_eq!(page.items[0].rating, Rating::Stars(5));
/// assert!(page.next.is_none());
/// ```
pub fn parse_collect_page(html: &str, base_url: &Url) -> Result<PageResult, String> {
    let selectors = CollectSelectors::new()?;
    let document = Html::parse_document(html);

    let items: Vec<ItemRecord> = document
        .select(&selectors.item)
        .map(|card| extract_item(&card, &selectors))
        .collect();

    if items.is_empty() {
        return Ok(PageResult::empty());
    }

    let next = extract_next_link(&document, &selectors, base_url);

    Ok(PageResult { items, next })
}

/// Extracts one record from an item card
fn extract_item(card: &ElementRef<'_>, selectors: &CollectSelectors) -> ItemRecord {
    let raw_title = first_text(card, &selectors.title);

    let rating = card
        .select(&selectors.rating)
        .next()
        .and_then(|span| span.value().attr("class"))
        .map_or(Rating::NotAvailable, Rating::from_class);

    ItemRecord::new(
        &raw_title,
        rating,
        first_text(card, &selectors.comment),
        first_text(card, &selectors.date),
    )
}

/// Trimmed text of the first match, or an empty string
fn first_text(card: &ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Finds and resolves the paginator's "next" link
fn extract_next_link(
    document: &Html,
    selectors: &CollectSelectors,
    base_url: &Url,
) -> Option<Url> {
    document
        .select(&selectors.next)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| resolve_link(href, base_url))
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be ignored:
/// - empty or fragment-only hrefs
/// - javascript: links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
