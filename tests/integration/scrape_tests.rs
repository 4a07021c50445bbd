//! Integration tests for the scraper
//!
//! These tests use wiremock to serve collect pages and exercise the
//! fetcher and paginator end-to-end over HTTP.

use douban_roast::config::SourceConfig;
use douban_roast::crawler::{scrape, PageFetcher};
use douban_roast::state::StopReason;
use douban_roast::{AppError, FetchErrorKind, Paginator, Rating};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER: &str = "ahbei";
const FIRST_PAGE: &str = "/people/ahbei/collect";
const COOKIE: &str = "bid=abc; ck=def";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) TestBrowser/1.0";

/// Creates a source configuration pointing at the mock server
fn create_test_config(base_url: &str) -> SourceConfig {
    SourceConfig {
        base_url: base_url.to_string(),
        user_agent: USER_AGENT.to_string(),
        cookie: COOKIE.to_string(),
        timeout_secs: 20,
        max_pages: 5,
        page_delay_ms: 10, // Very short for testing
    }
}

fn paginator(config: &SourceConfig) -> Paginator {
    Paginator::from_config(config).expect("Failed to build paginator")
}

fn item_card(title: &str, stars: Option<u8>) -> String {
    let rating = stars
        .map(|n| format!(r#"<span class="rating{}-t"></span>"#, n))
        .unwrap_or_default();
    format!(
        r#"<div class="item">
            <div class="info"><ul>
                <li class="title"><a href="/subject/1/"><em>{} / Alt Title</em></a></li>
                <li>{}<span class="date">2024-05-01</span></li>
                <li><span class="comment">comment on {}</span></li>
            </ul></div>
        </div>"#,
        title, rating, title
    )
}

/// A collect page with `count` items titled "P{page} M{i}"
fn collect_page(page: usize, count: usize, next_href: Option<&str>) -> String {
    let cards: String = (1..=count)
        .map(|i| item_card(&format!("P{} M{}", page, i), Some((i % 5 + 1) as u8)))
        .collect();
    let paginator = next_href
        .map(|href| {
            format!(
                r#"<div class="paginator"><span class="next"><a href="{}">后页&gt;</a></span></div>"#,
                href
            )
        })
        .unwrap_or_else(|| r#"<div class="paginator"><span class="next">后页&gt;</span></div>"#.to_string());
    format!(
        r#"<html><head><title>看过的影视</title></head><body><div class="grid-view">{}</div>{}</body></html>"#,
        cards, paginator
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_three_pages_in_source_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(html(collect_page(1, 10, Some("/pages/2"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/2"))
        .respond_with(html(collect_page(2, 10, Some("/pages/3"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/3"))
        .respond_with(html(collect_page(3, 10, None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let session = paginator(&config)
        .scrape_session(USER)
        .await
        .expect("Scrape failed");

    assert_eq!(session.pages_fetched(), 3);
    assert_eq!(session.delays_taken(), 2);
    assert_eq!(session.stop_reason(), Some(StopReason::LastPage));

    let items = session.into_items();
    assert_eq!(items.len(), 30);

    let expected: Vec<String> = (1..=3)
        .flat_map(|p| (1..=10).map(move |i| format!("P{} M{}", p, i)))
        .collect();
    let titles: Vec<String> = items.iter().map(|i| i.title.clone()).collect();
    assert_eq!(titles, expected);

    assert_eq!(items[0].rating, Rating::Stars(2));
    assert_eq!(items[0].comment, "comment on P1 M1");
    assert_eq!(items[0].date, "2024-05-01");
}

#[tokio::test]
async fn test_page_cap_limits_fetches() {
    let mock_server = MockServer::start().await;

    // Every page links back to itself, forever
    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(html(collect_page(1, 3, Some(FIRST_PAGE))))
        .expect(5)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let session = paginator(&config)
        .scrape_session(USER)
        .await
        .expect("Scrape failed");

    assert_eq!(session.pages_fetched(), 5);
    assert_eq!(session.delays_taken(), 4);
    assert_eq!(session.stop_reason(), Some(StopReason::PageCap));
    assert_eq!(session.items().len(), 15);
}

#[tokio::test]
async fn test_configured_page_cap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(html(collect_page(1, 2, Some(FIRST_PAGE))))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.max_pages = 2;

    let items = paginator(&config).scrape_all(USER).await.unwrap();
    assert_eq!(items.len(), 4);
}

#[tokio::test]
async fn test_empty_page_stops_before_next_link() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(html(collect_page(1, 4, Some("/pages/2"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/2"))
        .respond_with(html(collect_page(2, 0, Some("/pages/3"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/3"))
        .respond_with(html(collect_page(3, 10, None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let session = paginator(&config).scrape_session(USER).await.unwrap();

    assert_eq!(session.stop_reason(), Some(StopReason::EmptyPage));
    assert_eq!(session.pages_fetched(), 2);
    assert_eq!(session.delays_taken(), 1);
    assert_eq!(session.items().len(), 4);
}

#[tokio::test]
async fn test_private_profile_yields_no_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(html(
            r#"<html><body><p>这个用户的主页是私密的</p>
            <div class="paginator"><span class="next"><a href="/pages/2">后页</a></span></div>
            </body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let items = paginator(&config).scrape_all(USER).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_first_page_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let err = paginator(&config).scrape_all(USER).await.unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::NotFound);
    assert_eq!(err.detail, USER);
}

#[tokio::test]
async fn test_not_found_reports_id_as_given() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let err = paginator(&config).scrape_all("张三 x").await.unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::NotFound);
    assert_eq!(err.detail, "张三 x");
    assert_eq!(err.to_string(), "User profile not found (404): 张三 x");
}

#[tokio::test]
async fn test_not_found_on_later_page_reports_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(html(collect_page(1, 2, Some("/pages/2"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let err = paginator(&config).scrape_all(USER).await.unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::NotFound);
    assert_eq!(err.detail, USER);
}

#[tokio::test]
async fn test_forbidden_profile() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let err = paginator(&config).scrape_all(USER).await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Forbidden);
}

#[tokio::test]
async fn test_error_on_later_page_discards_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(html(collect_page(1, 5, Some("/pages/2"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/2"))
        .respond_with(html(collect_page(2, 5, None)).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.timeout_secs = 1;

    let result = paginator(&config).scrape_all(USER).await;
    let err = result.expect_err("Timeout on page 2 must fail the scrape");
    assert_eq!(err.kind, FetchErrorKind::Transient);
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let err = paginator(&config).scrape_all(USER).await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Transient);
    assert!(err.detail.contains("500"));
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    // Nothing listens on port 1
    let config = create_test_config("http://127.0.0.1:1");
    let err = paginator(&config).scrape_all(USER).await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Transient);
}

#[tokio::test]
async fn test_requests_carry_cookie_and_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .and(header("cookie", COOKIE))
        .and(header("user-agent", USER_AGENT))
        .respond_with(html(collect_page(1, 1, Some("/pages/2"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages/2"))
        .and(header("cookie", COOKIE))
        .respond_with(html(collect_page(2, 1, None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let items = paginator(&config).scrape_all(USER).await.unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_fetch_page_returns_absolute_next_link() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(html(collect_page(1, 2, Some("?start=15&sort=time"))))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let fetcher = PageFetcher::from_config(&config).unwrap();
    let url = url::Url::parse(&format!("{}{}", mock_server.uri(), FIRST_PAGE)).unwrap();

    let page = fetcher.fetch_page(&url).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(
        page.next.unwrap().as_str(),
        format!("{}{}?start=15&sort=time", mock_server.uri(), FIRST_PAGE)
    );
}

#[tokio::test]
async fn test_scrape_entry_point() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(html(collect_page(1, 3, None)))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let items = scrape(&config, USER).await.unwrap();
    assert_eq!(items.len(), 3);

    Mock::given(method("GET"))
        .and(path("/people/nobody/collect"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = scrape(&config, "nobody").await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(ref e) if e.kind == FetchErrorKind::NotFound));
}
