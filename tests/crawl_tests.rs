//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, including the retry pass.

use sumi_sift::config::Config;
use sumi_sift::crawler::Coordinator;
use sumi_sift::output::{report_path, write_report_file, Field, Report};
use sumi_sift::state::UrlState;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> Config {
    let mut config = Config::default();
    config.crawler.workers = 4;
    config.crawler.retry_workers = 2;
    config.crawler.request_timeout = 5;
    config.crawler.connect_timeout = 2;
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn column(report: &Report, field: &Field) -> usize {
    report
        .columns
        .iter()
        .position(|c| c == field)
        .expect("column missing from report")
}

fn row_for<'a>(report: &'a Report, url: &str) -> Option<&'a Vec<String>> {
    let url_col = column(report, &Field::Url);
    report.rows.iter().find(|row| row[url_col] == url)
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        format!(
            r#"<html><head><title>Home</title>
            <meta name="description" content="The home page"></head><body>
            <h1>Welcome</h1>
            <a href="{base}/page1">Page 1</a>
            <a href="/Page2/">Page 2</a>
            <a href="/image.png">Image</a>
            <a href="http://other.invalid/page">Elsewhere</a>
            <a href="/blog?page=2">Next</a>
            <a href="/cart">Cart</a>
            </body></html>"#
        ),
        1,
    )
    .await;

    mount_page(
        &server,
        "/page1",
        r#"<html><head><title>Page 1</title></head><body>
            <h1>One</h1><h1>Two</h1><h2>Sub</h2>
            <a href="/">Home</a><a href="/page2">Page 2</a>
            </body></html>"#
            .to_string(),
        1,
    )
    .await;

    mount_page(
        &server,
        "/page2",
        r#"<html><head><title>Page 2</title></head><body><a href="/page1/">Back</a></body></html>"#
            .to_string(),
        1,
    )
    .await;

    // Filtered links must never be requested
    for route in ["/image.png", "/blog", "/cart"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html(String::new()))
            .expect(0)
            .mount(&server)
            .await;
    }

    let coordinator = Coordinator::new(test_config(), &base).expect("valid seed");
    let outcome = coordinator.run().await;
    let report = &outcome.report;

    assert_eq!(report.rows.len(), 3, "rows: {:?}", report.rows);
    assert_eq!(
        report.header(),
        vec![
            "Status code",
            "URL",
            "Title",
            "META Description",
            "H1 - 1",
            "H1 - 2",
            "H2 - 1"
        ]
    );

    let home = row_for(report, &base).expect("home row");
    assert_eq!(
        home,
        &vec![
            "200".to_string(),
            base.clone(),
            "Home".to_string(),
            "The home page".to_string(),
            "Welcome".to_string(),
            String::new(),
            String::new(),
        ]
    );

    let page1 = row_for(report, &format!("{}/page1", base)).expect("page1 row");
    assert_eq!(page1[column(report, &Field::heading(1, 2))], "Two");
    assert_eq!(page1[column(report, &Field::heading(2, 1))], "Sub");

    assert!(row_for(report, &format!("{}/page2", base)).is_some());

    // Domain containment
    let url_col = column(report, &Field::Url);
    assert!(report.rows.iter().all(|row| row[url_col].starts_with(&base)));

    // The pagination link was claimed but never fetched
    assert_eq!(outcome.stats.count(UrlState::Completed), 3);
    assert_eq!(outcome.stats.count(UrlState::Dropped), 1);
    assert_eq!(outcome.stats.retried, 0);
}

#[tokio::test]
async fn test_rate_limited_page_recovers_in_retry_pass() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home</title></head><body><a href="/slow">Slow</a></body></html>"#
            .to_string(),
        1,
    )
    .await;

    // First hit is throttled, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    mount_page(
        &server,
        "/slow",
        r#"<html><head><title>Slow</title></head><body><a href="/after">After</a></body></html>"#
            .to_string(),
        1,
    )
    .await;

    // Links of a page that succeeded in the retry pass are followed
    mount_page(
        &server,
        "/after",
        "<html><head><title>After</title></head></html>".to_string(),
        1,
    )
    .await;

    let coordinator = Coordinator::new(test_config(), &base).expect("valid seed");
    let outcome = coordinator.run().await;
    let report = &outcome.report;

    let slow = row_for(report, &format!("{}/slow", base)).expect("slow row after retry");
    assert_eq!(slow[column(report, &Field::StatusCode)], "200");
    assert_eq!(slow[column(report, &Field::Title)], "Slow");
    assert!(row_for(report, &format!("{}/after", base)).is_some());

    assert_eq!(report.rows.len(), 3);
    assert_eq!(outcome.stats.retried, 1);
    assert_eq!(outcome.stats.dropped_after_retry, 0);
    assert_eq!(outcome.stats.count(UrlState::RateLimited), 0);
}

#[tokio::test]
async fn test_persistently_rate_limited_page_is_dropped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home</title></head><body><a href="/busy">Busy</a></body></html>"#
            .to_string(),
        1,
    )
    .await;

    // One attempt per pass, never a third
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_raw("<html><a href=\"/hidden\">x</a></html>", "text/html"),
        )
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html(String::new()))
        .expect(0)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(test_config(), &base).expect("valid seed");
    let outcome = coordinator.run().await;

    assert_eq!(outcome.report.rows.len(), 1);
    assert!(row_for(&outcome.report, &format!("{}/busy", base)).is_none());
    assert_eq!(outcome.stats.retried, 1);
    assert_eq!(outcome.stats.dropped_after_retry, 1);
    assert_eq!(outcome.stats.count(UrlState::Dropped), 1);
}

#[tokio::test]
async fn test_non_html_and_error_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><body><a href="/data">Data</a><a href="/gone">Gone</a></body></html>"#
            .to_string(),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"link": "<a href='/never'>"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw("<html><head><title>Not Found</title></head></html>", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(test_config(), &base).expect("valid seed");
    let outcome = coordinator.run().await;
    let report = &outcome.report;

    assert!(row_for(report, &format!("{}/data", base)).is_none());

    let gone = row_for(report, &format!("{}/gone", base)).expect("404 pages are recorded");
    assert_eq!(gone[column(report, &Field::StatusCode)], "404");
    assert_eq!(gone[column(report, &Field::Title)], "Not Found");

    // Untitled home page keeps an empty title cell
    let home = row_for(report, &base).expect("home row");
    assert_eq!(home[column(report, &Field::Title)], "");
}

#[tokio::test]
async fn test_report_written_to_disk() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        "<html><head><title>Home, Sweet Home</title></head><body><h1>Hi</h1></body></html>"
            .to_string(),
        1,
    )
    .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = test_config();
    config.output.directory = dir.path().display().to_string();

    let coordinator = Coordinator::new(config, &base).expect("valid seed");
    let outcome = coordinator.run().await;

    let path = report_path(coordinator.seed(), &coordinator.config().output);
    write_report_file(&outcome.report, &path, b',').expect("write report");

    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("http___127.0.0.1_"));
    assert!(file_name.ends_with("_scraped_results.csv"));

    let text = std::fs::read_to_string(&path).expect("read report");
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Status code,URL,Title,META Description,H1 - 1"
    );
    assert_eq!(
        lines.next().unwrap(),
        format!("200,{},\"Home, Sweet Home\",,Hi", base)
    );
}
