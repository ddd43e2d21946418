//! Integration tests for the fetcher
//!
//! These tests use wiremock to check retry, back-off and header behaviour
//! against a local HTTP server.

use sight_crawler::config::Config;
use sight_crawler::crawler::Fetcher;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Configuration with every wait set to zero
fn fast_config(max_retries: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_retries = max_retries;
    config.crawler.timeout_secs = 5;
    config.crawler.min_delay_ms = 0;
    config.crawler.max_delay_ms = 0;
    config.http.backoff_base_ms = 0;
    config.http.blocked_min_wait_ms = 0;
    config.http.blocked_max_wait_ms = 0;
    config
}

#[tokio::test]
async fn test_fetch_sends_browser_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page.html"))
        .and(header_exists("accept-language"))
        .and(header("referer", "https://you.ctrip.com/"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>故宫</body></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&fast_config(1)).expect("Failed to build fetcher");
    let body = fetcher
        .fetch(&format!("{}/page.html", mock_server.uri()))
        .await;

    assert_eq!(body.as_deref(), Some("<html><body>故宫</body></html>"));
}

#[tokio::test]
async fn test_fetch_gives_up_after_max_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&fast_config(3)).expect("Failed to build fetcher");
    let body = fetcher
        .fetch(&format!("{}/broken.html", mock_server.uri()))
        .await;

    assert!(body.is_none());
}

#[tokio::test]
async fn test_fetch_recovers_after_transient_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky.html"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&fast_config(3)).expect("Failed to build fetcher");
    let body = fetcher
        .fetch(&format!("{}/flaky.html", mock_server.uri()))
        .await;

    assert_eq!(body.as_deref(), Some("ok"));
}

#[tokio::test]
async fn test_fetch_waits_out_rate_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited.html"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/limited.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&fast_config(2)).expect("Failed to build fetcher");
    let body = fetcher
        .fetch(&format!("{}/limited.html", mock_server.uri()))
        .await;

    assert_eq!(body.as_deref(), Some("ok"));
}

#[tokio::test]
async fn test_fetch_follows_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old.html"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new.html", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&fast_config(1)).expect("Failed to build fetcher");
    let body = fetcher
        .fetch(&format!("{}/old.html", mock_server.uri()))
        .await;

    assert_eq!(body.as_deref(), Some("moved"));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let fetcher = Fetcher::new(&fast_config(2)).expect("Failed to build fetcher");
    let body = fetcher.fetch(&format!("{}/gone.html", uri)).await;

    assert!(body.is_none());
}
