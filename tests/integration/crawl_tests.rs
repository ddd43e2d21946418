//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing, detail and review pages and
//! exercise the crawl stages end-to-end: link discovery, record assembly,
//! cleaning, review crawling and persistence.

use sight_crawler::config::{Config, RegionEntry};
use sight_crawler::crawler::{debug_listing, Coordinator};
use sight_crawler::model::{PageOutcome, RejectReason};
use sight_crawler::output::{FileStore, OutputHandler};
use sight_crawler::pipeline::clean_records;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with one region listed on the mock server
fn create_test_config(base_url: &str, data_dir: &str) -> Config {
    let mut config = Config::default();
    config.crawler.max_pages = 2;
    config.crawler.max_retries = 1;
    config.crawler.timeout_secs = 5;
    config.crawler.min_delay_ms = 0;
    config.crawler.max_delay_ms = 0;
    config.crawler.max_reviews_per_sight = 1;
    config.http.backoff_base_ms = 0;
    config.http.blocked_min_wait_ms = 0;
    config.http.blocked_max_wait_ms = 0;
    config.output.data_dir = data_dir.to_string();
    config.regions = vec![RegionEntry {
        name: "北京".to_string(),
        listing_url: format!("{}/sight/beijing1/s0-p1.html", base_url),
    }];
    config
}

fn detail_page(name: &str, rating: &str, address: &str) -> String {
    format!(
        r#"<html><head><title>{name}</title></head><body>
        <h1 class="detailTitle">{name}</h1>
        <div class="score"><span class="textscore">{rating}</span></div>
        <div class="sight_detail_addr">地址：{address}</div>
        <div class="summary">这里是一段足够长的景点介绍文字，用于测试。</div>
        <span class="commentCount">共 321 条点评</span>
        </body></html>"#
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_collect_links_across_listing_pages() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/sight/beijing1/s0-p1.html",
        r#"<html><body>
            <a href="/sight/beijing1/229.html">故宫</a>
            <a href="/sight/beijing1/231.html">天坛</a>
            <a href="/sight/beijing1/s0-p2.html">下一页</a>
            <a href="/food/beijing1/1.html">美食</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_html(
        &mock_server,
        "/sight/beijing1/s0-p2.html",
        r#"<html><body>
            <a href="/sight/beijing1/231.html">天坛</a>
            <a href="https://gs.ctrip.com/html5/you/sight/beijing1/5174.html">颐和园</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), temp.path().to_str().unwrap());
    let mut coordinator = Coordinator::new(config, "test".to_string()).unwrap();

    let links = coordinator.collect_sight_links().await;

    assert_eq!(
        links,
        vec![
            "https://you.ctrip.com/sight/beijing1/229.html".to_string(),
            "https://you.ctrip.com/sight/beijing1/231.html".to_string(),
            "https://you.ctrip.com/sight/beijing1/5174.html".to_string(),
        ]
    );
    assert_eq!(coordinator.summary().links_discovered, 3);
}

#[tokio::test]
async fn test_missing_listing_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    // Only page 2 exists
    mount_html(
        &mock_server,
        "/sight/beijing1/s0-p2.html",
        r#"<a href="/sight/beijing1/229.html">故宫</a>"#.to_string(),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), temp.path().to_str().unwrap());
    let mut coordinator = Coordinator::new(config, "test".to_string()).unwrap();

    let links = coordinator.collect_sight_links().await;

    assert_eq!(links, vec!["https://you.ctrip.com/sight/beijing1/229.html".to_string()]);
}

#[tokio::test]
async fn test_fetch_sight_assembles_record() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/sight/beijing1/229.html",
        detail_page("故宫", "4.8", "北京市东城区景山前街4号"),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), temp.path().to_str().unwrap());
    let mut coordinator = Coordinator::new(config, "test".to_string()).unwrap();
    let url = format!("{}/sight/beijing1/229.html", mock_server.uri());

    let record = coordinator
        .fetch_sight(&url)
        .await
        .into_record()
        .expect("detail page should assemble");

    assert_eq!(record.name, "故宫");
    assert_eq!(record.rating, 4.8);
    assert_eq!(record.address, "北京市东城区景山前街4号");
    assert_eq!(record.review_count, 321);
    assert_eq!(record.city, "北京");
    assert_eq!(record.url, url);
    assert_eq!(coordinator.summary().records_assembled, 1);
}

#[tokio::test]
async fn test_fetch_failure_and_guide_pages_are_rejected() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/sight/beijing1/1.html",
        "<html><body><h1>北京旅游攻略大全</h1></body></html>".to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sight/beijing1/2.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), temp.path().to_str().unwrap());
    let mut coordinator = Coordinator::new(config, "test".to_string()).unwrap();

    let guide = coordinator
        .fetch_sight(&format!("{}/sight/beijing1/1.html", mock_server.uri()))
        .await;
    let missing = coordinator
        .fetch_sight(&format!("{}/sight/beijing1/2.html", mock_server.uri()))
        .await;

    assert_eq!(guide, PageOutcome::Rejected(RejectReason::UnknownName));
    assert_eq!(missing, PageOutcome::Rejected(RejectReason::FetchFailed));

    let summary = coordinator.summary();
    assert_eq!(summary.pages_attempted, 2);
    assert_eq!(summary.records_assembled, 0);
    assert_eq!(summary.rejections.get("fetch_failed"), Some(&1));
    assert_eq!(summary.rejections.get("unknown_name"), Some(&1));
}

#[tokio::test]
async fn test_crawl_clean_and_persist() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let base = mock_server.uri();

    mount_html(
        &mock_server,
        "/sight/beijing1/229.html",
        detail_page("故宫", "4.8", "北京市东城区景山前街4号"),
    )
    .await;
    mount_html(
        &mock_server,
        "/sight/beijing1/230.html",
        detail_page("故宫", "4.1", "北京市东城区东华门大街"),
    )
    .await;
    mount_html(
        &mock_server,
        "/sight/beijing1/231.html",
        detail_page("天坛", "4.7", "北京市东城区天坛东里甲1号"),
    )
    .await;

    let config = create_test_config(&base, temp.path().to_str().unwrap());
    let mut coordinator = Coordinator::new(config, "test".to_string()).unwrap();
    let links: Vec<String> = ["229", "230", "231"]
        .iter()
        .map(|id| format!("{}/sight/beijing1/{}.html", base, id))
        .collect();

    let records = coordinator.crawl_sights(&links, 10).await;
    assert_eq!(records.len(), 3);

    let cleaned = clean_records(records);
    let names: Vec<_> = cleaned.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["故宫", "天坛"]);
    assert_eq!(cleaned[0].rating, 4.8);

    let store = FileStore::new(temp.path());
    let saved = store.save_sights(&cleaned).unwrap();
    let json = saved.json.expect("JSON file written");
    assert!(saved.csv.is_some());

    let file_name = json.file_name().unwrap().to_string_lossy().into_owned();
    let reloaded = store.load_sights_json(&file_name).unwrap();
    assert_eq!(reloaded, cleaned);
    assert_eq!(store.recent_files().unwrap().len(), 2);
}

#[tokio::test]
async fn test_crawl_stops_at_max() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(detail_page("景山公园", "4.5", "北京市西城区景山西街44号")),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base, temp.path().to_str().unwrap());
    let mut coordinator = Coordinator::new(config, "test".to_string()).unwrap();
    let links: Vec<String> = (1..=5)
        .map(|id| format!("{}/sight/beijing1/{}.html", base, id))
        .collect();

    let records = coordinator.crawl_sights(&links, 2).await;

    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_crawl_reviews() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let base = mock_server.uri();

    mount_html(
        &mock_server,
        "/sight/beijing1/229.html",
        detail_page("故宫", "4.8", "北京市东城区景山前街4号"),
    )
    .await;
    mount_html(
        &mock_server,
        "/sight/beijing1/229/review.html",
        r#"<html><body>
            <div class="commentItem">
                <span class="user-name">小王</span>
                <span class="score">5</span>
                <p class="content">宫殿宏伟，讲解很专业，值得一去。</p>
                <span class="time">2024-04-01</span>
            </div>
        </body></html>"#
            .to_string(),
    )
    .await;

    let config = create_test_config(&base, temp.path().to_str().unwrap());
    let mut coordinator = Coordinator::new(config, "test".to_string()).unwrap();
    let url = format!("{}/sight/beijing1/229.html", base);
    let record = coordinator.fetch_sight(&url).await.into_record().unwrap();

    let reviews = coordinator.crawl_reviews(&[record]).await;

    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].sight_name, "故宫");
    assert_eq!(reviews[0].user_name, "小王");
    assert_eq!(reviews[0].rating, 5.0);
    assert_eq!(reviews[0].date, "2024-04-01");
    assert_eq!(coordinator.summary().reviews_collected, 1);

    let saved = FileStore::new(temp.path()).save_reviews(&reviews).unwrap();
    assert!(saved.json.is_some());
    assert!(saved.csv.is_some());
}

#[tokio::test]
async fn test_run_without_links_writes_summary_only() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");
    let summary_path = temp.path().join("summary.md");

    mount_html(
        &mock_server,
        "/sight/beijing1/s0-p1.html",
        "<html><body><p>暂无景点</p></body></html>".to_string(),
    )
    .await;
    mount_html(
        &mock_server,
        "/sight/beijing1/s0-p2.html",
        "<html><body><p>暂无景点</p></body></html>".to_string(),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri(), data_dir.to_str().unwrap());
    config.output.summary_path = Some(summary_path.to_string_lossy().into_owned());
    config.crawler.debug_mode = true;

    let mut coordinator = Coordinator::new(config, "hash123".to_string()).unwrap();
    let summary = coordinator.run().await.expect("run should complete");

    assert!(summary.debug_trial);
    assert_eq!(summary.links_discovered, 0);
    assert!(summary.files_written.is_empty());
    assert!(!data_dir.exists());

    let markdown = std::fs::read_to_string(&summary_path).unwrap();
    assert!(markdown.contains("hash123"));
    assert!(markdown.contains("debug trial"));
}

/// Mounts a small site: two attractions sharing a name, a third one, a
/// missing page and a review page for the first attraction
async fn mount_site(server: &MockServer) -> Vec<String> {
    mount_html(
        server,
        "/sight/beijing1/229.html",
        detail_page("故宫", "4.8", "北京市东城区景山前街4号"),
    )
    .await;
    mount_html(
        server,
        "/sight/beijing1/230.html",
        detail_page("故宫", "4.1", "北京市东城区东华门大街"),
    )
    .await;
    mount_html(
        server,
        "/sight/beijing1/231.html",
        detail_page("天坛", "4.7", "北京市东城区天坛东里甲1号"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sight/beijing1/232.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
    mount_html(
        server,
        "/sight/beijing1/229/review.html",
        r#"<div class="commentItem">
            <span class="user-name">小李</span>
            <span class="score">4</span>
            <p class="content">排队很久，但是非常震撼。</p>
            <span class="time">2024-04-02</span>
        </div>"#
            .to_string(),
    )
    .await;

    ["229", "230", "231", "232"]
        .iter()
        .map(|id| format!("{}/sight/beijing1/{}.html", server.uri(), id))
        .collect()
}

fn data_files(dir: &std::path::Path, prefix: &str) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .count()
}

#[tokio::test]
async fn test_full_run_without_reviews() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");
    let summary_path = temp.path().join("summary.md");
    let links = mount_site(&mock_server).await;

    let mut config = create_test_config(&mock_server.uri(), data_dir.to_str().unwrap());
    config.output.summary_path = Some(summary_path.to_string_lossy().into_owned());

    let mut coordinator = Coordinator::new(config, "full".to_string()).unwrap();
    let summary = coordinator.run_with_links(&links).await.unwrap();

    assert!(!summary.debug_trial);
    assert_eq!(summary.links_discovered, 4);
    assert_eq!(summary.pages_attempted, 4);
    assert_eq!(summary.records_assembled, 3);
    assert_eq!(summary.records_cleaned, 2);
    assert_eq!(summary.rejections.get("fetch_failed"), Some(&1));
    assert_eq!(summary.reviews_collected, 0);
    assert_eq!(summary.quality.total, 2);
    assert_eq!(summary.quality.with_address, 2);
    assert_eq!(summary.quality.total_reviews, 642);
    assert_eq!(summary.files_written.len(), 2);
    assert!(summary.save_failures.is_empty());
    assert!(summary.finished_at.is_some());

    assert_eq!(data_files(&data_dir, "sights_data_"), 2);
    assert_eq!(data_files(&data_dir, "reviews_data_"), 0);

    let markdown = std::fs::read_to_string(&summary_path).unwrap();
    assert!(markdown.contains("## Data Quality"));
    assert!(markdown.contains("## Files Written"));
    assert!(markdown.contains("sights_data_"));
    assert!(markdown.contains("| fetch_failed | 1 |"));
}

#[tokio::test]
async fn test_full_run_with_reviews() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");
    let links = mount_site(&mock_server).await;

    let mut config = create_test_config(&mock_server.uri(), data_dir.to_str().unwrap());
    config.crawler.crawl_reviews = true;

    let mut coordinator = Coordinator::new(config, "reviews".to_string()).unwrap();
    let summary = coordinator.run_with_links(&links).await.unwrap();

    assert_eq!(summary.records_cleaned, 2);
    assert_eq!(summary.reviews_collected, 1);
    assert_eq!(summary.files_written.len(), 4);
    assert_eq!(data_files(&data_dir, "reviews_data_"), 2);

    let store = FileStore::new(&data_dir);
    let json = summary
        .files_written
        .iter()
        .find(|path| {
            let name = path.file_name().unwrap().to_string_lossy();
            name.starts_with("sights_data_") && name.ends_with(".json")
        })
        .unwrap();
    let saved = store
        .load_sights_json(&json.file_name().unwrap().to_string_lossy())
        .unwrap();
    let names: Vec<_> = saved.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["故宫", "天坛"]);
}

#[tokio::test]
async fn test_debug_trial_resets_counters() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let links = mount_site(&mock_server).await;

    let mut config = create_test_config(&mock_server.uri(), temp.path().to_str().unwrap());
    config.crawler.debug_mode = true;

    let mut coordinator = Coordinator::new(config, "debug".to_string()).unwrap();
    let summary = coordinator.run_with_links(&links).await.unwrap();

    assert!(summary.debug_trial);
    assert_eq!(summary.pages_attempted, 4);
    assert_eq!(summary.records_assembled, 3);
    assert_eq!(summary.rejections.get("fetch_failed"), Some(&1));
    assert_eq!(summary.records_cleaned, 2);
    assert_eq!(summary.files_written.len(), 2);
}

#[tokio::test]
async fn test_save_failure_is_recorded_and_run_continues() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let links = mount_site(&mock_server).await;

    // A regular file where the data directory should be
    let blocked = temp.path().join("not-a-dir");
    std::fs::write(&blocked, "x").unwrap();
    let summary_path = temp.path().join("summary.md");

    let mut config = create_test_config(&mock_server.uri(), blocked.to_str().unwrap());
    config.crawler.crawl_reviews = true;
    config.output.summary_path = Some(summary_path.to_string_lossy().into_owned());

    let mut coordinator = Coordinator::new(config, "blocked".to_string()).unwrap();
    let summary = coordinator.run_with_links(&links).await.unwrap();

    assert!(summary.files_written.is_empty());
    assert_eq!(summary.reviews_collected, 1);
    assert_eq!(summary.save_failures.len(), 2);
    assert!(summary.save_failures[0].starts_with("sights: "));
    assert!(summary.save_failures[1].starts_with("reviews: "));

    let markdown = std::fs::read_to_string(&summary_path).unwrap();
    assert!(markdown.contains("## Save Failures"));
}

#[tokio::test]
async fn test_debug_listing_reports_link_verdicts() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/sight/beijing1/s0-p1.html",
        r#"<html><head><title>北京景点</title></head><body>
            <a href="/sight/beijing1/229.html">故宫</a>
            <a href="/sight/beijing1/s0-p2.html">下一页</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), temp.path().to_str().unwrap());
    let url = format!("{}/sight/beijing1/s0-p1.html", mock_server.uri());

    let inspection = debug_listing(&config, &url).await.unwrap().unwrap();

    assert_eq!(inspection.title.as_deref(), Some("北京景点"));
    assert_eq!(inspection.accepted.len(), 1);
    assert_eq!(inspection.rejected.len(), 1);
    assert_eq!(
        inspection.accepted[0].url,
        "https://you.ctrip.com/sight/beijing1/229.html"
    );
}
