//! End-to-end harvest tests against a mock collection API

use crate::common::*;
use shiori_harvest::config::PageFormat;
use shiori_harvest::output::{generate_markdown_summary, load_result, write_result};
use shiori_harvest::parse::JsonPageParser;
use shiori_harvest::source::HttpPageSource;
use shiori_harvest::{harvest, Harvester, ShioriError};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ids(result: &shiori_harvest::CombinedResult) -> Vec<&str> {
    result.items.iter().map(|item| item.id.as_str()).collect()
}

#[tokio::test]
async fn test_three_page_collection_over_http() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let source =
        HttpPageSource::new(&endpoint(&server), ACCOUNT, Duration::from_secs(5)).unwrap();
    let harvester =
        Harvester::new(Arc::new(source), Arc::new(JsonPageParser)).with_title("Alice");

    let result = harvester.fetch().await.unwrap();

    assert_eq!(result.title, "Alice");
    assert_eq!(result.pages, 3);
    assert_eq!(result.total_elements, 5);
    assert_eq!(ids(&result), vec!["a", "b", "c", "d", "e"]);
    assert!(result.items.iter().all(|item| item.validity.is_none()));
    assert_eq!(result.items[0].tags, vec!["rust".to_string()]);
}

#[tokio::test]
async fn test_server_error_fails_harvest() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(&server, "1", page_body(1, 3, 5, Some("2"), &base, &["a", "b"])).await;

    Mock::given(method("GET"))
        .and(path(account_path()))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let result_path = dir.path().join("result.json");
    let config = create_test_config(&server, &result_path.display().to_string());

    let err = harvest(&config).await.unwrap_err();

    assert!(matches!(err, ShioriError::PageStatus { ref page, status: 500 } if page == "2"));
    assert!(!result_path.exists());
}

#[tokio::test]
async fn test_archive_then_replay_round_trip() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let dir = TempDir::new().unwrap();
    let archive_dir = dir.path().join("pages");

    let mut config = create_test_config(&server, "result.json");
    config.source.archive_dir = Some(archive_dir.clone());
    let fetched = harvest(&config).await.unwrap();

    for page in ["1", "2", "3"] {
        assert!(archive_dir.join(format!("page-{}.json", page)).exists());
    }

    // Replay with the mock server gone
    drop(server);
    config.source.endpoint = None;
    config.source.archive_dir = None;
    config.source.replay_dir = Some(archive_dir);
    let replayed = harvest(&config).await.unwrap();

    assert_eq!(replayed, fetched);
}

#[tokio::test]
async fn test_html_collection_over_http() {
    let server = MockServer::start().await;

    let first = r#"
        <html><head><link rel="next" href="/api/accounts/alice?page=2"></head>
        <body>
            <div class="pagination" data-page="1" data-total-pages="2" data-total-elements="2"></div>
            <li class="bookmark" data-id="1"><a href="https://rust-lang.org">Rust</a></li>
        </body></html>
    "#;
    let second = r#"
        <div class="pagination" data-page="2" data-total-pages="2" data-total-elements="2"></div>
        <li class="bookmark" data-id="2"><a href="https://serde.rs">Serde</a></li>
    "#;
    mount_page(&server, "1", first.to_string()).await;
    mount_page(&server, "2", second.to_string()).await;

    let mut config = create_test_config(&server, "result.json");
    config.source.format = PageFormat::Html;

    let result = harvest(&config).await.unwrap();

    assert_eq!(ids(&result), vec!["1", "2"]);
    assert_eq!(result.items[1].url, "https://serde.rs");
}

#[tokio::test]
async fn test_harvest_with_verification_writes_outputs() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;
    mount_link(&server, "a", 200).await;
    mount_link(&server, "b", 404).await;
    mount_link(&server, "c", 200).await;
    mount_link(&server, "d", 503).await;
    mount_link(&server, "e", 200).await;

    let dir = TempDir::new().unwrap();
    let result_path = dir.path().join("out").join("result.json");
    let summary_path = dir.path().join("summary.md");

    let mut config = create_test_config(&server, &result_path.display().to_string());
    config.account.title = Some("Alice's reading list".to_string());
    config.verification.check_urls = true;
    config.verification.timeout_secs = 5;

    let result = harvest(&config).await.unwrap();

    assert_eq!(result.title, "Alice's reading list");
    assert_eq!(ids(&result), vec!["a", "b", "c", "d", "e"]);

    let labels: Vec<&str> = result
        .items
        .iter()
        .map(|item| item.validity_of("url").unwrap().as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["reachable", "unreachable", "reachable", "unreachable", "reachable"]
    );

    write_result(&result, &result_path).unwrap();
    generate_markdown_summary(&result, Some("abc123"), &summary_path).unwrap();

    assert_eq!(load_result(&result_path).unwrap(), result);
    let summary = std::fs::read_to_string(&summary_path).unwrap();
    assert!(summary.contains("| url | unreachable | 2 |"));
    assert!(summary.contains("Dead link"));
}
