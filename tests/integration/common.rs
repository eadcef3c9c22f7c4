//! Shared helpers for integration tests

use serde_json::json;
use shiori_harvest::config::{parse_config, Config};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Account every test harvests
pub const ACCOUNT: &str = "alice";

/// Path the collection API serves the account's pages from
pub fn account_path() -> String {
    format!("/api/accounts/{}", ACCOUNT)
}

/// Endpoint of the mock collection API
pub fn endpoint(server: &MockServer) -> String {
    format!("{}/api/accounts/", server.uri())
}

/// Creates a minimal configuration pointing at the mock server
pub fn create_test_config(server: &MockServer, result_path: &str) -> Config {
    let mut config = parse_config(&format!(
        r#"
[account]
id = "{}"

[source]
timeout-secs = 5

[output]
result-path = "result.json"
"#,
        ACCOUNT
    ))
    .expect("Failed to parse test config");

    config.source.endpoint = Some(endpoint(server));
    config.output.result_path = result_path.to_string();
    config
}

/// Renders one JSON page whose bookmarks point at `link_base`
pub fn page_body(
    number: u32,
    total: u32,
    total_elements: u64,
    next: Option<&str>,
    link_base: &str,
    ids: &[&str],
) -> String {
    let items: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "title": format!("Bookmark {}", id),
                "url": format!("{}/links/{}", link_base, id),
                "tags": ["rust"],
            })
        })
        .collect();

    let mut meta = json!({
        "number": number,
        "total": total,
        "totalElements": total_elements,
    });
    if let Some(next) = next {
        meta["next"] = json!(next);
    }

    json!({ "pageMeta": meta, "items": items }).to_string()
}

/// Mounts one page of the account's collection
pub async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(account_path()))
        .and(query_param("page", page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/json"),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts a three page collection with five bookmarks: a, b / c, d / e
pub async fn mount_three_pages(server: &MockServer) {
    let base = server.uri();
    mount_page(server, "1", page_body(1, 3, 5, Some("2"), &base, &["a", "b"])).await;
    mount_page(server, "2", page_body(2, 3, 5, Some("3"), &base, &["c", "d"])).await;
    mount_page(server, "3", page_body(3, 3, 5, None, &base, &["e"])).await;
}

/// Mounts a bookmarked link answering with `status`
pub async fn mount_link(server: &MockServer, id: &str, status: u16) {
    Mock::given(path(format!("/links/{}", id)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
