//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, including the page cache and
//! document generation.

use chrono::{TimeZone, Utc};
use docs_to_skill::config::{
    load_config_with_hash, CategoryTable, CheckpointConfig, Selectors, SkillConfig, UrlPatterns,
};
use docs_to_skill::crawler::{preview, Coordinator};
use docs_to_skill::output::{generate, write_artifacts, OutputLayout};
use docs_to_skill::storage::CheckpointStore;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `{server}/docs`
fn create_test_config(server_uri: &str, max_pages: usize) -> SkillConfig {
    SkillConfig {
        name: "demo".to_string(),
        description: "Demo framework documentation".to_string(),
        base_url: format!("{}/docs", server_uri),
        start_url: None,
        max_pages,
        rate_limit: 0.0,
        url_patterns: UrlPatterns::default(),
        selectors: Selectors::default(),
        categories: CategoryTable::new(vec![
            ("guides".to_string(), vec!["guide".to_string()]),
            ("api".to_string(), vec!["api".to_string()]),
        ]),
        file_patterns: vec!["**/*.demo".to_string()],
        checkpoint: CheckpointConfig::default(),
        user_agent: "TestBot/1.0".to_string(),
    }
}

/// HTML page with a title and the given links
fn html_page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        r#"<html><head><title>{title}</title></head><body>
        <main><h1>{title}</h1><p>About {title}.</p><pre><code>demo {title}</code></pre>{anchors}</main>
        </body></html>"#,
        title = title,
        anchors = anchors
    )
}

async fn mount_page(server: &MockServer, route: &str, title: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page(title, links))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_page_crawl_exhausts_frontier() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/docs", "Docs", &["/docs/guide"]).await;
    mount_page(&mock_server, "/docs/guide", "Guide", &["/docs"]).await;

    let config = create_test_config(&base, 2);
    let state = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await;

    assert_eq!(state.page_count(), 2);
    assert!(state.frontier().is_empty());
    assert!(state.errors().is_empty());

    let guide = state
        .page(&format!("{}/docs/guide", base))
        .expect("Guide page missing");
    assert_eq!(guide.title, "Guide");
    assert_eq!(guide.code_blocks, vec!["demo Guide"]);
}

#[tokio::test]
async fn test_link_repeated_on_page_is_queued_once() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/docs", "Docs", &["/docs/guide", "/docs/guide"]).await;
    Mock::given(method("GET"))
        .and(path("/docs/guide"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Guide", &[]))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = Coordinator::new(create_test_config(&base, 2))
        .expect("Failed to create coordinator")
        .run()
        .await;

    assert_eq!(state.page_count(), 2);
    assert!(state.frontier().is_empty());
    assert!(state.errors().is_empty());
}

#[tokio::test]
async fn test_mixed_case_base_url_keeps_links_in_scope() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/docs", "Docs", &["/docs/guide"]).await;
    mount_page(&mock_server, "/docs/guide", "Guide", &[]).await;

    let mut config = create_test_config(&base, 5);
    config.base_url = format!("{}/docs", base.replace("127.0.0.1", "LOCALHOST"));

    let state = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await;

    assert_eq!(state.page_count(), 2);
    assert!(state.errors().is_empty());
}

#[tokio::test]
async fn test_breadth_first_order() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/docs", "Root", &["/docs/a", "/docs/b"]).await;
    mount_page(&mock_server, "/docs/a", "A", &["/docs/a/deep"]).await;
    mount_page(&mock_server, "/docs/b", "B", &["/docs/b/deep"]).await;
    mount_page(&mock_server, "/docs/a/deep", "A Deep", &[]).await;
    mount_page(&mock_server, "/docs/b/deep", "B Deep", &[]).await;

    let state = Coordinator::new(create_test_config(&base, 10))
        .expect("Failed to create coordinator")
        .run()
        .await;

    let titles: Vec<&str> = state.pages().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Root", "A", "B", "A Deep", "B Deep"]);
    assert_eq!(state.visited().len(), 5);
}

#[tokio::test]
async fn test_page_budget_is_respected() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    let links: Vec<String> = (0..8).map(|i| format!("/docs/p{}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    mount_page(&mock_server, "/docs", "Root", &link_refs).await;
    for link in &links {
        mount_page(&mock_server, link, "Child", &[]).await;
    }

    let state = Coordinator::new(create_test_config(&base, 3))
        .expect("Failed to create coordinator")
        .run()
        .await;

    assert_eq!(state.page_count(), 3);
    assert_eq!(state.frontier().len(), 6);
}

#[tokio::test]
async fn test_http_error_recorded_once_and_crawl_continues() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/docs", "Root", &["/docs/broken", "/docs/ok", "/docs/broken"]).await;
    mount_page(&mock_server, "/docs/ok", "Ok", &["/docs/broken"]).await;
    Mock::given(method("GET"))
        .and(path("/docs/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = Coordinator::new(create_test_config(&base, 10))
        .expect("Failed to create coordinator")
        .run()
        .await;

    let broken = format!("{}/docs/broken", base);
    assert_eq!(state.page_count(), 2);
    assert_eq!(state.errors().len(), 1);
    assert_eq!(state.errors()[0].url, broken);
    assert!(state.errors()[0].message.contains("500"));
    assert!(state.page(&broken).is_none());
    assert!(state.is_visited(&broken));
}

#[tokio::test]
async fn test_transport_error_is_not_retried() {
    // Nothing listens on port 1
    let config = create_test_config("http://127.0.0.1:1", 5);
    let start = config.start_url().to_string();

    let state = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await;

    assert_eq!(state.page_count(), 0);
    assert_eq!(state.errors().len(), 1);
    assert_eq!(state.errors()[0].url, start);
    assert!(state.page(&start).is_none());
    assert!(state.frontier().is_empty());
}

#[tokio::test]
async fn test_excluded_urls_are_never_requested() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/docs", "Root", &["/docs/private/keys", "/docs/public"]).await;
    mount_page(&mock_server, "/docs/public", "Public", &[]).await;
    Mock::given(method("GET"))
        .and(path("/docs/private/keys"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Secret", &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base, 10);
    config.url_patterns.exclude = vec!["/private/".to_string()];

    let state = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await;

    assert_eq!(state.page_count(), 2);
    assert!(state.errors().is_empty());
    // Filtered URLs are consumed, not errors
    assert!(state.is_visited(&format!("{}/docs/private/keys", base)));
}

#[tokio::test]
async fn test_fragments_and_out_of_scope_links() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/docs",
        "Root",
        &[
            "/docs/a#intro",
            "/docs/a",
            "/docs/a#usage",
            "https://elsewhere.example/docs/x",
            "mailto:docs@demo.dev",
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("A", &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = Coordinator::new(create_test_config(&base, 10))
        .expect("Failed to create coordinator")
        .run()
        .await;

    assert_eq!(state.page_count(), 2);
    assert!(!state.is_visited("https://elsewhere.example/docs/x"));
    assert!(state.visited().iter().all(|url| !url.contains('#')));
}

#[tokio::test]
async fn test_resume_does_not_refetch_visited_pages() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let cache = dir.path().join(".scrape_cache.json");

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(html_page("Root", &["/docs/a", "/docs/b"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/docs/a", "A", &["/docs"]).await;
    mount_page(&mock_server, "/docs/b", "B", &[]).await;

    // First run stops after the budget of one page
    let first = Coordinator::new(create_test_config(&base, 1))
        .expect("Failed to create coordinator")
        .with_checkpoint(CheckpointStore::new(&cache), "hash")
        .run()
        .await;
    assert_eq!(first.page_count(), 1);
    assert_eq!(first.frontier().len(), 2);
    assert!(cache.exists());

    // Resumed run continues with the larger budget
    let resumed = Coordinator::new(create_test_config(&base, 3))
        .expect("Failed to create coordinator")
        .with_checkpoint(CheckpointStore::new(&cache), "hash")
        .resume()
        .expect("Failed to resume")
        .run()
        .await;

    let titles: Vec<&str> = resumed.pages().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Root", "A", "B"]);
    assert!(resumed.errors().is_empty());
}

#[tokio::test]
async fn test_build_only_regenerates_identical_documents() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(&mock_server, "/docs", "Overview", &["/docs/guide", "/docs/api"]).await;
    mount_page(&mock_server, "/docs/guide", "Guide", &[]).await;
    mount_page(&mock_server, "/docs/api", "API", &[]).await;

    let config = create_test_config(&base, 10);
    let layout = OutputLayout::new(dir.path(), &config.name);

    let state = Coordinator::new(config.clone())
        .expect("Failed to create coordinator")
        .with_checkpoint(CheckpointStore::new(layout.cache_path()), "")
        .run()
        .await;

    let generated_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let live = generate(state.pages(), &config, generated_at);
    let written = write_artifacts(&live, &layout).expect("Failed to write artifacts");
    let first_pass: Vec<String> = written
        .iter()
        .map(|p| fs::read_to_string(p).expect("Failed to read artifact"))
        .collect();

    let cached = CheckpointStore::new(layout.cache_path())
        .load_required()
        .expect("Page cache missing")
        .into_state();
    let rebuilt = generate(cached.pages(), &config, generated_at);
    assert_eq!(rebuilt, live);

    write_artifacts(&rebuilt, &layout).expect("Failed to write artifacts");
    let second_pass: Vec<String> = written
        .iter()
        .map(|p| fs::read_to_string(p).expect("Failed to read artifact"))
        .collect();
    assert_eq!(first_pass, second_pass);

    let guides = fs::read_to_string(layout.reference_path("guides")).expect("No guides doc");
    assert!(guides.contains("## Guide"));
    let api = fs::read_to_string(layout.reference_path("api")).expect("No api doc");
    assert!(api.contains("## API"));
}

#[tokio::test]
async fn test_config_file_to_documents() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let dir = TempDir::new().expect("Failed to create temp dir");

    mount_page(&mock_server, "/docs", "Start", &["/docs/guide"]).await;
    mount_page(&mock_server, "/docs/guide", "Guide", &[]).await;

    let config_path = dir.path().join("demo.toml");
    fs::write(
        &config_path,
        format!(
            r#"
name = "demo"
description = "Demo docs"
base_url = "{}/docs"
max_pages = 5
rate_limit = 0.0
file_patterns = ["**/*.demo"]

[categories]
guides = ["guide"]
"#,
            base
        ),
    )
    .expect("Failed to write config");

    let (config, hash) = load_config_with_hash(&config_path).expect("Failed to load config");
    let layout = OutputLayout::new(dir.path(), &config.name);

    let state = Coordinator::new(config.clone())
        .expect("Failed to create coordinator")
        .with_checkpoint(CheckpointStore::new(layout.cache_path()), hash)
        .run()
        .await;
    assert_eq!(state.page_count(), 2);

    let artifacts = generate(state.pages(), &config, Utc::now());
    write_artifacts(&artifacts, &layout).expect("Failed to write artifacts");

    let index = fs::read_to_string(layout.index_path()).expect("No index");
    assert!(index.contains("- **Guides**: 1 pages"));
    assert!(index.contains("- **Reference**: 1 pages"));
    assert!(layout.prompt_path().exists());
    assert!(layout.instructions_path().exists());
}

#[tokio::test]
async fn test_preview_lists_admitted_links() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/docs",
        "Root",
        &["/docs/b", "/docs/a", "/blog/post", "/docs/a#x"],
    )
    .await;

    let mut config = create_test_config(&base, 50);
    config.url_patterns.exclude = vec!["/blog/".to_string()];

    let report = preview(&config).await.expect("Preview failed");

    assert_eq!(report.links_found, 2);
    assert_eq!(
        report.sample,
        vec![format!("{}/docs/a", base), format!("{}/docs/b", base)]
    );
    assert_eq!(report.estimated_pages(), 2);
}
