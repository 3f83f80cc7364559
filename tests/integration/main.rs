//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the
//! traversal loops and the graph builder end-to-end.

mod crawl_tests;
mod pipeline_tests;

use pathway_atlas::config::{parse_config, Config};
use wiremock::ResponseTemplate;

/// Creates a test configuration with the given seeds
///
/// Rendering is disabled so embedded presentations are always read
/// through the static fallback.
pub fn create_test_config(seeds: &[String], max_pages: usize, max_depth: Option<u32>) -> Config {
    let seed_tables: String = seeds
        .iter()
        .map(|url| format!("\n[[seed]]\nurl = \"{}\"\n", url))
        .collect();

    let mut config = parse_config(&format!(
        r#"
[crawler]
max-pages = {max_pages}
politeness-delay-ms = 0
request-timeout-secs = 5

[render]
enabled = false
iframe-pattern = "/presentation/"

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[output]
pages-path = "pages.json"
sitemap-path = "sitemap.json"
graph-path = "graph.json"
{seed_tables}"#
    ))
    .expect("Failed to parse test config");

    config.crawler.max_depth = max_depth;
    config
}

/// A 200 response carrying an HTML body
pub fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

/// A minimal HTML page with a title, some text and the given anchors
pub fn page_with_links(title: &str, hrefs: &[String]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>About {}</p>{}</body></html>",
        title, title, anchors
    )
}
