//! Discovery, collection and graph building against a mock site

use super::{create_test_config, html, page_with_links};
use pathway_atlas::crawler::{Crawler, FrontierEntry, PageRecord, Sitemap, SubPage};
use pathway_atlas::graph::{build_graph, KnowledgeGraph, Relation};
use pathway_atlas::output::{read_json, write_json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a pathway page embedding one deck, plus the deck itself
async fn mount_pathway(site: &MockServer, page: &str, deck: &str, deck_links: &[String]) {
    let base = site.uri();

    Mock::given(method("GET"))
        .and(path(page.to_string()))
        .respond_with(html(format!(
            r#"<html><head><title>{page}</title></head><body>
            <h1>Pathway {page}</h1>
            <iframe src="https://youtube.com/embed/xyz"></iframe>
            <iframe src="{base}/presentation/d/{deck}/embed"></iframe>
            </body></html>"#
        )))
        .mount(site)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/presentation/d/{}/embed", deck)))
        .respond_with(html(page_with_links("Deck", deck_links)))
        .expect(1)
        .mount(site)
        .await;
}

#[tokio::test]
async fn test_discover_returns_same_host_links_at_depth_one() {
    let site = MockServer::start().await;
    let base = site.uri();

    mount_pathway(
        &site,
        "/pathways/it",
        "abc",
        &[
            "/pathways/cyber".to_string(),
            format!("{}/pathways/it", base),
            "https://other.org/x".to_string(),
            "/pathways/cyber/".to_string(),
            "/pathways/web#top".to_string(),
        ],
    )
    .await;

    let config = create_test_config(&[format!("{}/pathways/it", base)], 10, None);
    let crawler = Crawler::new(&config).expect("Failed to create crawler");

    let discovered = crawler.discover(&format!("{}/pathways/it", base)).await;

    assert_eq!(
        discovered,
        vec![
            FrontierEntry::new(format!("{}/pathways/cyber", base), 1),
            FrontierEntry::new(format!("{}/pathways/web", base), 1),
        ]
    );
}

#[tokio::test]
async fn test_discover_on_failed_page_is_empty() {
    let site = MockServer::start().await;
    let base = site.uri();

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&site)
        .await;

    let config = create_test_config(&[format!("{}/down", base)], 10, None);
    let crawler = Crawler::new(&config).expect("Failed to create crawler");

    assert!(crawler.discover(&format!("{}/down", base)).await.is_empty());
}

#[tokio::test]
async fn test_collect_marks_unreachable_subpages_missing() {
    let site = MockServer::start().await;
    let base = site.uri();

    Mock::given(method("GET"))
        .and(path("/p"))
        .respond_with(html(page_with_links("P", &[])))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/s1"))
        .respond_with(html(page_with_links("S1", &[])))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/s2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;

    let mut sitemap = Sitemap::new();
    sitemap.insert(
        format!("{}/p", base),
        vec![
            FrontierEntry::new(format!("{}/s1", base), 1),
            FrontierEntry::new(format!("{}/s2", base), 1),
        ],
    );

    let config = create_test_config(&[format!("{}/p", base)], 10, None);
    let crawler = Crawler::new(&config).expect("Failed to create crawler");
    let pages = crawler.collect(&sitemap).await;

    assert_eq!(pages.len(), 1);
    let root = &pages[0];
    assert_eq!(root.title, "P");
    assert_eq!(root.subcontent.len(), 2);
    assert_eq!(
        root.subcontent[0].as_present().map(|s| s.title.as_str()),
        Some("S1")
    );
    assert!(root.subcontent[1].is_missing());

    let json = serde_json::to_value(&pages).expect("Failed to serialize");
    assert!(json[0]["subcontent"][1].is_null());
}

#[tokio::test]
async fn test_collect_skips_unreachable_root() {
    let site = MockServer::start().await;
    let base = site.uri();

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(html(page_with_links("Child", &[])))
        .expect(0)
        .mount(&site)
        .await;

    let mut sitemap = Sitemap::new();
    sitemap.insert(
        format!("{}/gone", base),
        vec![FrontierEntry::new(format!("{}/child", base), 1)],
    );

    let config = create_test_config(&[format!("{}/gone", base)], 10, None);
    let crawler = Crawler::new(&config).expect("Failed to create crawler");

    assert!(crawler.collect(&sitemap).await.is_empty());
}

#[tokio::test]
async fn test_discover_collect_graph_end_to_end() {
    let site = MockServer::start().await;
    let base = site.uri();

    mount_pathway(
        &site,
        "/it",
        "deck-it",
        &["/cyber".to_string(), "/web".to_string()],
    )
    .await;
    mount_pathway(&site, "/health", "deck-health", &["/nursing".to_string()]).await;

    Mock::given(method("GET"))
        .and(path("/cyber"))
        .respond_with(html(page_with_links(
            "Cyber",
            &["/web".to_string(), "/unlisted".to_string()],
        )))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/web"))
        .respond_with(html(page_with_links("Web", &[])))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/nursing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;

    let seeds = [format!("{}/it", base), format!("{}/health", base)];
    let config = create_test_config(&seeds, 10, None);
    let crawler = Crawler::new(&config).expect("Failed to create crawler");

    let sitemap = crawler.build_sitemap(&config.seeds).await;
    assert_eq!(sitemap.len(), 2);
    assert_eq!(sitemap[&format!("{}/it", base)].len(), 2);
    assert_eq!(sitemap[&format!("{}/health", base)].len(), 1);

    let pages: Vec<PageRecord> = crawler.collect(&sitemap).await;
    assert_eq!(pages.len(), 2);
    let health = pages
        .iter()
        .find(|p| p.title == "/health")
        .expect("health root missing");
    assert!(matches!(health.subcontent.as_slice(), [SubPage::Missing]));

    // Artifacts survive a round trip through disk
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pages_path = dir.path().join("out").join("pages.json");
    write_json(&pages_path, &pages).expect("Failed to write pages");
    let reloaded: Vec<PageRecord> = read_json(&pages_path).expect("Failed to read pages");
    assert_eq!(reloaded, pages);

    let graph = build_graph(&reloaded);

    // it, cyber, web, health; nursing is missing
    assert_eq!(graph.nodes.len(), 4);
    assert!(!graph.contains_node(&format!("{}/nursing", base)));
    assert_eq!(graph.relation_count(Relation::HasSubcontent), 2);
    // cyber -> web only; /unlisted is not a node
    assert_eq!(graph.relation_count(Relation::LinksTo), 1);
    assert!(graph.dangling_edges().is_empty());

    let cyber = graph
        .node(&format!("{}/cyber", base))
        .expect("cyber node missing");
    assert_eq!(cyber.title, "Cyber");
    assert!(cyber.summary.starts_with("Cyber About Cyber"));

    let graph_path = dir.path().join("graph.json");
    write_json(&graph_path, &graph).expect("Failed to write graph");
    let reloaded_graph: KnowledgeGraph = read_json(&graph_path).expect("Failed to read graph");
    assert_eq!(reloaded_graph, graph);
}
