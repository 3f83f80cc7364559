//! Breadth-first crawl behaviour against mock sites

use super::{create_test_config, html, page_with_links};
use pathway_atlas::crawler::Crawler;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_crawl_stays_on_seed_host() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;
    let base = site.uri();

    // Same IP, different host name: must never be fetched
    let other_base = other.uri().replace("127.0.0.1", "localhost");

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(page_with_links(
            "A",
            &["/b".to_string(), format!("{}/c", other_base)],
        )))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(page_with_links("B", &[])))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html(page_with_links("C", &[])))
        .expect(0)
        .mount(&other)
        .await;

    let config = create_test_config(&[format!("{}/a", base)], 10, None);
    let crawler = Crawler::new(&config).expect("Failed to create crawler");
    let pages = crawler.crawl(&config.seeds).await;

    let urls: HashSet<String> = pages.iter().map(|p| p.url.clone()).collect();
    let expected: HashSet<String> = [format!("{}/a", base), format!("{}/b", base)]
        .into_iter()
        .collect();
    assert_eq!(urls, expected);

    let a = pages.iter().find(|p| p.title == "A").expect("A missing");
    assert_eq!(a.links, vec![format!("{}/b", base)]);
    assert!(a.text.contains("About A"));
}

#[tokio::test]
async fn test_crawl_respects_page_cap() {
    let site = MockServer::start().await;
    let base = site.uri();

    // A chain /p0 -> /p1 -> ... -> /p5
    for i in 0..6 {
        let next = vec![format!("/p{}", i + 1)];
        let expected_hits = if i < 3 { 1 } else { 0 };
        Mock::given(method("GET"))
            .and(path(format!("/p{}", i)))
            .respond_with(html(page_with_links(&format!("P{}", i), &next)))
            .expect(expected_hits)
            .mount(&site)
            .await;
    }

    let config = create_test_config(&[format!("{}/p0", base)], 3, None);
    let crawler = Crawler::new(&config).expect("Failed to create crawler");
    let pages = crawler.crawl(&config.seeds).await;

    assert_eq!(pages.len(), 3);
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let site = MockServer::start().await;
    let base = site.uri();

    // Pages that link to each other, to themselves, and to variants of the
    // same URL that normalize identically
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(page_with_links(
            "A",
            &[
                "/a".to_string(),
                "/b".to_string(),
                "/b/".to_string(),
                format!("{}/b#section", base),
            ],
        )))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(page_with_links("B", &["/a".to_string()])))
        .expect(1)
        .mount(&site)
        .await;

    let config = create_test_config(
        &[format!("{}/a", base), format!("{}/a/", base)],
        50,
        None,
    );
    let crawler = Crawler::new(&config).expect("Failed to create crawler");
    let pages = crawler.crawl(&config.seeds).await;

    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_failed_fetches_contribute_nothing() {
    let site = MockServer::start().await;
    let base = site.uri();

    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(html(page_with_links(
            "Home",
            &[
                "/gone".to_string(),
                "/brochure.pdf".to_string(),
                "/ok".to_string(),
            ],
        )))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html(page_with_links("Ok", &[])))
        .mount(&site)
        .await;

    let config = create_test_config(&[format!("{}/home", base)], 10, None);
    let crawler = Crawler::new(&config).expect("Failed to create crawler");
    let pages = crawler.crawl(&config.seeds).await;

    let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Ok"]);
}

#[tokio::test]
async fn test_failed_fetches_count_toward_cap() {
    let site = MockServer::start().await;
    let base = site.uri();

    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(html(page_with_links(
            "Home",
            &["/broken".to_string(), "/later".to_string()],
        )))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/later"))
        .respond_with(html(page_with_links("Later", &[])))
        .expect(0)
        .mount(&site)
        .await;

    let config = create_test_config(&[format!("{}/home", base)], 2, None);
    let crawler = Crawler::new(&config).expect("Failed to create crawler");
    let pages = crawler.crawl(&config.seeds).await;

    assert_eq!(pages.len(), 1);
}

#[tokio::test]
async fn test_max_depth_limits_descent() {
    let site = MockServer::start().await;
    let base = site.uri();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(page_with_links("A", &["/b".to_string()])))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(page_with_links("B", &["/c".to_string()])))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html(page_with_links("C", &[])))
        .expect(0)
        .mount(&site)
        .await;

    let config = create_test_config(&[format!("{}/a", base)], 10, Some(1));
    let crawler = Crawler::new(&config).expect("Failed to create crawler");
    let pages = crawler.crawl(&config.seeds).await;

    assert_eq!(pages.len(), 2);
    // B still records its link even though it was not followed
    let b = pages.iter().find(|p| p.title == "B").expect("B missing");
    assert_eq!(b.links, vec![format!("{}/c", base)]);
}

#[tokio::test]
async fn test_crawl_follows_links_inside_embedded_presentation() {
    let site = MockServer::start().await;
    let base = site.uri();

    Mock::given(method("GET"))
        .and(path("/it"))
        .respond_with(html(format!(
            r#"<html><head><title>IT</title></head><body>
            <iframe src="{}/presentation/d/abc/embed"></iframe>
            </body></html>"#,
            base
        )))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/presentation/d/abc/embed"))
        .respond_with(html(page_with_links(
            "Deck",
            &["/cyber".to_string(), "https://other.org/x".to_string()],
        )))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/cyber"))
        .respond_with(html(page_with_links("Cyber", &[])))
        .expect(1)
        .mount(&site)
        .await;

    let config = create_test_config(&[format!("{}/it", base)], 10, None);
    let crawler = Crawler::new(&config).expect("Failed to create crawler");
    let pages = crawler.crawl(&config.seeds).await;

    let it = pages.iter().find(|p| p.title == "IT").expect("IT missing");
    assert_eq!(it.links, vec![format!("{}/cyber", base)]);
    assert!(pages.iter().any(|p| p.title == "Cyber"));
}

#[tokio::test]
async fn test_presentation_fetches_observe_politeness_delay() {
    let site = MockServer::start().await;
    let base = site.uri();

    let iframes: String = (0..3)
        .map(|i| format!(r#"<iframe src="{}/presentation/d/{}/embed"></iframe>"#, base, i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/it"))
        .respond_with(html(format!(
            "<html><head><title>IT</title></head><body>{}</body></html>",
            iframes
        )))
        .expect(1)
        .mount(&site)
        .await;

    for i in 0..3 {
        Mock::given(method("GET"))
            .and(path(format!("/presentation/d/{}/embed", i)))
            .respond_with(html(page_with_links("Deck", &[])))
            .expect(1)
            .mount(&site)
            .await;
    }

    let mut config = create_test_config(&[format!("{}/it", base)], 10, None);
    config.crawler.politeness_delay_ms = 150;
    let crawler = Crawler::new(&config).expect("Failed to create crawler");

    let start = Instant::now();
    let pages = crawler.crawl(&config.seeds).await;
    let elapsed = start.elapsed();

    assert_eq!(pages.len(), 1);
    // Four sequential requests means three full delays
    assert!(
        elapsed >= Duration::from_millis(450),
        "crawl took only {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_maximum_seed_depth_does_not_overflow() {
    let site = MockServer::start().await;
    let base = site.uri();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(page_with_links("A", &["/b".to_string()])))
        .expect(1)
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(page_with_links("B", &[])))
        .expect(1)
        .mount(&site)
        .await;

    let mut config = create_test_config(&[format!("{}/a", base)], 10, None);
    config.seeds[0].depth = u32::MAX;
    let crawler = Crawler::new(&config).expect("Failed to create crawler");
    let pages = crawler.crawl(&config.seeds).await;

    assert_eq!(pages.len(), 2);
}
