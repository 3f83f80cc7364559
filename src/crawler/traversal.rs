//! Traversal engine - crawl orchestration
//!
//! This module contains the loops that drive fetching:
//! - [`Crawler::crawl`]: bounded breadth-first traversal from the seeds
//! - [`Crawler::discover`]: single-level discovery of links hidden in a
//!   page's embedded presentations
//! - [`Crawler::build_sitemap`] / [`Crawler::collect`]: discovery over every
//!   seed, then fetching each root with its discovered pages as subcontent
//!
//! Requests are strictly sequential with a politeness delay between them.
//! A failing page never aborts a run; it simply contributes nothing.

use crate::config::{Config, CrawlerConfig, SeedEntry};
use crate::crawler::extractor::SlideLinkExtractor;
use crate::crawler::fetcher::{build_http_client, fetch_page, fetch_url, FetchResult};
use crate::crawler::frontier::{CrawlState, FrontierEntry, Politeness};
use crate::crawler::parser::{dedup_preserve_order, extract_iframe_sources, parse_page};
use crate::crawler::record::{PageRecord, SubPage};
use crate::url::{extract_domain, has_host, normalize_str, normalize_url};
use crate::AtlasError;
use reqwest::Client;
use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};
use url::Url;

/// Seed URL -> links discovered in its embedded presentations
pub type Sitemap = BTreeMap<String, Vec<FrontierEntry>>;

/// Sequential crawler bound to one site configuration
pub struct Crawler {
    client: Client,
    config: CrawlerConfig,
    iframe_pattern: String,
    slides: SlideLinkExtractor,
}

impl Crawler {
    /// Creates a crawler, selecting the slide extractor by availability
    pub fn new(config: &Config) -> Result<Self, AtlasError> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout_secs)?;
        let slides = SlideLinkExtractor::select(&config.render, client.clone());

        if let Some(name) = slides.renderer_name() {
            tracing::info!("Using {} renderer for embedded presentations", name);
        }

        Ok(Self::with_extractor(config, client, slides))
    }

    /// Creates a crawler with an explicit slide extractor
    pub fn with_extractor(config: &Config, client: Client, slides: SlideLinkExtractor) -> Self {
        Self {
            client,
            config: config.crawler.clone(),
            iframe_pattern: config.render.iframe_pattern.clone(),
            slides,
        }
    }

    fn politeness(&self) -> Politeness {
        Politeness::new(Duration::from_millis(self.config.politeness_delay_ms))
    }

    fn may_descend(&self, depth: u32) -> bool {
        self.config.max_depth.map_or(true, |max| depth < max)
    }

    /// Runs a bounded breadth-first crawl from the seeds
    ///
    /// Only hosts of the seeds are eligible for traversal. A page's `links`
    /// holds same-origin anchors plus same-host links from its embedded
    /// presentations, so off-host URLs are neither recorded nor fetched.
    /// The crawl stops when the queue is empty or `max_pages` URLs have
    /// been visited. Every request, including presentation fetches, waits
    /// out the politeness delay.
    pub async fn crawl(&self, seeds: &[SeedEntry]) -> Vec<PageRecord> {
        let mut state = CrawlState::new();
        let mut scope: HashSet<String> = HashSet::new();

        for seed in seeds {
            match normalize_url(&seed.url) {
                Ok(url) => {
                    if let Some(host) = extract_domain(&url) {
                        scope.insert(host);
                    }
                    state.schedule(FrontierEntry::new(url.as_str(), seed.depth));
                }
                Err(e) => tracing::warn!("Skipping seed {}: {}", seed.url, e),
            }
        }

        tracing::info!(
            "Starting crawl: {} seeds, {} hosts in scope, cap {} pages",
            state.queue_len(),
            scope.len(),
            self.config.max_pages
        );

        let mut pacer = self.politeness();
        let mut pages = Vec::new();
        let start_time = Instant::now();

        while !state.is_done(self.config.max_pages) {
            let Some(entry) = state.next_entry() else {
                break;
            };
            state.mark_visited(&entry.url);

            let Some(record) = self.fetch_record(&entry.url, &mut pacer).await else {
                continue;
            };

            if self.may_descend(entry.depth) {
                for link in &record.links {
                    if !scope.iter().any(|host| has_host(link, host)) {
                        tracing::debug!("Not following off-site link {}", link);
                        continue;
                    }
                    state.schedule(FrontierEntry::new(
                        link.clone(),
                        entry.depth.saturating_add(1),
                    ));
                }
            }

            pages.push(record);

            if state.visited_count() % 10 == 0 {
                tracing::info!(
                    "Progress: {} visited, {} in frontier",
                    state.visited_count(),
                    state.queue_len()
                );
            }
        }

        tracing::info!(
            "Crawl completed: {} pages from {} visits in {:?}",
            pages.len(),
            state.visited_count(),
            start_time.elapsed()
        );

        pages
    }

    /// Discovers links embedded in presentations on a single page
    ///
    /// Only iframes whose source matches the configured pattern are
    /// examined. Results are same-host, normalized, exclude the page
    /// itself, and all carry depth 1.
    pub async fn discover(&self, url: &str) -> Vec<FrontierEntry> {
        self.discover_paced(url, &mut self.politeness()).await
    }

    async fn discover_paced(&self, url: &str, pacer: &mut Politeness) -> Vec<FrontierEntry> {
        let page_url = match normalize_url(url) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("Cannot discover from {}: {}", url, e);
                return Vec::new();
            }
        };

        pacer.wait().await;
        let body = match fetch_url(&self.client, page_url.as_str()).await {
            FetchResult::Success { body, .. } => body,
            other => {
                tracing::warn!("No result for {}: {}", page_url, other.describe());
                return Vec::new();
            }
        };

        let discovered: Vec<FrontierEntry> = self
            .embedded_links(&body, &page_url, pacer)
            .await
            .into_iter()
            .filter(|link| link != page_url.as_str())
            .map(|link| FrontierEntry::new(link, 1))
            .collect();

        tracing::info!("Discovered {} links from {}", discovered.len(), page_url);
        discovered
    }

    /// Runs [`discover`](Self::discover) for every seed
    pub async fn build_sitemap(&self, seeds: &[SeedEntry]) -> Sitemap {
        let mut sitemap = Sitemap::new();
        let mut pacer = self.politeness();

        for seed in seeds {
            let key = normalize_str(&seed.url).unwrap_or_else(|_| seed.url.clone());
            let entries = self.discover_paced(&seed.url, &mut pacer).await;
            sitemap.insert(key, entries);
        }

        sitemap
    }

    /// Fetches every sitemap root, attaching its discovered pages as subcontent
    ///
    /// A subpage that cannot be fetched leaves a [`SubPage::Missing`] slot.
    /// A root that cannot be fetched is skipped with its subpages.
    pub async fn collect(&self, sitemap: &Sitemap) -> Vec<PageRecord> {
        let mut pacer = self.politeness();
        let mut pages = Vec::with_capacity(sitemap.len());

        for (root_url, entries) in sitemap {
            pacer.wait().await;
            let Some(mut root) = fetch_page(&self.client, root_url).await else {
                tracing::warn!(
                    "Skipping root {} and its {} subpages",
                    root_url,
                    entries.len()
                );
                continue;
            };

            for entry in entries {
                pacer.wait().await;
                root.subcontent
                    .push(SubPage::from(fetch_page(&self.client, &entry.url).await));
            }

            let missing = root.subcontent.iter().filter(|s| s.is_missing()).count();
            tracing::debug!(
                "Collected {} with {} subpages ({} missing)",
                root_url,
                root.subcontent.len(),
                missing
            );
            pages.push(root);
        }

        pages
    }

    /// Fetches a page and merges in links from its embedded presentations
    async fn fetch_record(&self, url: &str, pacer: &mut Politeness) -> Option<PageRecord> {
        let page_url = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("Skipping malformed URL {}: {}", url, e);
                return None;
            }
        };

        pacer.wait().await;
        match fetch_url(&self.client, url).await {
            FetchResult::Success { body, .. } => {
                let parsed = parse_page(&body, &page_url);
                let mut record = PageRecord::from_parsed(url, parsed);
                let embedded = self.embedded_links(&body, &page_url, pacer).await;
                if !embedded.is_empty() {
                    let links = std::mem::take(&mut record.links);
                    record.links = dedup_preserve_order(links.into_iter().chain(embedded));
                }
                Some(record)
            }
            other => {
                tracing::warn!("No result for {}: {}", url, other.describe());
                None
            }
        }
    }

    /// Same-host links found inside matching presentation iframes
    async fn embedded_links(
        &self,
        body: &str,
        page_url: &Url,
        pacer: &mut Politeness,
    ) -> Vec<String> {
        let Some(host) = extract_domain(page_url) else {
            return Vec::new();
        };

        let sources = extract_iframe_sources(body, page_url, &self.iframe_pattern);
        let mut links = Vec::new();

        for src in sources {
            tracing::debug!("Extracting links from embedded presentation {}", src);
            pacer.wait().await;
            for href in self.slides.extract(&src).await {
                let resolved = match page_url.join(href.trim()) {
                    Ok(u) => u,
                    Err(e) => {
                        tracing::debug!("Dropping unresolvable link {}: {}", href, e);
                        continue;
                    }
                };

                match normalize_str(resolved.as_str()) {
                    Ok(link) if has_host(&link, &host) => links.push(link),
                    Ok(link) => tracing::debug!("Ignoring off-site embedded link {}", link),
                    Err(e) => tracing::debug!("Dropping link {}: {}", href, e),
                }
            }
        }

        dedup_preserve_order(links)
    }
}
