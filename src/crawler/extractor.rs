//! Link extraction from embedded presentations
//!
//! Slide decks embedded through an iframe render their links client-side,
//! so a plain fetch of the embedding page never sees them. Two
//! [`LinkExtractor`] implementations exist:
//!
//! - `BrowserExtractor` (feature `browser`) renders the deck headlessly
//! - [`StaticExtractor`] fetches the iframe URL and reads raw anchors
//!
//! [`SlideLinkExtractor`] picks whichever is available and always keeps the
//! static path as a fallback, so callers get a list and never an error.

use crate::config::RenderConfig;
use crate::crawler::fetcher::fetch_url;
use crate::crawler::parser::{dedup_preserve_order, extract_anchor_hrefs};
use crate::RenderError;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;

/// A way of turning an embed URL into the link targets it contains
#[async_trait]
pub trait LinkExtractor: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Extracts link targets from the document at `url`
    async fn extract_links(&self, url: &str) -> Result<Vec<String>, RenderError>;
}

/// Fetches the embed URL over plain HTTP and returns its anchor hrefs
pub struct StaticExtractor {
    client: Client,
}

impl StaticExtractor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkExtractor for StaticExtractor {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn extract_links(&self, url: &str) -> Result<Vec<String>, RenderError> {
        match fetch_url(&self.client, url).await.into_body() {
            Some((_, body)) => Ok(extract_anchor_hrefs(&body)),
            None => Err(RenderError::Failed {
                url: url.to_string(),
                message: "static fetch returned no HTML".to_string(),
            }),
        }
    }
}

/// Renders when possible, falls back to a static fetch, never fails
pub struct SlideLinkExtractor {
    renderer: Option<Box<dyn LinkExtractor>>,
    fallback: StaticExtractor,
}

impl SlideLinkExtractor {
    /// Creates an extractor with an explicit renderer (or none)
    pub fn new(renderer: Option<Box<dyn LinkExtractor>>, fallback: StaticExtractor) -> Self {
        Self { renderer, fallback }
    }

    /// Creates an extractor that only uses the static path
    pub fn static_only(client: Client) -> Self {
        Self::new(None, StaticExtractor::new(client))
    }

    /// Selects the renderer by availability
    ///
    /// The headless browser is used only when the `browser` feature is
    /// compiled in, rendering is enabled, and a browser executable can be
    /// found. Otherwise the static path is all there is.
    pub fn select(config: &RenderConfig, client: Client) -> Self {
        let renderer = if config.enabled {
            detect_renderer(config)
        } else {
            tracing::info!("Dynamic rendering disabled by configuration");
            None
        };
        Self::new(renderer, StaticExtractor::new(client))
    }

    /// Name of the active renderer, if any
    pub fn renderer_name(&self) -> Option<&'static str> {
        self.renderer.as_ref().map(|r| r.name())
    }

    /// Extracts links from an embed URL
    ///
    /// Order of attempts:
    /// 1. the renderer, if one is available
    /// 2. a static fetch, when the renderer is missing, failed, or found nothing
    /// 3. an empty list
    pub async fn extract(&self, url: &str) -> Vec<String> {
        if let Some(renderer) = &self.renderer {
            match renderer.extract_links(url).await {
                Ok(links) if !links.is_empty() => return links,
                Ok(_) => {
                    tracing::info!("{} extractor found no links in {}", renderer.name(), url)
                }
                Err(e) => tracing::warn!("{} extractor failed: {}", renderer.name(), e),
            }
        }

        match self.fallback.extract_links(url).await {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!("Static fallback failed for {}: {}", url, e);
                Vec::new()
            }
        }
    }
}

#[cfg(feature = "browser")]
fn detect_renderer(config: &RenderConfig) -> Option<Box<dyn LinkExtractor>> {
    match crate::crawler::browser::BrowserExtractor::detect(config) {
        Ok(extractor) => Some(Box::new(extractor)),
        Err(e) => {
            tracing::warn!("{}; using static extraction", e);
            None
        }
    }
}

#[cfg(not(feature = "browser"))]
fn detect_renderer(_config: &RenderConfig) -> Option<Box<dyn LinkExtractor>> {
    tracing::info!("Built without the `browser` feature; using static extraction");
    None
}

fn redirect_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)https://www\.google\.com/url\?q(?:\\u003d|=)(https://[\w\-./%]+)(?:\\u0026|&)")
            .expect("redirect pattern is valid")
    })
}

fn unicode_escape_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\\u([0-9a-fA-F]{4})").expect("escape pattern is valid"))
}

/// Replaces `\uXXXX` escapes with the characters they encode
pub fn decode_unicode_escapes(text: &str) -> String {
    unicode_escape_pattern()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Finds `https://www.google.com/url?q=<target>&...` redirects in markup
///
/// Both the literal markup and its unicode-unescaped form are scanned, each
/// target is percent-decoded, and the result is deduplicated in
/// first-seen order.
pub fn extract_redirect_targets(html: &str) -> Vec<String> {
    let decoded = decode_unicode_escapes(html);
    let pattern = redirect_pattern();

    let targets = [html, decoded.as_str()]
        .into_iter()
        .flat_map(|haystack| pattern.captures_iter(haystack))
        .map(|caps| {
            let raw = &caps[1];
            urlencoding::decode(raw)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string())
        })
        .collect::<Vec<_>>();

    dedup_preserve_order(targets)
}
