//! HTML parser for extracting text, links and embedded presentations
//!
//! This module handles parsing HTML content to extract:
//! - The page title and visible text
//! - Same-site links to follow (from `<a>` tags)
//! - Raw anchor targets, for pages that are not our own site
//! - Sources of embedded presentation iframes

use crate::url::normalize_str;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose text content is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title (from `<title>`), empty if absent
    pub title: String,

    /// Visible text nodes joined with single spaces
    pub text: String,

    /// Normalized same-site links, first-seen order, no duplicates
    pub links: Vec<String>,
}

/// Parses HTML content and extracts title, text and same-site links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - root-relative hrefs (`/pathways/...`), resolved against the page origin
/// - absolute hrefs whose origin equals the page origin
///
/// **Exclude:**
/// - protocol-relative hrefs (`//host/...`) pointing at another origin
/// - document-relative hrefs, fragments, `mailto:` and friends
/// - anything that fails to normalize (the link is dropped, not the page)
///
/// # Example
///
/// ```
/// use pathway_atlas::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><head><title>IT</title></head><body><a href="/cyber/">Cyber</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/it.html").unwrap();
/// let parsed = parse_page(html, &page_url);
/// assert_eq!(parsed.title, "IT");
/// assert_eq!(parsed.links, vec!["https://example.com/cyber".to_string()]);
/// ```
pub fn parse_page(html: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        links: extract_site_links(&document, page_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Joins every visible text node, skipping script/style/noscript content
fn extract_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

/// Extracts same-site anchor targets, normalized and deduplicated
fn extract_site_links(document: &Html, page_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let origin = page_url.origin();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href").map(str::trim) else {
            continue;
        };

        let resolved = if href.starts_with('/') {
            page_url.join(href).ok()
        } else {
            Url::parse(href).ok()
        };

        // `//host/path` also starts with a slash but may leave the site
        let Some(resolved) = resolved.filter(|u| u.origin() == origin) else {
            continue;
        };

        match normalize_str(resolved.as_str()) {
            Ok(normalized) => links.push(normalized),
            Err(e) => tracing::debug!("Dropping link {} on {}: {}", href, page_url, e),
        }
    }

    dedup_preserve_order(links)
}

/// Returns every anchor href exactly as written in the markup
///
/// Used for third-party pages (e.g. a presentation host) where the
/// site-origin filter of [`parse_page`] does not apply.
pub fn extract_anchor_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let hrefs = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(String::from);

    dedup_preserve_order(hrefs)
}

/// Returns the absolute `src` of every iframe whose source contains `pattern`
pub fn extract_iframe_sources(html: &str, page_url: &Url, pattern: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("iframe[src]") else {
        return Vec::new();
    };

    let sources = document
        .select(&selector)
        .filter_map(|element| element.value().attr("src"))
        .filter(|src| src.contains(pattern))
        .filter_map(|src| page_url.join(src.trim()).ok())
        .map(String::from);

    dedup_preserve_order(sources)
}

/// Removes duplicates, keeping the first occurrence of each value
pub fn dedup_preserve_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
