//! Crawler module for page fetching, link discovery and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with failure classification
//! - HTML parsing for text and link extraction
//! - Link extraction from embedded presentations (static or rendered)
//! - The bounded frontier and the traversal loops

#[cfg(feature = "browser")]
mod browser;
mod extractor;
mod fetcher;
mod frontier;
mod parser;
mod record;
mod traversal;

#[cfg(feature = "browser")]
pub use browser::BrowserExtractor;
pub use extractor::{
    decode_unicode_escapes, extract_redirect_targets, LinkExtractor, SlideLinkExtractor,
    StaticExtractor,
};
pub use fetcher::{build_http_client, fetch_page, fetch_url, user_agent_string, FetchResult};
pub use frontier::{CrawlState, FrontierEntry, Politeness};
pub use parser::{
    dedup_preserve_order, extract_anchor_hrefs, extract_iframe_sources, parse_page, ParsedPage,
};
pub use record::{PageRecord, SubPage};
pub use traversal::{Crawler, Sitemap};
