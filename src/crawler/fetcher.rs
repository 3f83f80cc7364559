//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with a descriptive user agent string
//! - GET requests with a per-request timeout
//! - Classifying status, content-type and transport failures
//!
//! Nothing here returns `Err` for a bad page: every failure is a
//! [`FetchResult`] variant, and [`fetch_page`] collapses them to `None`.

use crate::config::UserAgentConfig;
use crate::crawler::parser::parse_page;
use crate::crawler::record::PageRecord;
use crate::url::normalize_url;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Transport failure (timeout, DNS, connection reset, body read)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns the body of a successful fetch
    pub fn into_body(self) -> Option<(String, String)> {
        match self {
            FetchResult::Success { final_url, body } => Some((final_url, body)),
            _ => None,
        }
    }

    /// Short description of a failed fetch, for logs
    pub fn describe(&self) -> String {
        match self {
            FetchResult::Success { .. } => "ok".to_string(),
            FetchResult::ContentMismatch { content_type } => {
                format!("expected HTML, got '{}'", content_type)
            }
            FetchResult::HttpError { status_code } => format!("HTTP {}", status_code),
            FetchResult::NetworkError { error } => error.clone(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use pathway_atlas::config::UserAgentConfig;
/// use pathway_atlas::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "PathwayAtlas".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, 10).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 + `text/html` | `Success` |
/// | HTTP 200, other type | `ContentMismatch` |
/// | Any other status | `HttpError` |
/// | Timeout / connect / body error | `NetworkError` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.to_ascii_lowercase().contains("text/html") {
        return FetchResult::ContentMismatch { content_type };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => FetchResult::Success { final_url, body },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Fetches and parses one page into a [`PageRecord`]
///
/// Returns `None` when the URL is malformed or the fetch fails for any
/// reason; the failure is logged and the caller carries on.
pub async fn fetch_page(client: &Client, url: &str) -> Option<PageRecord> {
    let normalized = match normalize_url(url) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("Skipping malformed URL {}: {}", url, e);
            return None;
        }
    };

    let result = fetch_url(client, normalized.as_str()).await;
    match result {
        FetchResult::Success { body, .. } => {
            let parsed = parse_page(&body, &normalized);
            Some(PageRecord::from_parsed(normalized.as_str(), parsed))
        }
        other => {
            tracing::warn!("No result for {}: {}", normalized, other.describe());
            None
        }
    }
}
