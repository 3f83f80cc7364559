use serde::Deserialize;

/// Main configuration structure for Pathway-Atlas
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default, rename = "seed")]
    pub seeds: Vec<SeedEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages visited by one full crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Optional maximum link depth from the seeds
    #[serde(default, rename = "max-depth")]
    pub max_depth: Option<u32>,

    /// Pause between successive fetches (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout", rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

/// Dynamic (headless browser) extraction settings
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Use the headless browser when the capability is present
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Upper bound on one render session (seconds)
    #[serde(default = "default_render_timeout", rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Extra wait after load before reading the DOM (milliseconds)
    #[serde(default = "default_settle_ms", rename = "settle-ms")]
    pub settle_ms: u64,

    /// Substring identifying presentation iframes worth rendering
    #[serde(default = "default_iframe_pattern", rename = "iframe-pattern")]
    pub iframe_pattern: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_render_timeout(),
            settle_ms: default_settle_ms(),
            iframe_pattern: default_iframe_pattern(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output artifact locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// JSON array of page records
    #[serde(rename = "pages-path")]
    pub pages_path: String,

    /// JSON mapping of seed URL to discovered entries
    #[serde(rename = "sitemap-path")]
    pub sitemap_path: String,

    /// JSON knowledge graph
    #[serde(rename = "graph-path")]
    pub graph_path: String,
}

/// A start URL with its configured depth
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    pub url: String,

    #[serde(default)]
    pub depth: u32,
}

fn default_request_timeout() -> u64 {
    10
}

fn default_render_timeout() -> u64 {
    30
}

fn default_settle_ms() -> u64 {
    1000
}

fn default_iframe_pattern() -> String {
    "docs.google.com/presentation".to_string()
}

fn default_true() -> bool {
    true
}
