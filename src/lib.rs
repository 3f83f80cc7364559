//! Pathway-Atlas: a bounded site crawler and knowledge-graph builder
//!
//! This crate discovers, fetches and structures pages from a single
//! career-pathways site, including links hidden inside embedded slide
//! decks, and assembles the collected pages into a node/edge graph.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Pathway-Atlas operations
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Errors raised by a dynamic link extractor
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Rendering capability unavailable: {0}")]
    Unavailable(String),

    #[error("Rendering failed for {url}: {message}")]
    Failed { url: String, message: String },

    #[error("Rendering timed out for {url} after {seconds}s")]
    Timeout { url: String, seconds: u64 },
}

/// Result type alias for Pathway-Atlas operations
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, FrontierEntry, PageRecord, SubPage};
pub use graph::{build_graph, GraphEdge, GraphNode, KnowledgeGraph, Relation};
pub use url::{extract_domain, normalize_url};
