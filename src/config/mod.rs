//! Configuration module for Pathway-Atlas
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Seeds live here rather than in the crawler so the site being mapped is
//! purely a matter of configuration.
//!
//! # Example
//!
//! ```no_run
//! use pathway_atlas::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("atlas.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, RenderConfig, SeedEntry, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
