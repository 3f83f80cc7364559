//! Pathway-Atlas main entry point
//!
//! This is the command-line interface for crawling a career-pathways site
//! and building its knowledge graph.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pathway_atlas::config::{load_config_with_hash, Config};
use pathway_atlas::crawler::{Crawler, PageRecord, Sitemap};
use pathway_atlas::graph::build_graph;
use pathway_atlas::output::{
    graph_statistics, page_statistics, print_graph_statistics, print_page_statistics,
    print_sitemap_statistics, read_json, write_json,
};
use pathway_atlas::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Pathway-Atlas: a bounded site crawler and knowledge-graph builder
///
/// Pathway-Atlas discovers pages of a single site, including links hidden
/// in embedded slide decks, and turns them into page records and a
/// node/edge knowledge graph.
#[derive(Parser, Debug)]
#[command(name = "pathway-atlas")]
#[command(version)]
#[command(about = "A bounded site crawler and knowledge-graph builder", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Breadth-first crawl from the seeds, writing page records
    Crawl,

    /// Discover links in each seed's embedded presentations, writing the sitemap
    Discover,

    /// Fetch sitemap roots with their discovered pages as subcontent
    Collect,

    /// Build the knowledge graph from page records
    Graph,

    /// Discover, collect and graph in one go
    Run,

    /// Validate config and show what would be done without fetching anything
    DryRun,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    match cli.command {
        Command::Crawl => handle_crawl(&config).await?,
        Command::Discover => {
            handle_discover(&config).await?;
        }
        Command::Collect => {
            handle_collect(&config, None).await?;
        }
        Command::Graph => handle_graph(&config, None)?,
        Command::Run => {
            let sitemap = handle_discover(&config).await?;
            let pages = handle_collect(&config, Some(sitemap)).await?;
            handle_graph(&config, Some(pages))?;
        }
        Command::DryRun => handle_dry_run(&config),
    }

    Ok(())
}

/// Loads, validates and hashes the configuration file
fn load_configuration(path: &Path) -> Result<Config> {
    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pathway_atlas=info,warn"),
            1 => EnvFilter::new("pathway_atlas=debug,info"),
            2 => EnvFilter::new("pathway_atlas=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `dry-run`: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Pathway-Atlas Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    match config.crawler.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nRendering:");
    println!("  Enabled: {}", config.render.enabled);
    println!(
        "  Browser support compiled in: {}",
        cfg!(feature = "browser")
    );
    println!("  Timeout: {}s", config.render.timeout_secs);
    println!("  Iframe pattern: {}", config.render.iframe_pattern);

    println!("\nOutput:");
    println!("  Pages: {}", config.output.pages_path);
    println!("  Sitemap: {}", config.output.sitemap_path);
    println!("  Graph: {}", config.output.graph_path);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {} (depth {})", seed.url, seed.depth);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles `crawl`: bounded BFS from every seed
async fn handle_crawl(config: &Config) -> Result<()> {
    let crawler = Crawler::new(config)?;
    let pages = crawler.crawl(&config.seeds).await;

    write_json(Path::new(&config.output.pages_path), &pages)?;
    print_page_statistics(&page_statistics(&pages));
    Ok(())
}

/// Handles `discover`: single-level discovery for every seed
async fn handle_discover(config: &Config) -> Result<Sitemap> {
    let crawler = Crawler::new(config)?;
    let sitemap = crawler.build_sitemap(&config.seeds).await;

    write_json(Path::new(&config.output.sitemap_path), &sitemap)?;
    print_sitemap_statistics(&sitemap);
    Ok(sitemap)
}

/// Handles `collect`: fetch roots and their discovered subpages
async fn handle_collect(
    config: &Config,
    sitemap: Option<Sitemap>,
) -> Result<Vec<PageRecord>> {
    let sitemap = match sitemap {
        Some(s) => s,
        None => read_json(Path::new(&config.output.sitemap_path)).inspect_err(|_| {
            tracing::error!("Run `discover` first to produce the sitemap")
        })?,
    };

    let crawler = Crawler::new(config)?;
    let pages = crawler.collect(&sitemap).await;

    write_json(Path::new(&config.output.pages_path), &pages)?;
    print_page_statistics(&page_statistics(&pages));
    Ok(pages)
}

/// Handles `graph`: page records to knowledge graph
fn handle_graph(config: &Config, pages: Option<Vec<PageRecord>>) -> Result<()> {
    let pages = match pages {
        Some(p) => p,
        None => read_json(Path::new(&config.output.pages_path)).inspect_err(|_| {
            tracing::error!("Run `crawl` or `collect` first to produce page records")
        })?,
    };

    let graph = build_graph(&pages);

    write_json(Path::new(&config.output.graph_path), &graph)?;
    print_graph_statistics(&graph_statistics(&graph));
    Ok(())
}
