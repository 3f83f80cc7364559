//! Statistics over produced artifacts
//!
//! This module computes and prints short summaries of page records,
//! sitemaps and knowledge graphs after each command.

use crate::crawler::{PageRecord, Sitemap};
use crate::graph::{KnowledgeGraph, Relation};
use crate::url::extract_domain;
use std::collections::HashSet;
use url::Url;

/// Page record statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageStatistics {
    /// Number of root records
    pub root_pages: usize,

    /// Number of present subcontent records
    pub subpages: usize,

    /// Number of subcontent slots whose fetch failed
    pub missing_subpages: usize,

    /// Distinct hosts across roots and subpages
    pub unique_domains: usize,

    /// Links across roots and subpages
    pub total_links: usize,
}

/// Knowledge graph statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStatistics {
    pub nodes: usize,
    pub has_subcontent_edges: usize,
    pub links_to_edges: usize,
}

/// Computes statistics for a set of root page records
pub fn page_statistics(pages: &[PageRecord]) -> PageStatistics {
    let mut stats = PageStatistics {
        root_pages: pages.len(),
        ..Default::default()
    };
    let mut domains = HashSet::new();

    for page in pages {
        stats.missing_subpages += page.subcontent.iter().filter(|s| s.is_missing()).count();

        stats.subpages += page.present_subpages().count();

        for record in std::iter::once(page).chain(page.present_subpages()) {
            stats.total_links += record.links.len();
            if let Some(domain) = Url::parse(&record.url).ok().and_then(|u| extract_domain(&u)) {
                domains.insert(domain);
            }
        }
    }

    stats.unique_domains = domains.len();
    stats
}

/// Computes statistics for a knowledge graph
pub fn graph_statistics(graph: &KnowledgeGraph) -> GraphStatistics {
    GraphStatistics {
        nodes: graph.nodes.len(),
        has_subcontent_edges: graph.relation_count(Relation::HasSubcontent),
        links_to_edges: graph.relation_count(Relation::LinksTo),
    }
}

/// Prints page statistics to stdout
pub fn print_page_statistics(stats: &PageStatistics) {
    println!("=== Page Records ===");
    println!("  Root pages: {}", stats.root_pages);
    println!(
        "  Subpages: {} ({} missing)",
        stats.subpages, stats.missing_subpages
    );
    println!("  Unique domains: {}", stats.unique_domains);
    println!("  Total links: {}", stats.total_links);
}

/// Prints sitemap statistics to stdout
pub fn print_sitemap_statistics(sitemap: &Sitemap) {
    let discovered: usize = sitemap.values().map(Vec::len).sum();
    let empty = sitemap.values().filter(|entries| entries.is_empty()).count();

    println!("=== Sitemap ===");
    println!("  Seeds: {}", sitemap.len());
    println!("  Discovered links: {}", discovered);
    println!("  Seeds with no discoveries: {}", empty);
}

/// Prints graph statistics to stdout
pub fn print_graph_statistics(stats: &GraphStatistics) {
    println!("=== Knowledge Graph ===");
    println!("  Nodes: {}", stats.nodes);
    println!("  has_subcontent edges: {}", stats.has_subcontent_edges);
    println!("  links_to edges: {}", stats.links_to_edges);
}
