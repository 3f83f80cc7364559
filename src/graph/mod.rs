//! Knowledge graph over crawled pages
//!
//! Nodes are pages keyed by normalized URL. Edges are either containment
//! (`has_subcontent`, root page to a page nested in it) or hyperlinks
//! (`links_to`, only between pages that are both nodes).

mod builder;

pub use builder::{build_graph, summarize, SUMMARY_CHARS};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Kind of relation an edge represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    HasSubcontent,
    LinksTo,
}

/// One page in the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub title: String,
    pub summary: String,
}

/// A directed relation between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relation: Relation,
}

/// The serialized graph artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl KnowledgeGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Number of edges carrying `relation`
    pub fn relation_count(&self, relation: Relation) -> usize {
        self.edges.iter().filter(|e| e.relation == relation).count()
    }

    /// Returns the edges whose endpoints are not both nodes
    ///
    /// Always empty for graphs produced by [`build_graph`]; useful when a
    /// graph was loaded from disk.
    pub fn dangling_edges(&self) -> Vec<&GraphEdge> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .filter(|e| !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()))
            .collect()
    }
}
