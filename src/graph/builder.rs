use crate::crawler::{PageRecord, SubPage};
use crate::graph::{GraphEdge, GraphNode, KnowledgeGraph, Relation};
use crate::url::normalize_str;
use std::collections::{HashMap, HashSet};

/// Maximum number of characters of page text kept in a node summary
pub const SUMMARY_CHARS: usize = 300;

/// Builds the knowledge graph from root page records
///
/// # Algorithm
///
/// 1. Every root with a URL becomes a node (first occurrence wins).
/// 2. Every present subcontent page with a URL becomes a node and gets a
///    `has_subcontent` edge from its root, if the root has a URL. `Missing`
///    slots and URL-less records are skipped.
/// 3. A second pass over all roots and subpages adds a `links_to` edge for
///    each link whose target is a node.
///
/// Duplicate edges are dropped, and a page keeps only the first root that
/// claimed it, so each subcontent node has exactly one incoming
/// `has_subcontent` edge.
///
/// # Example
///
/// ```
/// use pathway_atlas::crawler::{PageRecord, SubPage};
/// use pathway_atlas::graph::{build_graph, Relation};
///
/// let root = PageRecord {
///     url: "https://example.com/p".to_string(),
///     subcontent: vec![
///         SubPage::Missing,
///         SubPage::Present(PageRecord {
///             url: "https://example.com/s".to_string(),
///             ..Default::default()
///         }),
///     ],
///     ..Default::default()
/// };
///
/// let graph = build_graph(&[root]);
/// assert_eq!(graph.nodes.len(), 2);
/// assert_eq!(graph.relation_count(Relation::HasSubcontent), 1);
/// ```
pub fn build_graph(pages: &[PageRecord]) -> KnowledgeGraph {
    let mut builder = GraphBuilder::default();

    for page in pages {
        let root_id = builder.add_node(page);
        if root_id.is_none() {
            tracing::debug!("Root record without a URL; keeping its subpages unparented");
        }

        for sub in &page.subcontent {
            let SubPage::Present(sub) = sub else {
                continue;
            };
            let Some(sub_id) = builder.add_node(sub) else {
                continue;
            };
            if let Some(root_id) = &root_id {
                builder.add_subcontent_edge(root_id, &sub_id);
            }
        }
    }

    for page in pages {
        for record in std::iter::once(page).chain(page.present_subpages()) {
            if !record.has_url() {
                continue;
            }
            let source = canonical_id(&record.url);
            for link in &record.links {
                builder.add_link_edge(&source, &canonical_id(link));
            }
        }
    }

    builder.finish()
}

/// First [`SUMMARY_CHARS`] characters of `text`, whitespace collapsed
pub fn summarize(text: &str) -> String {
    let prefix: String = text.chars().take(SUMMARY_CHARS).collect();
    prefix.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Node id for a URL: its normalized form, or the trimmed input if it
/// does not parse
fn canonical_id(url: &str) -> String {
    normalize_str(url).unwrap_or_else(|_| url.trim().to_string())
}

#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    seen_edges: HashSet<GraphEdge>,
    has_parent: HashSet<String>,
}

impl GraphBuilder {
    /// Adds a node for `record` if it has a URL; returns the node id
    fn add_node(&mut self, record: &PageRecord) -> Option<String> {
        if !record.has_url() {
            return None;
        }

        let id = canonical_id(&record.url);
        if !self.index.contains_key(&id) {
            self.index.insert(id.clone(), self.nodes.len());
            self.nodes.push(GraphNode {
                id: id.clone(),
                title: record.title.trim().to_string(),
                summary: summarize(&record.text),
            });
        }
        Some(id)
    }

    fn add_subcontent_edge(&mut self, root: &str, sub: &str) {
        if root == sub {
            return;
        }
        if !self.has_parent.insert(sub.to_string()) {
            tracing::debug!("{} already nested under another root; not linking from {}", sub, root);
            return;
        }
        self.push_edge(root, sub, Relation::HasSubcontent);
    }

    fn add_link_edge(&mut self, source: &str, target: &str) {
        if self.index.contains_key(source) && self.index.contains_key(target) {
            self.push_edge(source, target, Relation::LinksTo);
        }
    }

    fn push_edge(&mut self, source: &str, target: &str, relation: Relation) {
        let edge = GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
            relation,
        };
        if self.seen_edges.insert(edge.clone()) {
            self.edges.push(edge);
        }
    }

    fn finish(self) -> KnowledgeGraph {
        KnowledgeGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
