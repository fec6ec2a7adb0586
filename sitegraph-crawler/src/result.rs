use serde::{Deserialize, Serialize};

/// A page that was fetched successfully, keyed by its normalized URL.
/// Depth is the BFS hop distance from the seed, assigned when the page
/// was first discovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageNode {
    pub url: String,
    pub depth: usize,
    pub status_code: u16,
    pub content_type: Option<String>,
}

/// A link whose target answered 404, with the literal hop path that
/// reached it from the seed. Diagnostic only, never re-traversed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokenLink {
    pub url: String,
    pub path: Vec<String>,
}

/// Finalized artifacts of one crawl. The engine returns this bundle and
/// keeps no reference to it; persistence and rendering are the concern
/// of downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub seed: String,
    pub nodes: Vec<PageNode>,
    pub edges: Vec<(String, String)>,
    pub broken_links: Vec<BrokenLink>,
    pub failed_fetches: usize,
    pub cancelled: bool,
}

impl CrawlResult {
    pub fn depth_of(&self, url: &str) -> Option<usize> {
        self.nodes.iter().find(|n| n.url == url).map(|n| n.depth)
    }

    pub fn contains_node(&self, url: &str) -> bool {
        self.nodes.iter().any(|n| n.url == url)
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edges.iter().any(|(s, t)| s == source && t == target)
    }
}
