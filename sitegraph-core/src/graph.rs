use petgraph::Direction;
use petgraph::dot::{Config as DotConfig, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use sitegraph_crawler::{CrawlResult, PageNode};
use std::collections::HashMap;
use url::Url;

/// Directed page-reachability graph built from a finalized crawl.
/// Node identity is the normalized URL; duplicate edges cannot occur by
/// construction (the engine de-duplicates at discovery time and this
/// builder checks again on load).
pub struct SiteGraph {
    graph: DiGraph<PageNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl SiteGraph {
    pub fn from_result(result: &CrawlResult) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for node in &result.nodes {
            let idx = graph.add_node(node.clone());
            index.insert(node.url.clone(), idx);
        }

        for (source, target) in &result.edges {
            // Edges referencing pruned nodes can appear in hand-edited
            // stores; skip rather than panic.
            if let (Some(&s), Some(&t)) = (index.get(source), index.get(target))
                && graph.find_edge(s, t).is_none()
            {
                graph.add_edge(s, t, ());
            }
        }

        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PageNode> {
        self.graph.node_weights()
    }

    pub fn depth_of(&self, url: &str) -> Option<usize> {
        self.index.get(url).map(|&idx| self.graph[idx].depth)
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        match (self.index.get(source), self.index.get(target)) {
            (Some(&s), Some(&t)) => self.graph.find_edge(s, t).is_some(),
            _ => false,
        }
    }

    /// Outgoing link targets of a page, for report drill-downs.
    pub fn links_from(&self, url: &str) -> Vec<&str> {
        let Some(&idx) = self.index.get(url) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n].url.as_str())
            .collect()
    }

    /// Graphviz rendering of the node-link diagram. Nodes are labeled
    /// with their path and BFS depth to keep the plot readable.
    pub fn to_dot(&self) -> String {
        let labeled = self.graph.map(
            |_, node| {
                let label = Url::parse(&node.url)
                    .map(|u| u.path().to_string())
                    .unwrap_or_else(|_| node.url.clone());
                format!("{} (depth {})", label, node.depth)
            },
            |_, _| "",
        );
        format!(
            "{}",
            Dot::with_config(&labeled, &[DotConfig::EdgeNoLabel])
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> CrawlResult {
        CrawlResult {
            seed: "https://x.test/".to_string(),
            nodes: vec![
                PageNode {
                    url: "https://x.test/".to_string(),
                    depth: 0,
                    status_code: 200,
                    content_type: Some("text/html".to_string()),
                },
                PageNode {
                    url: "https://x.test/a".to_string(),
                    depth: 1,
                    status_code: 200,
                    content_type: Some("text/html".to_string()),
                },
            ],
            edges: vec![
                ("https://x.test/".to_string(), "https://x.test/a".to_string()),
                ("https://x.test/a".to_string(), "https://x.test/".to_string()),
            ],
            broken_links: vec![],
            failed_fetches: 0,
            cancelled: false,
        }
    }

    #[test]
    fn test_builds_nodes_and_edges() {
        let graph = SiteGraph::from_result(&sample_result());
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains_edge("https://x.test/", "https://x.test/a"));
        assert!(graph.contains_edge("https://x.test/a", "https://x.test/"));
        assert_eq!(graph.depth_of("https://x.test/a"), Some(1));
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut result = sample_result();
        result
            .edges
            .push(("https://x.test/".to_string(), "https://x.test/a".to_string()));

        let graph = SiteGraph::from_result(&result);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_edges_to_unknown_nodes_skipped() {
        let mut result = sample_result();
        result.edges.push((
            "https://x.test/a".to_string(),
            "https://x.test/missing".to_string(),
        ));

        let graph = SiteGraph::from_result(&result);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_links_from() {
        let graph = SiteGraph::from_result(&sample_result());
        assert_eq!(graph.links_from("https://x.test/"), vec!["https://x.test/a"]);
        assert!(graph.links_from("https://x.test/unknown").is_empty());
    }

    #[test]
    fn test_dot_rendering_labels_paths_and_depths() {
        let dot = SiteGraph::from_result(&sample_result()).to_dot();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("/a (depth 1)"));
        assert!(dot.contains("->"));
    }
}
