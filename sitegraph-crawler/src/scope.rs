use url::Url;

/// True iff `url` lives on the same network authority as the crawl
/// origin: same scheme, host and effective port. Relative links are
/// internal by construction (the normalizer resolves them against the
/// origin before this check runs).
pub fn is_internal(url: &Url, origin: &Url) -> bool {
    url.scheme() == origin.scheme()
        && url.host_str() == origin.host_str()
        && url.port_or_known_default() == origin.port_or_known_default()
}

/// Loop-avoidance heuristic for leaf-content sections.
///
/// Blog posts commonly cross-link siblings through "related posts"
/// widgets; following those edges blows up the graph and deflates depth
/// (a lateral post looks one hop away from an unrelated one). An edge is
/// suppressed when both source and candidate are leaf pages under the
/// configured path segment. The section index (`/blog`) and pagination
/// pages (`/blog/page/2`) are structural and never suppressed.
#[derive(Debug, Clone)]
pub struct LoopHeuristic {
    segment: String,
    listing_markers: Vec<String>,
}

impl LoopHeuristic {
    pub fn new(segment: impl Into<String>) -> Self {
        let mut segment = segment.into();
        if !segment.starts_with('/') {
            segment.insert(0, '/');
        }
        if !segment.ends_with('/') {
            segment.push('/');
        }
        Self {
            segment,
            listing_markers: vec!["page".to_string()],
        }
    }

    /// Replace the path elements that mark a listing/pagination page
    /// under the segment (default: `page`).
    pub fn with_listing_markers(mut self, markers: Vec<String>) -> Self {
        self.listing_markers = markers;
        self
    }

    /// Whether the edge source -> candidate should be dropped from both
    /// the graph and the frontier.
    pub fn suppresses(&self, source: &Url, candidate: &Url) -> bool {
        self.is_leaf_page(source) && self.is_leaf_page(candidate)
    }

    fn is_leaf_page(&self, url: &Url) -> bool {
        let path = url.path();
        let Some(idx) = path.find(&self.segment) else {
            return false;
        };

        let rest = &path[idx + self.segment.len()..];
        if rest.is_empty() {
            // The section index itself.
            return false;
        }

        let first = rest.split('/').next().unwrap_or("");
        !self.listing_markers.iter().any(|m| m == first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_same_origin_is_internal() {
        let origin = url("https://example.com/");
        assert!(is_internal(&url("https://example.com/about"), &origin));
        assert!(is_internal(&url("https://example.com:443/about"), &origin));
    }

    #[test]
    fn test_other_host_is_external() {
        let origin = url("https://example.com/");
        assert!(!is_internal(&url("https://other.test/"), &origin));
        assert!(!is_internal(&url("https://sub.example.com/"), &origin));
    }

    #[test]
    fn test_scheme_and_port_must_match() {
        let origin = url("https://example.com/");
        assert!(!is_internal(&url("http://example.com/"), &origin));
        assert!(!is_internal(&url("https://example.com:8443/"), &origin));
    }

    #[test]
    fn test_cross_links_between_posts_suppressed() {
        let h = LoopHeuristic::new("/blog/");
        let a = url("https://example.com/blog/first-post");
        let b = url("https://example.com/blog/second-post");
        assert!(h.suppresses(&a, &b));
        assert!(h.suppresses(&b, &a));
    }

    #[test]
    fn test_index_links_not_suppressed() {
        let h = LoopHeuristic::new("/blog/");
        let index = url("https://example.com/blog");
        let post = url("https://example.com/blog/first-post");
        assert!(!h.suppresses(&index, &post));
        assert!(!h.suppresses(&post, &index));
    }

    #[test]
    fn test_pagination_not_suppressed() {
        let h = LoopHeuristic::new("/blog/");
        let post = url("https://example.com/blog/first-post");
        let page2 = url("https://example.com/blog/page/2");
        assert!(!h.suppresses(&post, &page2));
        assert!(!h.suppresses(&page2, &post));
    }

    #[test]
    fn test_pages_outside_segment_not_suppressed() {
        let h = LoopHeuristic::new("/blog/");
        let post = url("https://example.com/blog/first-post");
        let about = url("https://example.com/about");
        assert!(!h.suppresses(&post, &about));
        assert!(!h.suppresses(&about, &post));
    }

    #[test]
    fn test_segment_normalized_to_slashes() {
        let h = LoopHeuristic::new("news");
        let a = url("https://example.com/news/story-one");
        let b = url("https://example.com/news/story-two");
        assert!(h.suppresses(&a, &b));
    }
}
