use crate::normalize::normalize;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// File extensions whose targets are fetched assets, not pages. Links to
/// these are dropped at extraction time so the frontier only ever holds
/// candidate pages.
pub fn default_excluded_extensions() -> Vec<String> {
    [
        "jpg", "jpeg", "png", "gif", "webp", "svg", "ico", "bmp", "css", "js", "mjs", "pdf",
        "zip", "tar", "gz", "rar", "7z", "mp3", "mp4", "webm", "avi", "mov", "woff", "woff2",
        "ttf", "eot", "xml", "rss",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Stateless extractor: HTML in, set of normalized candidate URLs out.
/// De-duplicates within the page; document order never reaches the
/// frontier, only the queue's FIFO discipline orders traversal.
pub struct LinkExtractor {
    excluded_extensions: Vec<String>,
}

impl LinkExtractor {
    pub fn new(excluded_extensions: Vec<String>) -> Self {
        Self {
            excluded_extensions,
        }
    }

    pub fn extract(&self, html: &str, base: &Url) -> HashSet<Url> {
        let document = Html::parse_document(html);
        let link_selector = Selector::parse("a[href]").unwrap();

        let mut links = HashSet::new();
        for element in document.select(&link_selector) {
            if let Some(href) = element.value().attr("href")
                && let Some(url) = normalize(href, base)
            {
                if self.is_excluded(&url) {
                    continue;
                }
                links.insert(url);
            }
        }
        links
    }

    fn is_excluded(&self, url: &Url) -> bool {
        let path = url.path().to_ascii_lowercase();
        let Some(filename) = path.rsplit('/').next() else {
            return false;
        };
        let Some((_, ext)) = filename.rsplit_once('.') else {
            return false;
        };
        self.excluded_extensions.iter().any(|e| e == ext)
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new(default_excluded_extensions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    fn urls(set: &HashSet<Url>) -> Vec<&str> {
        let mut v: Vec<&str> = set.iter().map(|u| u.as_str()).collect();
        v.sort();
        v
    }

    #[test]
    fn test_extracts_and_normalizes_hrefs() {
        let html = r#"<html><body>
            <a href="/a">A</a>
            <a href="b.html">B</a>
            <a href="https://example.com/c/">C</a>
        </body></html>"#;

        let links = LinkExtractor::default().extract(html, &base());
        assert_eq!(
            urls(&links),
            vec![
                "https://example.com/a",
                "https://example.com/b.html",
                "https://example.com/c",
            ]
        );
    }

    #[test]
    fn test_deduplicates_within_page() {
        let html = r#"<html><body>
            <a href="/a">first</a>
            <a href="/a/">again</a>
            <a href="/a#section">and again</a>
        </body></html>"#;

        let links = LinkExtractor::default().extract(html, &base());
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_asset_extensions_dropped() {
        let html = r#"<html><body>
            <a href="/photo.JPG">photo</a>
            <a href="/style.css">css</a>
            <a href="/archive.tar.gz">tarball</a>
            <a href="/page">page</a>
        </body></html>"#;

        let links = LinkExtractor::default().extract(html, &base());
        assert_eq!(urls(&links), vec!["https://example.com/page"]);
    }

    #[test]
    fn test_exclusion_list_is_configurable() {
        let html = r#"<a href="/doc.pdf">doc</a>"#;

        let keep_pdfs = LinkExtractor::new(vec!["zip".to_string()]);
        assert_eq!(keep_pdfs.extract(html, &base()).len(), 1);

        let drop_pdfs = LinkExtractor::new(vec!["pdf".to_string()]);
        assert!(drop_pdfs.extract(html, &base()).is_empty());
    }

    #[test]
    fn test_non_anchor_elements_ignored() {
        let html = r#"<html><body>
            <img src="/photo.png">
            <script src="/app.js"></script>
            <a name="anchor-without-href">x</a>
        </body></html>"#;

        let links = LinkExtractor::default().extract(html, &base());
        assert!(links.is_empty());
    }

    #[test]
    fn test_unresolvable_hrefs_dropped() {
        let html = r##"<html><body>
            <a href="javascript:void(0)">js</a>
            <a href="mailto:x@example.com">mail</a>
            <a href="#top">top</a>
            <a href="http://[broken">broken</a>
        </body></html>"##;

        let links = LinkExtractor::default().extract(html, &base());
        assert!(links.is_empty());
    }
}
