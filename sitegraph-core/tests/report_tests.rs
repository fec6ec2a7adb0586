// Tests for report generation

use sitegraph_core::report::{
    ReportFormat, extract_url_path, generate_edge_csv, generate_json_report, generate_text_report,
    render,
};
use sitegraph_crawler::{BrokenLink, CrawlResult, PageNode};

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
        edges: vec![(
            "https://x.test/".to_string(),
            "https://x.test/a".to_string(),
        )],
        broken_links: vec![BrokenLink {
            url: "https://x.test/a/b".to_string(),
            path: vec![
                "https://x.test/".to_string(),
                "https://x.test/a".to_string(),
                "https://x.test/a/b".to_string(),
            ],
        }],
        failed_fetches: 1,
        cancelled: false,
    }
}

#[test]
fn test_text_report_summarizes_the_crawl() {
    let report = generate_text_report(&sample_result());

    assert!(report.contains("Pages crawled: 2"));
    assert!(report.contains("Broken links:  1"));
    assert!(report.contains("Failed fetches: 1"));
    assert!(report.contains("Depth 0"));
    assert!(report.contains("Depth 1"));
    assert!(report.contains("/a"));
}

#[test]
fn test_text_report_shows_broken_link_path_chain() {
    let report = generate_text_report(&sample_result());

    assert!(report.contains("404"));
    assert!(report.contains("https://x.test/a/b"));
    assert!(report.contains("https://x.test/ -> https://x.test/a -> https://x.test/a/b"));
}

#[test]
fn test_text_report_marks_partial_results() {
    let mut result = sample_result();
    result.cancelled = true;

    let report = generate_text_report(&result);
    assert!(report.contains("cancelled"));
}

#[test]
fn test_json_report_round_trips_nodes_and_edges() {
    let json = generate_json_report(&sample_result()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let report = &value["report"];
    assert_eq!(report["metadata"]["generator"], "Sitegraph");
    assert_eq!(report["summary"]["pages"], 2);
    assert_eq!(report["summary"]["broken_links"], 1);
    assert_eq!(report["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(report["edges"].as_array().unwrap().len(), 1);
    assert_eq!(
        report["broken_links"][0]["path"].as_array().unwrap().len(),
        3
    );
}

#[test]
fn test_edge_csv_has_header_and_one_row_per_edge() {
    let csv = generate_edge_csv(&sample_result());
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "source,target");
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "https://x.test/,https://x.test/a");
}

#[test]
fn test_edge_csv_quotes_awkward_urls() {
    let mut result = sample_result();
    result.edges = vec![(
        "https://x.test/search?q=a,b".to_string(),
        "https://x.test/a".to_string(),
    )];

    let csv = generate_edge_csv(&result);
    assert!(csv.contains("\"https://x.test/search?q=a,b\",https://x.test/a"));
}

#[test]
fn test_render_dispatches_on_format() {
    let result = sample_result();

    assert!(render(&result, &ReportFormat::Text).unwrap().contains("Summary"));
    assert!(render(&result, &ReportFormat::Csv).unwrap().starts_with("source,target"));
    assert!(render(&result, &ReportFormat::Dot).unwrap().starts_with("digraph"));
    serde_json::from_str::<serde_json::Value>(&render(&result, &ReportFormat::Json).unwrap())
        .unwrap();
}

#[test]
fn test_report_format_from_str() {
    assert!(matches!(ReportFormat::from_str("text"), Some(ReportFormat::Text)));
    assert!(matches!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json)));
    assert!(matches!(ReportFormat::from_str("csv"), Some(ReportFormat::Csv)));
    assert!(matches!(ReportFormat::from_str("graphviz"), Some(ReportFormat::Dot)));
    assert!(ReportFormat::from_str("xlsx").is_none());
}

#[test]
fn test_extract_url_path() {
    assert_eq!(extract_url_path("http://example.com/"), "/");
    assert_eq!(extract_url_path("http://example.com"), "/");
    assert_eq!(extract_url_path("http://example.com/api/v1"), "/api/v1");
    assert_eq!(extract_url_path("not a valid url"), "not a valid url");
}
