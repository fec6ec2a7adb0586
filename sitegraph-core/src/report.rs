// Report and export generation from a finalized crawl

use crate::graph::SiteGraph;
use serde::{Deserialize, Serialize};
use sitegraph_crawler::CrawlResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Dot,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "dot" | "graphviz" => Some(ReportFormat::Dot),
            _ => None,
        }
    }
}

/// Render the chosen format for a crawl result.
pub fn render(result: &CrawlResult, format: &ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(result)),
        ReportFormat::Json => generate_json_report(result),
        ReportFormat::Csv => Ok(generate_edge_csv(result)),
        ReportFormat::Dot => Ok(SiteGraph::from_result(result).to_dot()),
    }
}

pub fn generate_text_report(result: &CrawlResult) -> String {
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Seed:          {}\n", result.seed));
    report.push_str(&format!("  Pages crawled: {}\n", result.nodes.len()));
    report.push_str(&format!("  Links found:   {}\n", result.edges.len()));
    report.push_str(&format!("  Broken links:  {}\n", result.broken_links.len()));
    report.push_str(&format!("  Failed fetches: {}\n", result.failed_fetches));
    if result.cancelled {
        report.push_str("  (crawl was cancelled; result is partial)\n");
    }

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Pages by depth:\n");

    let max_depth = result.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
    for depth in 0..=max_depth {
        let at_depth: Vec<_> = result.nodes.iter().filter(|n| n.depth == depth).collect();
        if at_depth.is_empty() {
            continue;
        }
        report.push_str(&format!("\n## Depth {}\n", depth));
        for node in at_depth {
            // Color code based on status
            let status_str = match node.status_code {
                200..=299 => format!("\x1b[32m{}\x1b[0m", node.status_code), // Green
                300..=399 => format!("\x1b[36m{}\x1b[0m", node.status_code), // Cyan
                _ => format!("{}", node.status_code),
            };
            report.push_str(&format!("  {} {}\n", status_str, extract_url_path(&node.url)));
        }
    }

    if !result.broken_links.is_empty() {
        report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
        report.push_str("# Broken links (404):\n\n");
        for broken in &result.broken_links {
            report.push_str(&format!("  \x1b[33m404\x1b[0m {}\n", broken.url));
            report.push_str(&format!("      via {}\n", broken.path.join(" -> ")));
        }
    }

    report.push('\n');
    report
}

pub fn generate_json_report(result: &CrawlResult) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Sitegraph",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json",
            },
            "summary": {
                "seed": result.seed,
                "pages": result.nodes.len(),
                "edges": result.edges.len(),
                "broken_links": result.broken_links.len(),
                "failed_fetches": result.failed_fetches,
                "cancelled": result.cancelled,
            },
            "nodes": result.nodes,
            "edges": result.edges,
            "broken_links": result.broken_links,
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// Edge table for spreadsheet import: one `source,target` row per link.
pub fn generate_edge_csv(result: &CrawlResult) -> String {
    let mut csv = String::from("source,target\n");
    for (source, target) in &result.edges {
        csv.push_str(&format!("{},{}\n", csv_field(source), csv_field(target)));
    }
    csv
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}
