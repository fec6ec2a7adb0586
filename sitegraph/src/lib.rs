// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{expand_database_path, parse_seed_url};

// Re-export crawl functionality from sitegraph-core
pub use sitegraph_core::crawl::{CrawlOptions, execute_crawl};
pub use sitegraph_core::report::{ReportFormat, render, save_report};
