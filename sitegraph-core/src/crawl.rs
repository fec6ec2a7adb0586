use indicatif::{ProgressBar, ProgressStyle};
use sitegraph_crawler::{CancelFlag, Crawler, CrawlResult, LoopHeuristic};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub seed: String,
    pub threads: usize,
    pub timeout_secs: u64,
    pub max_depth: Option<usize>,
    pub max_pages: Option<usize>,
    pub excluded_extensions: Option<Vec<String>>,
    pub leaf_segment: Option<String>,
    pub show_progress_bars: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            seed: String::new(),
            threads: 10,
            timeout_secs: 10,
            max_depth: None,
            max_pages: None,
            excluded_extensions: None,
            leaf_segment: Some("/blog/".to_string()),
            show_progress_bars: true,
        }
    }
}

/// Execute a crawl with the given options, wiring progress display and
/// the shared cancel flag. Returns the finalized crawl result.
pub async fn execute_crawl(options: CrawlOptions, cancel: CancelFlag) -> Result<CrawlResult, String> {
    let CrawlOptions {
        seed,
        threads,
        timeout_secs,
        max_depth,
        max_pages,
        excluded_extensions,
        leaf_segment,
        show_progress_bars,
    } = options;

    let mut crawler = Crawler::with_timeout(Duration::from_secs(timeout_secs))
        .map_err(|e| format!("Failed to build crawler: {}", e))?
        .with_cancel_flag(cancel);

    if let Some(depth) = max_depth {
        crawler = crawler.with_max_depth(depth);
    }
    if let Some(pages) = max_pages {
        crawler = crawler.with_max_pages(pages);
    }
    if let Some(extensions) = excluded_extensions {
        crawler = crawler.with_excluded_extensions(extensions);
    }
    if let Some(segment) = leaf_segment {
        crawler = crawler.with_loop_heuristic(LoopHeuristic::new(segment));
    }

    // Single spinner for overall crawl progress (only if enabled)
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let count_clone = processed_count.clone();
        crawler = crawler.with_progress_callback(Arc::new(move |_worker_id: usize, url: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            pb_clone.set_message(format!("Crawling... {} pages processed ({})", count, url));
            pb_clone.tick();
        }));
    }

    let result = crawler
        .crawl(&seed, threads)
        .await
        .map_err(|e| format!("Crawl failed: {}", e))?;

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        if result.cancelled {
            pb.finish_with_message(format!("Crawl cancelled after {} pages", total));
        } else {
            pb.finish_with_message(format!("Crawl complete! {} pages processed", total));
        }
    }

    Ok(result)
}
