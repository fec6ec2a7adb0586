use crate::error::{CrawlError, Result};
use crate::extract::LinkExtractor;
use crate::fetch::{FetchOutcome, Fetcher};
use crate::normalize::normalize_url;
use crate::result::{BrokenLink, CrawlResult, PageNode};
use crate::scope::{LoopHeuristic, is_internal};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Shared stop signal. Workers stop issuing fetches once set; the
/// partial result accumulated so far is returned intact.
pub type CancelFlag = Arc<AtomicBool>;

/// Frontier state shared by the worker pool. A single mutex serializes
/// every queue/graph mutation, which is what makes the check-and-mark
/// in the dequeue and enqueue paths atomic.
#[derive(Default)]
struct FrontierState {
    /// FIFO queue of (normalized URL, path from seed). One shared queue
    /// keeps dequeue order breadth-first across workers.
    queue: VecDeque<(Url, Vec<String>)>,
    /// URLs that have been dequeued and attempted.
    visited: HashSet<String>,
    /// URLs that have ever been enqueued; owns depth assignment and
    /// guarantees each URL enters the queue at most once.
    discovered: HashSet<String>,
    pages: Vec<PageNode>,
    edges: Vec<(String, String)>,
    edge_set: HashSet<(String, String)>,
    broken: Vec<BrokenLink>,
    failed: usize,
    in_flight: usize,
}

/// The crawl driver: owns the frontier, the visited set and the
/// accumulating graph, and orchestrates fetch -> extract -> filter ->
/// enqueue until the frontier drains.
pub struct Crawler {
    fetcher: Arc<Fetcher>,
    extractor: Arc<LinkExtractor>,
    loop_heuristic: Option<Arc<LoopHeuristic>>,
    max_depth: Option<usize>,
    max_pages: Option<usize>,
    progress_callback: Option<ProgressCallback>,
    cancel: CancelFlag,
}

impl Crawler {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(10))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            fetcher: Arc::new(Fetcher::new(timeout)?),
            extractor: Arc::new(LinkExtractor::default()),
            loop_heuristic: None,
            max_depth: None,
            max_pages: None,
            progress_callback: None,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.max_pages = Some(pages);
        self
    }

    pub fn with_excluded_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extractor = Arc::new(LinkExtractor::new(extensions));
        self
    }

    pub fn with_loop_heuristic(mut self, heuristic: LoopHeuristic) -> Self {
        self.loop_heuristic = Some(Arc::new(heuristic));
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Crawl the site reachable from `seed`, with `workers` concurrent
    /// fetches. An unparseable or non-http(s) seed is the only fatal
    /// error; per-page failures are classified and absorbed.
    pub async fn crawl(&self, seed: &str, workers: usize) -> Result<CrawlResult> {
        let parsed = Url::parse(seed)
            .map_err(|e| CrawlError::InvalidSeed(format!("{}: {}", seed, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(CrawlError::InvalidSeed(format!(
                "{}: unsupported scheme '{}'",
                seed,
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none() {
            return Err(CrawlError::InvalidSeed(format!("{}: missing host", seed)));
        }

        let origin = normalize_url(&parsed);
        let seed_key = origin.as_str().to_string();
        let workers = workers.max(1);

        info!("Starting crawl of {} with {} workers", seed_key, workers);

        let state = Arc::new(Mutex::new(FrontierState::default()));
        {
            let mut st = state.lock().await;
            st.discovered.insert(seed_key.clone());
            st.queue.push_back((origin.clone(), vec![seed_key.clone()]));
        }

        let mut worker_handles = Vec::new();
        for worker_id in 0..workers {
            let fetcher = self.fetcher.clone();
            let extractor = self.extractor.clone();
            let loop_heuristic = self.loop_heuristic.clone();
            let progress_callback = self.progress_callback.clone();
            let cancel = self.cancel.clone();
            let max_depth = self.max_depth;
            let max_pages = self.max_pages;
            let origin = origin.clone();
            let state = state.clone();

            let handle = tokio::spawn(async move {
                debug!("Worker {} started", worker_id);

                loop {
                    if cancel.load(Ordering::Relaxed) {
                        debug!("Worker {} cancelled", worker_id);
                        break;
                    }

                    let item = {
                        let mut st = state.lock().await;
                        if let Some(item) = st.queue.pop_front() {
                            st.in_flight += 1;
                            Some(item)
                        } else if st.in_flight == 0 {
                            break;
                        } else {
                            None
                        }
                    };

                    let Some((url, path)) = item else {
                        // Queue drained but peers may still produce work.
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        continue;
                    };

                    let key = url.as_str().to_string();

                    // Defensive re-check; the discovered set should keep
                    // duplicates out of the queue entirely.
                    let already_visited = {
                        let mut st = state.lock().await;
                        !st.visited.insert(key.clone())
                    };
                    if already_visited {
                        state.lock().await.in_flight -= 1;
                        continue;
                    }

                    if let Some(ref callback) = progress_callback {
                        callback(worker_id, key.clone());
                    }

                    let depth = path.len() - 1;
                    match fetcher.fetch(&url).await {
                        FetchOutcome::NotFound => {
                            warn!("Broken link: {}", key);
                            let mut st = state.lock().await;
                            st.broken.push(BrokenLink { url: key, path });
                        }
                        FetchOutcome::Failed(reason) => {
                            warn!("Fetch failed for {}: {}", key, reason);
                            let mut st = state.lock().await;
                            st.failed += 1;
                        }
                        FetchOutcome::Success {
                            status,
                            content_type,
                            body,
                        } => {
                            let is_html = content_type
                                .as_ref()
                                .map(|ct| ct.contains("text/html"))
                                .unwrap_or(false);

                            // Relative hrefs resolve against the site
                            // origin, matching how the pages address it.
                            let candidates = if is_html {
                                extractor.extract(&body, &origin)
                            } else {
                                HashSet::new()
                            };

                            let mut st = state.lock().await;
                            st.pages.push(PageNode {
                                url: key.clone(),
                                depth,
                                status_code: status,
                                content_type,
                            });

                            for candidate in candidates {
                                if !is_internal(&candidate, &origin) {
                                    continue;
                                }
                                if let Some(ref heuristic) = loop_heuristic
                                    && heuristic.suppresses(&url, &candidate)
                                {
                                    debug!("Suppressed lateral link {} -> {}", key, candidate);
                                    continue;
                                }

                                let candidate_key = candidate.as_str().to_string();
                                if candidate_key == key {
                                    continue;
                                }

                                if !st.discovered.contains(&candidate_key) {
                                    if max_depth.is_some_and(|limit| depth + 1 > limit) {
                                        continue;
                                    }
                                    if max_pages.is_some_and(|limit| st.discovered.len() >= limit)
                                    {
                                        continue;
                                    }
                                    st.discovered.insert(candidate_key.clone());
                                    let mut next_path = path.clone();
                                    next_path.push(candidate_key.clone());
                                    st.queue.push_back((candidate, next_path));
                                }

                                // Edges are recorded whenever discovered,
                                // including back edges into pages already
                                // visited or queued; the set makes
                                // rediscovery idempotent.
                                let edge = (key.clone(), candidate_key);
                                if st.edge_set.insert(edge.clone()) {
                                    st.edges.push(edge);
                                }
                            }
                        }
                    }

                    state.lock().await.in_flight -= 1;
                }

                debug!("Worker {} finished", worker_id);
            });

            worker_handles.push(handle);
        }

        for handle in worker_handles {
            handle.await?;
        }

        let st = std::mem::take(&mut *state.lock().await);
        let result = Self::finalize(seed_key, st, self.cancel.load(Ordering::Relaxed));

        info!(
            "Crawl complete: {} pages, {} edges, {} broken links, {} failed fetches",
            result.nodes.len(),
            result.edges.len(),
            result.broken_links.len(),
            result.failed_fetches
        );

        Ok(result)
    }

    /// Freeze the frontier state into the immutable result bundle.
    /// Nodes are the successfully fetched pages; edges into targets that
    /// turned out broken, failed or never-fetched are pruned (those URLs
    /// live in the broken-link and failure tallies instead).
    fn finalize(seed: String, st: FrontierState, cancelled: bool) -> CrawlResult {
        let node_urls: HashSet<&str> = st.pages.iter().map(|p| p.url.as_str()).collect();

        let edges = st
            .edges
            .iter()
            .filter(|(s, t)| node_urls.contains(s.as_str()) && node_urls.contains(t.as_str()))
            .cloned()
            .collect();

        let mut nodes = st.pages;
        nodes.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.url.cmp(&b.url)));

        CrawlResult {
            seed,
            nodes,
            edges,
            broken_links: st.broken,
            failed_fetches: st.failed,
            cancelled,
        }
    }
}
