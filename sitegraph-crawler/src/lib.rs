pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod result;
pub mod scope;

pub use crawler::{CancelFlag, Crawler, ProgressCallback};
pub use error::CrawlError;
pub use extract::LinkExtractor;
pub use fetch::{FetchOutcome, Fetcher};
pub use result::{BrokenLink, CrawlResult, PageNode};
pub use scope::LoopHeuristic;
