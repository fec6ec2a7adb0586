use crate::error::Result;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Classified outcome of one page retrieval.
///
/// Only 404 is a reportable broken link; every other non-2xx status and
/// any transport failure is a dead end the engine counts but does not
/// expand.
#[derive(Debug)]
pub enum FetchOutcome {
    Success {
        status: u16,
        content_type: Option<String>,
        body: String,
    },
    NotFound,
    Failed(String),
}

/// Thin stateful-client, stateless-per-call boundary around reqwest.
/// Every request is bounded by the configured timeout; no retries.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("Sitegraph/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(timeout / 2)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &Url) -> FetchOutcome {
        debug!("Fetching {}", url);

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Failed(e.to_string()),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return FetchOutcome::NotFound;
        }
        if !status.is_success() {
            return FetchOutcome::Failed(format!("HTTP status {}", status.as_u16()));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        match response.text().await {
            Ok(body) => FetchOutcome::Success {
                status: status.as_u16(),
                content_type,
                body,
            },
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }
}
