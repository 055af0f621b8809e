//! HTTP fetching
//!
//! Wraps reqwest behind the [`PageFetcher`] trait so the orchestrator can
//! be driven by a mock in tests. Outcome classification matters more than
//! the body here: the pacing layer treats timeouts and connection resets
//! as potential rate-limiting, while HTTP-level errors are definitive.

use crate::Result;
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::time::Duration;
use tracing::debug;

/// Desktop browser identities rotated across requests.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Classified result of one page fetch
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// 2xx response with a body
    Success {
        final_url: String,
        status: u16,
        body: String,
    },
    /// Non-2xx response; definitive, not ban evidence
    HttpError { status: u16 },
    /// Timeout or connection-level failure; possible rate-limiting
    Transient { error: String },
    /// Any other client failure
    Failed { error: String },
}

impl FetchOutcome {
    /// Whether this outcome feeds the consecutive-error ban counter.
    pub fn is_ban_signal(&self) -> bool {
        matches!(self, FetchOutcome::Transient { .. })
    }
}

/// Abstraction over page retrieval.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl std::future::Future<Output = FetchOutcome> + Send;
}

/// Builds the HTTP client shared by a run.
///
/// No default User-Agent is set; [`HttpFetcher`] rotates one per request.
pub fn build_http_client(request_timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

/// Production fetcher backed by reqwest.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn pick_user_agent() -> &'static str {
        USER_AGENTS
            .choose(&mut thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0])
    }

    fn classify_error(error: reqwest::Error) -> FetchOutcome {
        let message = error.to_string();
        if error.is_timeout() || error.is_connect() || message.contains("reset") {
            FetchOutcome::Transient { error: message }
        } else {
            FetchOutcome::Failed { error: message }
        }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        debug!(url, "Fetching page");

        let response = match self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, Self::pick_user_agent())
            .header(
                reqwest::header::ACCEPT_LANGUAGE,
                "ru-RU,ru;q=0.9,en-US;q=0.8",
            )
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Self::classify_error(e),
        };

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return FetchOutcome::HttpError {
                status: status.as_u16(),
            };
        }

        match response.text().await {
            Ok(body) => FetchOutcome::Success {
                final_url,
                status: status.as_u16(),
                body,
            },
            Err(e) => Self::classify_error(e),
        }
    }
}
