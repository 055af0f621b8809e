//! Session concerns: challenge solving and credential login
//!
//! Both are optional capabilities behind traits. The default no-op
//! implementations make the crawl degrade gracefully: a challenge page
//! with no solver configured is counted as a miss, not an error.

use std::time::Duration;
use tracing::debug;

/// Clears anti-bot challenge pages (e.g. a captcha interstitial).
pub trait ChallengeSolver {
    /// Attempts to solve the challenge on the given page. Returns true if
    /// the page should be refetched afterwards.
    fn solve(
        &self,
        page_html: &str,
        timeout: Duration,
    ) -> impl std::future::Future<Output = bool> + Send;
}

/// Establishes an authenticated session so contact data becomes visible.
pub trait CredentialSession {
    /// Attempts a login. Returns true if the session is now authenticated.
    fn login(
        &self,
        identity: &str,
        secret: &str,
    ) -> impl std::future::Future<Output = bool> + Send;
}

/// Solver used when no external service is configured.
pub struct NoopSolver;

impl ChallengeSolver for NoopSolver {
    async fn solve(&self, _page_html: &str, _timeout: Duration) -> bool {
        debug!("No challenge solver configured, skipping");
        false
    }
}

/// Session used when no credentials are configured.
pub struct NoopSession;

impl CredentialSession for NoopSession {
    async fn login(&self, _identity: &str, _secret: &str) -> bool {
        debug!("No credential session configured, staying anonymous");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_solver_declines() {
        let solver = NoopSolver;
        assert!(!solver.solve("<html></html>", Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_noop_session_stays_anonymous() {
        let session = NoopSession;
        assert!(!session.login("user", "pass").await);
    }
}
