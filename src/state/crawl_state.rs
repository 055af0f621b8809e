//! Per-run mutable counters

/// Process-wide, per-run crawl state.
///
/// Initialized at run start, mutated by the orchestrator and the pacing
/// controller on every request outcome, discarded at run end.
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    /// Detail pages processed (attempted), across all districts
    pub processed: u64,

    /// Records that passed filtering and reached the sink
    pub saved: u64,

    /// Records dropped by the signal or district filters
    pub skipped: u64,

    /// Content-level misses (challenge timeout, failed post-solve refetch)
    pub misses: u64,

    /// Network-level fetch failures; kept apart from content misses
    pub fetch_failures: u64,

    /// Consecutive transient-fetch failures; ban detection input
    pub consecutive_errors: u32,

    /// Whether the credential session has been established
    pub logged_in: bool,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }
}
