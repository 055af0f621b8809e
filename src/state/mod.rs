//! Run-level state
//!
//! `CrawlState` is the single explicit value that replaces what would
//! otherwise be global mutable counters: it is owned by the orchestrator,
//! handed to the pacing controller on every request outcome, and discarded
//! at run end. A rerun starts cold; continuity comes from the append-only
//! checkpoint files, never from this state.

mod crawl_state;

pub use crawl_state::CrawlState;
