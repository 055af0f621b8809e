//! Crawling: pacing, fetching, session handling, and orchestration
//!
//! # Components
//!
//! - `pacing`: when to wait, and for how long
//! - `fetcher`: HTTP retrieval behind the [`PageFetcher`] seam
//! - `session`: optional challenge-solver and login capabilities
//! - `orchestrator`: the sequential crawl loop tying it all together

pub mod fetcher;
pub mod orchestrator;
pub mod pacing;
pub mod session;

pub use fetcher::{build_http_client, FetchOutcome, HttpFetcher, PageFetcher};
pub use orchestrator::{Orchestrator, RunScope};
pub use pacing::{PaceState, PacingController, Pause};
pub use session::{ChallengeSolver, CredentialSession, NoopSession, NoopSolver};
