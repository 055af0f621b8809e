//! Request pacing and backoff
//!
//! All timing decisions live here: randomized inter-request delays, the
//! periodic long rest whose threshold re-randomizes with a raised floor
//! after each rest, and the fixed cooldown taken when consecutive
//! transient failures look like a ban. The controller only decides
//! durations; the orchestrator performs the actual sleeps.

use crate::config::PacingConfig;
use crate::state::CrawlState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{info, warn};

/// Pacing posture of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceState {
    /// Requests flow with only the short randomized delays
    Normal,
    /// The serviced-request threshold was hit; a long rest is due
    Resting,
    /// Consecutive transient failures crossed the ban threshold
    Banned,
}

/// A pause the orchestrator must serve before the next request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Periodic long rest
    Rest(Duration),
    /// Cooldown after a suspected ban
    BanCooldown(Duration),
}

impl Pause {
    pub fn duration(&self) -> Duration {
        match self {
            Pause::Rest(d) | Pause::BanCooldown(d) => *d,
        }
    }
}

/// Decides when and how long to wait between requests.
///
/// Holds its own RNG so runs can be made deterministic in tests via
/// [`PacingController::with_seed`].
pub struct PacingController {
    config: PacingConfig,
    rng: StdRng,
    state: PaceState,
    /// Requests serviced since the last long rest
    serviced: u32,
    /// Lower bound for the next threshold draw; rises after each rest
    rest_floor: u32,
    /// Serviced count at which the next long rest triggers
    next_rest_at: u32,
}

impl PacingController {
    pub fn new(config: PacingConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic construction for tests.
    pub fn with_seed(config: PacingConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: PacingConfig, mut rng: StdRng) -> Self {
        let rest_floor = config.rest_after_min;
        let next_rest_at = rng.gen_range(rest_floor..=config.rest_after_max);
        Self {
            config,
            rng,
            state: PaceState::Normal,
            serviced: 0,
            rest_floor,
            next_rest_at,
        }
    }

    pub fn state(&self) -> PaceState {
        self.state
    }

    /// Requests left before the next long rest triggers.
    pub fn requests_until_rest(&self) -> u32 {
        self.next_rest_at.saturating_sub(self.serviced)
    }

    /// Randomized delay before a per-listing request.
    pub fn next_listing_delay(&mut self) -> Duration {
        self.random_delay(
            self.config.listing_delay_min_secs,
            self.config.listing_delay_max_secs,
        )
    }

    /// Randomized delay between list pages.
    pub fn next_page_delay(&mut self) -> Duration {
        self.random_delay(
            self.config.page_delay_min_secs,
            self.config.page_delay_max_secs,
        )
    }

    fn random_delay(&mut self, min: f64, max: f64) -> Duration {
        let secs = if max > min {
            self.rng.gen_range(min..=max)
        } else {
            min
        };
        Duration::from_secs_f64(secs)
    }

    /// A request completed and yielded usable content.
    pub fn record_success(&mut self, state: &mut CrawlState) {
        state.consecutive_errors = 0;
        self.serviced += 1;
    }

    /// A request failed in a way that may be rate-limiting in disguise
    /// (timeout, connection reset). Enough of these in a row and the
    /// controller treats the run as banned.
    pub fn record_transient_failure(&mut self, state: &mut CrawlState) {
        state.consecutive_errors += 1;
        warn!(
            consecutive = state.consecutive_errors,
            threshold = self.config.max_errors_before_ban,
            "Transient fetch failure"
        );
        if state.consecutive_errors >= self.config.max_errors_before_ban {
            self.state = PaceState::Banned;
        }
    }

    /// A request failed definitively (HTTP error, unparseable page).
    /// Definitive failures are not ban evidence, so the streak resets.
    pub fn record_hard_failure(&mut self, state: &mut CrawlState) {
        state.consecutive_errors = 0;
    }

    /// Checks whether a pause is due before the next request
    ///
    /// # Returns
    ///
    /// * `Some(Pause)` - A pause the caller must serve, reporting back
    ///   through [`PacingController::pause_elapsed`] once it has slept
    /// * `None` - Requests may continue with only the short delays
    pub fn check_pause(&mut self) -> Option<Pause> {
        match self.state {
            PaceState::Banned => {
                let cooldown = Duration::from_secs(self.config.ban_cooldown_secs);
                warn!(secs = cooldown.as_secs(), "Suspected ban, cooling down");
                Some(Pause::BanCooldown(cooldown))
            }
            PaceState::Normal if self.serviced >= self.next_rest_at => {
                self.state = PaceState::Resting;
                let rest = Duration::from_secs(
                    self.rng
                        .gen_range(self.config.rest_min_secs..=self.config.rest_max_secs),
                );
                info!(
                    after = self.serviced,
                    secs = rest.as_secs(),
                    "Taking a long rest"
                );
                Some(Pause::Rest(rest))
            }
            _ => None,
        }
    }

    /// The caller finished serving a pause. Resets counters and draws a
    /// fresh rest threshold with the floor raised, so rest intervals drift
    /// upward over a long run instead of repeating a fixed period.
    pub fn pause_elapsed(&mut self, state: &mut CrawlState) {
        if self.state == PaceState::Banned {
            state.consecutive_errors = 0;
        }
        self.state = PaceState::Normal;
        self.serviced = 0;
        self.rest_floor = (self.rest_floor + 2).min(self.config.rest_after_max);
        self.next_rest_at = self
            .rng
            .gen_range(self.rest_floor..=self.config.rest_after_max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> PacingConfig {
        PacingConfig {
            listing_delay_min_secs: 0.0,
            listing_delay_max_secs: 0.01,
            page_delay_min_secs: 0.0,
            page_delay_max_secs: 0.01,
            rest_after_min: 3,
            rest_after_max: 3,
            rest_min_secs: 1,
            rest_max_secs: 1,
            ban_cooldown_secs: 900,
            max_errors_before_ban: 3,
        }
    }

    #[test]
    fn test_listing_delay_within_range() {
        let config = PacingConfig::default();
        let mut pacing = PacingController::with_seed(config.clone(), 7);
        for _ in 0..100 {
            let d = pacing.next_listing_delay().as_secs_f64();
            assert!(d >= config.listing_delay_min_secs);
            assert!(d <= config.listing_delay_max_secs);
        }
    }

    #[test]
    fn test_rest_triggers_at_threshold() {
        let mut pacing = PacingController::with_seed(fast_config(), 1);
        let mut state = CrawlState::new();

        for _ in 0..2 {
            pacing.record_success(&mut state);
            assert!(pacing.check_pause().is_none());
        }
        pacing.record_success(&mut state);

        match pacing.check_pause() {
            Some(Pause::Rest(d)) => assert_eq!(d.as_secs(), 1),
            other => panic!("expected a rest, got {:?}", other),
        }
        assert_eq!(pacing.state(), PaceState::Resting);

        pacing.pause_elapsed(&mut state);
        assert_eq!(pacing.state(), PaceState::Normal);
        assert!(pacing.check_pause().is_none());
    }

    #[test]
    fn test_ban_after_consecutive_transient_failures() {
        let mut pacing = PacingController::with_seed(fast_config(), 1);
        let mut state = CrawlState::new();

        pacing.record_transient_failure(&mut state);
        pacing.record_transient_failure(&mut state);
        assert_eq!(pacing.state(), PaceState::Normal);

        pacing.record_transient_failure(&mut state);
        assert_eq!(pacing.state(), PaceState::Banned);

        match pacing.check_pause() {
            Some(Pause::BanCooldown(d)) => assert_eq!(d.as_secs(), 900),
            other => panic!("expected ban cooldown, got {:?}", other),
        }

        pacing.pause_elapsed(&mut state);
        assert_eq!(pacing.state(), PaceState::Normal);
        assert_eq!(state.consecutive_errors, 0);
    }

    #[test]
    fn test_success_resets_error_streak() {
        let mut pacing = PacingController::with_seed(fast_config(), 1);
        let mut state = CrawlState::new();

        pacing.record_transient_failure(&mut state);
        pacing.record_transient_failure(&mut state);
        pacing.record_success(&mut state);
        assert_eq!(state.consecutive_errors, 0);

        pacing.record_transient_failure(&mut state);
        assert_eq!(pacing.state(), PaceState::Normal);
    }

    #[test]
    fn test_hard_failure_resets_streak_without_ban() {
        let mut pacing = PacingController::with_seed(fast_config(), 1);
        let mut state = CrawlState::new();

        pacing.record_transient_failure(&mut state);
        pacing.record_transient_failure(&mut state);
        pacing.record_hard_failure(&mut state);
        assert_eq!(state.consecutive_errors, 0);
        assert_eq!(pacing.state(), PaceState::Normal);
    }

    #[test]
    fn test_rest_floor_rises_after_each_rest() {
        let config = PacingConfig {
            rest_after_min: 15,
            rest_after_max: 25,
            ..fast_config()
        };
        let mut pacing = PacingController::with_seed(config, 42);
        let mut state = CrawlState::new();

        let first = pacing.next_rest_at;
        assert!((15..=25).contains(&first));

        for _ in 0..first {
            pacing.record_success(&mut state);
        }
        assert!(matches!(pacing.check_pause(), Some(Pause::Rest(_))));
        pacing.pause_elapsed(&mut state);

        assert_eq!(pacing.rest_floor, 17);
        assert!((17..=25).contains(&pacing.next_rest_at));
    }
}
