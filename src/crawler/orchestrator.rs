//! Crawl orchestration
//!
//! Drives the whole pipeline for a `(cities, districts, pages)` scope:
//! list pages are walked sequentially, each listing link is fetched after
//! a pacing delay, the page is assembled into a record, filtered, and
//! appended to a per-scope checkpoint sink. The crawl is deliberately
//! single-threaded; politeness is the point, not throughput.

use crate::config::Config;
use crate::crawler::fetcher::{FetchOutcome, PageFetcher};
use crate::crawler::pacing::PacingController;
use crate::crawler::session::{ChallengeSolver, CredentialSession};
use crate::districts::{City, District};
use crate::extract::links::{extract_listing_links, has_next_page, listing_id};
use crate::extract::phone::{extract_phones, has_challenge};
use crate::output::{CheckpointSink, RunSummary};
use crate::record::{assemble, matches_district};
use crate::state::CrawlState;
use crate::{Result, ScoutError};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// What one run covers
#[derive(Debug, Clone)]
pub struct RunScope {
    pub cities: Vec<City>,

    /// Districts to crawl; empty means whole-city, unfiltered
    pub districts: Vec<&'static District>,

    /// List pages to walk per district
    pub pages: u32,

    /// Stop after this many saved records; 0 means unlimited
    pub max_listings: u64,

    pub output_dir: PathBuf,
}

/// Sequential crawl driver, generic over its I/O seams so tests can
/// substitute mocks for the network, the solver, and the login flow.
pub struct Orchestrator<F, S, C> {
    fetcher: F,
    solver: S,
    session: C,
    config: Config,
    scope: RunScope,
    pacing: PacingController,
    state: CrawlState,
    shutdown: Arc<AtomicBool>,
}

impl<F, S, C> Orchestrator<F, S, C>
where
    F: PageFetcher,
    S: ChallengeSolver,
    C: CredentialSession,
{
    pub fn new(
        fetcher: F,
        solver: S,
        session: C,
        config: Config,
        scope: RunScope,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let pacing = PacingController::new(config.pacing.clone());
        Self {
            fetcher,
            solver,
            session,
            config,
            scope,
            pacing,
            state: CrawlState::new(),
            shutdown,
        }
    }

    /// Test constructor with a seeded pacing controller.
    pub fn with_pacing(
        fetcher: F,
        solver: S,
        session: C,
        config: Config,
        scope: RunScope,
        shutdown: Arc<AtomicBool>,
        pacing: PacingController,
    ) -> Self {
        Self {
            fetcher,
            solver,
            session,
            config,
            scope,
            pacing,
            state: CrawlState::new(),
            shutdown,
        }
    }

    /// Runs the crawl to completion and returns the aggregated summary.
    pub async fn run(mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for city in self.scope.cities.clone() {
            let districts: Vec<Option<&'static District>> = {
                let for_city: Vec<_> = self
                    .scope
                    .districts
                    .iter()
                    .filter(|d| d.city == city)
                    .copied()
                    .map(Some)
                    .collect();
                if for_city.is_empty() {
                    vec![None]
                } else {
                    for_city
                }
            };

            for district in districts {
                if self.stop_requested(&summary) {
                    break;
                }
                self.crawl_scope(city, district, &mut summary).await?;
            }
        }

        summary.processed = self.state.processed;
        summary.skipped = self.state.skipped;
        summary.misses = self.state.misses;
        summary.fetch_failures = self.state.fetch_failures;
        Ok(summary)
    }

    /// Crawls one `(city, district)` scope into its own sink.
    async fn crawl_scope(
        &mut self,
        city: City,
        district: Option<&'static District>,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let scope_label = match district {
            Some(d) => format!("{}/{}", city.slug(), d.slug),
            None => format!("{}/all", city.slug()),
        };
        let stem = match district {
            Some(d) => format!("krisha_{}_{}", city.slug(), d.slug),
            None => format!("krisha_{}_all", city.slug()),
        };
        info!(scope = %scope_label, "Crawling scope");

        let mut sink = CheckpointSink::new(
            &self.scope.output_dir,
            &stem,
            self.config.output.flush_every,
        )?;

        let result = self
            .crawl_pages(city, district, &scope_label, &mut sink, summary)
            .await;

        // Whatever happened, push buffered records out before returning
        let flush_result = sink.finalize();
        match result {
            Err(e @ ScoutError::Sink(_)) => return Err(e),
            Err(e) => {
                warn!(scope = %scope_label, error = %e, "Scope crawl aborted");
            }
            Ok(()) => {}
        }
        flush_result?;
        Ok(())
    }

    async fn crawl_pages(
        &mut self,
        city: City,
        district: Option<&'static District>,
        scope_label: &str,
        sink: &mut CheckpointSink,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let mut seen_ids: HashSet<u64> = HashSet::new();

        for page in 1..=self.scope.pages {
            if self.stop_requested(summary) {
                break;
            }

            let list_url = self.list_url(city, district, page);
            debug!(url = %list_url, "Fetching list page");

            let body = match self.fetcher.fetch(&list_url).await {
                FetchOutcome::Success { body, .. } => body,
                outcome => {
                    warn!(url = %list_url, ?outcome, "List page fetch failed, ending scope");
                    break;
                }
            };

            let links = extract_listing_links(&body, &self.config.site.base_url);
            info!(page, links = links.len(), "List page parsed");

            if links.is_empty() {
                // No candidates means no more results, not an error
                debug!(page, "Empty list page, ending scope");
                break;
            }

            for link in links {
                if self.stop_requested(summary) {
                    return Ok(());
                }
                if let Some(id) = listing_id(&link) {
                    if !seen_ids.insert(id) {
                        continue;
                    }
                }
                self.process_listing(&link, city, district, scope_label, sink, summary)
                    .await?;
            }

            if page < self.scope.pages {
                if !has_next_page(&body) {
                    debug!(page, "No further pages advertised");
                    break;
                }
                sleep(self.pacing.next_page_delay()).await;
            }
        }

        Ok(())
    }

    async fn process_listing(
        &mut self,
        url: &str,
        city: City,
        district: Option<&'static District>,
        scope_label: &str,
        sink: &mut CheckpointSink,
        summary: &mut RunSummary,
    ) -> Result<()> {
        self.serve_pause().await;
        sleep(self.pacing.next_listing_delay()).await;

        self.state.processed += 1;

        let (final_url, body) = match self.fetcher.fetch(url).await {
            FetchOutcome::Success {
                final_url, body, ..
            } => {
                self.pacing.record_success(&mut self.state);
                (final_url, body)
            }
            FetchOutcome::Transient { error } => {
                warn!(url, error, "Transient failure on listing");
                self.pacing.record_transient_failure(&mut self.state);
                self.state.fetch_failures += 1;
                return Ok(());
            }
            FetchOutcome::HttpError { status } => {
                warn!(url, status, "HTTP error on listing");
                self.pacing.record_hard_failure(&mut self.state);
                self.state.fetch_failures += 1;
                return Ok(());
            }
            FetchOutcome::Failed { error } => {
                warn!(url, error, "Fetch failed on listing");
                self.pacing.record_hard_failure(&mut self.state);
                self.state.fetch_failures += 1;
                return Ok(());
            }
        };

        let (body, challenge_status) = self.maybe_solve_challenge(url, body).await;

        let mut record = assemble(&body, city, &final_url);
        self.fill_phones(&mut record, &body, challenge_status).await;

        if !record.has_signal() {
            debug!(url, "Record carries no signal, skipping");
            self.state.skipped += 1;
            return Ok(());
        }

        if !matches_district(&record, district) {
            debug!(url, district = ?record.district, "District filter rejected record");
            self.state.skipped += 1;
            return Ok(());
        }

        sink.append(record)?;
        self.state.saved += 1;
        summary.record_saved(scope_label);
        debug!(url, saved = self.state.saved, "Record saved");
        Ok(())
    }

    /// If the page is a challenge interstitial and a solver is configured,
    /// solve and refetch once. The second element reports why the
    /// challenge could not be cleared, for the per-record status.
    async fn maybe_solve_challenge(
        &mut self,
        url: &str,
        body: String,
    ) -> (String, Option<&'static str>) {
        if !has_challenge(&body) {
            return (body, None);
        }

        info!(url, "Challenge page detected");
        let timeout = Duration::from_secs(self.config.solver.timeout_secs);
        if !self.solver.solve(&body, timeout).await {
            self.state.misses += 1;
            return (body, Some("captcha_timeout"));
        }

        match self.fetcher.fetch(url).await {
            FetchOutcome::Success { body, .. } => (body, None),
            _ => {
                self.state.misses += 1;
                (body, Some("refetch_failed"))
            }
        }
    }

    /// Fills phone fields, logging in lazily the first time contact data
    /// turns out to be gated and credentials are available. The status
    /// string records why a reveal did not happen.
    async fn fill_phones(
        &mut self,
        record: &mut crate::record::ListingRecord,
        body: &str,
        challenge_status: Option<&'static str>,
    ) {
        let mut phones = extract_phones(body);
        let mut login_failed = false;

        if phones.is_empty() && challenge_status.is_none() && !self.state.logged_in {
            if let (Some(phone), Some(password)) =
                (self.config.auth.phone.clone(), self.config.auth.password.clone())
            {
                info!("Contact data gated, attempting login");
                if self.session.login(&phone, &password).await {
                    self.state.logged_in = true;
                    if let FetchOutcome::Success { body, .. } =
                        self.fetcher.fetch(&record.url).await
                    {
                        phones = extract_phones(&body);
                    }
                } else {
                    login_failed = true;
                }
            }
        }

        if phones.is_empty() {
            record.phones = None;
            record.phone_status = match challenge_status {
                Some(reason) => reason.to_string(),
                None if login_failed => "need_auth".to_string(),
                None => "hidden".to_string(),
            };
        } else {
            record.phones = Some(phones.join(";"));
            record.phone_status = "revealed".to_string();
        }
    }

    /// Serves any pause the pacing controller has scheduled.
    async fn serve_pause(&mut self) {
        if let Some(pause) = self.pacing.check_pause() {
            sleep(pause.duration()).await;
            self.pacing.pause_elapsed(&mut self.state);
        }
    }

    fn list_url(&self, city: City, district: Option<&'static District>, page: u32) -> String {
        let base = self.config.site.base_url.trim_end_matches('/');
        let segment = match district {
            Some(d) => d.slug,
            None => city.slug(),
        };
        if page > 1 {
            format!("{base}/prodazha/kvartiry/{segment}/?page={page}")
        } else {
            format!("{base}/prodazha/kvartiry/{segment}/")
        }
    }

    fn stop_requested(&self, summary: &RunSummary) -> bool {
        if self.shutdown.load(Ordering::Relaxed) {
            info!("Shutdown requested, stopping crawl");
            return true;
        }
        if self.scope.max_listings > 0 && summary.saved >= self.scope.max_listings {
            info!(cap = self.scope.max_listings, "Listing cap reached");
            return true;
        }
        false
    }
}
