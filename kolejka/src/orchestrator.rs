//! End-to-end queue aggregation.
//!
//! `QueueOrchestrator` drives the whole pipeline:
//!
//! ```text
//! Idle ──► LocatingHome ──► SamplingPoints ──► ResolvingNear ──► Idle
//!                                                   │       (discovered)
//!                                         throttled │
//!                                                   ▼
//!                                               Throttled
//!                                                   ▲
//!                                         throttled │
//!                                                   │
//! search ──► FetchingHome ──► FetchingNear[0..n] ───┴──► Ready
//! ```
//!
//! Discovery resolves the home region from the current position fix, then
//! samples a ring of boundary points and fan-outs them into the near-region
//! set. Searches fetch the home region's pages first, then every near
//! region strictly in order with a fixed pause between regions; all page
//! requests share one rate limiter. A throttled near fetch parks the
//! pipeline in `Throttled`: accumulated near records are dropped, the
//! region cursor stays put, and [`QueueOrchestrator::retry_search`] resumes
//! from the region that was interrupted. A new search cancels whatever
//! fetch is still in flight before taking over.
//!
//! Collaborators (geocoder, queue API, position feed) are injected at
//! construction; the orchestrator owns no network singletons.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api::{FetchError, QueueApi, QueueRecord, PAGE_SIZE};
use crate::config::{DiscoverySettings, FetchSettings};
use crate::fanout::{RoundOutcome, SamplingRound};
use crate::fetch::{FetchMode, FetchRun, PageFetcher};
use crate::geo::{points_on_circle, Coordinate, GeoError};
use crate::geocode::{GeocodeClient, GeocodeError, RegionResolver};
use crate::position::PositionFeed;
use crate::ratelimit::RateLimiter;
use crate::region::{RegionSet, Voivodeship};

/// Where the pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing running; discovery may or may not have completed.
    #[default]
    Idle,
    /// Reverse-geocoding the current position fix.
    LocatingHome,
    /// Computing the sampling ring.
    SamplingPoints,
    /// Fan-out resolution of the sampled points.
    ResolvingNear,
    /// Paginating the home region's queue stream.
    FetchingHome,
    /// Paginating near region `index` of the discovered set.
    FetchingNear { index: usize },
    /// A search finished; aggregated records are available.
    Ready,
    /// A throttling signal parked the pipeline; retry or accept partials.
    Throttled,
}

impl Phase {
    /// True while discovery or a search is actively running.
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            Phase::LocatingHome
                | Phase::SamplingPoints
                | Phase::ResolvingNear
                | Phase::FetchingHome
                | Phase::FetchingNear { .. }
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::LocatingHome => write!(f, "LocatingHome"),
            Phase::SamplingPoints => write!(f, "SamplingPoints"),
            Phase::ResolvingNear => write!(f, "ResolvingNear"),
            Phase::FetchingHome => write!(f, "FetchingHome"),
            Phase::FetchingNear { index } => write!(f, "FetchingNear[{index}]"),
            Phase::Ready => write!(f, "Ready"),
            Phase::Throttled => write!(f, "Throttled"),
        }
    }
}

/// What a discovery run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryOutcome {
    /// Home and near regions are known; searches may start.
    Completed {
        home: Voivodeship,
        near: Vec<Voivodeship>,
    },
    /// The sampling round hit a throttling signal; region data was
    /// discarded. Recover with [`QueueOrchestrator::retry_discovery`].
    Throttled,
}

/// What a search produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Every region was fetched; the aggregate is complete.
    Ready,
    /// A near-region fetch was throttled; home records stand, near
    /// records were dropped. Recover with
    /// [`QueueOrchestrator::retry_search`].
    Throttled,
}

/// Errors that end a discovery run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no position fix available")]
    NoPositionFix,
    #[error("current position did not resolve to a supported region")]
    HomeRegionUnknown,
    #[error("geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),
    #[error("sampling geometry rejected: {0}")]
    Geometry(#[from] GeoError),
}

/// Snapshot of the pipeline for the presentation boundary.
#[derive(Debug, Clone)]
pub struct QueueStatus {
    pub phase: Phase,
    pub home_region: Option<Voivodeship>,
    pub near_regions: Vec<Voivodeship>,
    pub home_records: Vec<QueueRecord>,
    pub near_records: Vec<QueueRecord>,
    /// True while discovery or a search is running.
    pub loading: bool,
    /// True while parked after a throttling signal.
    pub throttled: bool,
    /// True once a sampling round has completed successfully.
    pub discovery_finished: bool,
}

/// Which phase raised the throttling signal; decides which retry applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThrottleOrigin {
    Discovery,
    Fetch,
}

#[derive(Default)]
struct OrchestratorState {
    phase: Phase,
    home: Option<Voivodeship>,
    near_regions: RegionSet,
    home_records: Vec<QueueRecord>,
    near_records: Vec<QueueRecord>,
    near_cursor: usize,
    benefit: Option<String>,
    for_children: bool,
    discovery_finished: bool,
    throttle_origin: Option<ThrottleOrigin>,
}

/// Drives discovery and multi-region aggregation over injected
/// collaborators.
pub struct QueueOrchestrator<G, Q> {
    resolver: Arc<RegionResolver<G>>,
    sampler: SamplingRound<G>,
    fetcher: PageFetcher<Q>,
    api: Arc<Q>,
    limiter: Arc<RateLimiter>,
    position: PositionFeed,
    discovery: DiscoverySettings,
    fetch: FetchSettings,
    state: RwLock<OrchestratorState>,
    /// Serializes discovery and search runs; only one may mutate state.
    op_gate: tokio::sync::Mutex<()>,
    /// Token of the current search; replaced (and the old one cancelled)
    /// when a new search arrives.
    search_cancel: Mutex<CancellationToken>,
}

impl<G, Q> QueueOrchestrator<G, Q>
where
    G: GeocodeClient + 'static,
    Q: QueueApi + 'static,
{
    pub fn new(
        geocoder: G,
        api: Q,
        position: PositionFeed,
        discovery: DiscoverySettings,
        fetch: FetchSettings,
    ) -> Self {
        let resolver = Arc::new(RegionResolver::new(geocoder));
        let sampler = SamplingRound::new(Arc::clone(&resolver), discovery.stagger());
        let api = Arc::new(api);
        let limiter = Arc::new(RateLimiter::new(
            fetch.max_requests_per_window,
            fetch.rate_window(),
        ));
        let fetcher = PageFetcher::new(Arc::clone(&api), Arc::clone(&limiter));

        Self {
            resolver,
            sampler,
            fetcher,
            api,
            limiter,
            position,
            discovery,
            fetch,
            state: RwLock::new(OrchestratorState::default()),
            op_gate: tokio::sync::Mutex::new(()),
            search_cancel: Mutex::new(CancellationToken::new()),
        }
    }

    /// Runs discovery: locate the home region, sample the ring, resolve
    /// the near-region set.
    ///
    /// Requires a position fix in the feed. A throttled sampling round is
    /// not an error; it parks the pipeline and returns
    /// [`DiscoveryOutcome::Throttled`].
    pub async fn run_discovery(&self) -> Result<DiscoveryOutcome, DiscoveryError> {
        let _gate = self.op_gate.lock().await;

        let center = self
            .position
            .coordinate()
            .ok_or(DiscoveryError::NoPositionFix)?;
        let home = self.locate_home_at(center).await?;

        self.sample_near(center, home).await
    }

    /// Resolves and stores the home region without sampling near regions.
    ///
    /// Searches after this fetch the home region only; the near set stays
    /// empty until [`QueueOrchestrator::run_discovery`] runs.
    pub async fn locate_home(&self) -> Result<Voivodeship, DiscoveryError> {
        let _gate = self.op_gate.lock().await;

        let center = self
            .position
            .coordinate()
            .ok_or(DiscoveryError::NoPositionFix)?;
        let home = self.locate_home_at(center).await?;
        self.set_phase(Phase::Idle);
        Ok(home)
    }

    async fn locate_home_at(&self, center: Coordinate) -> Result<Voivodeship, DiscoveryError> {
        self.set_phase(Phase::LocatingHome);

        let home = match self.resolver.resolve_home(center).await {
            Ok(Some(home)) => home,
            Ok(None) => {
                self.set_phase(Phase::Idle);
                return Err(DiscoveryError::HomeRegionUnknown);
            }
            Err(err) => {
                self.set_phase(Phase::Idle);
                return Err(err.into());
            }
        };
        info!(
            province = home.code(),
            name = home.display_name(),
            "home region resolved"
        );
        self.state.write().unwrap().home = Some(home);
        Ok(home)
    }

    /// Retries a throttled discovery after the configured cooldown.
    ///
    /// Only the sampling phase is re-run; an already resolved home region
    /// is kept.
    pub async fn retry_discovery(&self) -> Result<DiscoveryOutcome, DiscoveryError> {
        let cooldown = self.discovery.retry_cooldown();
        info!(
            cooldown_secs = cooldown.as_secs(),
            "waiting before discovery retry"
        );
        tokio::time::sleep(cooldown).await;

        let home = self.state.read().unwrap().home;
        match home {
            Some(home) => {
                let _gate = self.op_gate.lock().await;
                let center = self
                    .position
                    .coordinate()
                    .ok_or(DiscoveryError::NoPositionFix)?;
                self.sample_near(center, home).await
            }
            None => self.run_discovery().await,
        }
    }

    async fn sample_near(
        &self,
        center: Coordinate,
        home: Voivodeship,
    ) -> Result<DiscoveryOutcome, DiscoveryError> {
        self.set_phase(Phase::SamplingPoints);
        let points = match points_on_circle(
            center,
            self.discovery.sample_radius_m,
            self.discovery.sample_count,
        ) {
            Ok(points) => points,
            Err(err) => {
                self.set_phase(Phase::Idle);
                return Err(err.into());
            }
        };

        self.set_phase(Phase::ResolvingNear);
        match self.sampler.run(points, home).await {
            RoundOutcome::Resolved(regions) => {
                let near: Vec<Voivodeship> = regions.as_slice().to_vec();
                info!(count = near.len(), "near regions resolved");
                {
                    let mut state = self.state.write().unwrap();
                    state.near_regions = regions;
                    state.near_cursor = 0;
                    state.discovery_finished = true;
                    state.throttle_origin = None;
                }
                self.set_phase(Phase::Idle);
                Ok(DiscoveryOutcome::Completed { home, near })
            }
            RoundOutcome::Throttled => {
                warn!("sampling round throttled, discarding region data");
                {
                    let mut state = self.state.write().unwrap();
                    state.near_regions = RegionSet::new(Some(home));
                    state.near_cursor = 0;
                    state.throttle_origin = Some(ThrottleOrigin::Discovery);
                }
                self.set_phase(Phase::Throttled);
                Ok(DiscoveryOutcome::Throttled)
            }
        }
    }

    /// Fetches every page of `benefit`'s queues for the home region and
    /// each near region, aggregating records.
    ///
    /// Cancels and supersedes any search still in flight. Transport,
    /// status, and decode errors abort the run but keep the regions that
    /// already completed; a throttled near fetch parks the pipeline
    /// instead (see [`SearchOutcome::Throttled`]).
    pub async fn search(
        &self,
        benefit: &str,
        for_children: bool,
    ) -> Result<SearchOutcome, FetchError> {
        let token = self.replace_search_token();
        let _gate = self.op_gate.lock().await;
        if token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        info!(benefit, for_children, "search started");

        let home = {
            let mut state = self.state.write().unwrap();
            state.benefit = Some(benefit.to_string());
            state.for_children = for_children;
            state.home_records.clear();
            state.near_records.clear();
            state.near_cursor = 0;
            state.throttle_origin = None;
            state.home
        };

        let Some(home) = home else {
            warn!(benefit, "search before discovery, nothing to fetch");
            self.set_phase(Phase::Ready);
            return Ok(SearchOutcome::Ready);
        };

        self.set_phase(Phase::FetchingHome);
        match self
            .fetcher
            .run(home, benefit, for_children, FetchMode::Home, token.clone())
            .await
        {
            Ok(FetchRun::Completed(records)) => {
                info!(
                    province = home.code(),
                    records = records.len(),
                    "home region fetched"
                );
                self.state.write().unwrap().home_records = records;
            }
            Ok(FetchRun::AlreadyInFlight) => {
                warn!("home fetch ignored, another run still in flight");
                return Err(FetchError::Cancelled);
            }
            Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
            Err(err) => {
                error!(province = home.code(), error = %err, "home region fetch failed");
                self.set_phase(Phase::Ready);
                return Err(err);
            }
        }

        self.fetch_near_from(0, benefit, for_children, token).await
    }

    /// Resumes a search parked by a throttled near fetch.
    ///
    /// Waits the inter-region delay, then continues from the region
    /// cursor left by the interrupted run; regions before the cursor are
    /// not re-fetched. A no-op when nothing is parked, or when a newer
    /// search supersedes the retry during the cooldown.
    pub async fn retry_search(&self) -> Result<SearchOutcome, FetchError> {
        if self.state.read().unwrap().throttle_origin != Some(ThrottleOrigin::Fetch) {
            debug!("no throttled search to resume");
            return Ok(SearchOutcome::Ready);
        }

        let delay = self.fetch.inter_region_delay();
        info!(
            delay_ms = delay.as_millis() as u64,
            "waiting before resuming near fetch"
        );
        tokio::time::sleep(delay).await;

        // Snapshot the parked state only once the gate is held: a search
        // issued during the cooldown has cleared (or replaced) it, and
        // the newest query wins
        let _gate = self.op_gate.lock().await;
        let (benefit, for_children, cursor) = {
            let state = self.state.read().unwrap();
            if state.throttle_origin != Some(ThrottleOrigin::Fetch) {
                debug!("retry superseded by a newer search");
                return Ok(SearchOutcome::Ready);
            }
            (state.benefit.clone(), state.for_children, state.near_cursor)
        };
        let Some(benefit) = benefit else {
            debug!("no throttled search to resume");
            return Ok(SearchOutcome::Ready);
        };

        let token = self.replace_search_token();
        if token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        info!(cursor, "resuming near fetch after throttle");
        self.state.write().unwrap().throttle_origin = None;

        self.fetch_near_from(cursor, &benefit, for_children, token)
            .await
    }

    async fn fetch_near_from(
        &self,
        start: usize,
        benefit: &str,
        for_children: bool,
        token: CancellationToken,
    ) -> Result<SearchOutcome, FetchError> {
        let regions: Vec<Voivodeship> = {
            let state = self.state.read().unwrap();
            state.near_regions.as_slice().to_vec()
        };

        for (index, region) in regions.iter().copied().enumerate().skip(start) {
            if index > start {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(FetchError::Cancelled),
                    _ = tokio::time::sleep(self.fetch.inter_region_delay()) => {}
                }
            }

            self.state.write().unwrap().near_cursor = index;
            self.set_phase(Phase::FetchingNear { index });

            // De-dup against every near record aggregated so far
            let known: HashSet<String> = {
                let state = self.state.read().unwrap();
                state.near_records.iter().map(|r| r.id.clone()).collect()
            };

            let mode = FetchMode::Near { known_ids: known };
            match self
                .fetcher
                .run(region, benefit, for_children, mode, token.clone())
                .await
            {
                Ok(FetchRun::Completed(records)) => {
                    debug!(
                        province = region.code(),
                        records = records.len(),
                        "near region fetched"
                    );
                    self.state.write().unwrap().near_records.extend(records);
                }
                Ok(FetchRun::AlreadyInFlight) => {
                    warn!("near fetch ignored, another run still in flight");
                    return Err(FetchError::Cancelled);
                }
                Err(FetchError::Throttled) => {
                    warn!(
                        province = region.code(),
                        cursor = index,
                        "near fetch throttled, parking pipeline"
                    );
                    {
                        let mut state = self.state.write().unwrap();
                        state.near_records.clear();
                        state.throttle_origin = Some(ThrottleOrigin::Fetch);
                    }
                    self.set_phase(Phase::Throttled);
                    return Ok(SearchOutcome::Throttled);
                }
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(err) => {
                    error!(province = region.code(), error = %err, "near region fetch failed");
                    self.set_phase(Phase::Ready);
                    return Err(err);
                }
            }
        }

        self.set_phase(Phase::Ready);
        Ok(SearchOutcome::Ready)
    }

    /// Looks up benefit names matching `fragment`, paginating like a
    /// queue fetch and sharing the same rate limiter.
    ///
    /// Fragments shorter than three characters are answered locally with
    /// an empty list; the API rejects them anyway.
    pub async fn lookup_benefits(&self, fragment: &str) -> Result<Vec<String>, FetchError> {
        if fragment.chars().count() <= 2 {
            debug!(fragment, "fragment too short for benefit lookup");
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = Vec::new();
        let mut expected: Option<u32> = None;
        let mut page = 1;
        loop {
            self.limiter.acquire().await;
            let body = self.api.fetch_benefit_names(fragment, page).await?;
            let received = body.data.len();
            if expected.is_none() {
                expected = Some(body.meta.count);
            }
            names.extend(body.data);

            if names.len() >= expected.unwrap_or(0) as usize || received < PAGE_SIZE as usize {
                debug!(fragment, names = names.len(), "benefit lookup complete");
                return Ok(names);
            }
            page += 1;
        }
    }

    /// Snapshot for the presentation boundary.
    pub fn status(&self) -> QueueStatus {
        let state = self.state.read().unwrap();
        QueueStatus {
            phase: state.phase,
            home_region: state.home,
            near_regions: state.near_regions.as_slice().to_vec(),
            home_records: state.home_records.clone(),
            near_records: state.near_records.clone(),
            loading: state.phase.is_loading(),
            throttled: state.phase == Phase::Throttled,
            discovery_finished: state.discovery_finished,
        }
    }

    fn set_phase(&self, phase: Phase) {
        let mut state = self.state.write().unwrap();
        if state.phase != phase {
            info!(from = %state.phase, to = %phase, "phase transition");
            state.phase = phase;
        }
    }

    fn replace_search_token(&self) -> CancellationToken {
        let mut current = self.search_cancel.lock().unwrap();
        current.cancel();
        *current = CancellationToken::new();
        current.clone()
    }
}
