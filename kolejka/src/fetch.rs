//! Paginated queue fetching.
//!
//! One [`PageFetcher::run`] call walks every page of a (region, benefit)
//! stream as an explicit loop:
//!
//! ```text
//! Start ──► FetchPage(n) ──► more pages? ──► FetchPage(n+1)
//!                │                │
//!                │                └── no ──► Done
//!                └── error ──────────────► aborted, nothing kept
//! ```
//!
//! Every page request passes through the shared [`RateLimiter`]. The
//! server-reported total is captured from page 1 and never updated within
//! the run; the run ends when the accumulator reaches that total or a
//! page comes back short. A fetcher only ever runs one stream at a time —
//! a second call while one is in flight is ignored, not queued.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{FetchError, PageQuery, QueueApi, QueueRecord, PAGE_SIZE};
use crate::ratelimit::RateLimiter;
use crate::region::Voivodeship;

/// How a run treats records that are already present.
#[derive(Debug, Clone)]
pub enum FetchMode {
    /// Single non-overlapping stream; records append unconditionally.
    Home,
    /// Part of a cross-region aggregate; records de-duplicate by id
    /// against `known_ids` and against this run's own accumulator.
    Near { known_ids: HashSet<String> },
}

/// What a fetch call produced.
#[derive(Debug)]
pub enum FetchRun {
    /// The run walked every page; these are its records in page order.
    Completed(Vec<QueueRecord>),
    /// Another run was in flight on this fetcher; nothing was done.
    AlreadyInFlight,
}

/// Working state of one run.
struct FetchAccumulator {
    items: Vec<QueueRecord>,
    expected_total: Option<u32>,
    current_page: u32,
    /// Ids to skip; `Some` only in near mode.
    seen: Option<HashSet<String>>,
}

impl FetchAccumulator {
    fn new(mode: FetchMode) -> Self {
        Self {
            items: Vec::new(),
            expected_total: None,
            current_page: 1,
            seen: match mode {
                FetchMode::Home => None,
                FetchMode::Near { known_ids } => Some(known_ids),
            },
        }
    }

    /// Merges one page of records, honoring the mode's de-dup rule.
    fn append(&mut self, records: Vec<QueueRecord>) {
        match self.seen.as_mut() {
            None => self.items.extend(records),
            Some(seen) => {
                for record in records {
                    if seen.insert(record.id.clone()) {
                        self.items.push(record);
                    }
                }
            }
        }
    }
}

/// Walks the pages of one (region, benefit) stream at a time.
pub struct PageFetcher<Q> {
    api: Arc<Q>,
    limiter: Arc<RateLimiter>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the holding run ends.
///
/// Tied to the run future itself, not to its return path: a run dropped
/// mid-flight (timeout, select) releases the fetcher just like one that
/// ran to completion.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<Q: QueueApi> PageFetcher<Q> {
    pub fn new(api: Arc<Q>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            api,
            limiter,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Fetches every page for `region` matching `benefit`.
    ///
    /// Pages are requested strictly in order; page n+1 is only requested
    /// after page n's records are merged. Any transport, status, or
    /// decode error aborts the run with nothing kept. Cancelling the
    /// token aborts between suspension points with
    /// [`FetchError::Cancelled`].
    pub async fn run(
        &self,
        region: Voivodeship,
        benefit: &str,
        for_children: bool,
        mode: FetchMode,
        cancel: CancellationToken,
    ) -> Result<FetchRun, FetchError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!(
                province = region.code(),
                benefit, "fetch already in flight, ignoring"
            );
            return Ok(FetchRun::AlreadyInFlight);
        }
        let _in_flight = InFlightGuard(&self.in_flight);

        let result = self
            .run_pages(region, benefit, for_children, mode, cancel)
            .await;

        match &result {
            Ok(items) => info!(
                province = region.code(),
                benefit,
                records = items.len(),
                "paginated fetch complete"
            ),
            Err(err) => warn!(
                province = region.code(),
                benefit,
                error = %err,
                "paginated fetch aborted"
            ),
        }

        result.map(FetchRun::Completed)
    }

    async fn run_pages(
        &self,
        region: Voivodeship,
        benefit: &str,
        for_children: bool,
        mode: FetchMode,
        cancel: CancellationToken,
    ) -> Result<Vec<QueueRecord>, FetchError> {
        let mut accumulator = FetchAccumulator::new(mode);

        loop {
            let query = PageQuery {
                region,
                benefit: benefit.to_string(),
                page: accumulator.current_page,
                for_children,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = self.limiter.acquire() => {}
            }

            let page = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                fetched = self.api.fetch_queue_page(&query) => fetched?,
            };

            let received = page.data.len();
            if accumulator.expected_total.is_none() {
                // Captured once; later pages may report drifting counts
                accumulator.expected_total = Some(page.meta.count);
            }
            accumulator.append(page.data);

            let expected = accumulator.expected_total.unwrap_or(0) as usize;
            debug!(
                province = region.code(),
                page = accumulator.current_page,
                received,
                accumulated = accumulator.items.len(),
                expected,
                "page merged"
            );

            if accumulator.items.len() >= expected || received < PAGE_SIZE as usize {
                return Ok(accumulator.items);
            }

            accumulator.current_page += 1;
        }
    }
}
