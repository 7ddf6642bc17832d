//! Sampling-round fan-out.
//!
//! One resolution task per ring point, launched with staggered starts so
//! the geocoder is not hit with a burst. Results converge on a single
//! collector over an mpsc channel: the collector drains exactly one
//! message per point before deciding the round, so a round completes
//! exactly once no matter how the individual resolutions end.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::geo::SamplePoint;
use crate::geocode::{GeocodeClient, RegionResolver};
use crate::region::{RegionSet, Voivodeship};

/// Outcome of one sampling round.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundOutcome {
    /// Every point resolved without throttling. The set holds the
    /// de-duplicated near regions in arrival order, home excluded; it may
    /// legitimately be empty.
    Resolved(RegionSet),
    /// At least one resolution was throttled. Partial results are
    /// discarded, including resolutions that succeeded.
    Throttled,
}

/// Runs sampling rounds: fan the resolver out over the ring points,
/// collect every result, aggregate.
pub struct SamplingRound<G> {
    resolver: Arc<RegionResolver<G>>,
    stagger: Duration,
}

impl<G: GeocodeClient + 'static> SamplingRound<G> {
    /// Creates a round runner. Task `i` of a round launches `i * stagger`
    /// after the round starts.
    pub fn new(resolver: Arc<RegionResolver<G>>, stagger: Duration) -> Self {
        Self { resolver, stagger }
    }

    /// Resolves every point and aggregates the round outcome.
    ///
    /// All resolutions run to completion even when one reports throttling;
    /// the throttled outcome is decided only after the collector has
    /// drained every message.
    pub async fn run(&self, points: Vec<SamplePoint>, home: Voivodeship) -> RoundOutcome {
        let total = points.len();
        let (tx, mut rx) = mpsc::channel(total.max(1));

        for point in points {
            let resolver = Arc::clone(&self.resolver);
            let tx = tx.clone();
            let delay = self.stagger * point.id as u32;

            tokio::spawn(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let resolution = resolver.resolve(point).await;
                // The receiver lives until every sender is done; a send
                // can only fail if the whole round future was dropped
                let _ = tx.send(resolution).await;
            });
        }

        // Drop the original sender so the channel closes once the last
        // task reports
        drop(tx);

        let mut regions = RegionSet::new(Some(home));
        let mut throttled = false;

        while let Some(resolution) = rx.recv().await {
            if resolution.throttled {
                throttled = true;
                continue;
            }
            if let Some(region) = resolution.region {
                if regions.insert(region) {
                    debug!(
                        point = resolution.point.id,
                        region = region.display_name(),
                        "near region discovered"
                    );
                }
            }
        }

        if throttled {
            info!(
                points = total,
                "sampling round throttled, discarding partial region list"
            );
            return RoundOutcome::Throttled;
        }

        info!(
            points = total,
            near_regions = regions.len(),
            "sampling round complete"
        );
        RoundOutcome::Resolved(regions)
    }
}
