//! Latest-wins position feed.
//!
//! Position fixes arrive on an mpsc channel from whatever source the host
//! attaches (GPS bridge, CLI flag, test harness). Only the most recent fix
//! matters; consumers pull the current fix when they need one rather than
//! subscribing to every update.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::geo::Coordinate;

/// One position fix with its arrival time.
#[derive(Debug, Clone, Copy)]
pub struct PositionFix {
    pub coordinate: Coordinate,
    pub received_at: Instant,
}

impl PositionFix {
    /// Time since this fix arrived.
    pub fn age(&self) -> std::time::Duration {
        self.received_at.elapsed()
    }
}

/// Thread-safe holder of the most recent position fix.
///
/// Cloning is cheap; clones share the same fix.
#[derive(Clone, Default)]
pub struct PositionFeed {
    latest: Arc<RwLock<Option<PositionFix>>>,
}

impl PositionFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fix, replacing whatever came before it.
    pub fn update(&self, coordinate: Coordinate) {
        let fix = PositionFix {
            coordinate,
            received_at: Instant::now(),
        };
        *self.latest.write().unwrap() = Some(fix);
        debug!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "position fix recorded"
        );
    }

    /// The most recent fix, if any has arrived.
    pub fn current(&self) -> Option<PositionFix> {
        *self.latest.read().unwrap()
    }

    /// The most recent coordinate, if any fix has arrived.
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.current().map(|fix| fix.coordinate)
    }

    /// The most recent coordinate, or `fallback` when no fix has arrived.
    pub fn coordinate_or(&self, fallback: Coordinate) -> Coordinate {
        self.coordinate().unwrap_or(fallback)
    }

    pub fn has_fix(&self) -> bool {
        self.latest.read().unwrap().is_some()
    }

    /// Spawns the consumer task draining `updates` into this feed.
    ///
    /// The task ends when the token is cancelled or every sender is
    /// dropped. Updates queued behind one another are applied in order,
    /// so the feed always ends up holding the newest.
    pub fn spawn_consumer(
        &self,
        mut updates: mpsc::Receiver<Coordinate>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let feed = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    next = updates.recv() => match next {
                        Some(coordinate) => feed.update(coordinate),
                        None => break,
                    },
                }
            }
            debug!("position feed consumer stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_empty_feed_has_no_fix() {
        let feed = PositionFeed::new();

        assert!(!feed.has_fix());
        assert!(feed.current().is_none());
        assert!(feed.coordinate().is_none());
    }

    #[test]
    fn test_coordinate_or_falls_back_when_empty() {
        let feed = PositionFeed::new();
        let fallback = coord(50.049683, 19.944544);

        assert_eq!(feed.coordinate_or(fallback), fallback);
    }

    #[test]
    fn test_update_replaces_previous_fix() {
        let feed = PositionFeed::new();

        feed.update(coord(50.0, 19.9));
        feed.update(coord(52.2, 21.0));

        assert_eq!(feed.coordinate(), Some(coord(52.2, 21.0)));
    }

    #[test]
    fn test_clones_share_the_same_fix() {
        let feed = PositionFeed::new();
        let clone = feed.clone();

        feed.update(coord(50.0, 19.9));

        assert_eq!(clone.coordinate(), Some(coord(50.0, 19.9)));
    }

    #[tokio::test]
    async fn test_consumer_applies_updates_in_order() {
        let feed = PositionFeed::new();
        let (tx, rx) = mpsc::channel(8);
        let handle = feed.spawn_consumer(rx, CancellationToken::new());

        tx.send(coord(50.0, 19.9)).await.unwrap();
        tx.send(coord(51.1, 17.0)).await.unwrap();
        tx.send(coord(52.2, 21.0)).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(feed.coordinate(), Some(coord(52.2, 21.0)));
    }

    #[tokio::test]
    async fn test_consumer_stops_when_senders_drop() {
        let feed = PositionFeed::new();
        let (tx, rx) = mpsc::channel::<Coordinate>(8);
        let handle = feed.spawn_consumer(rx, CancellationToken::new());

        drop(tx);
        handle.await.unwrap();

        assert!(!feed.has_fix());
    }

    #[tokio::test]
    async fn test_cancel_stops_consumer() {
        let feed = PositionFeed::new();
        let (tx, rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let handle = feed.spawn_consumer(rx, cancel.clone());

        tx.send(coord(50.0, 19.9)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        cancel.cancel();
        handle.await.unwrap();

        // Consumer is gone; later sends change nothing
        let _ = tx.send(coord(54.3, 18.6)).await;
        assert_eq!(feed.coordinate(), Some(coord(50.0, 19.9)));
    }
}
