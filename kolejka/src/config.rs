//! Configuration for region discovery and queue fetching.
//!
//! All values have defaults tuned for the public NFZ and Nominatim
//! endpoints; hosts override individual fields before handing the
//! settings to the orchestrator.

use std::time::Duration;

use crate::geo::Coordinate;

// ==================== Discovery Defaults ====================

/// Default number of boundary points sampled per discovery round.
pub const DEFAULT_SAMPLE_COUNT: usize = 5;

/// Default sampling circle radius in meters (100 km).
///
/// Large enough to cross a voivodeship border from most of Poland,
/// small enough that points stay in neighbouring regions.
pub const DEFAULT_SAMPLE_RADIUS_M: f64 = 100_000.0;

/// Default delay between launching consecutive point resolutions in
/// milliseconds.
///
/// Spreads the reverse-geocode burst so the geocoder sees at most
/// one new request per second.
pub const DEFAULT_STAGGER_MS: u64 = 1_000;

/// Default cooldown before a throttled discovery round is retried in
/// seconds.
pub const DEFAULT_RETRY_COOLDOWN_SECS: u64 = 60;

/// Default reverse-geocoding endpoint.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

// ==================== Fetch Defaults ====================

/// Default NFZ queues API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.nfz.gov.pl/app-itl-api";

/// Default pause between consecutive near-region fetches in milliseconds
/// (5 s).
pub const DEFAULT_INTER_REGION_DELAY_MS: u64 = 5_000;

/// Default number of API requests allowed per rate window.
pub const DEFAULT_MAX_REQUESTS_PER_WINDOW: u32 = 10;

/// Default rate window length in seconds.
pub const DEFAULT_RATE_WINDOW_SECS: u64 = 1;

// ==================== Position Default ====================

/// Fallback position when no live fix is available (Kraków city centre).
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: 50.049683,
    longitude: 19.944544,
};

/// Settings for the region discovery phase.
#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    /// Number of boundary points per sampling round.
    pub sample_count: usize,

    /// Sampling circle radius in meters.
    pub sample_radius_m: f64,

    /// Delay between launching consecutive point resolutions in
    /// milliseconds.
    pub stagger_ms: u64,

    /// Cooldown before retrying a throttled round in seconds.
    pub retry_cooldown_secs: u64,

    /// Reverse-geocoding endpoint.
    pub geocoder_url: String,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            sample_radius_m: DEFAULT_SAMPLE_RADIUS_M,
            stagger_ms: DEFAULT_STAGGER_MS,
            retry_cooldown_secs: DEFAULT_RETRY_COOLDOWN_SECS,
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
        }
    }
}

impl DiscoverySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the stagger interval as a Duration.
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    /// Get the retry cooldown as a Duration.
    pub fn retry_cooldown(&self) -> Duration {
        Duration::from_secs(self.retry_cooldown_secs)
    }
}

/// Settings for the paginated queue fetch phase.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// NFZ queues API endpoint.
    pub api_url: String,

    /// Pause between consecutive near-region fetches in milliseconds.
    pub inter_region_delay_ms: u64,

    /// API requests allowed per rate window.
    pub max_requests_per_window: u32,

    /// Rate window length in seconds.
    pub rate_window_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            inter_region_delay_ms: DEFAULT_INTER_REGION_DELAY_MS,
            max_requests_per_window: DEFAULT_MAX_REQUESTS_PER_WINDOW,
            rate_window_secs: DEFAULT_RATE_WINDOW_SECS,
        }
    }
}

impl FetchSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the inter-region delay as a Duration.
    pub fn inter_region_delay(&self) -> Duration {
        Duration::from_millis(self.inter_region_delay_ms)
    }

    /// Get the rate window as a Duration.
    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_defaults() {
        let settings = DiscoverySettings::default();

        assert_eq!(settings.sample_count, DEFAULT_SAMPLE_COUNT);
        assert_eq!(settings.sample_radius_m, DEFAULT_SAMPLE_RADIUS_M);
        assert_eq!(settings.stagger_ms, DEFAULT_STAGGER_MS);
        assert_eq!(settings.retry_cooldown_secs, DEFAULT_RETRY_COOLDOWN_SECS);
        assert_eq!(settings.geocoder_url, DEFAULT_GEOCODER_URL);
    }

    #[test]
    fn test_fetch_defaults() {
        let settings = FetchSettings::default();

        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.inter_region_delay_ms, DEFAULT_INTER_REGION_DELAY_MS);
        assert_eq!(
            settings.max_requests_per_window,
            DEFAULT_MAX_REQUESTS_PER_WINDOW
        );
        assert_eq!(settings.rate_window_secs, DEFAULT_RATE_WINDOW_SECS);
    }

    #[test]
    fn test_duration_conversions() {
        let discovery = DiscoverySettings::default();
        assert_eq!(discovery.stagger(), Duration::from_millis(DEFAULT_STAGGER_MS));
        assert_eq!(
            discovery.retry_cooldown(),
            Duration::from_secs(DEFAULT_RETRY_COOLDOWN_SECS)
        );

        let fetch = FetchSettings::default();
        assert_eq!(
            fetch.inter_region_delay(),
            Duration::from_millis(DEFAULT_INTER_REGION_DELAY_MS)
        );
        assert_eq!(fetch.rate_window(), Duration::from_secs(DEFAULT_RATE_WINDOW_SECS));
    }

    #[test]
    fn test_default_center_is_a_valid_coordinate() {
        let validated =
            Coordinate::new(DEFAULT_CENTER.latitude, DEFAULT_CENTER.longitude).unwrap();
        assert_eq!(validated, DEFAULT_CENTER);
    }
}
