//! CLI runner for common setup.
//!
//! Encapsulates logging initialization and orchestrator construction to
//! reduce duplication across command handlers.

use kolejka::api::NfzClient;
use kolejka::config::{DiscoverySettings, FetchSettings};
use kolejka::geo::Coordinate;
use kolejka::geocode::NominatimClient;
use kolejka::logging::{self, LoggingGuard};
use kolejka::orchestrator::QueueOrchestrator;
use kolejka::position::PositionFeed;
use tracing::info;

use crate::error::CliError;

/// Orchestrator over the real network collaborators.
pub type Orchestrator = QueueOrchestrator<NominatimClient, NfzClient>;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
}

impl CliRunner {
    /// Create a new CLI runner and initialize logging.
    ///
    /// `verbose` raises the default log filter from `info` to `debug`;
    /// an explicit RUST_LOG still takes precedence.
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        let default_filter = if verbose { "debug" } else { "info" };
        let logging_guard = logging::init_logging(
            logging::default_log_dir(),
            logging::default_log_file(),
            default_filter,
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self { logging_guard })
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("kolejka v{}", kolejka::VERSION);
        info!(command, "command started");
    }

    /// Build an orchestrator over the real geocoder and queue API, with
    /// the position feed seeded at `center`.
    pub fn build_orchestrator(
        &self,
        discovery: DiscoverySettings,
        fetch: FetchSettings,
        center: Coordinate,
    ) -> Orchestrator {
        let geocoder = NominatimClient::new(discovery.geocoder_url.clone());
        let api = NfzClient::new(fetch.api_url.clone());
        let position = PositionFeed::new();
        position.update(center);

        QueueOrchestrator::new(geocoder, api, position, discovery, fetch)
    }
}
