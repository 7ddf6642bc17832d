//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use kolejka::api::FetchError;
use kolejka::orchestrator::DiscoveryError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid coordinate on the command line
    BadCoordinate(String),
    /// Region discovery failed
    Discovery(DiscoveryError),
    /// Region discovery stayed throttled after the cooldown retry
    DiscoveryThrottled,
    /// Queue fetch failed
    Fetch(FetchError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Discovery(DiscoveryError::HomeRegionUnknown) => {
                eprintln!();
                eprintln!("The location does not resolve to a Polish voivodeship.");
                eprintln!("Queue listings are only published for providers in Poland;");
                eprintln!("pass a location inside Poland with --lat/--lon.");
            }
            CliError::DiscoveryThrottled => {
                eprintln!();
                eprintln!("The geocoding service is rate limiting requests.");
                eprintln!("Wait a few minutes and try again, or rerun with --no-near");
                eprintln!("to make a single geocoding call.");
            }
            CliError::Fetch(FetchError::Throttled) => {
                eprintln!();
                eprintln!("The queue service is rate limiting requests. Wait a minute");
                eprintln!("and retry; partial results were discarded to stay consistent.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::BadCoordinate(msg) => write!(f, "Invalid coordinate: {}", msg),
            CliError::Discovery(e) => write!(f, "Region discovery failed: {}", e),
            CliError::DiscoveryThrottled => {
                write!(f, "Region discovery was throttled twice in a row")
            }
            CliError::Fetch(e) => write!(f, "Queue fetch failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Discovery(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for CliError {
    fn from(e: DiscoveryError) -> Self {
        CliError::Discovery(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}
