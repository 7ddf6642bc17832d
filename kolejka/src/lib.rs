//! Kolejka - multi-region medical queue aggregation
//!
//! This library discovers which Polish voivodeships surround the user's
//! location and aggregates public queue listings for a chosen benefit
//! across all of them, strictly rate-limited and resumable after
//! service-side throttling.
//!
//! # High-Level API
//!
//! The [`orchestrator`] module provides the end-to-end pipeline:
//!
//! ```ignore
//! use kolejka::api::NfzClient;
//! use kolejka::config::{self, DiscoverySettings, FetchSettings};
//! use kolejka::geocode::NominatimClient;
//! use kolejka::orchestrator::QueueOrchestrator;
//! use kolejka::position::PositionFeed;
//!
//! let discovery = DiscoverySettings::default();
//! let fetch = FetchSettings::default();
//! let geocoder = NominatimClient::new(discovery.geocoder_url.clone());
//! let api = NfzClient::new(fetch.api_url.clone());
//!
//! let position = PositionFeed::new();
//! position.update(config::DEFAULT_CENTER);
//!
//! let orchestrator = QueueOrchestrator::new(geocoder, api, position, discovery, fetch);
//! orchestrator.run_discovery().await?;
//! orchestrator.search("PORADNIA ORTOPEDYCZNA", false).await?;
//! let status = orchestrator.status();
//! ```

pub mod api;
pub mod config;
pub mod fanout;
pub mod fetch;
pub mod geo;
pub mod geocode;
pub mod logging;
pub mod orchestrator;
pub mod phone;
pub mod position;
pub mod ratelimit;
pub mod region;

/// Version of the kolejka library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
