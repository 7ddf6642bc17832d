//! Reverse geocoding and region resolution.
//!
//! Discovery needs to know which voivodeship a coordinate falls in. This
//! module provides the geocoder abstraction and the resolution layer on
//! top of it:
//!
//! ```text
//! RegionResolver
//!     │
//!     └── GeocodeClient trait → NominatimClient (direct reqwest)
//!             │
//!             └── PlaceInfo { country_code, admin_area }
//! ```
//!
//! The resolver applies the country filter and the voivodeship name
//! lookup, and classifies geocoder failures as throttling so a sampling
//! round can be discarded and retried as a whole.

mod client;
mod error;
mod resolver;

pub use client::{GeocodeClient, NominatimClient, PlaceInfo};
pub use error::GeocodeError;
pub use resolver::{RegionResolution, RegionResolver};

#[cfg(test)]
pub use client::tests::MockGeocodeClient;
