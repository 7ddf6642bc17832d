//! Geocoding client trait and Nominatim implementation.
//!
//! The [`GeocodeClient`] trait abstracts over reverse-geocoding services,
//! so resolution logic can run against a mock in tests. The
//! [`NominatimClient`] implementation queries an OSM Nominatim instance
//! via `reqwest`.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

use super::error::GeocodeError;
use crate::geo::Coordinate;

/// Default HTTP timeout for a single reverse-geocode call.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent to the geocoder. Nominatim's usage policy requires an
/// identifying agent string.
const USER_AGENT: &str = concat!("kolejka/", env!("CARGO_PKG_VERSION"));

/// What a reverse-geocode call tells us about a location.
///
/// This is our own type, decoupled from any particular geocoder's schema.
/// Only the fields region discovery needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceInfo {
    /// ISO 3166-1 alpha-2 country code, lowercase, if known.
    pub country_code: Option<String>,
    /// First-level administrative area display name, if known.
    pub admin_area: Option<String>,
}

/// Trait for resolving a coordinate to administrative place information.
pub trait GeocodeClient: Send + Sync {
    /// Reverse-geocode a single coordinate.
    ///
    /// A location the service knows nothing about (open sea, for example)
    /// is a successful call returning an empty [`PlaceInfo`], not an error.
    fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<PlaceInfo, GeocodeError>> + Send;
}

/// Relevant slice of a Nominatim `jsonv2` reverse response.
///
/// Ocean points come back as `{"error": "Unable to geocode"}` with HTTP
/// 200, so `address` must be optional.
#[derive(Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Deserialize)]
struct NominatimAddress {
    state: Option<String>,
    country_code: Option<String>,
}

/// Nominatim client using direct HTTP requests.
///
/// Uses a reusable `reqwest::Client` with connection pooling and timeouts.
pub struct NominatimClient {
    /// Reusable HTTP client with connection pooling.
    http: reqwest::Client,

    /// Base URL of the Nominatim instance, without a trailing slash.
    base_url: String,
}

impl NominatimClient {
    /// Create a new client against the given Nominatim instance.
    pub fn new(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self { http, base_url }
    }
}

impl GeocodeClient for NominatimClient {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<PlaceInfo, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::HttpError(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            200 => {}
            429 | 403 => return Err(GeocodeError::Throttled(status)),
            other => return Err(GeocodeError::BadStatus(other)),
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GeocodeError::HttpError(e.to_string()))?;

        let decoded: NominatimResponse =
            serde_json::from_slice(&bytes).map_err(|e| GeocodeError::JsonError(e.to_string()))?;

        let place = match decoded.address {
            Some(address) => PlaceInfo {
                country_code: address.country_code,
                admin_area: address.state,
            },
            None => PlaceInfo::default(),
        };

        tracing::trace!(
            lat = coordinate.latitude,
            lon = coordinate.longitude,
            country = place.country_code.as_deref().unwrap_or("-"),
            admin_area = place.admin_area.as_deref().unwrap_or("-"),
            "reverse geocoded"
        );

        Ok(place)
    }
}
