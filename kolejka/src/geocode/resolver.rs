//! Region resolution on top of raw geocoding.
//!
//! [`RegionResolver`] turns a geocoder's answer into the one thing
//! discovery cares about: which voivodeship, if any, a point falls in.
//! Points outside the configured country, unknown places, and admin-area
//! names that are not voivodeships all collapse to "no region" — those
//! points are simply skipped. Errors collapse to a throttled resolution,
//! which makes the whole sampling round discardable.

use tracing::{debug, warn};

use super::client::GeocodeClient;
use super::error::GeocodeError;
use crate::geo::{Coordinate, SamplePoint};
use crate::region::Voivodeship;

/// Country the discovery process operates in.
const COUNTRY_CODE: &str = "pl";

/// Outcome of resolving one sample point.
///
/// Never mutated after creation; consumed by the fan-out collector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionResolution {
    /// The point this resolution answers for.
    pub point: SamplePoint,
    /// The voivodeship the point falls in, if it resolved to one.
    pub region: Option<Voivodeship>,
    /// True when the geocoder failed; the containing round must be
    /// discarded.
    pub throttled: bool,
}

/// Resolves coordinates to voivodeships through a [`GeocodeClient`].
pub struct RegionResolver<G> {
    client: G,
}

impl<G: GeocodeClient> RegionResolver<G> {
    pub fn new(client: G) -> Self {
        Self { client }
    }

    /// Resolves one ring point.
    ///
    /// Infallible by design: a geocoder error is reported as a throttled
    /// resolution rather than bubbling, since sibling resolutions in the
    /// same round still need to run to completion.
    pub async fn resolve(&self, point: SamplePoint) -> RegionResolution {
        match self.client.reverse_geocode(point.coordinate).await {
            Ok(place) => {
                let region = region_from_place(place.country_code.as_deref(), place.admin_area.as_deref());
                debug!(
                    point = point.id,
                    region = region.map(|r| r.display_name()).unwrap_or("-"),
                    "ring point resolved"
                );
                RegionResolution {
                    point,
                    region,
                    throttled: false,
                }
            }
            Err(err) => {
                warn!(
                    point = point.id,
                    quota = err.is_throttled(),
                    error = %err,
                    "ring point resolution failed, round will be discarded"
                );
                RegionResolution {
                    point,
                    region: None,
                    throttled: true,
                }
            }
        }
    }

    /// Resolves the home coordinate itself.
    ///
    /// Unlike ring points the home cannot be silently skipped, so errors
    /// bubble: the caller distinguishes a miss (`Ok(None)`, location
    /// outside coverage) from throttling and other failures.
    pub async fn resolve_home(
        &self,
        center: Coordinate,
    ) -> Result<Option<Voivodeship>, GeocodeError> {
        let place = self.client.reverse_geocode(center).await?;
        Ok(region_from_place(
            place.country_code.as_deref(),
            place.admin_area.as_deref(),
        ))
    }
}

/// Applies the country filter and the voivodeship name lookup.
fn region_from_place(country_code: Option<&str>, admin_area: Option<&str>) -> Option<Voivodeship> {
    if country_code != Some(COUNTRY_CODE) {
        return None;
    }
    admin_area.and_then(Voivodeship::from_name)
}
