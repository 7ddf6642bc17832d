//! Geographic coordinate types

use std::fmt;

/// Valid latitude range in degrees
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in degrees
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Mean Earth radius in meters, used by all great-circle math.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, validating both axes.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// A numbered point produced by one sampling round.
///
/// The id is the point's position on the ring (0-based), so log lines and
/// resolution results can be tied back to a specific bearing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Position on the ring, `0..count`
    pub id: usize,
    /// Location of this sample
    pub coordinate: Coordinate,
}

/// Errors that can occur during geographic calculations.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude is outside valid range (-90 to 90)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180 to 180)
    InvalidLongitude(f64),
    /// Ring radius must be positive
    InvalidRadius(f64),
    /// Ring point count must be at least one
    InvalidCount(usize),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            GeoError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            GeoError::InvalidRadius(radius) => {
                write!(f, "Invalid ring radius: {} m (must be positive)", radius)
            }
            GeoError::InvalidCount(count) => {
                write!(f, "Invalid ring point count: {} (must be at least 1)", count)
            }
        }
    }
}

impl std::error::Error for GeoError {}
