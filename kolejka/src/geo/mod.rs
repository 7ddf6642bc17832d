//! Great-circle geometry
//!
//! Provides the ring sampling used for region discovery (N points evenly
//! spaced on a circle around a center) and haversine distances between
//! coordinates. All math is spherical, using a mean Earth radius.

mod types;

pub use types::{
    Coordinate, GeoError, SamplePoint, EARTH_RADIUS_M, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

use std::f64::consts::PI;

/// Computes `count` points evenly spaced on a circle around `center`.
///
/// Point `i` lies `radius_meters` away at bearing `i * 360/count` degrees,
/// so point 0 is due north and bearings advance clockwise. Destinations are
/// computed with the great-circle destination formula on a sphere of radius
/// [`EARTH_RADIUS_M`].
///
/// # Returns
///
/// A `Result` containing the sample points, or an error when the radius is
/// not positive or the count is zero.
pub fn points_on_circle(
    center: Coordinate,
    radius_meters: f64,
    count: usize,
) -> Result<Vec<SamplePoint>, GeoError> {
    if radius_meters <= 0.0 {
        return Err(GeoError::InvalidRadius(radius_meters));
    }
    if count == 0 {
        return Err(GeoError::InvalidCount(count));
    }

    let lat1 = center.latitude.to_radians();
    let lon1 = center.longitude.to_radians();

    // Angular distance on the unit sphere
    let delta = radius_meters / EARTH_RADIUS_M;

    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let bearing = (i as f64 * 360.0 / count as f64).to_radians();

        let lat2 =
            (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
        let lon2 = lon1
            + (bearing.sin() * delta.sin() * lat1.cos())
                .atan2(delta.cos() - lat1.sin() * lat2.sin());

        // Wrap longitude back into [-180, 180]
        let lon2 = ((lon2 + 3.0 * PI) % (2.0 * PI)) - PI;

        points.push(SamplePoint {
            id: i,
            coordinate: Coordinate {
                latitude: lat2.to_degrees(),
                longitude: lon2.to_degrees(),
            },
        });
    }

    Ok(points)
}

/// Great-circle distance between two coordinates in meters (haversine).
#[inline]
pub fn distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Formats a distance for display: whole meters below 1 km, tenths of a
/// kilometer above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // The destination and haversine formulas are exact inverses on the
    // sphere, so only float rounding separates them.
    const RING_TOLERANCE_M: f64 = 1.0;

    #[test]
    fn test_four_points_at_cardinal_bearings() {
        let center = Coordinate::new(50.0, 20.0).unwrap();
        let points = points_on_circle(center, 100_000.0, 4).unwrap();

        assert_eq!(points.len(), 4);

        // Bearing 0 is due north: latitude grows, longitude unchanged
        let north = points[0].coordinate;
        assert!(north.latitude > center.latitude);
        assert!((north.longitude - center.longitude).abs() < 1e-9);

        // Bearing 90 is due east: longitude grows
        let east = points[1].coordinate;
        assert!(east.longitude > center.longitude);

        // Bearing 180 is due south
        let south = points[2].coordinate;
        assert!(south.latitude < center.latitude);
        assert!((south.longitude - center.longitude).abs() < 1e-9);

        // Bearing 270 is due west
        let west = points[3].coordinate;
        assert!(west.longitude < center.longitude);

        for point in &points {
            let d = distance_m(center, point.coordinate);
            assert!(
                (d - 100_000.0).abs() < RING_TOLERANCE_M,
                "point {} is {} m from center, expected 100000 m",
                point.id,
                d
            );
        }
    }

    #[test]
    fn test_point_ids_follow_bearing_order() {
        let center = Coordinate::new(52.2, 21.0).unwrap();
        let points = points_on_circle(center, 50_000.0, 8).unwrap();

        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.id, i);
        }
    }

    #[test]
    fn test_longitude_wraps_at_antimeridian() {
        let center = Coordinate::new(0.0, 179.9).unwrap();
        let points = points_on_circle(center, 100_000.0, 4).unwrap();

        // The eastern point crosses the antimeridian and must come back
        // wrapped, not at 180.8
        let east = points[1].coordinate;
        assert!(east.longitude < 0.0, "east longitude: {}", east.longitude);
        assert!((MIN_LON..=MAX_LON).contains(&east.longitude));
        assert!(
            (distance_m(center, east) - 100_000.0).abs() < RING_TOLERANCE_M,
            "wrapped point must still sit on the ring"
        );
    }

    #[test]
    fn test_zero_radius_rejected() {
        let center = Coordinate::new(50.0, 20.0).unwrap();
        let result = points_on_circle(center, 0.0, 4);
        assert!(matches!(result, Err(GeoError::InvalidRadius(_))));
    }

    #[test]
    fn test_negative_radius_rejected() {
        let center = Coordinate::new(50.0, 20.0).unwrap();
        let result = points_on_circle(center, -10.0, 4);
        assert!(matches!(result, Err(GeoError::InvalidRadius(_))));
    }

    #[test]
    fn test_zero_count_rejected() {
        let center = Coordinate::new(50.0, 20.0).unwrap();
        let result = points_on_circle(center, 1000.0, 0);
        assert!(matches!(result, Err(GeoError::InvalidCount(0))));
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            Coordinate::new(90.1, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Coordinate::new(0.0, -180.5),
            Err(GeoError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_distance_zero_for_same_point() {
        let a = Coordinate::new(50.049683, 19.944544).unwrap();
        assert_eq!(distance_m(a, a), 0.0);
    }

    #[test]
    fn test_distance_krakow_to_warsaw() {
        // Kraków main square to Warsaw city centre, roughly 252 km
        let krakow = Coordinate::new(50.0617, 19.9373).unwrap();
        let warsaw = Coordinate::new(52.2297, 21.0122).unwrap();

        let d = distance_m(krakow, warsaw);
        assert!((240_000.0..265_000.0).contains(&d), "distance: {} m", d);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(850.4), "850 m");
        assert_eq!(format_distance(999.4), "999 m");
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(12_345.0), "12.3 km");
    }

    proptest! {
        #[test]
        fn prop_ring_has_exactly_count_points(
            lat in -80.0_f64..80.0,
            lon in -179.0_f64..179.0,
            radius in 100.0_f64..500_000.0,
            count in 1_usize..32,
        ) {
            let center = Coordinate::new(lat, lon).unwrap();
            let points = points_on_circle(center, radius, count).unwrap();
            prop_assert_eq!(points.len(), count);
        }

        #[test]
        fn prop_ring_points_sit_on_the_ring(
            lat in -80.0_f64..80.0,
            lon in -179.0_f64..179.0,
            radius in 100.0_f64..500_000.0,
            count in 1_usize..32,
        ) {
            let center = Coordinate::new(lat, lon).unwrap();
            let points = points_on_circle(center, radius, count).unwrap();

            for point in points {
                let d = distance_m(center, point.coordinate);
                prop_assert!(
                    (d - radius).abs() < RING_TOLERANCE_M,
                    "point {} at {} m, expected {} m",
                    point.id, d, radius
                );
            }
        }

        #[test]
        fn prop_ring_points_are_valid_coordinates(
            lat in -80.0_f64..80.0,
            lon in -179.0_f64..179.0,
            radius in 100.0_f64..500_000.0,
            count in 1_usize..16,
        ) {
            let center = Coordinate::new(lat, lon).unwrap();
            let points = points_on_circle(center, radius, count).unwrap();

            for point in points {
                let c = point.coordinate;
                prop_assert!((MIN_LAT..=MAX_LAT).contains(&c.latitude));
                prop_assert!((MIN_LON..=MAX_LON).contains(&c.longitude));
            }
        }
    }
}
