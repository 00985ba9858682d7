//! GPS route geometry - Haversine distances over recorded points
//!
//! A route is an ordered sequence of GPS fixes. Total distance is the sum of
//! great-circle distances between consecutive fixes; the route is never
//! shortcut across non-adjacent points.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A single GPS fix on a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    /// Latitude in degrees, [-90, 90]
    pub lat: f64,
    /// Longitude in degrees, [-180, 180]
    pub lon: f64,
    /// Altitude above sea level in meters
    #[serde(default)]
    pub alt_m: f64,
}

#[derive(Error, Debug, PartialEq)]
pub enum GeoError {
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("non-finite coordinate at point {0}")]
    NonFiniteCoordinate(usize),
}

impl RoutePoint {
    pub fn new(lat: f64, lon: f64, alt_m: f64) -> Self {
        Self { lat, lon, alt_m }
    }

    /// Check coordinate ranges. Out-of-range fixes are rejected at ingestion
    /// rather than silently producing bad geometry downstream.
    pub fn validate(&self) -> Result<(), GeoError> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(GeoError::NonFiniteCoordinate(0));
        }
        if self.lat < -90.0 || self.lat > 90.0 {
            return Err(GeoError::LatitudeOutOfRange(self.lat));
        }
        if self.lon < -180.0 || self.lon > 180.0 {
            return Err(GeoError::LongitudeOutOfRange(self.lon));
        }
        Ok(())
    }
}

/// Validate every fix in a route. Empty routes are fine (distance is 0).
pub fn validate_route(points: &[RoutePoint]) -> Result<(), GeoError> {
    for (i, p) in points.iter().enumerate() {
        p.validate().map_err(|e| match e {
            GeoError::NonFiniteCoordinate(_) => GeoError::NonFiniteCoordinate(i),
            other => other,
        })?;
    }
    Ok(())
}

/// Great-circle distance between two GPS fixes in kilometers
pub fn haversine_km(a: &RoutePoint, b: &RoutePoint) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Total traversed distance of a route in kilometers
///
/// Sums consecutive-pair haversine distances. Routes with fewer than two
/// points have zero length.
pub fn route_distance_km(points: &[RoutePoint]) -> f64 {
    points.windows(2).map(|w| haversine_km(&w[0], &w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    fn pt(lat: f64, lon: f64) -> RoutePoint {
        RoutePoint::new(lat, lon, 0.0)
    }

    #[test]
    fn single_point_has_zero_distance() {
        assert_eq!(route_distance_km(&[pt(42.0, 23.0)]), 0.0);
        assert_eq!(route_distance_km(&[]), 0.0);
    }

    #[test]
    fn identical_consecutive_points_contribute_nothing() {
        let p = pt(42.6977, 23.3219);
        assert_eq!(route_distance_km(&[p, p, p]), 0.0);
    }

    #[test]
    fn sofia_segment_is_about_1_67_km() {
        let route = [pt(42.6977, 23.3219), pt(42.7000, 23.3400)];
        let d = route_distance_km(&route);
        assert!((d - 1.67).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antipodal_points_approach_half_circumference() {
        let d = haversine_km(&pt(0.0, 0.0), &pt(0.0, 180.0));
        assert!((d - PI * EARTH_RADIUS_KM).abs() < 0.001, "got {d}");
    }

    #[test]
    fn one_degree_at_equator() {
        // 1 degree of longitude at the equator is R * pi/180
        let d = haversine_km(&pt(0.0, 0.0), &pt(0.0, 1.0));
        assert!((d - EARTH_RADIUS_KM * PI / 180.0).abs() < 0.001, "got {d}");
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert_eq!(
            pt(91.0, 0.0).validate(),
            Err(GeoError::LatitudeOutOfRange(91.0))
        );
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert_eq!(
            pt(0.0, -180.5).validate(),
            Err(GeoError::LongitudeOutOfRange(-180.5))
        );
    }

    #[test]
    fn rejects_non_finite_coordinate_with_index() {
        let route = [pt(1.0, 1.0), pt(f64::NAN, 0.0)];
        assert_eq!(
            validate_route(&route),
            Err(GeoError::NonFiniteCoordinate(1))
        );
    }

    proptest! {
        /// Property: haversine is symmetric in its arguments
        #[test]
        fn haversine_symmetric(
            lat1 in -90.0f64..90.0, lon1 in -180.0f64..180.0,
            lat2 in -90.0f64..90.0, lon2 in -180.0f64..180.0,
        ) {
            let a = pt(lat1, lon1);
            let b = pt(lat2, lon2);
            prop_assert!((haversine_km(&a, &b) - haversine_km(&b, &a)).abs() < 1e-9);
        }

        /// Property: distances are non-negative and bounded by pi * R
        #[test]
        fn haversine_bounded(
            lat1 in -90.0f64..90.0, lon1 in -180.0f64..180.0,
            lat2 in -90.0f64..90.0, lon2 in -180.0f64..180.0,
        ) {
            let d = haversine_km(&pt(lat1, lon1), &pt(lat2, lon2));
            prop_assert!(d >= 0.0);
            prop_assert!(d <= PI * EARTH_RADIUS_KM + 1e-6);
        }

        /// Property: route distance is invariant under reversing the sequence
        #[test]
        fn route_distance_reversal_invariant(
            coords in proptest::collection::vec((-90.0f64..90.0, -180.0f64..180.0), 0..20)
        ) {
            let route: Vec<RoutePoint> = coords.iter().map(|&(la, lo)| pt(la, lo)).collect();
            let mut reversed = route.clone();
            reversed.reverse();
            let fwd = route_distance_km(&route);
            let bwd = route_distance_km(&reversed);
            prop_assert!((fwd - bwd).abs() < 1e-9 * (1.0 + fwd));
        }

        /// Property: distance is additive across any split point
        #[test]
        fn route_distance_additive(
            coords in proptest::collection::vec((-90.0f64..90.0, -180.0f64..180.0), 2..20),
            split_frac in 0.0f64..1.0,
        ) {
            let route: Vec<RoutePoint> = coords.iter().map(|&(la, lo)| pt(la, lo)).collect();
            let split = 1 + (split_frac * (route.len() - 2) as f64) as usize;
            let total = route_distance_km(&route);
            let first = route_distance_km(&route[..=split]);
            let second = route_distance_km(&route[split..]);
            prop_assert!((total - (first + second)).abs() < 1e-9 * (1.0 + total));
        }
    }
}
