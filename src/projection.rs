//! Route projection onto the visualization globe
//!
//! Maps GPS fixes onto a unit-radius sphere, lifting the middle of the route
//! into an arc so it reads as a launch trajectory rather than hugging the
//! surface. Pure and deterministic: the same route always yields the same
//! coordinates.

use crate::geo::RoutePoint;

/// Radius of the visualization globe
pub const GLOBE_RADIUS: f32 = 1.0;
/// Offset keeping the route just above the surface
pub const SURFACE_OFFSET: f32 = 0.01;
/// Peak height of the arc above the surface, at the route midpoint
pub const ARC_HEIGHT: f32 = 0.15;

/// Project a route onto the globe with the launch arc applied
///
/// The radial offset is `sin(pi * t) * ARC_HEIGHT` where `t` is the
/// normalized index along the route (0 for a single-point route).
pub fn project_route(points: &[RoutePoint]) -> Vec<[f32; 3]> {
    let n = points.len();
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            let arc = (t * std::f32::consts::PI).sin() * ARC_HEIGHT;
            project_point(p, GLOBE_RADIUS + SURFACE_OFFSET + arc)
        })
        .collect()
}

/// Spherical to Cartesian at the given radius
fn project_point(p: &RoutePoint, radius: f32) -> [f32; 3] {
    let lat = (p.lat as f32).to_radians();
    let lon = (p.lon as f32).to_radians();
    [
        radius * lat.cos() * lon.cos(),
        radius * lat.sin(),
        radius * lat.cos() * lon.sin(),
    ]
}

/// Index of the runner along a projected path for a progress percentage
///
/// Progress 0 maps to the first point, 100 to the last.
pub fn runner_index(progress_percent: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let idx = (progress_percent / 100.0 * (len - 1) as f64).floor() as usize;
    idx.min(len - 1)
}

/// Current runner position along a projected path
pub fn runner_position(path: &[[f32; 3]], progress_percent: f64) -> Option<[f32; 3]> {
    path.get(runner_index(progress_percent, path.len())).copied()
}

/// Completed portion of the path, from the start through the runner
pub fn trail<'a>(path: &'a [[f32; 3]], progress_percent: f64) -> &'a [[f32; 3]] {
    if path.is_empty() {
        return path;
    }
    &path[..=runner_index(progress_percent, path.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> RoutePoint {
        RoutePoint::new(lat, lon, 0.0)
    }

    fn radius(p: [f32; 3]) -> f32 {
        (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
    }

    #[test]
    fn projection_is_deterministic() {
        let route = vec![pt(42.6977, 23.3219), pt(42.7, 23.34), pt(42.71, 23.36)];
        assert_eq!(project_route(&route), project_route(&route));
    }

    #[test]
    fn single_point_sits_on_the_surface_offset() {
        let path = project_route(&[pt(0.0, 0.0)]);
        assert_eq!(path.len(), 1);
        assert!((radius(path[0]) - (GLOBE_RADIUS + SURFACE_OFFSET)).abs() < 1e-5);
        // lat=0, lon=0 points along +X
        assert!((path[0][0] - (GLOBE_RADIUS + SURFACE_OFFSET)).abs() < 1e-5);
    }

    #[test]
    fn endpoints_touch_surface_and_midpoint_peaks() {
        let route: Vec<RoutePoint> = (0..11).map(|i| pt(i as f64, i as f64)).collect();
        let path = project_route(&route);
        let base = GLOBE_RADIUS + SURFACE_OFFSET;
        assert!((radius(path[0]) - base).abs() < 1e-5);
        assert!((radius(path[10]) - base).abs() < 1e-5);
        assert!((radius(path[5]) - (base + ARC_HEIGHT)).abs() < 1e-5);
    }

    #[test]
    fn north_pole_points_up() {
        let path = project_route(&[pt(90.0, 0.0)]);
        assert!((path[0][1] - (GLOBE_RADIUS + SURFACE_OFFSET)).abs() < 1e-5);
        assert!(path[0][0].abs() < 1e-5);
        assert!(path[0][2].abs() < 1e-5);
    }

    #[test]
    fn runner_walks_the_path() {
        let path: Vec<[f32; 3]> = (0..5).map(|i| [i as f32, 0.0, 0.0]).collect();
        assert_eq!(runner_position(&path, 0.0), Some([0.0, 0.0, 0.0]));
        assert_eq!(runner_position(&path, 50.0), Some([2.0, 0.0, 0.0]));
        assert_eq!(runner_position(&path, 100.0), Some([4.0, 0.0, 0.0]));
        // Over 100 stays clamped to the last point
        assert_eq!(runner_position(&path, 250.0), Some([4.0, 0.0, 0.0]));
    }

    #[test]
    fn trail_grows_with_progress() {
        let path: Vec<[f32; 3]> = (0..5).map(|i| [i as f32, 0.0, 0.0]).collect();
        assert_eq!(trail(&path, 0.0).len(), 1);
        assert_eq!(trail(&path, 50.0).len(), 3);
        assert_eq!(trail(&path, 100.0).len(), 5);
        assert!(trail(&[], 50.0).is_empty());
    }
}
