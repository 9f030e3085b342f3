//! Spherical geometry used by waypoints and the datacheck angle/distance
//! rules. Grounded in `original_source/classes/Waypoint/Waypoint.cpp`.

use std::f64::consts::PI;

/// Earth diameter in miles, as used by the haversine formula below.
const EARTH_DIAMETER_MILES: f64 = 7926.2;

/// Project-wide curve-compensation constant: real routes wiggle more than
/// the straight line between two plotted waypoints, so raw haversine
/// distance is scaled up by this factor to better estimate actual mileage.
const CURVE_FUDGE_FACTOR: f64 = 1.02112;

/// Great-circle distance between two `(lat, lng)` points, in miles, with the
/// curve-compensation factor applied.
pub fn haversine_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let rlat1 = lat1.to_radians();
    let rlng1 = lng1.to_radians();
    let rlat2 = lat2.to_radians();
    let rlng2 = lng2.to_radians();

    let a = ((rlat2 - rlat1) / 2.0).sin().powi(2)
        + rlat1.cos() * rlat2.cos() * ((rlng2 - rlng1) / 2.0).sin().powi(2);
    let miles = a.sqrt().asin() * EARTH_DIAMETER_MILES;
    miles * CURVE_FUDGE_FACTOR
}

/// Angle in degrees formed at `self` by the path `pred -> self -> succ`,
/// via the unit-vector difference formula. Undefined (will return NaN) if
/// `self` coincides exactly with either neighbor — callers must check
/// `same_coords` first, which is exactly what the `BAD_ANGLE` rule does.
pub fn turn_angle_degrees(
    pred: (f64, f64),
    here: (f64, f64),
    succ: (f64, f64),
) -> f64 {
    let unit = |lat: f64, lng: f64| -> (f64, f64, f64) {
        let rlat = lat.to_radians();
        let rlng = lng.to_radians();
        (
            rlng.cos() * rlat.cos(),
            rlng.sin() * rlat.cos(),
            rlat.sin(),
        )
    };
    let (x0, y0, z0) = unit(pred.0, pred.1);
    let (x1, y1, z1) = unit(here.0, here.1);
    let (x2, y2, z2) = unit(succ.0, succ.1);

    let dot = (x2 - x1) * (x1 - x0) + (y2 - y1) * (y1 - y0) + (z2 - z1) * (z1 - z0);
    let mag1 = ((x2 - x1).powi(2) + (y2 - y1).powi(2) + (z2 - z1).powi(2)).sqrt();
    let mag0 = ((x1 - x0).powi(2) + (y1 - y0).powi(2) + (z1 - z0).powi(2)).sqrt();

    (dot / (mag1 * mag0)).acos() * 180.0 / PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_is_symmetric_and_nonnegative() {
        let d1 = haversine_miles(34.0, -118.0, 34.2, -118.0);
        let d2 = haversine_miles(34.2, -118.0, 34.0, -118.0);
        assert!((d1 - d2).abs() < 1e-9);
        assert!(d1 >= 0.0);
    }

    #[test]
    fn haversine_same_point_is_zero() {
        assert!(haversine_miles(34.0, -118.0, 34.0, -118.0) < 1e-9);
    }

    #[test]
    fn haversine_matches_expected_mileage_between_two_points() {
        // S1: two points 0.2 degrees of latitude apart near 34N, ~14.1 mi.
        let d = haversine_miles(34.0, -118.0, 34.2, -118.0);
        assert!((d - 14.1).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn angle_on_distinct_noncolinear_points_is_in_open_range() {
        let angle = turn_angle_degrees(
            (34.0, -118.0),
            (34.1, -118.0),
            (34.1, -117.9),
        );
        assert!(angle > 0.0 && angle < 180.0, "got {}", angle);
    }

    #[test]
    fn straight_line_angle_is_near_180() {
        let angle = turn_angle_degrees(
            (34.0, -118.0),
            (34.1, -118.0),
            (34.2, -118.0),
        );
        assert!((angle - 180.0).abs() < 0.5, "got {}", angle);
    }

    #[test]
    fn sharp_angle_boundary() {
        // A right-angle-ish turn should read well above 90 and trigger the
        // > 135 threshold used by SHARP_ANGLE when extreme enough.
        let angle = turn_angle_degrees(
            (34.0, -118.0),
            (34.1, -118.0),
            (34.0, -118.1),
        );
        assert!(angle > 0.0 && angle < 180.0);
    }
}
