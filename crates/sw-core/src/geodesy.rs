//! Stateless geodesy helpers.
//!
//! | Function                 | Space          | Result                     |
//! |--------------------------|----------------|----------------------------|
//! | [`distance`]             | sphere         | metres (haversine)         |
//! | [`project_onto_segment`] | planar degrees | clamped projection         |
//! | [`turn_angle`]           | planar degrees | degrees in `[0, 180]`      |
//!
//! The planar helpers treat lat/lon as a flat grid.  That is only valid for
//! the short spans they are used on (one route step, one road segment).

use crate::GeoPoint;

/// Mean Earth radius, metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Returned by [`distance`] when either input has a non-finite coordinate.
/// Compares greater than every real distance so it is never picked as a
/// minimum.
pub const UNDEFINED_DISTANCE: f64 = f64::INFINITY;

/// Haversine great-circle distance in metres.
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    if !a.is_finite() || !b.is_finite() {
        return UNDEFINED_DISTANCE;
    }

    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

    EARTH_RADIUS_M * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Orthogonal projection of `p` onto the segment `start → end`, clamped to
/// the segment.  A zero-length segment projects everything onto `start`.
pub fn project_onto_segment(p: GeoPoint, start: GeoPoint, end: GeoPoint) -> GeoPoint {
    let dx = end.lon - start.lon;
    let dy = end.lat - start.lat;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return start;
    }

    let t = (((p.lon - start.lon) * dx + (p.lat - start.lat) * dy) / len_sq).clamp(0.0, 1.0);
    GeoPoint::new(start.lat + t * dy, start.lon + t * dx)
}

/// Angle at `cur` between the incoming (`prev → cur`) and outgoing
/// (`cur → next`) directions, in degrees.
///
/// `180` means straight through and `0` a full reversal.  A zero-length leg
/// has no direction; it is reported as `180` (no turn).
pub fn turn_angle(prev: GeoPoint, cur: GeoPoint, next: GeoPoint) -> f64 {
    // Both legs measured outward from `cur`.
    let (ax, ay) = (prev.lat - cur.lat, prev.lon - cur.lon);
    let (bx, by) = (next.lat - cur.lat, next.lon - cur.lon);

    let mag_a = ax.hypot(ay);
    let mag_b = bx.hypot(by);
    if mag_a == 0.0 || mag_b == 0.0 {
        return 180.0;
    }

    let cos = ((ax * bx + ay * by) / (mag_a * mag_b)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Sum of the haversine lengths of consecutive steps.
pub fn path_length(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Planar Euclidean length in degree space.  Used only for the access
/// stand-off test, which is defined in degrees.
#[inline]
pub fn planar_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    (b.lon - a.lon).hypot(b.lat - a.lat)
}
