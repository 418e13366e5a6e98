//! Geographic coordinate types.
//!
//! `GeoPoint` stores double-precision WGS-84 degrees.  Stand-off distances
//! used by the route assembler are around 5e-5° so `f32` would lose the
//! geometry entirely.
//!
//! Two points are considered the *same site* when their [`PositionKey`]s are
//! equal, i.e. both coordinates agree after rounding to
//! [`COORD_DECIMALS`](crate::tolerance::COORD_DECIMALS) places (~1.1 m).

use std::fmt;

use crate::geodesy;
use crate::tolerance::COORD_SCALE;

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` if neither coordinate is NaN or infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Haversine great-circle distance in metres.
    ///
    /// See [`geodesy::distance`] for the handling of non-finite coordinates.
    #[inline]
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        geodesy::distance(self, other)
    }

    /// Rounded identity key used for deduplication and exact site matching.
    #[inline]
    pub fn key(self) -> PositionKey {
        PositionKey {
            lat: (self.lat * COORD_SCALE).round() as i64,
            lon: (self.lon * COORD_SCALE).round() as i64,
        }
    }

    /// `true` if both points round to the same [`PositionKey`].
    #[inline]
    pub fn same_site(self, other: GeoPoint) -> bool {
        self.key() == other.key()
    }

    /// Axis-aligned tolerance check in degree space.  Both axes must differ
    /// by strictly less than `tol_deg`.
    #[inline]
    pub fn within_deg(self, other: GeoPoint, tol_deg: f64) -> bool {
        (self.lat - other.lat).abs() < tol_deg && (self.lon - other.lon).abs() < tol_deg
    }

    /// `[lat, lon]` pair, the layout used by the R-tree indices.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── PositionKey ───────────────────────────────────────────────────────────────

/// Coordinates scaled by 10^5 and rounded.  Hashable stand-in for a
/// [`GeoPoint`] when deciding whether two points are the same site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey {
    pub lat: i64,
    pub lon: i64,
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.5},{:.5}",
            self.lat as f64 / COORD_SCALE,
            self.lon as f64 / COORD_SCALE
        )
    }
}

// ── RoadAnchor ────────────────────────────────────────────────────────────────

/// Nearest-road coordinate as reported by a road snapper.
///
/// Kept in the snapper's `{x: lon, y: lat}` layout; convert with
/// [`to_geo`](Self::to_geo) before doing geometry.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadAnchor {
    pub x: f64,
    pub y: f64,
}

impl RoadAnchor {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_geo(self) -> GeoPoint {
        GeoPoint::new(self.y, self.x)
    }

    #[inline]
    pub fn from_geo(p: GeoPoint) -> Self {
        Self { x: p.lon, y: p.lat }
    }
}

impl From<GeoPoint> for RoadAnchor {
    fn from(p: GeoPoint) -> Self {
        Self::from_geo(p)
    }
}
