//! Projection of a network onto (distance, elevation) for charting.

use sw_core::tolerance::PROFILE_MARGIN_M;
use sw_core::{SewerError, SewerResult};

use crate::{ElevationProfile, ManholeKind, SewerNetwork};

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfilePoint {
    pub distance_m:  f64,
    pub elevation_m: f64,
}

impl ProfilePoint {
    #[inline]
    pub fn new(distance_m: f64, elevation_m: f64) -> Self {
        Self { distance_m, elevation_m }
    }
}

/// A chamber drawn at its invert elevation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManholeMarker {
    pub at:   ProfilePoint,
    pub kind: ManholeKind,
}

/// Chart-ready series for one network.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileProjection {
    /// Ground line, one point per route point.
    pub surface:  Vec<ProfilePoint>,
    /// Pipe invert, two points per pipe (start, end) in walk order.
    pub pipes:    Vec<ProfilePoint>,
    /// One marker per chamber, in network order.
    pub manholes: Vec<ManholeMarker>,
}

impl ProfileProjection {
    /// Horizontal extent `(0, route length)`.
    pub fn x_range(&self) -> (f64, f64) {
        let end = self.surface.last().map_or(0.0, |p| p.distance_m);
        (0.0, end)
    }

    /// Vertical extent: lowest pipe point to highest ground point, each
    /// padded by [`PROFILE_MARGIN_M`].
    pub fn y_range(&self) -> (f64, f64) {
        let low = self
            .pipes
            .iter()
            .chain(self.manholes.iter().map(|m| &m.at))
            .map(|p| p.elevation_m)
            .fold(f64::INFINITY, f64::min);
        let high = self
            .surface
            .iter()
            .map(|p| p.elevation_m)
            .fold(f64::NEG_INFINITY, f64::max);
        (low - PROFILE_MARGIN_M, high + PROFILE_MARGIN_M)
    }
}

/// Map `network` onto the route's elevation profile.
///
/// Chambers use their own recorded surface elevation.  Pipe ends look up
/// the surface at the first route point at or beyond their distance.
pub fn project_profile(network: &SewerNetwork, profile: &ElevationProfile) -> SewerResult<ProfileProjection> {
    if profile.is_empty() {
        return Err(SewerError::input("empty elevation profile"));
    }

    let surface = profile
        .distances()
        .iter()
        .zip(profile.elevations())
        .map(|(&d, &e)| ProfilePoint::new(d, e))
        .collect();

    let pipes = network
        .pipes()
        .iter()
        .flat_map(|p| {
            [
                ProfilePoint::new(p.distance_start_m, profile.elevation_at(p.distance_start_m) - p.depth_start_m),
                ProfilePoint::new(p.distance_end_m, profile.elevation_at(p.distance_end_m) - p.depth_end_m),
            ]
        })
        .collect();

    let manholes = network
        .manholes()
        .iter()
        .map(|m| ManholeMarker {
            at:   ProfilePoint::new(m.distance_m, m.invert_elevation_m()),
            kind: m.kind,
        })
        .collect();

    Ok(ProfileProjection { surface, pipes, manholes })
}
