//! Surface elevation along a route.
//!
//! Elevation services may return `null` for individual points.  Gaps are
//! filled by linear interpolation over distance along the route; leading and
//! trailing gaps take the nearest known value.  A response with no values
//! at all fails the build.

use sw_core::tolerance::DISTANCE_EPSILON_M;
use sw_core::{RoutePath, SewerError, SewerResult};
use tracing::debug;

/// Fill `None` (and non-finite) entries of `raw`.
///
/// `distances` are the cumulative route distances for the same points and
/// must be the same length.
pub fn fill_elevation_gaps(raw: &[Option<f64>], distances: &[f64]) -> SewerResult<Vec<f64>> {
    if raw.len() != distances.len() {
        return Err(SewerError::external(
            "elevation",
            format!("expected {} values, got {}", distances.len(), raw.len()),
        ));
    }

    let known = |i: usize| raw[i].filter(|e| e.is_finite());
    let n = raw.len();

    // next_known[i] = first index ≥ i with a value.
    let mut next_known = vec![None; n + 1];
    for i in (0..n).rev() {
        next_known[i] = if known(i).is_some() { Some(i) } else { next_known[i + 1] };
    }
    if next_known[0].is_none() {
        return Err(SewerError::input("elevation service returned no values"));
    }

    let mut out = Vec::with_capacity(n);
    let mut prev_known: Option<usize> = None;
    let mut filled = 0usize;
    for i in 0..n {
        if let Some(e) = known(i) {
            out.push(e);
            prev_known = Some(i);
            continue;
        }
        filled += 1;
        let value = match (prev_known, next_known[i]) {
            (Some(j), Some(k)) => {
                let (ej, ek) = (out[j], known(k).unwrap_or(out[j]));
                let span = distances[k] - distances[j];
                if span > DISTANCE_EPSILON_M {
                    ej + (ek - ej) * (distances[i] - distances[j]) / span
                } else {
                    ej
                }
            }
            (Some(j), None) => out[j],
            (None, k) => k.and_then(|k| known(k)).unwrap_or_default(),
        };
        out.push(value);
    }

    if filled > 0 {
        debug!(filled, total = n, "filled elevation gaps");
    }
    Ok(out)
}

/// Cumulative distance and surface elevation for every route point.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationProfile {
    distances:  Vec<f64>,
    elevations: Vec<f64>,
}

impl ElevationProfile {
    /// Build from a route and the raw service response for its points.
    pub fn from_raw(route: &RoutePath, raw: &[Option<f64>]) -> SewerResult<Self> {
        let distances = route.cumulative_distances();
        let elevations = fill_elevation_gaps(raw, &distances)?;
        Ok(Self { distances, elevations })
    }

    /// Build from already complete elevations.
    pub fn new(route: &RoutePath, elevations: Vec<f64>) -> SewerResult<Self> {
        let distances = route.cumulative_distances();
        if elevations.len() != distances.len() {
            return Err(SewerError::input(format!(
                "expected {} elevations, got {}",
                distances.len(),
                elevations.len()
            )));
        }
        if let Some(i) = elevations.iter().position(|e| !e.is_finite()) {
            return Err(SewerError::degenerate(format!("elevation {i} is not finite")));
        }
        Ok(Self { distances, elevations })
    }

    #[inline]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    #[inline]
    pub fn elevations(&self) -> &[f64] {
        &self.elevations
    }

    pub fn len(&self) -> usize {
        self.elevations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevations.is_empty()
    }

    /// Surface elevation at the first point at or beyond `distance_m`;
    /// the last point's elevation past the end of the route.
    pub fn elevation_at(&self, distance_m: f64) -> f64 {
        let i = self
            .distances
            .partition_point(|&d| d < distance_m - DISTANCE_EPSILON_M)
            .min(self.distances.len() - 1);
        self.elevations[i]
    }

    pub fn min_elevation_m(&self) -> f64 {
        self.elevations.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_elevation_m(&self) -> f64 {
        self.elevations.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}
