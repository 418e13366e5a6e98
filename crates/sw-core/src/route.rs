//! Validated route polyline.

use crate::{GeoPoint, SewerError, SewerResult, geodesy};

/// An ordered route from the true start point to the true end point.
///
/// # Invariants (checked by [`RoutePath::new`])
///
/// - at least two points
/// - every coordinate finite
/// - no two consecutive points exactly equal
///
/// The first and last points are fixed for the lifetime of the value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoutePath {
    points: Vec<GeoPoint>,
}

impl RoutePath {
    pub fn new(points: Vec<GeoPoint>) -> SewerResult<Self> {
        if points.len() < 2 {
            return Err(SewerError::degenerate(format!(
                "route needs at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(SewerError::degenerate(format!("route point {i} is not finite: {p}")));
        }
        if let Some(i) = points.windows(2).position(|w| w[0] == w[1]) {
            return Err(SewerError::degenerate(format!(
                "route points {i} and {} are identical",
                i + 1
            )));
        }
        Ok(Self { points })
    }

    #[inline]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn first(&self) -> GeoPoint {
        self.points[0]
    }

    #[inline]
    pub fn last(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }

    /// Haversine length of every step, `len() - 1` entries.
    pub fn step_lengths(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .map(|w| geodesy::distance(w[0], w[1]))
            .collect()
    }

    /// Distance along the route to every point, starting at `0.0`.
    pub fn cumulative_distances(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.points.len());
        let mut acc = 0.0;
        out.push(acc);
        for w in self.points.windows(2) {
            acc += geodesy::distance(w[0], w[1]);
            out.push(acc);
        }
        out
    }

    pub fn total_length_m(&self) -> f64 {
        geodesy::path_length(&self.points)
    }

    /// Index of the first route point with the same rounded position as `p`.
    pub fn position_of_site(&self, p: GeoPoint) -> Option<usize> {
        let key = p.key();
        self.points.iter().position(|q| q.key() == key)
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }
}
