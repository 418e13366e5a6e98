//! Spatial lookup of candidate manhole sites.

use rstar::{AABB, RTree};
use sw_core::GeoPoint;
use sw_core::tolerance::ROUTE_MATCH_DEG;

/// Reduced candidate set, indexed by an R-tree over `[lat, lon]`.
///
/// A route point *matches* a site when both coordinates differ by less than
/// the tolerance (default [`ROUTE_MATCH_DEG`], ~11 m).
pub struct CandidateSites {
    tree:    RTree<[f64; 2]>,
    tol_deg: f64,
}

impl CandidateSites {
    pub fn new(points: &[GeoPoint]) -> Self {
        Self::with_tolerance(points, ROUTE_MATCH_DEG)
    }

    pub fn with_tolerance(points: &[GeoPoint], tol_deg: f64) -> Self {
        let entries: Vec<[f64; 2]> = points
            .iter()
            .filter(|p| p.is_finite())
            .map(|p| p.to_array())
            .collect();
        Self { tree: RTree::bulk_load(entries), tol_deg }
    }

    /// No candidate sites at all.
    pub fn empty() -> Self {
        Self::new(&[])
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// `true` if some site lies within the tolerance box around `p`.
    pub fn matches(&self, p: GeoPoint) -> bool {
        let [lat, lon] = p.to_array();
        let tol = self.tol_deg;
        let window = AABB::from_corners([lat - tol, lon - tol], [lat + tol, lon + tol]);
        self.tree
            .locate_in_envelope(&window)
            .any(|s| GeoPoint::new(s[0], s[1]).within_deg(p, tol))
    }
}

impl Default for CandidateSites {
    fn default() -> Self {
        Self::empty()
    }
}
