//! Offline nearest-road snapping over a set of road polylines.
//!
//! Each road polyline is split into straight segments and bulk-loaded into
//! an R-tree.  A query finds the nearest segment in degree space, projects
//! the point onto it, and accepts the projection if it lies within the snap
//! radius (haversine metres).

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use sw_core::geodesy::{distance, project_onto_segment};
use sw_core::tolerance::SNAP_RADIUS_M;
use sw_core::{GeoPoint, RoadAnchor};

// ── R-tree segment entry ──────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct RoadSegment {
    a: GeoPoint,
    b: GeoPoint,
}

impl RoadSegment {
    fn project(&self, p: GeoPoint) -> GeoPoint {
        project_onto_segment(p, self.a, self.b)
    }
}

impl RTreeObject for RoadSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.a.to_array(), self.b.to_array())
    }
}

impl PointDistance for RoadSegment {
    /// Squared planar distance in `[lat, lon]` degrees to the clamped
    /// projection.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let proj = self.project(GeoPoint::new(point[0], point[1]));
        let dlat = proj.lat - point[0];
        let dlon = proj.lon - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── SegmentSnapper ────────────────────────────────────────────────────────────

/// Nearest-road lookup over in-memory road geometry.
pub struct SegmentSnapper {
    tree:     RTree<RoadSegment>,
    radius_m: f64,
}

impl SegmentSnapper {
    /// Index every consecutive pair of every polyline.  Non-finite points
    /// break a polyline into separate runs.
    pub fn new<'a, I>(roads: I) -> Self
    where
        I: IntoIterator<Item = &'a [GeoPoint]>,
    {
        let segments: Vec<RoadSegment> = roads
            .into_iter()
            .flat_map(|line| line.windows(2))
            .filter(|w| w[0].is_finite() && w[1].is_finite())
            .map(|w| RoadSegment { a: w[0], b: w[1] })
            .collect();
        Self { tree: RTree::bulk_load(segments), radius_m: SNAP_RADIUS_M }
    }

    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn segment_count(&self) -> usize {
        self.tree.size()
    }

    /// Closest point on any road, or `None` if nothing lies within the snap
    /// radius.
    pub fn snap(&self, p: GeoPoint) -> Option<RoadAnchor> {
        if !p.is_finite() {
            return None;
        }
        let seg = self.tree.nearest_neighbor(&p.to_array())?;
        let proj = seg.project(p);
        (distance(p, proj) <= self.radius_m).then(|| RoadAnchor::from_geo(proj))
    }
}
