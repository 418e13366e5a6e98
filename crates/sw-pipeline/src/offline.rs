//! In-memory collaborators for offline runs and tests.
//!
//! | Collaborator         | Backed by                                        |
//! |----------------------|--------------------------------------------------|
//! | [`RoadSnapper`]      | `sw_route::SegmentSnapper`                       |
//! | [`RoadRouter`]       | `sw_route::RoadGraph` (single shortest path)     |
//! | [`TopologyQuery`]    | [`WayTopology`], raw way polylines              |
//! | [`ElevationService`] | [`SampledElevation`], nearest surveyed sample    |

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use sw_core::tolerance::ROUTE_MATCH_DEG;
use sw_core::{GeoPoint, RoadAnchor, SewerResult};
use sw_route::{RoadGraph, RoutePolygon, SegmentSnapper, shared_way_nodes};

use crate::services::{ElevationService, RoadRoute, RoadRouter, RoadSnapper, TopologyQuery};

impl RoadSnapper for SegmentSnapper {
    async fn nearest_road(&self, point: GeoPoint) -> SewerResult<Option<RoadAnchor>> {
        Ok(self.snap(point))
    }
}

impl RoadRouter for RoadGraph {
    async fn route(&self, from: RoadAnchor, to: RoadAnchor) -> SewerResult<Vec<RoadRoute>> {
        Ok(self
            .route_between(from.to_geo(), to.to_geo())
            .map(|p| RoadRoute { points: p.points, distance_m: p.distance_m })
            .into_iter()
            .collect())
    }
}

// ── WayTopology ───────────────────────────────────────────────────────────────

/// Shared way nodes computed from a fixed set of way polylines.
///
/// A node is reported when it lies inside the polygon's bounding box,
/// padded by [`ROUTE_MATCH_DEG`].
#[derive(Clone, Debug, Default)]
pub struct WayTopology {
    ways: Vec<Vec<GeoPoint>>,
}

impl WayTopology {
    pub fn new(ways: Vec<Vec<GeoPoint>>) -> Self {
        Self { ways }
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }
}

impl TopologyQuery for WayTopology {
    async fn shared_nodes(&self, polygon: &RoutePolygon) -> SewerResult<Vec<GeoPoint>> {
        let Some((lo, hi)) = polygon.bounds() else {
            return Ok(Vec::new());
        };
        let pad = ROUTE_MATCH_DEG;
        let inside = |p: &GeoPoint| {
            p.lat >= lo[0] - pad && p.lat <= hi[0] + pad && p.lon >= lo[1] - pad && p.lon <= hi[1] + pad
        };
        let shared = shared_way_nodes(self.ways.iter().flatten().copied());
        Ok(shared.into_iter().filter(inside).collect())
    }
}

// ── SampledElevation ──────────────────────────────────────────────────────────

#[derive(Clone)]
struct Sample {
    point:       [f64; 2],
    elevation_m: f64,
}

impl RTreeObject for Sample {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for Sample {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

/// Elevation from the nearest surveyed sample.
///
/// Points farther than `max_radius_m` from every sample get `None`.
pub struct SampledElevation {
    tree:         RTree<Sample>,
    max_radius_m: f64,
}

impl SampledElevation {
    pub fn new<I>(samples: I, max_radius_m: f64) -> Self
    where
        I: IntoIterator<Item = (GeoPoint, f64)>,
    {
        let samples = samples
            .into_iter()
            .filter(|(p, e)| p.is_finite() && e.is_finite())
            .map(|(p, e)| Sample { point: p.to_array(), elevation_m: e })
            .collect();
        Self { tree: RTree::bulk_load(samples), max_radius_m }
    }

    pub fn sample_count(&self) -> usize {
        self.tree.size()
    }

    fn lookup(&self, p: GeoPoint) -> Option<f64> {
        let nearest = self.tree.nearest_neighbor(&p.to_array())?;
        let at = GeoPoint::new(nearest.point[0], nearest.point[1]);
        (p.distance_m(at) <= self.max_radius_m).then_some(nearest.elevation_m)
    }
}

impl ElevationService for SampledElevation {
    async fn elevations(&self, points: &[GeoPoint]) -> SewerResult<Vec<Option<f64>>> {
        Ok(points.iter().map(|&p| self.lookup(p)).collect())
    }
}
