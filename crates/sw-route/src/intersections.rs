//! Preferred manhole sites at probable road crossings.
//!
//! Two independent sources feed the candidate set:
//!
//! | Source                      | Produced by                                 |
//! |-----------------------------|---------------------------------------------|
//! | [`CandidateSource::TurnAngle`] | [`angle_candidates`] on the road polyline |
//! | [`CandidateSource::Topology`]  | an external query for shared way nodes    |
//!
//! [`reduce_intersections`] unions both and keeps one point per
//! [`PositionKey`](sw_core::PositionKey).

use rustc_hash::{FxHashMap, FxHashSet};
use sw_core::geodesy::turn_angle;
use sw_core::{GeoPoint, PositionKey};

/// Where a candidate came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CandidateSource {
    TurnAngle,
    Topology,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionCandidate {
    pub point:  GeoPoint,
    pub source: CandidateSource,
}

impl IntersectionCandidate {
    pub fn topology(point: GeoPoint) -> Self {
        Self { point, source: CandidateSource::Topology }
    }
}

/// Interior points whose turn angle is below `threshold_deg`.
pub fn angle_candidates(points: &[GeoPoint], threshold_deg: f64) -> Vec<IntersectionCandidate> {
    points
        .windows(3)
        .filter(|w| turn_angle(w[0], w[1], w[2]) < threshold_deg)
        .map(|w| IntersectionCandidate { point: w[1], source: CandidateSource::TurnAngle })
        .collect()
}

/// Keep the first point seen for each rounded position.  Non-finite points
/// are dropped.
pub fn remove_duplicate_intersections(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let mut seen: FxHashSet<PositionKey> = FxHashSet::default();
    points
        .iter()
        .copied()
        .filter(|p| p.is_finite() && seen.insert(p.key()))
        .collect()
}

/// Union of both candidate sources, deduplicated.  Provenance is dropped.
pub fn reduce_intersections(
    angle: &[IntersectionCandidate],
    topology: &[IntersectionCandidate],
) -> Vec<GeoPoint> {
    let all: Vec<GeoPoint> = angle.iter().chain(topology).map(|c| c.point).collect();
    remove_duplicate_intersections(&all)
}

/// Road-way node coordinates that occur more than once, i.e. nodes shared
/// by at least two ways.
///
/// `way_nodes` is the flat list of every node of every way, with repeats.
/// The result holds one rounded point per shared position, in first-seen
/// order.
pub fn shared_way_nodes<I>(way_nodes: I) -> Vec<GeoPoint>
where
    I: IntoIterator<Item = GeoPoint>,
{
    let mut counts: FxHashMap<PositionKey, u32> = FxHashMap::default();
    let mut order = Vec::new();
    for p in way_nodes.into_iter().filter(|p| p.is_finite()) {
        let key = p.key();
        let n = counts.entry(key).or_insert(0);
        if *n == 0 {
            order.push(key);
        }
        *n += 1;
    }

    order
        .into_iter()
        .filter(|k| counts[k] > 1)
        .map(|k| {
            GeoPoint::new(
                k.lat as f64 / sw_core::tolerance::COORD_SCALE,
                k.lon as f64 / sw_core::tolerance::COORD_SCALE,
            )
        })
        .collect()
}

// ── RoutePolygon ──────────────────────────────────────────────────────────────

/// Route outline handed to topology queries.
///
/// [`poly_filter`](Self::poly_filter) renders the Overpass `poly:` form,
/// `"lon lat lon lat …"`.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutePolygon {
    points: Vec<GeoPoint>,
}

impl RoutePolygon {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn poly_filter(&self) -> String {
        self.points
            .iter()
            .map(|p| format!("{} {}", p.lon, p.lat))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `[min_lat, min_lon]`, `[max_lat, max_lon]`, or `None` when empty.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let first = self.points.first()?;
        let mut lo = first.to_array();
        let mut hi = lo;
        for p in &self.points[1..] {
            lo = [lo[0].min(p.lat), lo[1].min(p.lon)];
            hi = [hi[0].max(p.lat), hi[1].max(p.lon)];
        }
        Some((lo, hi))
    }
}
