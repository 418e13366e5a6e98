//! Stitching a road route and two access segments into one [`RoutePath`].
//!
//! ```text
//!  start ──access── ·  anchor₁ ═══ primary route ═══ anchor₂  · ──access── end
//!                   ↑                                         ↑
//!          stand-off gap (~5 m)                      stand-off gap (~5 m)
//! ```
//!
//! Each access segment runs from its endpoint towards the road anchor and
//! stops [`ACCESS_STANDOFF_DEG`] short of it, unless the endpoint is already
//! closer than that, in which case it runs straight onto the anchor.

use sw_core::geodesy::{self, planar_deg};
use sw_core::tolerance::{ACCESS_STANDOFF_DEG, TERMINAL_STUB_M};
use sw_core::{GeoPoint, RoadAnchor, RoutePath, SewerError, SewerResult};
use tracing::debug;

use crate::RouteBuildContext;

/// Everything the assembler needs for one build.
#[derive(Clone, Copy, Debug)]
pub struct AssemblyInput<'a> {
    pub start:        GeoPoint,
    pub end:          GeoPoint,
    pub start_anchor: RoadAnchor,
    pub end_anchor:   RoadAnchor,
    /// Road route from `start_anchor` to `end_anchor`, as returned by the
    /// router.
    pub primary:      &'a [GeoPoint],
}

/// Two-point access segment from `endpoint` towards `anchor`.
pub fn access_segment(endpoint: GeoPoint, anchor: RoadAnchor) -> SewerResult<[GeoPoint; 2]> {
    let road = anchor.to_geo();
    if !endpoint.is_finite() {
        return Err(SewerError::degenerate(format!("endpoint {endpoint} is not finite")));
    }
    if !road.is_finite() {
        return Err(SewerError::degenerate(format!("road anchor {road} is not finite")));
    }

    let length = planar_deg(endpoint, road);
    if length < ACCESS_STANDOFF_DEG {
        return Ok([endpoint, road]);
    }

    let ux = (road.lon - endpoint.lon) / length;
    let uy = (road.lat - endpoint.lat) / length;
    let reach = length - ACCESS_STANDOFF_DEG;
    let pre_road = GeoPoint::new(endpoint.lat + uy * reach, endpoint.lon + ux * reach);
    Ok([endpoint, pre_road])
}

/// Road-centreline anchor from the points a snapper returned.
///
/// For snapper implementations whose backend answers with several snapped
/// points per query (one per carriageway side).  Two or more points
/// straddle the carriageway, so their first two are averaged; a single
/// point is used as is.  [`SegmentSnapper`](crate::SegmentSnapper) projects
/// onto one segment and does not need it.
pub fn road_centerline_anchor(snapped: &[GeoPoint]) -> Option<RoadAnchor> {
    match snapped {
        [] => None,
        [only] => Some(RoadAnchor::from_geo(*only)),
        [a, b, ..] => Some(RoadAnchor::from_geo(GeoPoint::new(
            (a.lat + b.lat) / 2.0,
            (a.lon + b.lon) / 2.0,
        ))),
    }
}

/// Drop the final point if the last step is shorter than
/// [`TERMINAL_STUB_M`].
pub fn trim_terminal_stub(points: &mut Vec<GeoPoint>) {
    let n = points.len();
    if n < 2 {
        return;
    }
    if geodesy::distance(points[n - 2], points[n - 1]) < TERMINAL_STUB_M {
        debug!(dropped = %points[n - 1], "dropping terminal stub");
        points.pop();
    }
}

/// Remove consecutive exact duplicates in place.
pub fn dedup_consecutive(points: &mut Vec<GeoPoint>) {
    points.dedup_by(|b, a| a == b);
}

/// Build the full start-to-end route.
///
/// On the first call for a given `ctx`, the start anchor is recorded as the
/// build's access chamber.
pub fn assemble_route(ctx: &mut RouteBuildContext, input: &AssemblyInput<'_>) -> SewerResult<RoutePath> {
    if input.primary.is_empty() {
        return Err(SewerError::input("router returned an empty polyline"));
    }
    if let Some(i) = input.primary.iter().position(|p| !p.is_finite()) {
        return Err(SewerError::degenerate(format!("primary route point {i} is not finite")));
    }
    if input.start_anchor.to_geo().same_site(input.end_anchor.to_geo()) {
        return Err(SewerError::degenerate(format!(
            "start and end snap to the same road point {}",
            input.start_anchor.to_geo()
        )));
    }

    let head = access_segment(input.start, input.start_anchor)?;
    let tail = access_segment(input.end, input.end_anchor)?;

    if ctx.record_first_access(input.start_anchor) {
        debug!(generation = ctx.generation(), anchor = %input.start_anchor.to_geo(), "recorded access chamber");
    }

    let mut points = Vec::with_capacity(input.primary.len() + 4);
    points.extend_from_slice(&head);
    points.extend_from_slice(input.primary);
    points.extend(tail.iter().rev());

    trim_terminal_stub(&mut points);
    dedup_consecutive(&mut points);

    debug!(
        generation = ctx.generation(),
        points = points.len(),
        "assembled route"
    );
    RoutePath::new(points)
}
