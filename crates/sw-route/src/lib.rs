//! `sw-route` — from a raw road route to an assembled trunk-line path.
//!
//! # Crate layout
//!
//! | Module            | Contents                                               |
//! |-------------------|--------------------------------------------------------|
//! | [`context`]       | `RouteBuildContext`, `AccessChamber`                   |
//! | [`assemble`]      | access segments, stitching, `assemble_route`           |
//! | [`intersections`] | turn-angle / topology candidates, dedup, `RoutePolygon`|
//! | [`sites`]         | `CandidateSites` (R-tree, ~11 m match)                 |
//! | [`snap`]          | `SegmentSnapper` (offline nearest-road lookup)         |
//! | [`graph`]         | `RoadGraph` (CSR, Dijkstra) for offline routing         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod assemble;
pub mod context;
pub mod graph;
pub mod intersections;
pub mod sites;
pub mod snap;


pub use assemble::{AssemblyInput, access_segment, assemble_route, road_centerline_anchor};
pub use context::{AccessChamber, RouteBuildContext};
pub use graph::{GraphPath, NodeId, RoadGraph, RoadGraphBuilder};
pub use intersections::{
    CandidateSource, IntersectionCandidate, RoutePolygon, angle_candidates, reduce_intersections,
    remove_duplicate_intersections, shared_way_nodes,
};
pub use sites::CandidateSites;
pub use snap::SegmentSnapper;
