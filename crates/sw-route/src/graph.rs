//! Offline road graph and shortest-path routing.
//!
//! # Data layout
//!
//! Outgoing edges are stored in **Compressed Sparse Row (CSR)** form.  Given
//! a `NodeId n`, its outgoing edges occupy
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Nodes are deduplicated by [`PositionKey`], so two road polylines that
//! pass through the same rounded position share a junction node.
//!
//! Edge cost is the haversine length in whole millimetres, which keeps the
//! Dijkstra heap on integer keys.
//!
//! A second R-tree holds one entry per road segment, so a query point that
//! lies between two junctions can enter the graph at either end of the
//! segment it sits on.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;
use sw_core::geodesy::{distance, path_length, project_onto_segment};
use sw_core::{GeoPoint, PositionKey};

use crate::assemble::dedup_consecutive;

// ── NodeId ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── R-tree edge entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct EdgeEntry {
    a:    GeoPoint,
    b:    GeoPoint,
    ends: [NodeId; 2],
}

impl RTreeObject for EdgeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.a.to_array(), self.b.to_array())
    }
}

impl PointDistance for EdgeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let proj = project_onto_segment(GeoPoint::new(point[0], point[1]), self.a, self.b);
        let dlat = proj.lat - point[0];
        let dlon = proj.lon - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Undirected road graph in CSR format plus node and segment indexes for
/// snapping.
///
/// Build with [`RoadGraphBuilder`].
pub struct RoadGraph {
    node_pos:       Vec<GeoPoint>,
    node_out_start: Vec<u32>,
    edge_from:      Vec<NodeId>,
    edge_to:        Vec<NodeId>,
    edge_length_mm: Vec<u64>,
    spatial_idx:    RTree<NodeEntry>,
    edge_idx:       RTree<EdgeEntry>,
}

/// A shortest path through the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphPath {
    pub points:     Vec<GeoPoint>,
    pub distance_m: f64,
}

impl RoadGraph {
    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn node_pos(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    #[inline]
    fn out_edges(&self, node: NodeId) -> std::ops::Range<usize> {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        start..end
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_edges(node).len()
    }

    /// Nearest graph node to `pos`; `None` only for an empty graph.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx.nearest_neighbor(&pos.to_array()).map(|e| e.id)
    }

    /// Dijkstra over edge length.  `from == to` yields a single-node path.
    pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Option<GraphPath> {
        if from == to {
            return Some(GraphPath { points: vec![self.node_pos(from)], distance_m: 0.0 });
        }

        let n = self.node_count();
        let mut dist = vec![u64::MAX; n];
        let mut prev_edge = vec![usize::MAX; n];
        dist[from.index()] = 0;

        let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
        heap.push(Reverse((0, from)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == to {
                return Some(self.reconstruct(&prev_edge, to));
            }
            if cost > dist[node.index()] {
                continue;
            }
            for e in self.out_edges(node) {
                let next = self.edge_to[e];
                let new_cost = cost.saturating_add(self.edge_length_mm[e]);
                if new_cost < dist[next.index()] {
                    dist[next.index()] = new_cost;
                    prev_edge[next.index()] = e;
                    heap.push(Reverse((new_cost, next)));
                }
            }
        }
        None
    }

    fn reconstruct(&self, prev_edge: &[usize], to: NodeId) -> GraphPath {
        let mut nodes = vec![to];
        let mut cur = to;
        while prev_edge[cur.index()] != usize::MAX {
            cur = self.edge_from[prev_edge[cur.index()]];
            nodes.push(cur);
        }
        nodes.reverse();
        let points: Vec<GeoPoint> = nodes.into_iter().map(|n| self.node_pos(n)).collect();
        let distance_m = path_length(&points);
        GraphPath { points, distance_m }
    }

    /// Road path from `a` to `b`, with `a` and `b` themselves as the first
    /// and last points.
    ///
    /// Each point enters the graph through either end of its nearest
    /// segment; the cheapest of the four pairings wins.  Two points on the
    /// same segment are joined directly.  A graph without edges falls back
    /// to the nearest nodes.
    pub fn route_between(&self, a: GeoPoint, b: GeoPoint) -> Option<GraphPath> {
        let (Some(ea), Some(eb)) = (
            self.edge_idx.nearest_neighbor(&a.to_array()),
            self.edge_idx.nearest_neighbor(&b.to_array()),
        ) else {
            let inner = self.shortest_path(self.snap_to_node(a)?, self.snap_to_node(b)?)?;
            return Some(with_ends(a, inner.points, b));
        };

        let mut best: Option<(f64, Vec<GeoPoint>)> = None;
        if ea.ends == eb.ends {
            best = Some((distance(a, b), Vec::new()));
        }
        for from in ea.ends {
            for to in eb.ends {
                let Some(inner) = self.shortest_path(from, to) else {
                    continue;
                };
                let cost = distance(a, self.node_pos(from)) + inner.distance_m + distance(self.node_pos(to), b);
                if best.as_ref().is_none_or(|(c, _)| cost < *c) {
                    best = Some((cost, inner.points));
                }
            }
        }
        best.map(|(_, inner)| with_ends(a, inner, b))
    }
}

fn with_ends(a: GeoPoint, inner: Vec<GeoPoint>, b: GeoPoint) -> GraphPath {
    let mut points = Vec::with_capacity(inner.len() + 2);
    points.push(a);
    points.extend(inner);
    points.push(b);
    dedup_consecutive(&mut points);
    let distance_m = path_length(&points);
    GraphPath { points, distance_m }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Collect road polylines, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use sw_core::GeoPoint;
/// use sw_route::RoadGraphBuilder;
///
/// let mut b = RoadGraphBuilder::new();
/// b.add_road(&[GeoPoint::new(54.0, 25.0), GeoPoint::new(54.0, 25.001)]);
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 2); // both directions
/// ```
#[derive(Default)]
pub struct RoadGraphBuilder {
    nodes:     Vec<GeoPoint>,
    by_key:    FxHashMap<PositionKey, NodeId>,
    raw_edges: Vec<(NodeId, NodeId, u64)>,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node at `pos`, reusing an existing node with the same rounded
    /// position.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let next = NodeId(self.nodes.len() as u32);
        let id = *self.by_key.entry(pos.key()).or_insert(next);
        if id == next {
            self.nodes.push(pos);
        }
        id
    }

    /// Add a two-way road.  Non-finite points are skipped.
    pub fn add_road(&mut self, polyline: &[GeoPoint]) {
        let ids: Vec<NodeId> = polyline
            .iter()
            .filter(|p| p.is_finite())
            .map(|&p| self.add_node(p))
            .collect();
        for w in ids.windows(2) {
            let (a, b) = (w[0], w[1]);
            if a == b {
                continue;
            }
            let mm = (distance(self.nodes[a.index()], self.nodes[b.index()]) * 1000.0).round() as u64;
            self.raw_edges.push((a, b, mm));
            self.raw_edges.push((b, a, mm));
        }
    }

    pub fn build(self) -> RoadGraph {
        let node_count = self.nodes.len();
        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|e| e.0);

        let edge_from = raw.iter().map(|e| e.0).collect();
        let edge_to = raw.iter().map(|e| e.1).collect();
        let edge_length_mm = raw.iter().map(|e| e.2).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.0.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: p.to_array(), id: NodeId(i as u32) })
            .collect();

        let segments: Vec<EdgeEntry> = raw
            .iter()
            .filter(|e| e.0 < e.1)
            .map(|&(from, to, _)| EdgeEntry {
                a:    self.nodes[from.index()],
                b:    self.nodes[to.index()],
                ends: [from, to],
            })
            .collect();

        RoadGraph {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_mm,
            spatial_idx: RTree::bulk_load(entries),
            edge_idx: RTree::bulk_load(segments),
        }
    }
}
