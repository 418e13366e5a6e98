//! External collaborators.
//!
//! Each trait method returns a `Send` future so a pipeline can be driven
//! from any tokio worker.  Implementations report their own failures as
//! [`SewerError::ExternalService`](sw_core::SewerError::ExternalService);
//! timeouts are applied by the pipeline, not by the implementations.

use std::future::Future;

use sw_core::{GeoPoint, RoadAnchor, SewerResult};
use sw_route::RoutePolygon;

/// One road path returned by a [`RoadRouter`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadRoute {
    pub points:     Vec<GeoPoint>,
    /// The router's own length figure, metres.  Logged only.
    pub distance_m: f64,
}

/// Nearest point on the road network.
pub trait RoadSnapper: Send + Sync {
    /// `Ok(None)` when no road is close enough.
    fn nearest_road(&self, point: GeoPoint) -> impl Future<Output = SewerResult<Option<RoadAnchor>>> + Send;
}

/// Road routing between two anchors.
pub trait RoadRouter: Send + Sync {
    /// Alternatives in preference order.  An empty list means no route.
    fn route(&self, from: RoadAnchor, to: RoadAnchor) -> impl Future<Output = SewerResult<Vec<RoadRoute>>> + Send;
}

/// Road-network topology around a route.
pub trait TopologyQuery: Send + Sync {
    /// Nodes inside `polygon` that are shared by two or more ways.
    fn shared_nodes(&self, polygon: &RoutePolygon) -> impl Future<Output = SewerResult<Vec<GeoPoint>>> + Send;
}

/// Surface elevation lookup.
pub trait ElevationService: Send + Sync {
    /// One entry per input point, `None` where the service has no data.
    fn elevations(&self, points: &[GeoPoint]) -> impl Future<Output = SewerResult<Vec<Option<f64>>>> + Send;
}
