//! `sw-core` — foundational types for the sewer trunk-line workspace.
//!
//! This crate is a dependency of every other `sw-*` crate.  It has no `sw-*`
//! dependencies and only `thiserror` (plus optional `serde`) from outside.
//!
//! # What lives here
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`geo`]       | `GeoPoint`, `PositionKey`, `RoadAnchor`                |
//! | [`geodesy`]   | haversine distance, segment projection, turn angle     |
//! | [`route`]     | `RoutePath` (validated polyline)                       |
//! | [`config`]    | `SewerConfig` (depth, slope, interval parameters)      |
//! | [`tolerance`] | named distance / angle thresholds                      |
//! | [`error`]     | `SewerError`, `SewerResult`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to the public value types.  |

pub mod config;
pub mod error;
pub mod geo;
pub mod geodesy;
pub mod route;
pub mod tolerance;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SewerConfig;
pub use error::{SewerError, SewerResult};
pub use geo::{GeoPoint, PositionKey, RoadAnchor};
pub use route::RoutePath;
