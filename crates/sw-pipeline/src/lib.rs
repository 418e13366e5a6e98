//! `sw-pipeline` — the asynchronous route build.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`services`]   | `RoadSnapper`, `RoadRouter`, `TopologyQuery`, `ElevationService` |
//! | [`offline`]    | in-memory implementations of the collaborator traits     |
//! | [`generation`] | `GenerationCounter`, `BuildTicket` (newest build wins)   |
//! | [`cache`]      | `ElevationCache`, `CachedElevation`                      |
//! | [`observer`]   | `BuildObserver`, `NoopObserver`, `TracingObserver`       |
//! | [`config`]     | `PipelineConfig`                                         |
//! | [`pipeline`]   | `BuildPipeline`, `BuildRequest`, `BuildOutcome`          |
//! | [`error`]      | `PipelineError`, `PipelineResult`                        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let pipeline = BuildPipeline::new(snapper, graph, topology, elevation, PipelineConfig::default())?;
//! let outcome = pipeline
//!     .build(BuildRequest::new(start, end), &mut TracingObserver)
//!     .await?;
//! ```
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on config and request types. |

pub mod cache;
pub mod config;
pub mod error;
pub mod generation;
pub mod observer;
pub mod offline;
pub mod pipeline;
pub mod services;

#[cfg(test)]
mod tests;

pub use cache::{CachedElevation, ElevationCache, request_key};
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use generation::{BuildTicket, GenerationCounter};
pub use observer::{BuildObserver, BuildStep, NoopObserver, TracingObserver};
pub use offline::{SampledElevation, WayTopology};
pub use pipeline::{BuildOutcome, BuildPipeline, BuildRequest};
pub use services::{ElevationService, RoadRoute, RoadRouter, RoadSnapper, TopologyQuery};
