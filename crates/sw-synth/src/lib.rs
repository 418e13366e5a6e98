//! `sw-synth` — manholes, pipes, and the elevation profile.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`network`]   | `SewerNetwork`, `Manhole`, `ManholeKind`, `PipeSegment`  |
//! | [`elevation`] | `ElevationProfile`, gap filling                          |
//! | [`synth`]     | `NetworkSynthesizer` (single forward walk)               |
//! | [`profile`]   | `project_profile`, `ProfileProjection`                   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let profile = ElevationProfile::from_raw(&route, &raw_elevations)?;
//! let network = NetworkSynthesizer::default()
//!     .synthesize(&route, profile.elevations(), &sites, ctx.access_chamber())?;
//! let chart = project_profile(&network, &profile)?;
//! ```

pub mod elevation;
pub mod network;
pub mod profile;
pub mod synth;


pub use elevation::{ElevationProfile, fill_elevation_gaps};
pub use network::{Manhole, ManholeKind, PipeSegment, SewerNetwork};
pub use profile::{ManholeMarker, ProfilePoint, ProfileProjection, project_profile};
pub use synth::{NetworkSynthesizer, calculate_manholes_and_pipes};
