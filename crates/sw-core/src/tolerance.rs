//! Numeric tolerances shared across the workspace.
//!
//! Every threshold that decides "same point", "close enough", or "too short"
//! lives here, with its unit in the name.

/// Decimal places kept when deriving a [`PositionKey`](crate::PositionKey).
/// Five places is ~1.1 m at the equator.
pub const COORD_DECIMALS: i32 = 5;

/// `10^COORD_DECIMALS`.
pub const COORD_SCALE: f64 = 100_000.0;

/// Per-axis tolerance, in degrees, for deciding that a route point coincides
/// with a candidate manhole site (~11 m).
pub const ROUTE_MATCH_DEG: f64 = 0.000_1;

/// Stand-off between an access segment's end and its road anchor, in
/// degrees (~5 m).  Also the threshold below which the access segment runs
/// straight onto the anchor.
pub const ACCESS_STANDOFF_DEG: f64 = 0.000_05;

/// A trailing route step shorter than this, in metres, is an artifact of
/// stitching and is dropped.
pub const TERMINAL_STUB_M: f64 = 1.0;

/// Interior route points with a turn angle below this, in degrees, are
/// treated as probable road crossings.
pub const INTERSECTION_ANGLE_DEG: f64 = 170.0;

/// Slack, in metres, when comparing accumulated distances against
/// thresholds or each other.
pub const DISTANCE_EPSILON_M: f64 = 1e-6;

/// Vertical headroom, in metres, added above and below the profile chart's
/// data range.
pub const PROFILE_MARGIN_M: f64 = 5.0;

/// Largest distance, in metres, at which the offline snapper still reports a
/// road anchor.
pub const SNAP_RADIUS_M: f64 = 50.0;
