//! Workspace error type.
//!
//! Downstream crates keep their own error enums and wrap `SewerError` as one
//! variant, the same way `PipelineError` does.

use thiserror::Error;

/// Failure classes for a single route build.
///
/// None of these are fatal to the process: the build that hit them is
/// abandoned and the caller may start a new one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SewerError {
    /// Required upstream data is missing (no road anchor, no route, no
    /// elevations).
    #[error("input unavailable: {0}")]
    InputUnavailable(String),

    /// Geometry that would poison later arithmetic: NaN coordinates,
    /// zero-length routes, identical anchors.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// An external collaborator failed or returned malformed data.
    #[error("{service} failed: {message}")]
    ExternalService {
        service: &'static str,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl SewerError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::InputUnavailable(msg.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry(msg.into())
    }

    pub fn external(service: &'static str, msg: impl Into<String>) -> Self {
        Self::ExternalService { service, message: msg.into() }
    }
}

/// Shorthand result type for all `sw-*` crates.
pub type SewerResult<T> = Result<T, SewerError>;
