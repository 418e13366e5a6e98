//! Error type for `sw-pipeline`.

use std::time::Duration;

use sw_core::SewerError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Sewer(#[from] SewerError),

    /// A newer build started while this one was waiting on a collaborator.
    #[error("build {generation} superseded by build {current}")]
    Superseded { generation: u64, current: u64 },

    /// A collaborator did not answer within the per-call timeout.
    #[error("{service} timed out after {after:?}")]
    Timeout { service: &'static str, after: Duration },
}

impl PipelineError {
    /// `true` for failures caused by an external collaborator, including
    /// timeouts.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Sewer(SewerError::ExternalService { .. }))
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
