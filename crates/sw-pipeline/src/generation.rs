//! Build generations.  Only the newest build may publish its result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{PipelineError, PipelineResult};

/// Shared, monotonically increasing build counter.
///
/// Cloning shares the counter.
#[derive(Clone, Debug, Default)]
pub struct GenerationCounter {
    latest: Arc<AtomicU64>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new build, invalidating every earlier ticket.
    pub fn begin(&self) -> BuildTicket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        BuildTicket { generation, latest: Arc::clone(&self.latest) }
    }

    /// Generation of the most recently started build (0 before any).
    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

/// Identity of one build.
#[derive(Clone, Debug)]
pub struct BuildTicket {
    generation: u64,
    latest:     Arc<AtomicU64>,
}

impl BuildTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }

    /// `Err(Superseded)` once a newer build has begun.
    pub fn ensure_current(&self) -> PipelineResult<()> {
        let current = self.latest.load(Ordering::Acquire);
        if current == self.generation {
            Ok(())
        } else {
            Err(PipelineError::Superseded { generation: self.generation, current })
        }
    }
}
