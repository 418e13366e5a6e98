//! The `OutputWriter` trait implemented by all backend writers.

use crate::{ManholeRow, OutputResult, PipeRow, ProfileRow};

/// Sink for the rows of completed builds.
pub trait OutputWriter {
    fn write_manholes(&mut self, rows: &[ManholeRow]) -> OutputResult<()>;

    fn write_pipes(&mut self, rows: &[PipeRow]) -> OutputResult<()>;

    fn write_profile(&mut self, rows: &[ProfileRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
