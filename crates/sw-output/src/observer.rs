//! `OutputObserver<W>` — bridges `BuildObserver` to an `OutputWriter`.

use sw_pipeline::{BuildObserver, BuildOutcome};

use crate::row::{manhole_rows, pipe_rows, profile_rows};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`BuildObserver`] that writes every completed build to an
/// [`OutputWriter`].  Failed and superseded builds write nothing.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  Check with [`take_error`][Self::take_error].
pub struct OutputObserver<W: OutputWriter> {
    writer:     W,
    written:    usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> OutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0, last_error: None }
    }

    /// Number of builds written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer and hand it back.
    pub fn finish(mut self) -> OutputResult<W> {
        if let Some(e) = self.last_error.take() {
            return Err(e);
        }
        self.writer.finish()?;
        Ok(self.writer)
    }

    fn write(&mut self, outcome: &BuildOutcome) -> OutputResult<()> {
        let generation = outcome.generation;
        self.writer.write_manholes(&manhole_rows(generation, &outcome.network))?;
        self.writer.write_pipes(&pipe_rows(generation, &outcome.network))?;
        self.writer.write_profile(&profile_rows(generation, &outcome.projection))?;
        Ok(())
    }
}

impl<W: OutputWriter> BuildObserver for OutputObserver<W> {
    fn on_build_complete(&mut self, outcome: &BuildOutcome) {
        match self.write(outcome) {
            Ok(()) => self.written += 1,
            // Keep only the first error.
            Err(e) if self.last_error.is_none() => self.last_error = Some(e),
            Err(_) => {}
        }
    }
}
