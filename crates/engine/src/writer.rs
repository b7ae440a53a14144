// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restart-safe JSON array writer
//!
//! Composes an [`ArrayFramer`] and an [`OutputState`] behind the
//! open → write → update → close lifecycle a chunk-oriented engine drives.
//!
//! ```text
//! Unopened ──open──▶ Open ──close──▶ Closed
//!                     │ ▲
//!               write │ │ update (checkpoint into ExecutionContext)
//!                     ▼ │
//! ```
//!
//! Dropping an open writer without `close` leaves the file without its
//! closing `]`; reopening with the last saved context resumes it.
//!
//! A failed write is rolled back to the last checkpoint. If the rollback
//! fails too the writer is `Failed`: it refuses `write` and `update`, and
//! `close` releases the file without a footer. Reopening recovers.
//! Bytes still buffered from the failed write are dropped, never flushed.

use crate::error::WriterError;
use jaw_core::{ArrayFramer, Checkpoint, ExecutionContext, OutputTarget, RecordEncoder};
use jaw_storage::OutputState;
use std::io;

/// Context key used when no name is given
pub const DEFAULT_WRITER_NAME: &str = "json_array_writer";

/// Lifecycle phase of a [`JsonArrayWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterPhase {
    Unopened,
    Open,
    /// Output holds bytes past the last checkpoint that could not be discarded
    Failed,
    Closed,
}

/// Writes batches of records into one JSON array file
pub struct JsonArrayWriter<E> {
    name: String,
    target: Option<OutputTarget>,
    encoder: E,
    framer: ArrayFramer,
    state: Option<OutputState>,
    phase: WriterPhase,
}

impl<E: RecordEncoder> JsonArrayWriter<E> {
    pub fn new(encoder: E) -> Self {
        Self {
            name: DEFAULT_WRITER_NAME.to_string(),
            target: None,
            encoder,
            framer: ArrayFramer::new(),
            state: None,
            phase: WriterPhase::Unopened,
        }
    }

    pub fn with_target(mut self, target: OutputTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Key of this writer's checkpoint in the execution context
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the target. Not allowed while open.
    pub fn set_target(&mut self, target: OutputTarget) -> Result<(), WriterError> {
        if self.phase == WriterPhase::Open {
            return Err(WriterError::Configuration(
                "the output target cannot change while the writer is open".to_string(),
            ));
        }
        self.target = Some(target);
        Ok(())
    }

    /// Open the output, resuming from this writer's checkpoint in `ctx` if
    /// there is one. A second call while open does nothing; a failed writer
    /// is reopened.
    pub fn open(&mut self, ctx: &ExecutionContext) -> Result<(), WriterError> {
        if self.phase == WriterPhase::Open {
            return Ok(());
        }

        let target = self
            .target
            .clone()
            .ok_or_else(|| WriterError::Configuration("the output target must be set".to_string()))?;
        let resume: Option<Checkpoint> = ctx.get(&self.name)?;
        if let Some(mut stale) = self.state.take() {
            stale.abandon();
        }

        let state = OutputState::open(target, resume.as_ref())?;
        self.framer = ArrayFramer::restore(resume.is_some_and(|c| c.has_elements));
        self.state = Some(state);
        self.phase = WriterPhase::Open;

        tracing::info!(
            writer = %self.name,
            restarted = resume.is_some(),
            "writer opened"
        );
        Ok(())
    }

    /// Encode and frame every record, then hand the batch to the output as a
    /// single write.
    ///
    /// If encoding fails nothing is written. If the write fails the output
    /// is cut back to the last checkpoint before the error is returned.
    pub fn write(&mut self, batch: &[E::Record]) -> Result<(), WriterError> {
        let state = match (self.phase, self.state.as_mut()) {
            (WriterPhase::Open, Some(state)) => state,
            (WriterPhase::Failed, _) => return Err(WriterError::Failed),
            _ => return Err(WriterError::NotOpen),
        };
        if batch.is_empty() {
            return Ok(());
        }

        let mut framer = self.framer;
        let mut text = String::new();
        for record in batch {
            let fragment = self.encoder.encode(record)?;
            framer.frame_into(&fragment, &mut text);
        }

        tracing::debug!(writer = %self.name, records = batch.len(), "writing batch");
        if let Err(e) = state.write(&text, batch.len() as u64) {
            if let Err(rollback) = state.truncate() {
                tracing::error!(
                    writer = %self.name,
                    error = %rollback,
                    "could not discard partial write"
                );
                self.phase = WriterPhase::Failed;
            }
            return Err(e.into());
        }
        self.framer = framer;
        Ok(())
    }

    /// Commit what has been written and record the checkpoint in `ctx`
    pub fn update(&mut self, ctx: &mut ExecutionContext) -> Result<Checkpoint, WriterError> {
        let state = match (self.phase, self.state.as_mut()) {
            (WriterPhase::Open, Some(state)) => state,
            (WriterPhase::Failed, _) => return Err(WriterError::Failed),
            _ => return Err(WriterError::NotOpen),
        };

        let bytes_written = state.checkpoint()?;
        let checkpoint = Checkpoint {
            has_elements: self.framer.has_elements(),
            bytes_written,
            records_written: state.records_written(),
        };
        ctx.put(&self.name, &checkpoint)?;

        tracing::debug!(
            writer = %self.name,
            bytes_written,
            records_written = checkpoint.records_written,
            "checkpoint"
        );
        Ok(checkpoint)
    }

    /// Write the footer, close the output and apply delete-if-empty.
    ///
    /// Every step is attempted; the first failure is returned. Valid in any
    /// phase; closing twice is a no-op. A failed writer gets neither footer
    /// nor clean-up so the file stays resumable.
    pub fn close(&mut self) -> Result<(), WriterError> {
        let failed = self.phase == WriterPhase::Failed;
        self.phase = match self.phase {
            WriterPhase::Unopened => WriterPhase::Unopened,
            _ => WriterPhase::Closed,
        };
        let Some(mut state) = self.state.take() else {
            return Ok(());
        };

        let mut result: Result<(), WriterError> = Ok(());

        if let Some(footer) = self.framer.footer().filter(|_| !failed) {
            if let Err(e) = state.write_footer(footer) {
                result = Err(e.into());
            }
        }

        if failed {
            state.abandon();
        } else if let Err(e) = state.close() {
            if result.is_ok() {
                result = Err(e.into());
            }
        }

        if !failed && state.records_written() == 0 && state.target().delete_if_empty {
            if let Err(e) = delete_empty(&state) {
                tracing::warn!(writer = %self.name, error = %e, "failed to delete empty output");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }

        tracing::info!(
            writer = %self.name,
            records_written = state.records_written(),
            ok = result.is_ok(),
            "writer closed"
        );
        result
    }

    pub fn phase(&self) -> WriterPhase {
        self.phase
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> Option<&OutputTarget> {
        self.target.as_ref()
    }

    /// Whether any record has been framed into the file, including prior runs
    pub fn has_elements(&self) -> bool {
        self.framer.has_elements()
    }

    /// Records written over the writer's lifetime; zero when not open
    pub fn records_written(&self) -> u64 {
        self.state.as_ref().map_or(0, OutputState::records_written)
    }
}

fn delete_empty(state: &OutputState) -> Result<(), WriterError> {
    let path = state.path();
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "deleted empty output");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(WriterError::CleanupFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
