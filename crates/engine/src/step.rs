// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chunk-oriented step driver
//!
//! Reads up to `commit_interval` records, writes them as one batch, then
//! commits: reader and writer record their positions in the execution
//! context and the context is saved. A run that stops or fails between
//! commits is resumed by running the step again against the same store.

use crate::error::StepError;
use crate::reader::ItemReader;
use crate::writer::JsonArrayWriter;
use jaw_core::{is_valid_step_name, RecordEncoder, StepConfig};
use jaw_storage::ContextStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How a step run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Input exhausted; the array was closed and the checkpoint cleared
    Completed { records: u64, chunks: u64 },
    /// Stop requested; the checkpoint of the last chunk is saved
    Stopped { records: u64, chunks: u64 },
}

impl StepOutcome {
    /// Records committed during this run
    pub fn records(&self) -> u64 {
        match self {
            StepOutcome::Completed { records, .. } | StepOutcome::Stopped { records, .. } => {
                *records
            }
        }
    }

    pub fn chunks(&self) -> u64 {
        match self {
            StepOutcome::Completed { chunks, .. } | StepOutcome::Stopped { chunks, .. } => *chunks,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed { .. })
    }
}

/// A named step committing every `commit_interval` records
#[derive(Debug, Clone)]
pub struct ChunkStep {
    name: String,
    commit_interval: usize,
    stop: Arc<AtomicBool>,
}

impl ChunkStep {
    pub fn new(name: impl Into<String>, commit_interval: usize) -> Result<Self, StepError> {
        let name = name.into();
        if !is_valid_step_name(&name) {
            return Err(StepError::InvalidStep(format!(
                "{:?} is not a valid step name",
                name
            )));
        }
        if commit_interval == 0 {
            return Err(StepError::InvalidStep(
                "commit interval must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            name,
            commit_interval,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn from_config(config: &StepConfig) -> Result<Self, StepError> {
        Self::new(config.name.clone(), config.commit_interval)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commit_interval(&self) -> usize {
        self.commit_interval
    }

    /// Flag that halts the run at the next chunk boundary once set
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run the step to completion or until stopped.
    ///
    /// On error the writer is left open and the store holds the last
    /// committed chunk, so the run can be repeated.
    pub fn run<R, E, S>(
        &self,
        reader: &mut R,
        writer: &mut JsonArrayWriter<E>,
        store: &mut S,
    ) -> Result<StepOutcome, StepError>
    where
        R: ItemReader<Item = E::Record>,
        E: RecordEncoder,
        S: ContextStore + ?Sized,
    {
        let mut ctx = store.load(&self.name)?;
        let resumed = !ctx.is_empty();
        reader.open(&ctx)?;
        writer.open(&ctx)?;

        tracing::info!(
            step = %self.name,
            commit_interval = self.commit_interval,
            resumed,
            "step started"
        );

        let mut records = 0u64;
        let mut chunks = 0u64;
        let mut batch = Vec::with_capacity(self.commit_interval);
        let mut exhausted = false;

        while !exhausted {
            if self.stop.load(Ordering::SeqCst) {
                tracing::info!(step = %self.name, records, chunks, "step stopped");
                return Ok(StepOutcome::Stopped { records, chunks });
            }

            batch.clear();
            while batch.len() < self.commit_interval {
                match reader.read()? {
                    Some(item) => batch.push(item),
                    None => {
                        exhausted = true;
                        break;
                    }
                }
            }
            if batch.is_empty() {
                break;
            }

            writer.write(&batch)?;
            reader.update(&mut ctx)?;
            writer.update(&mut ctx)?;
            store.save(&self.name, &ctx)?;

            records += batch.len() as u64;
            chunks += 1;
            tracing::debug!(step = %self.name, chunk = chunks, size = batch.len(), "chunk committed");
        }

        writer.close()?;
        store.clear(&self.name)?;

        tracing::info!(step = %self.name, records, chunks, "step completed");
        Ok(StepOutcome::Completed { records, chunks })
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
