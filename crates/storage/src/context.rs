// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence of step execution contexts between runs

use chrono::{DateTime, Utc};
use jaw_core::{is_valid_step_name, ExecutionContext};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid step name: {0:?}")]
    InvalidStep(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// Load/save the execution context of a step
pub trait ContextStore {
    /// Saved context for `step`, or an empty one for a fresh run
    fn load(&self, step: &str) -> Result<ExecutionContext, ContextStoreError>;

    fn save(&mut self, step: &str, context: &ExecutionContext) -> Result<(), ContextStoreError>;

    /// Forget the saved context (step completed or reset)
    fn clear(&mut self, step: &str) -> Result<(), ContextStoreError>;
}

/// On-disk document for one step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredContext {
    pub version: u32,
    pub step: String,
    pub saved_at: DateTime<Utc>,
    pub context: ExecutionContext,
}

impl StoredContext {
    pub const CURRENT_VERSION: u32 = 1;
}

/// One JSON file per step under a base directory
///
/// Saves go to a temporary file that is synced and renamed over the old
/// one, so a crash leaves either the previous or the new context.
#[derive(Debug, Clone)]
pub struct JsonContextStore {
    base_dir: PathBuf,
}

impl JsonContextStore {
    /// Open a store at the given directory, creating it if needed
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self, ContextStoreError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Load the full stored document, including its metadata
    pub fn load_stored(&self, step: &str) -> Result<Option<StoredContext>, ContextStoreError> {
        let path = self.path_for(step)?;
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredContext = serde_json::from_reader(BufReader::new(file))?;
        if stored.version != StoredContext::CURRENT_VERSION {
            return Err(ContextStoreError::InvalidFormat(format!(
                "unsupported version: {} (expected {})",
                stored.version,
                StoredContext::CURRENT_VERSION
            )));
        }
        Ok(Some(stored))
    }

    fn path_for(&self, step: &str) -> Result<PathBuf, ContextStoreError> {
        if !is_valid_step_name(step) {
            return Err(ContextStoreError::InvalidStep(step.to_string()));
        }
        Ok(self.base_dir.join(format!("{}.json", step)))
    }
}

impl ContextStore for JsonContextStore {
    fn load(&self, step: &str) -> Result<ExecutionContext, ContextStoreError> {
        Ok(self
            .load_stored(step)?
            .map(|stored| stored.context)
            .unwrap_or_default())
    }

    fn save(&mut self, step: &str, context: &ExecutionContext) -> Result<(), ContextStoreError> {
        let path = self.path_for(step)?;
        let temp_path = path.with_extension("json.tmp");

        let stored = StoredContext {
            version: StoredContext::CURRENT_VERSION,
            step: step.to_string(),
            saved_at: Utc::now(),
            context: context.clone(),
        };

        let mut writer = BufWriter::new(File::create(&temp_path)?);
        serde_json::to_writer_pretty(&mut writer, &stored)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        fs::rename(&temp_path, &path)?;
        tracing::debug!(step, path = %path.display(), "context saved");
        Ok(())
    }

    fn clear(&mut self, step: &str) -> Result<(), ContextStoreError> {
        let path = self.path_for(step)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(step, "context cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryContextStore {
    contexts: HashMap<String, ExecutionContext>,
}

impl MemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, step: &str) -> bool {
        self.contexts.contains_key(step)
    }
}

impl ContextStore for MemoryContextStore {
    fn load(&self, step: &str) -> Result<ExecutionContext, ContextStoreError> {
        Ok(self.contexts.get(step).cloned().unwrap_or_default())
    }

    fn save(&mut self, step: &str, context: &ExecutionContext) -> Result<(), ContextStoreError> {
        self.contexts.insert(step.to_string(), context.clone());
        Ok(())
    }

    fn clear(&mut self, step: &str) -> Result<(), ContextStoreError> {
        self.contexts.remove(step);
        Ok(())
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
