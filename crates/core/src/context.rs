// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restart metadata carried between chunks and across runs

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("context entry {key} is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("context entry {key} could not be serialized: {source}")]
    Unserializable {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Writer position confirmed durable at the end of a chunk
///
/// `has_elements` is the array framing flag; it cannot be recovered from the
/// file without re-reading it, so it travels with the byte offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub has_elements: bool,
    pub bytes_written: u64,
    pub records_written: u64,
}

/// String-keyed bag of step state persisted by the engine
///
/// Each participant of a step (reader, writer) stores its own entry under a
/// distinct key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionContext {
    entries: BTreeMap<String, serde_json::Value>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and deserialize an entry. Returns `None` when absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ContextError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| ContextError::Malformed {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    /// Serialize and store an entry, replacing any previous value
    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), ContextError> {
        let value = serde_json::to_value(value).map_err(|source| ContextError::Unserializable {
            key: key.to_string(),
            source,
        })?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
