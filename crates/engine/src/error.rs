// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the writer facade and the chunk step

use jaw_core::{ContextError, EncodeError};
use jaw_storage::{ContextStoreError, OutputError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from [`crate::JsonArrayWriter`]
#[derive(Debug, Error)]
pub enum WriterError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("writer must be open before it can be written to")]
    NotOpen,
    #[error("a write left the output past its last checkpoint; reopen to resume")]
    Failed,
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("failed to encode record: {0}")]
    Encode(#[from] EncodeError),
    #[error("checkpoint error: {0}")]
    Context(#[from] ContextError),
    #[error("failed to delete empty file {}: {source}", path.display())]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from [`crate::ItemReader`] implementations
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid record on line {line}: {source}")]
    InvalidRecord {
        line: u64,
        #[source]
        source: serde_json::Error,
    },
    #[error("input ended after {read} records but checkpoint expects {expected}")]
    InputTooShort { read: u64, expected: u64 },
    #[error("checkpoint error: {0}")]
    Context(#[from] ContextError),
}

/// Errors that abort a chunk step
#[derive(Debug, Error)]
pub enum StepError {
    #[error("invalid step: {0}")]
    InvalidStep(String),
    #[error("read failed: {0}")]
    Read(#[from] ReaderError),
    #[error("write failed: {0}")]
    Write(#[from] WriterError),
    #[error("checkpoint store failed: {0}")]
    Store(#[from] ContextStoreError),
}
