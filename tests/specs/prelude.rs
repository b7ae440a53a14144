//! Shared helpers for the behavioral specs

#![allow(dead_code)]

pub use jaw_core::{Checkpoint, ExecutionContext, JsonEncoder, OutputTarget, RawJsonEncoder};
pub use jaw_engine::{ChunkStep, JsonArrayWriter, ListReader, StepOutcome, WriterError};
pub use jaw_storage::{ContextStore, JsonContextStore, OutputError};
pub use serde_json::{json, Value};
pub use similar_asserts::assert_eq;

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory with a conventional output path inside it
pub struct Scratch {
    pub dir: TempDir,
    pub output: PathBuf,
}

impl Scratch {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let output = dir.path().join("out.json");
        Self { dir, output }
    }

    pub fn target(&self) -> OutputTarget {
        OutputTarget::new(&self.output)
    }

    pub fn raw_writer(&self, target: OutputTarget) -> JsonArrayWriter<RawJsonEncoder> {
        JsonArrayWriter::new(RawJsonEncoder).with_target(target)
    }

    pub fn contents(&self) -> String {
        read(&self.output)
    }

    pub fn state_dir(&self) -> PathBuf {
        self.dir.path().join("state")
    }
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("Failed to read output")
}

pub fn fragments(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
