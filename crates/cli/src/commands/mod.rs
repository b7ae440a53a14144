// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod reset;
pub mod run;
pub mod status;

use anyhow::{Context, Result};
use clap::Args;
use jaw_core::JobConfig;
use jaw_storage::JsonContextStore;
use std::path::{Path, PathBuf};

/// Job file shared by every command
#[derive(Args)]
pub struct JobArgs {
    /// Path to the TOML job file
    #[arg(short, long, default_value = "jaw.toml")]
    pub config: PathBuf,
}

impl JobArgs {
    /// Load the job file; relative paths in it resolve against its directory
    pub fn load(&self) -> Result<JobConfig> {
        let config = JobConfig::load(&self.config)
            .with_context(|| format!("failed to load job file {}", self.config.display()))?;
        let base = self.config.parent().unwrap_or(Path::new(""));
        Ok(config.relative_to(base))
    }
}

pub fn open_store(config: &JobConfig) -> Result<JsonContextStore> {
    JsonContextStore::open(&config.step.state_dir).with_context(|| {
        format!(
            "failed to open checkpoint directory {}",
            config.step.state_dir.display()
        )
    })
}
