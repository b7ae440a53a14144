// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job configuration
//!
//! A job file is TOML with a `[step]` and an `[output]` table. Every output
//! option has a default so only `path` is needed.

use crate::charset::{Charset, CharsetError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
    #[error(transparent)]
    Charset(#[from] CharsetError),
}

/// Whether `name` can key a step's saved checkpoint: ASCII letters, digits,
/// `-`, `_` and `.`, not starting with `.`
pub fn is_valid_step_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Destination file and the policies applied to it
///
/// Immutable once a writer has been opened against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: PathBuf,
    /// Charset label; resolved when the output is opened
    pub encoding: String,
    pub append_allowed: bool,
    pub delete_if_exists: bool,
    pub delete_if_empty: bool,
    pub force_sync: bool,
    pub transactional: bool,
}

impl OutputTarget {
    /// Target with every option at its default
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            encoding: Charset::Utf8.name().to_string(),
            append_allowed: false,
            delete_if_exists: true,
            delete_if_empty: false,
            force_sync: false,
            transactional: true,
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Appending never deletes an existing file
    pub fn with_append_allowed(mut self, append_allowed: bool) -> Self {
        self.append_allowed = append_allowed;
        if append_allowed {
            self.delete_if_exists = false;
        }
        self
    }

    pub fn with_delete_if_exists(mut self, delete_if_exists: bool) -> Self {
        self.delete_if_exists = delete_if_exists && !self.append_allowed;
        self
    }

    pub fn with_delete_if_empty(mut self, delete_if_empty: bool) -> Self {
        self.delete_if_empty = delete_if_empty;
        self
    }

    pub fn with_force_sync(mut self, force_sync: bool) -> Self {
        self.force_sync = force_sync;
        self
    }

    pub fn with_transactional(mut self, transactional: bool) -> Self {
        self.transactional = transactional;
        self
    }
}

/// `[output]` table as written in the job file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    pub encoding: Option<String>,
    pub append_allowed: bool,
    pub delete_if_exists: Option<bool>,
    pub delete_if_empty: bool,
    pub force_sync: bool,
    pub transactional: Option<bool>,
}

impl OutputConfig {
    /// Validate and resolve into an [`OutputTarget`]
    pub fn target(&self) -> Result<OutputTarget, ConfigError> {
        let path = self
            .path
            .clone()
            .ok_or(ConfigError::MissingField("output.path"))?;
        if path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.path",
                message: "path is empty".to_string(),
            });
        }

        let mut target = OutputTarget::new(path);
        if let Some(label) = &self.encoding {
            label.parse::<Charset>()?;
            target = target.with_encoding(label.as_str());
        }

        Ok(target
            .with_delete_if_exists(self.delete_if_exists.unwrap_or(true))
            .with_append_allowed(self.append_allowed)
            .with_delete_if_empty(self.delete_if_empty)
            .with_force_sync(self.force_sync)
            .with_transactional(self.transactional.unwrap_or(true)))
    }
}

/// `[step]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepConfig {
    pub name: String,
    pub commit_interval: usize,
    pub state_dir: PathBuf,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            name: "json-export".to_string(),
            commit_interval: 100,
            state_dir: PathBuf::from(".jaw"),
        }
    }
}

/// Complete job file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    pub step: StepConfig,
    pub output: OutputConfig,
}

impl JobConfig {
    /// Parse a job file from TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: JobConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a job file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Resolve relative output and state paths against `base`
    pub fn relative_to(mut self, base: &Path) -> Self {
        if let Some(path) = self.output.path.take() {
            self.output.path = Some(base.join(path));
        }
        self.step.state_dir = base.join(&self.step.state_dir);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.step.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "step.name",
                message: "name is empty".to_string(),
            });
        }
        if !is_valid_step_name(&self.step.name) {
            return Err(ConfigError::InvalidValue {
                field: "step.name",
                message: format!(
                    "{:?} may only contain letters, digits, '-', '_' and '.', and must not start with '.'",
                    self.step.name
                ),
            });
        }
        if self.step.commit_interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "step.commit_interval",
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(label) = &self.output.encoding {
            label.parse::<Charset>()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
