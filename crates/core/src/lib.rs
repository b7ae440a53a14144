// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jaw-core: building blocks for the streaming JSON array writer
//!
//! This crate provides:
//! - Incremental array framing (`[`, `,`, `]`)
//! - Record encoders producing JSON fragments
//! - Output charsets
//! - Checkpoint and execution context types
//! - TOML job configuration

pub mod charset;
pub mod config;
pub mod context;
pub mod encoder;
pub mod framer;

pub use charset::{Charset, CharsetError};
pub use config::{
    is_valid_step_name, ConfigError, JobConfig, OutputConfig, OutputTarget, StepConfig,
};
pub use context::{Checkpoint, ContextError, ExecutionContext};
pub use encoder::{EncodeError, JsonEncoder, RawJsonEncoder, RecordEncoder};
pub use framer::ArrayFramer;
