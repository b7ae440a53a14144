// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jaw execution: the JSON array writer and the chunk step that drives it

mod error;
mod reader;
mod step;
mod writer;

pub use error::{ReaderError, StepError, WriterError};
pub use reader::{ItemReader, JsonLinesReader, ListReader};
pub use step::{ChunkStep, StepOutcome};
pub use writer::{JsonArrayWriter, WriterPhase, DEFAULT_WRITER_NAME};
