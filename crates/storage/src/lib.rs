// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable storage: the output file and saved step contexts

mod context;
mod output;

pub use context::{
    ContextStore, ContextStoreError, JsonContextStore, MemoryContextStore, StoredContext,
};
pub use output::{OutputError, OutputState};
