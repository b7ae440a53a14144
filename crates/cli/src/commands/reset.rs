// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jaw reset` - Discard the saved checkpoint

use super::{open_store, JobArgs};
use anyhow::Result;
use clap::Args;
use jaw_storage::ContextStore;

#[derive(Args)]
pub struct ResetArgs {
    #[command(flatten)]
    pub job: JobArgs,
}

pub fn handle(args: ResetArgs) -> Result<()> {
    let config = args.job.load()?;
    let mut store = open_store(&config)?;
    store.clear(&config.step.name)?;
    println!("Checkpoint cleared for {}", config.step.name);
    Ok(())
}
