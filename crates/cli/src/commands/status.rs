// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jaw status` - Show the saved checkpoint

use super::{open_store, JobArgs};
use anyhow::Result;
use clap::Args;
use jaw_core::Checkpoint;
use jaw_engine::DEFAULT_WRITER_NAME;

#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Print the raw saved document as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn handle(args: StatusArgs) -> Result<()> {
    let config = args.job.load()?;
    let store = open_store(&config)?;
    let name = &config.step.name;

    let Some(stored) = store.load_stored(name)? else {
        println!("{}: no checkpoint", name);
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stored)?);
        return Ok(());
    }

    println!("Step: {}", stored.step);
    println!("  Saved: {}", stored.saved_at.to_rfc3339());
    if let Some(checkpoint) = stored.context.get::<Checkpoint>(DEFAULT_WRITER_NAME)? {
        println!("  Records written: {}", checkpoint.records_written);
        println!("  Bytes committed: {}", checkpoint.bytes_written);
    }
    Ok(())
}
