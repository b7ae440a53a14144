// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jaw run` - Export JSON Lines input into the configured array file

use super::{open_store, JobArgs};
use anyhow::{Context, Result};
use clap::Args;
use jaw_core::JsonEncoder;
use jaw_engine::{ChunkStep, JsonArrayWriter, JsonLinesReader, StepOutcome};
use serde_json::Value;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::Ordering;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// JSON Lines input file (default: stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file, overriding `output.path` in the job file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn handle(args: RunArgs) -> Result<()> {
    let mut config = args.job.load()?;
    if let Some(output) = args.output {
        config.output.path = Some(output);
    }
    let target = config.output.target().context("invalid [output] section")?;
    let step = ChunkStep::from_config(&config.step)?;

    let stop = step.stop_handle();
    ctrlc::set_handler(move || {
        eprintln!("\nStopping at the next chunk boundary...");
        stop.store(true, Ordering::SeqCst);
    })?;

    let source: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(std::io::stdin().lock()),
    };
    let mut reader = JsonLinesReader::new(source);

    let output_path = target.path.clone();
    let mut writer = JsonArrayWriter::new(JsonEncoder::<Value>::new()).with_target(target);
    let mut store = open_store(&config)?;

    let outcome = step
        .run(&mut reader, &mut writer, &mut store)
        .with_context(|| format!("step {} failed; rerun to resume", step.name()))?;

    match outcome {
        StepOutcome::Completed { records, chunks } => {
            println!(
                "Completed: {} records in {} chunks -> {}",
                records,
                chunks,
                output_path.display()
            );
        }
        StepOutcome::Stopped { records, chunks } => {
            println!(
                "Stopped after {} records in {} chunks; rerun to resume",
                records, chunks
            );
        }
    }
    Ok(())
}
