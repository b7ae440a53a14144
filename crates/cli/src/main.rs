// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jaw - restartable JSON array export

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{reset, run, status};

#[derive(Parser)]
#[command(
    name = "jaw",
    version,
    about = "jaw writes JSON Lines records into one JSON array file, resuming after interruptions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the export step, resuming from a saved checkpoint if present
    Run(run::RunArgs),
    /// Show the saved checkpoint of the step
    Status(status::StatusArgs),
    /// Discard the saved checkpoint so the next run starts over
    Reset(reset::ResetArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run::handle(args),
        Commands::Status(args) => status::handle(args),
        Commands::Reset(args) => reset::handle(args),
    }
}

/// Log to stderr so stdout stays clean for command output
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
