// Clipsync - E-Reader Clippings to Git
// Copyright (C) 2026 Clipsync Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

mod commands;
mod config;
mod output;
mod service;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use clipsync_observability::{init_tracing, LogFormat};
use commands::{SyncCmd, WatchCmd};
use std::io;

#[derive(Parser)]
#[command(name = "clipsync")]
#[command(version, about = "Sync e-reader clippings into a Git repository")]
#[command(
    long_about = "Clipsync watches for an e-reader being plugged in, waits for its filesystem
to finish mounting, and commits the device's clippings file into a Git
repository, and only when the clippings actually changed."
)]
#[command(propagate_version = true)]
#[command(author = "Clipsync Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format (pretty|compact|json)
    #[arg(long, global = true, value_name = "FORMAT", default_value = "compact")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch for device mounts and commit clippings as they appear
    Watch(WatchCmd),

    /// Extract and commit once from an already-mounted path
    Sync(SyncCmd),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.quiet {
        let format = match cli.log_format.parse::<LogFormat>() {
            Ok(format) => format,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        };
        let level = if cli.verbose { "debug" } else { "info" };

        // Ignore errors if already initialized
        init_tracing(format, Some(level)).ok();
    }

    match cli.command {
        Commands::Watch(cmd) => cmd.execute().await,
        Commands::Sync(cmd) => cmd.execute().await,
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "clipsync", &mut io::stdout());
            Ok(())
        }
    }
}
