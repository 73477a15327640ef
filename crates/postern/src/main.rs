// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Postern - transport negotiation and delivery core of a secure messaging client.
//!
//! The binary inspects stored messages and checks configuration.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod inspect;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

/// Postern - transport negotiation and delivery core of a secure messaging client.
#[derive(Parser, Debug)]
#[command(name = "postern", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the presentation of a message stored as JSON.
    Inspect {
        /// Path to the message JSON (raw store flags).
        message: PathBuf,
        /// The recipient currently has an active push session.
        #[arg(long)]
        push_destination: bool,
        /// The message belongs to a group thread.
        #[arg(long)]
        group_thread: bool,
        /// Evaluate relative times against this RFC 3339 instant instead of now.
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Manage Postern configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Load and validate configuration, reporting every problem found.
    Check {
        /// Check this file instead of the standard lookup paths.
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config {
            action: ConfigAction::Check { path },
        } => check::run_check(path.as_deref()),
        Commands::Inspect {
            message,
            push_destination,
            group_thread,
            now,
        } => {
            let config = match postern_config::load_and_validate() {
                Ok(config) => config,
                Err(errors) => {
                    postern_config::render_errors(&errors);
                    return ExitCode::FAILURE;
                }
            };
            init_tracing(&config.client.log_level);

            let options = inspect::InspectOptions {
                push_destination,
                group_thread,
                now: now.unwrap_or_else(Utc::now),
            };
            match inspect::run_inspect(&config, &message, &options) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Install the fmt subscriber on stderr. `POSTERN_LOG` overrides the
/// configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("POSTERN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("postern={log_level},warn")));

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
