// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MEX - Model EXplorer.
//!
//! Command-line driver for the credential subsystem of the desktop client:
//! it performs the same load/save/clear calls the settings dialog makes.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod doctor;
mod key;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mex_config::MexConfig;
use mex_core::MexError;
use mex_security::SecretRegistry;

/// MEX - Model EXplorer.
#[derive(Parser, Debug)]
#[command(name = "mex", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the saved API key.
    #[command(subcommand)]
    Key(KeyCommand),
    /// Check whether credentials can be protected on this machine.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Subcommand, Debug)]
enum KeyCommand {
    /// Load the saved key as the client does at startup and report the outcome.
    Status,
    /// Read a key (hidden prompt, or one line of stdin) and save it encrypted.
    Set,
    /// Delete the saved key.
    Clear,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => mex_config::load_and_validate_path(path),
        None => mex_config::load_and_validate(),
    };
    let config: MexConfig = match loaded {
        Ok(config) => config,
        Err(errors) => {
            mex_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    let registry = SecretRegistry::new();
    logging::init_tracing(&config, registry.clone());

    let result = match cli.command {
        Commands::Key(KeyCommand::Status) => key::status(&config, &registry),
        Commands::Key(KeyCommand::Set) => key::set(&config, &registry),
        Commands::Key(KeyCommand::Clear) => key::clear(&config, &registry),
        Commands::Doctor { plain } => doctor::run_doctor(&config, plain),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("mex: {e}");
            if matches!(&e, MexError::Credential(inner) if inner.is_recoverable()) {
                eprintln!("mex: run `mex key set` to enter the API key again");
            }
            ExitCode::FAILURE
        }
    }
}
