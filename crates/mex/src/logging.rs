// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup. All output passes through the secret redactor.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use mex_config::model::LOG_FILE_NAME;
use mex_config::MexConfig;
use mex_security::{RedactingMakeWriter, SecretRegistry};
use mex_vault::store::ensure_private_dir;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Where log lines go: `app.log` next to the record, or stderr.
fn log_file_path(config: &MexConfig) -> Option<PathBuf> {
    if !config.logging.file {
        return None;
    }
    config
        .credentials
        .resolved_directory()
        .map(|dir| dir.join(LOG_FILE_NAME))
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mex={level},mex_vault={level},warn")))
}

/// Install the global subscriber. Falls back to stderr if the log file
/// cannot be opened.
pub fn init_tracing(config: &MexConfig, registry: SecretRegistry) {
    let level = config.logging.level.to_ascii_lowercase();

    let file = log_file_path(config).and_then(|path| {
        let opened = path
            .parent()
            .map_or(Ok(()), ensure_private_dir)
            .and_then(|()| OpenOptions::new().create(true).append(true).open(&path));
        match opened {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("mex: cannot open log file {}: {e}; logging to stderr", path.display());
                None
            }
        }
    });

    let to_file = file.is_some();
    let writer = match file {
        Some(file) => BoxMakeWriter::new(RedactingMakeWriter::new(Mutex::new(file), registry)),
        None => BoxMakeWriter::new(RedactingMakeWriter::new(std::io::stderr, registry)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(&level))
        .with_writer(writer)
        .with_ansi(!to_file)
        .with_target(true)
        .init();
}
