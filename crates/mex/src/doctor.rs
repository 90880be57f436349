// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mex doctor` command implementation.
//!
//! Checks whether this machine can protect an API key at rest and whether
//! the saved key, if any, still opens here.

use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use mex_config::MexConfig;
use mex_core::MexError;
use mex_vault::{CredentialController, IdentitySource, LoadOutcome, OsIdentity, SecretStore};
use tempfile::NamedTempFile;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `mex doctor` command.
///
/// With `plain`, disables colored output. Exits with failure if any check fails.
pub fn run_doctor(config: &MexConfig, plain: bool) -> Result<ExitCode, MexError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let store = SecretStore::from_config(&config.credentials)?;
    let results = vec![
        check_config(&store),
        check_identity(&OsIdentity),
        check_record_directory(store.directory()),
        check_saved_key(store, OsIdentity),
    ];

    println!();
    println!("  mex doctor");
    println!("  {}", "-".repeat(50));

    for result in &results {
        println!("{}", format_line(result, use_color));
    }
    println!();

    let fail_count = count(&results, &CheckStatus::Fail);
    let issues = fail_count + count(&results, &CheckStatus::Warn);
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(if fail_count > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn count(results: &[CheckResult], status: &CheckStatus) -> usize {
    results.iter().filter(|r| &r.status == status).count()
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    use colored::Colorize;

    let duration_ms = result.duration.as_millis();
    if !use_color {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        return format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        );
    }

    let (symbol, message) = match result.status {
        CheckStatus::Pass => ("✓".green(), result.message.normal()),
        CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
        CheckStatus::Fail => ("✗".red(), result.message.red()),
    };
    format!(
        "    {symbol} {:<20} {message} ({duration_ms}ms)",
        result.name
    )
}

/// Configuration already loaded; report where the record lives.
fn check_config(store: &SecretStore) -> CheckResult {
    let start = Instant::now();
    CheckResult::new(
        "Configuration",
        CheckStatus::Pass,
        format!("record at {}", store.path().display()),
        start,
    )
}

/// The machine identifier must resolve for a key to be saved or opened.
fn check_identity(source: &impl IdentitySource) -> CheckResult {
    let start = Instant::now();
    match source.resolve() {
        Ok(id) if !id.is_blank() => {
            CheckResult::new("Machine identity", CheckStatus::Pass, "resolved", start)
        }
        Ok(_) => CheckResult::new(
            "Machine identity",
            CheckStatus::Fail,
            "identifier is empty",
            start,
        ),
        Err(e) => CheckResult::new("Machine identity", CheckStatus::Fail, e.to_string(), start),
    }
}

/// Probe the record directory with a throwaway temp file.
fn check_record_directory(dir: &Path) -> CheckResult {
    let start = Instant::now();
    if !dir.exists() {
        return CheckResult::new(
            "Record directory",
            CheckStatus::Warn,
            format!(
                "not found: {} (will be created on first save)",
                dir.display()
            ),
            start,
        );
    }

    match NamedTempFile::new_in(dir) {
        Ok(_) => CheckResult::new("Record directory", CheckStatus::Pass, "writable", start),
        Err(e) => CheckResult::new(
            "Record directory",
            CheckStatus::Fail,
            format!("not writable: {e}"),
            start,
        ),
    }
}

/// Run the startup load without keeping the key.
fn check_saved_key<I: IdentitySource>(store: SecretStore, identity: I) -> CheckResult {
    let start = Instant::now();
    let mut controller = CredentialController::new(store, identity);
    match controller.load_on_startup() {
        Ok(LoadOutcome::Present(_)) => CheckResult::new(
            "Saved API key",
            CheckStatus::Pass,
            "decrypts on this machine",
            start,
        ),
        Ok(LoadOutcome::Absent) => {
            CheckResult::new("Saved API key", CheckStatus::Warn, "none saved", start)
        }
        Ok(LoadOutcome::Unusable(reason)) => {
            CheckResult::new("Saved API key", CheckStatus::Fail, reason.to_string(), start)
        }
        Err(e) => CheckResult::new("Saved API key", CheckStatus::Fail, e.to_string(), start),
    }
}
