// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mex key` commands: the settings-dialog calls, driven from a terminal.

use std::io::{BufRead, ErrorKind, IsTerminal};
use std::process::ExitCode;

use mex_config::MexConfig;
use mex_core::MexError;
use mex_security::SecretRegistry;
use mex_vault::{CredentialController, CredentialState, LoadOutcome};
use zeroize::Zeroizing;

/// Exit code when a saved key exists but cannot be used here.
const EXIT_UNUSABLE: u8 = 2;

/// Run the startup load and report `present`, `absent` or `unusable`.
pub fn status(config: &MexConfig, registry: &SecretRegistry) -> Result<ExitCode, MexError> {
    let mut controller = CredentialController::from_config(&config.credentials)?;
    let path = controller.store().path().display().to_string();

    match controller.load_on_startup()? {
        LoadOutcome::Present(key) => {
            registry.register(key);
            println!("present: API key loaded from {path}");
            Ok(ExitCode::SUCCESS)
        }
        LoadOutcome::Absent => {
            println!("absent: no API key saved at {path}");
            Ok(ExitCode::SUCCESS)
        }
        LoadOutcome::Unusable(reason) => {
            println!("unusable: {reason}");
            println!("run `mex key set` to enter the key again");
            Ok(ExitCode::from(EXIT_UNUSABLE))
        }
    }
}

/// Read the key from the terminal (hidden) or stdin and commit it like the
/// API key field. An empty entry clears the saved key.
pub fn set(config: &MexConfig, registry: &SecretRegistry) -> Result<ExitCode, MexError> {
    let mut controller = CredentialController::from_config(&config.credentials)?;
    let input = read_key_input()?;

    let state = controller.apply_field(&input)?;
    match (state, controller.api_key()) {
        (CredentialState::KeyPresent, Some(key)) => {
            registry.register(key);
            println!(
                "API key saved (encrypted) to {}",
                controller.store().path().display()
            );
        }
        _ => {
            registry.clear();
            println!("empty entry: saved API key cleared");
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Delete the saved key.
pub fn clear(config: &MexConfig, registry: &SecretRegistry) -> Result<ExitCode, MexError> {
    let mut controller = CredentialController::from_config(&config.credentials)?;
    controller.clear()?;
    registry.clear();
    println!("API key cleared");
    Ok(ExitCode::SUCCESS)
}

fn read_key_input() -> Result<Zeroizing<String>, MexError> {
    if std::io::stdin().is_terminal() {
        let entered = rpassword::prompt_password("API key: ")?;
        return Ok(Zeroizing::new(entered));
    }
    read_key_line(&mut std::io::stdin().lock())
}

/// One line from a non-interactive source. Closed input is an error, so only
/// an explicit blank line clears the saved key.
fn read_key_line(reader: &mut impl BufRead) -> Result<Zeroizing<String>, MexError> {
    let mut line = Zeroizing::new(String::new());
    if reader.read_line(&mut line)? == 0 {
        return Err(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            "no API key on stdin; send an empty line to clear the saved key",
        )
        .into());
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> MexConfig {
        let mut config = MexConfig::default();
        config.credentials.directory = Some(dir.display().to_string());
        config
    }

    #[test]
    fn closed_stdin_is_an_error_not_a_clear() {
        let err = read_key_line(&mut std::io::empty()).unwrap_err();
        assert!(matches!(
            err,
            MexError::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn blank_line_is_read_as_an_empty_entry() {
        let line = read_key_line(&mut "\n".as_bytes()).unwrap();
        assert_eq!(line.trim(), "");
    }

    #[test]
    fn key_line_is_read_verbatim() {
        let line = read_key_line(&mut "sk-line-1\nignored\n".as_bytes()).unwrap();
        assert_eq!(line.as_str(), "sk-line-1\n");
    }

    #[test]
    fn status_without_record_succeeds() {
        let dir = tempdir().unwrap();
        let registry = SecretRegistry::new();
        status(&config_in(dir.path()), &registry).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_without_record_succeeds_twice() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let registry = SecretRegistry::new();
        clear(&config, &registry).unwrap();
        clear(&config, &registry).unwrap();
    }

    #[test]
    fn clear_removes_an_existing_record() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let record = dir.path().join(&config.credentials.file_name);
        std::fs::write(&record, b"opaque").unwrap();

        clear(&config, &SecretRegistry::new()).unwrap();
        assert!(!record.exists());
    }
}
