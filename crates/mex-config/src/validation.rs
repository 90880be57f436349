// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::path::{Component, Path};

use crate::diagnostic::ConfigError;
use crate::model::{MexConfig, LOG_FILE_NAME};

/// Log levels accepted by `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single normal path component: no separators, no `.` or `..`, no root.
fn is_bare_file_name(name: &str) -> bool {
    if name.contains('/') || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &MexConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let credentials = &config.credentials;

    let file_name = credentials.file_name.as_str();
    if file_name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "credentials.file_name must not be empty".to_string(),
        });
    } else if file_name.trim() != file_name {
        errors.push(ConfigError::Validation {
            message: format!(
                "credentials.file_name `{file_name}` must not have leading or trailing whitespace"
            ),
        });
    } else if !is_bare_file_name(file_name) {
        errors.push(ConfigError::Validation {
            message: format!(
                "credentials.file_name `{file_name}` must be a bare file name, not a path"
            ),
        });
    } else if file_name == LOG_FILE_NAME {
        errors.push(ConfigError::Validation {
            message: format!("credentials.file_name must not be `{LOG_FILE_NAME}`"),
        });
    }

    if credentials.namespace.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "credentials.namespace must not be empty".to_string(),
        });
    }

    if let Some(dir) = &credentials.directory
        && dir.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "credentials.directory must not be empty when set".to_string(),
        });
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
