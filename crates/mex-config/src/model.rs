// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the MEX model explorer.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level MEX configuration.
///
/// Loaded from TOML files with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MexConfig {
    /// Where the encrypted API key record lives.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Log level and destination.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Location of the encrypted API key record.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    /// Explicit directory for the record. When unset, the record lives in
    /// `<home>/<namespace>`.
    #[serde(default)]
    pub directory: Option<String>,

    /// Per-user application directory name under the home directory.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// File name of the record inside the directory.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            directory: None,
            namespace: default_namespace(),
            file_name: default_file_name(),
        }
    }
}

impl CredentialsConfig {
    /// Directory holding the record (and the optional log file).
    ///
    /// Returns `None` only when no directory is configured and the home
    /// directory cannot be determined.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        match &self.directory {
            Some(dir) => Some(PathBuf::from(dir)),
            None => dirs::home_dir().map(|home| home.join(&self.namespace)),
        }
    }

    /// Full path of the encrypted record.
    pub fn record_path(&self) -> Option<PathBuf> {
        self.resolved_directory()
            .map(|dir| dir.join(&self.file_name))
    }
}

fn default_namespace() -> String {
    ".mex-model-explorer".to_string()
}

fn default_file_name() -> String {
    "api_key.enc".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to `app.log` in the credentials directory instead of stderr.
    #[serde(default)]
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// File name of the log file written when `logging.file` is enabled.
pub const LOG_FILE_NAME: &str = "app.log";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_path_is_under_home_namespace() {
        let config = CredentialsConfig::default();
        let path = config.record_path().expect("home directory available in tests");
        assert!(path.ends_with(".mex-model-explorer/api_key.enc"));
    }

    #[test]
    fn explicit_directory_overrides_namespace() {
        let config = CredentialsConfig {
            directory: Some("/tmp/mex-test".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.record_path(),
            Some(PathBuf::from("/tmp/mex-test/api_key.enc"))
        );
    }

    #[test]
    fn logging_defaults() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert!(!logging.file);
    }

    #[test]
    fn unknown_credentials_field_is_rejected() {
        let toml_str = r#"
[credentials]
file_nmae = "key.enc"
"#;
        assert!(toml::from_str::<MexConfig>(toml_str).is_err());
    }
}
