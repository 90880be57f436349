// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports `./mex.toml` > `<config_dir>/mex/mex.toml` > `/etc/mex/mex.toml`
//! with environment variable overrides via `MEX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MexConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/mex/mex.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "mex.toml";

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mex/mex.toml` (system-wide)
/// 3. `<config_dir>/mex/mex.toml` (user config)
/// 4. `./mex.toml` (local directory)
/// 5. `MEX_*` environment variables
pub fn load_config() -> Result<MexConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MexConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MexConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MexConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("mex").join(LOCAL_CONFIG_FILE))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Map `MEX_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `MEX_CREDENTIALS_FILE_NAME` must become `credentials.file_name`.
fn env_provider() -> Env {
    Env::prefixed("MEX_").map(|key| {
        // `key` keeps the case of the variable name, prefix stripped.
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("credentials_", "credentials.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn uppercase_env_vars_land_in_their_sections() {
        Jail::expect_with(|jail| {
            jail.set_env("MEX_CREDENTIALS_FILE_NAME", "env.enc");
            jail.set_env("MEX_LOGGING_FILE", "true");

            let config: MexConfig = Figment::new()
                .merge(Serialized::defaults(MexConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.credentials.file_name, "env.enc");
            assert!(config.logging.file);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_local_file_in_standard_hierarchy() {
        Jail::expect_with(|jail| {
            jail.create_file(LOCAL_CONFIG_FILE, "[logging]\nlevel = \"warn\"\n")?;
            jail.set_env("MEX_LOGGING_LEVEL", "debug");

            let config = load_config()?;
            assert_eq!(config.logging.level, "debug");
            Ok(())
        });
    }
}
