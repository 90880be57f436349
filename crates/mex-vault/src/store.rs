// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk home of the [`EncryptedRecord`].
//!
//! Every operation touches exactly one file path. There is no locking: the
//! store is not reentrant and assumes a single writer (the settings flow of
//! one process). Atomic replacement only protects against a crash mid-write,
//! not against concurrent writers.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use mex_config::CredentialsConfig;
use mex_core::CredentialError;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::crypto::EncryptedRecord;

/// Owner of the encrypted record file.
#[derive(Debug, Clone)]
pub struct SecretStore {
    path: PathBuf,
}

impl SecretStore {
    /// Store backed by an explicit record path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured per-user location.
    pub fn from_config(config: &CredentialsConfig) -> Result<Self, CredentialError> {
        Self::located(config.record_path(), &config.file_name)
    }

    fn located(path: Option<PathBuf>, file_name: &str) -> Result<Self, CredentialError> {
        path.map(Self::new).ok_or_else(|| {
            CredentialError::StoreLocationUnresolved(format!(
                "home directory could not be determined; set credentials.directory to store `{file_name}`"
            ))
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the record.
    pub fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Atomically replace the record with `record`.
    ///
    /// The bytes go to a temp file in the same directory, are fsynced, then
    /// renamed over the record. A crash leaves either the old record or the
    /// new one, never a partial file.
    pub fn save(&self, record: &EncryptedRecord) -> Result<(), CredentialError> {
        let dir = self.directory();
        ensure_private_dir(dir).map_err(|e| self.unwritable(e))?;

        // Dropping the temp file before `persist` deletes it.
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| self.unwritable(e))?;
        temp.write_all(record.as_bytes())
            .map_err(|e| self.unwritable(e))?;
        temp.as_file().sync_all().map_err(|e| self.unwritable(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| self.unwritable(e))?;
        }

        temp.persist(&self.path)
            .map_err(|e| self.unwritable(e.error))?;
        sync_dir(dir);

        debug!(path = %self.path.display(), bytes = record.len(), "credential record written");
        Ok(())
    }

    /// Read the record. `Ok(None)` means nothing has been saved yet.
    pub fn load(&self) -> Result<Option<EncryptedRecord>, CredentialError> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                debug!(path = %self.path.display(), bytes = bytes.len(), "credential record read");
                Ok(Some(EncryptedRecord::from(bytes)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no credential record");
                Ok(None)
            }
            Err(e) => Err(CredentialError::StoreUnreadable {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Delete the record. Deleting a missing record succeeds.
    pub fn clear(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "credential record deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.unwritable(e)),
        }
    }

    fn unwritable(&self, source: std::io::Error) -> CredentialError {
        CredentialError::StoreUnwritable {
            path: self.path.clone(),
            source,
        }
    }
}

/// Create `dir` and missing parents, owner-only on Unix.
pub fn ensure_private_dir(dir: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
    }
    #[cfg(not(unix))]
    {
        fs::create_dir_all(dir)
    }
}

/// Make the rename durable. Best effort: the record itself is already synced.
fn sync_dir(dir: &Path) {
    #[cfg(unix)]
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        debug!(dir = %dir.display(), error = %e, "directory fsync failed");
    }
    #[cfg(not(unix))]
    let _ = dir;
}
