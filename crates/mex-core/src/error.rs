// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the MEX model explorer.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the credential-at-rest subsystem.
///
/// A missing record is not an error: the store reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The OS could not supply a machine identifier. Fatal to every key
    /// operation; there is no fallback identifier.
    #[error("cannot protect credentials on this machine: machine identity unavailable ({0})")]
    IdentityUnavailable(String),

    /// The machine identifier was empty.
    #[error("invalid machine identifier")]
    InvalidIdentifier,

    /// Authentication of the encrypted record failed: wrong machine or corrupted bytes.
    #[error("saved credential could not be decrypted -- it was written on another machine or is corrupted")]
    DecryptionFailed,

    /// The record (or its directory) could not be written or removed.
    #[error("cannot write credential record at {}: {source}", path.display())]
    StoreUnwritable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The record exists but could not be read.
    #[error("cannot read credential record at {}: {source}", path.display())]
    StoreUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No record location could be worked out (no home directory and no
    /// configured directory).
    #[error("cannot locate the credential record: {0}")]
    StoreLocationUnresolved(String),

    /// An empty secret was submitted for saving.
    #[error("refusing to save an empty API key")]
    EmptySecret,

    /// Random number generation or sealing failed; nothing was persisted.
    #[error("cryptographic failure: {0}")]
    Crypto(String),
}

impl CredentialError {
    /// Whether re-entering the key can resolve the failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DecryptionFailed | Self::EmptySecret)
    }
}

/// Top-level error for the `mex` binary.
#[derive(Debug, Error)]
pub enum MexError {
    /// Credential subsystem errors.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Terminal or stdin I/O outside the credential store.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
