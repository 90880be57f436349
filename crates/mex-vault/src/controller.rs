// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential lifecycle: load on startup, save on entry, clear on removal.
//!
//! The controller is the only owner of the plaintext API key. It is created
//! at session start and dropped at shutdown; dropping it zeroes the key.
//! Every operation derives the record key afresh from the machine identity
//! and discards it before returning.
//!
//! State machine per process:
//!
//! ```text
//! NoKey --save--> KeyPresent --save--> KeyPresent --clear--> NoKey
//! ```
//!
//! An `Unusable` startup load leaves the controller in `NoKey`.

use mex_config::CredentialsConfig;
use mex_core::CredentialError;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::crypto;
use crate::identity::{IdentitySource, OsIdentity};
use crate::kdf;
use crate::store::SecretStore;

/// Whether the session currently holds an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    NoKey,
    KeyPresent,
}

/// Why a saved record could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusableReason {
    /// Authentication failed: the record was written on another machine or
    /// has been corrupted.
    DecryptionFailed,
    /// The record decrypted but does not hold a UTF-8 key.
    NotUtf8,
}

impl std::fmt::Display for UnusableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DecryptionFailed => f.write_str(
                "the saved API key could not be decrypted on this machine; please enter it again",
            ),
            Self::NotUtf8 => f.write_str("the saved API key is not valid text; please enter it again"),
        }
    }
}

/// Result of [`CredentialController::load_on_startup`].
#[derive(Debug)]
pub enum LoadOutcome<'a> {
    /// A saved key was decrypted. The controller keeps ownership.
    Present(&'a SecretString),
    /// Nothing saved yet.
    Absent,
    /// A record exists but cannot be used; prompt for re-entry.
    Unusable(UnusableReason),
}

/// Orchestrates identity, key derivation, the codec and the store.
///
/// Not safe for concurrent use; `&mut self` on every transition keeps a
/// single writer inside the process.
pub struct CredentialController<I = OsIdentity> {
    store: SecretStore,
    identity: I,
    current: Option<SecretString>,
}

impl<I: IdentitySource> std::fmt::Debug for CredentialController<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialController")
            .field("store", &self.store)
            .field("state", &self.state())
            .finish()
    }
}

impl CredentialController<OsIdentity> {
    /// Controller for the configured record location, bound to this machine.
    pub fn from_config(config: &CredentialsConfig) -> Result<Self, CredentialError> {
        Ok(Self::new(SecretStore::from_config(config)?, OsIdentity))
    }
}

impl<I: IdentitySource> CredentialController<I> {
    pub fn new(store: SecretStore, identity: I) -> Self {
        Self {
            store,
            identity,
            current: None,
        }
    }

    pub fn store(&self) -> &SecretStore {
        &self.store
    }

    pub fn state(&self) -> CredentialState {
        match self.current {
            Some(_) => CredentialState::KeyPresent,
            None => CredentialState::NoKey,
        }
    }

    /// The session's API key, to hand to the inference backend per request.
    pub fn api_key(&self) -> Option<&SecretString> {
        self.current.as_ref()
    }

    /// Load the saved key, if any.
    ///
    /// The machine identity is only resolved when a record exists, so a first
    /// run succeeds even where identity is unavailable. Decryption is never
    /// retried: it is deterministic.
    pub fn load_on_startup(&mut self) -> Result<LoadOutcome<'_>, CredentialError> {
        self.current = None;

        let Some(record) = self.store.load()? else {
            info!(path = %self.store.path().display(), "no saved API key");
            return Ok(LoadOutcome::Absent);
        };

        let key = kdf::derive(&self.identity.resolve()?)?;
        let plaintext = match crypto::decrypt(&key, &record) {
            Ok(bytes) => bytes,
            Err(CredentialError::DecryptionFailed) => {
                warn!(
                    path = %self.store.path().display(),
                    "saved API key failed authentication (other machine or corrupted)"
                );
                return Ok(LoadOutcome::Unusable(UnusableReason::DecryptionFailed));
            }
            Err(e) => return Err(e),
        };
        drop(key);

        let Ok(text) = std::str::from_utf8(&plaintext) else {
            warn!(path = %self.store.path().display(), "saved API key is not valid UTF-8");
            return Ok(LoadOutcome::Unusable(UnusableReason::NotUtf8));
        };

        info!(path = %self.store.path().display(), "saved API key loaded");
        Ok(LoadOutcome::Present(
            self.current.insert(SecretString::from(text.to_string())),
        ))
    }

    /// Encrypt and persist `plaintext`, replacing any saved key.
    ///
    /// The key stays in memory for the session even when persisting fails;
    /// the failure is still returned. Nothing is written unless encryption
    /// succeeded, so a broken crypto path never degrades to plaintext on disk.
    pub fn save(&mut self, plaintext: SecretString) -> Result<(), CredentialError> {
        if plaintext.expose_secret().is_empty() {
            return Err(CredentialError::EmptySecret);
        }

        let current = self.current.insert(plaintext);
        let key = kdf::derive(&self.identity.resolve()?)?;
        let record = crypto::encrypt(&key, current.expose_secret().as_bytes())?;
        drop(key);

        self.store.save(&record)?;
        info!(path = %self.store.path().display(), "API key saved");
        Ok(())
    }

    /// Forget the key in memory and delete the saved record.
    pub fn clear(&mut self) -> Result<(), CredentialError> {
        self.current = None;
        self.store.clear()?;
        info!("API key cleared");
        Ok(())
    }

    /// Apply the committed contents of the API key field.
    ///
    /// Surrounding whitespace is trimmed; an empty field clears the key.
    pub fn apply_field(&mut self, input: &str) -> Result<CredentialState, CredentialError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            self.clear()?;
        } else {
            self.save(SecretString::from(trimmed.to_string()))?;
        }
        Ok(self.state())
    }
}
