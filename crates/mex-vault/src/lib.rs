// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Machine-bound protection of the MEX API key at rest.
//!
//! The API key is encrypted with AES-256-GCM under a key derived (HKDF-SHA256)
//! from the machine identifier, and the resulting record is the only form of
//! the secret ever written to disk. A record copied to another machine fails
//! authentication instead of decrypting to garbage.
//!
//! Components, leaf first: [`identity`] → [`kdf`] → [`crypto`] → [`store`] →
//! [`controller`].

pub mod controller;
pub mod crypto;
pub mod identity;
pub mod kdf;
pub mod store;

pub use controller::{CredentialController, CredentialState, LoadOutcome, UnusableReason};
pub use crypto::{decrypt, encrypt, EncryptedRecord};
pub use identity::{FixedIdentity, IdentitySource, MachineIdentifier, OsIdentity};
pub use kdf::{derive, DerivedKey};
pub use store::SecretStore;
