// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM encryption of the API key into an [`EncryptedRecord`].
//!
//! Record layout: `nonce (12) || ciphertext || tag (16)`, with no header or
//! version byte. Every call to [`encrypt`] draws a fresh random 96-bit nonce
//! from the system CSPRNG; nonce reuse would be catastrophic for GCM.

use mex_core::CredentialError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::kdf::DerivedKey;

/// Length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Smallest well-formed record: nonce plus tag around an empty plaintext.
pub const MIN_RECORD_LEN: usize = NONCE_LEN + TAG_LEN;

/// The persisted artifact: opaque nonce + ciphertext + tag bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedRecord(Vec<u8>);

impl EncryptedRecord {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for EncryptedRecord {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Debug for EncryptedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedRecord")
            .field("len", &self.0.len())
            .finish()
    }
}

fn aead_key(key: &DerivedKey) -> Result<LessSafeKey, CredentialError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key.as_bytes())
        .map_err(|_| CredentialError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` under `key`.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> Result<EncryptedRecord, CredentialError> {
    let sealing_key = aead_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| CredentialError::Crypto("failed to generate random nonce".to_string()))?;

    // Sealed in place; the working buffer holds plaintext until then.
    // Room for the tag so sealing never reallocates a plaintext buffer.
    let mut in_out = Zeroizing::new(Vec::with_capacity(plaintext.len() + TAG_LEN));
    in_out.extend_from_slice(plaintext);
    sealing_key
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            &mut *in_out,
        )
        .map_err(|_| CredentialError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    let mut record = Vec::with_capacity(NONCE_LEN + in_out.len());
    record.extend_from_slice(&nonce_bytes);
    record.extend_from_slice(&in_out);
    Ok(EncryptedRecord(record))
}

/// Decrypt `record` under `key`.
///
/// Any authentication failure (wrong machine key, flipped byte, truncation)
/// is reported as [`CredentialError::DecryptionFailed`].
pub fn decrypt(
    key: &DerivedKey,
    record: &EncryptedRecord,
) -> Result<Zeroizing<Vec<u8>>, CredentialError> {
    if record.len() < MIN_RECORD_LEN {
        return Err(CredentialError::DecryptionFailed);
    }
    let opening_key = aead_key(key)?;

    let (nonce_bytes, sealed) = record.as_bytes().split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| CredentialError::DecryptionFailed)?;

    let mut in_out = Zeroizing::new(sealed.to_vec());
    let plaintext_len = opening_key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| CredentialError::DecryptionFailed)?
        .len();

    in_out.truncate(plaintext_len);
    Ok(in_out)
}
