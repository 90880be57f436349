// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HKDF-SHA256 derivation of the record key from the machine identifier.
//!
//! The key is a pure function of the identifier and fixed application
//! constants, so it is recomputed for every operation and never stored.

use mex_core::CredentialError;
use ring::hkdf;
use zeroize::Zeroizing;

use crate::identity::MachineIdentifier;

/// Application salt (constant, not secret).
const APP_SALT: &[u8] = b"mex-model-explorer/api-key-at-rest/v1";

/// HKDF context label.
const KEY_INFO: &[u8] = b"api-key-encryption";

/// Length of the derived key, sized for AES-256-GCM.
pub const KEY_LEN: usize = 32;

/// Key material derived from the machine identifier. Zeroed on drop.
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive the 256-bit record key for `identifier`.
///
/// Fails with [`CredentialError::InvalidIdentifier`] for an empty or
/// whitespace-only identifier.
pub fn derive(identifier: &MachineIdentifier) -> Result<DerivedKey, CredentialError> {
    if identifier.is_blank() {
        return Err(CredentialError::InvalidIdentifier);
    }

    let prk = hkdf::Salt::new(hkdf::HKDF_SHA256, APP_SALT).extract(identifier.as_bytes());

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    prk.expand(&[KEY_INFO], hkdf::HKDF_SHA256)
        .and_then(|okm| okm.fill(&mut key[..]))
        .map_err(|_| CredentialError::Crypto("HKDF expansion failed".to_string()))?;

    Ok(DerivedKey(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_for(id: &str) -> [u8; KEY_LEN] {
        *derive(&MachineIdentifier::new(id)).unwrap().as_bytes()
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(key_for("machine-a"), key_for("machine-a"));
    }

    #[test]
    fn different_machines_get_different_keys() {
        assert_ne!(key_for("machine-a"), key_for("machine-b"));
    }

    #[test]
    fn key_is_not_the_identifier() {
        let id = "0123456789abcdef0123456789abcdef";
        assert_ne!(&key_for(id)[..], id.as_bytes());
    }

    #[test]
    fn empty_identifier_is_rejected() {
        let result = derive(&MachineIdentifier::new(""));
        assert!(matches!(result, Err(CredentialError::InvalidIdentifier)));

        let result = derive(&MachineIdentifier::new("   "));
        assert!(matches!(result, Err(CredentialError::InvalidIdentifier)));
    }

    #[test]
    fn debug_does_not_print_key_material() {
        let key = derive(&MachineIdentifier::new("machine-a")).unwrap();
        assert_eq!(format!("{key:?}"), "DerivedKey([REDACTED])");
    }
}
