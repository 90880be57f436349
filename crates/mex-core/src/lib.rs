// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the MEX model explorer.
//!
//! Holds the error taxonomy shared by the credential vault, the configuration
//! layer and the `mex` binary.

pub mod error;

pub use error::{CredentialError, MexError};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn credential_error_has_all_variants() {
        let _identity = CredentialError::IdentityUnavailable("no machine-id".into());
        let _invalid = CredentialError::InvalidIdentifier;
        let _decrypt = CredentialError::DecryptionFailed;
        let _unwritable = CredentialError::StoreUnwritable {
            path: PathBuf::from("/tmp/api_key.enc"),
            source: std::io::Error::other("test"),
        };
        let _unreadable = CredentialError::StoreUnreadable {
            path: PathBuf::from("/tmp/api_key.enc"),
            source: std::io::Error::other("test"),
        };
        let _unresolved = CredentialError::StoreLocationUnresolved("no home".into());
        let _empty = CredentialError::EmptySecret;
        let _crypto = CredentialError::Crypto("test".into());
    }

    #[test]
    fn identity_unavailable_message_is_user_facing() {
        let err = CredentialError::IdentityUnavailable("sandboxed".into());
        let msg = err.to_string();
        assert!(msg.contains("cannot protect credentials on this machine"));
        assert!(msg.contains("sandboxed"));
    }

    #[test]
    fn store_errors_mention_the_path() {
        let err = CredentialError::StoreUnwritable {
            path: PathBuf::from("/nope/api_key.enc"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/nope/api_key.enc"));
    }

    #[test]
    fn unresolved_location_does_not_claim_a_write_failure() {
        let err = CredentialError::StoreLocationUnresolved(
            "home directory could not be determined".into(),
        );
        let msg = err.to_string();
        assert!(msg.contains("cannot locate"));
        assert!(!msg.contains("write"));
    }

    #[test]
    fn only_reentry_errors_are_recoverable() {
        assert!(CredentialError::DecryptionFailed.is_recoverable());
        assert!(CredentialError::EmptySecret.is_recoverable());
        assert!(!CredentialError::InvalidIdentifier.is_recoverable());
        assert!(!CredentialError::IdentityUnavailable("x".into()).is_recoverable());
    }

    #[test]
    fn credential_error_converts_into_mex_error() {
        let err: MexError = CredentialError::DecryptionFailed.into();
        assert!(matches!(
            err,
            MexError::Credential(CredentialError::DecryptionFailed)
        ));
        // Transparent: the credential message is shown as-is.
        assert_eq!(err.to_string(), CredentialError::DecryptionFailed.to_string());
    }
}
