// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Machine identity: the stable per-machine input to key derivation.
//!
//! The identifier strengthens the derived key and binds it to one machine.
//! It is not an identity proof and is not guaranteed globally unique.

use mex_core::CredentialError;
use zeroize::Zeroizing;

/// Opaque machine identifier. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct MachineIdentifier(Zeroizing<String>);

impl MachineIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// True when the identifier has no usable content.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for MachineIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MachineIdentifier([REDACTED])")
    }
}

/// Source of the machine identifier.
///
/// Implementations are pure queries. A source that cannot produce an
/// identifier must fail with [`CredentialError::IdentityUnavailable`] rather
/// than return a constant.
pub trait IdentitySource {
    fn resolve(&self) -> Result<MachineIdentifier, CredentialError>;
}

impl<T: IdentitySource + ?Sized> IdentitySource for &T {
    fn resolve(&self) -> Result<MachineIdentifier, CredentialError> {
        (**self).resolve()
    }
}

impl<T: IdentitySource + ?Sized> IdentitySource for Box<T> {
    fn resolve(&self) -> Result<MachineIdentifier, CredentialError> {
        (**self).resolve()
    }
}

/// Reads the hardware/OS machine id.
///
/// Linux: `/etc/machine-id` or `/var/lib/dbus/machine-id`; macOS:
/// `IOPlatformUUID`; Windows: the `MachineGuid` registry value.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsIdentity;

impl IdentitySource for OsIdentity {
    fn resolve(&self) -> Result<MachineIdentifier, CredentialError> {
        machine_uid::get()
            .map(MachineIdentifier::new)
            .map_err(|e| CredentialError::IdentityUnavailable(e.to_string()))
    }
}

/// A caller-supplied identifier.
#[derive(Debug, Clone)]
pub struct FixedIdentity(MachineIdentifier);

impl FixedIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(MachineIdentifier::new(value))
    }
}

impl IdentitySource for FixedIdentity {
    fn resolve(&self) -> Result<MachineIdentifier, CredentialError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unavailable;

    impl IdentitySource for Unavailable {
        fn resolve(&self) -> Result<MachineIdentifier, CredentialError> {
            Err(CredentialError::IdentityUnavailable("sandboxed".into()))
        }
    }

    #[test]
    fn fixed_identity_is_stable() {
        let source = FixedIdentity::new("machine-a");
        assert_eq!(source.resolve().unwrap(), source.resolve().unwrap());
    }

    #[test]
    fn debug_does_not_leak_identifier() {
        let id = MachineIdentifier::new("4c4c4544-0042-3510-8052-b4c04f4d4e31");
        let debug = format!("{id:?}");
        assert!(!debug.contains("4c4c4544"));
    }

    #[test]
    fn blank_identifier_detection() {
        assert!(MachineIdentifier::new("").is_blank());
        assert!(MachineIdentifier::new(" \n\t").is_blank());
        assert!(!MachineIdentifier::new("abc").is_blank());
    }

    #[test]
    fn boxed_and_borrowed_sources_delegate() {
        let boxed: Box<dyn IdentitySource> = Box::new(Unavailable);
        assert!(matches!(
            boxed.resolve(),
            Err(CredentialError::IdentityUnavailable(_))
        ));

        let fixed = FixedIdentity::new("m");
        let borrowed = &fixed;
        assert_eq!(borrowed.resolve().unwrap(), MachineIdentifier::new("m"));
    }

    #[test]
    fn os_identity_is_stable_when_available() {
        // Containers without a machine-id legitimately fail; only check stability.
        if let Ok(first) = OsIdentity.resolve() {
            assert_eq!(first, OsIdentity.resolve().unwrap());
        }
    }
}
