// SPDX-FileCopyrightText: 2026 MEX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for key derivation and the record codec.

use mex_core::CredentialError;
use mex_vault::{decrypt, derive, encrypt, EncryptedRecord, MachineIdentifier};
use proptest::prelude::*;

fn machine_id() -> impl Strategy<Value = String> {
    "[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}"
}

proptest! {
    #[test]
    fn roundtrip_on_same_machine(
        id in machine_id(),
        plaintext in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let m = MachineIdentifier::new(id);
        let record = encrypt(&derive(&m).unwrap(), &plaintext).unwrap();
        let opened = decrypt(&derive(&m).unwrap(), &record).unwrap();
        prop_assert_eq!(opened.as_slice(), plaintext.as_slice());
    }

    #[test]
    fn records_do_not_port_across_machines(
        id1 in machine_id(),
        id2 in machine_id(),
        plaintext in proptest::collection::vec(any::<u8>(), 0..128),
    ) {
        prop_assume!(id1 != id2);
        let record = encrypt(&derive(&MachineIdentifier::new(id1)).unwrap(), &plaintext).unwrap();
        let result = decrypt(&derive(&MachineIdentifier::new(id2)).unwrap(), &record);
        prop_assert!(matches!(result, Err(CredentialError::DecryptionFailed)));
    }

    #[test]
    fn any_single_byte_flip_is_detected(
        id in machine_id(),
        plaintext in proptest::collection::vec(any::<u8>(), 1..64),
        index in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let key = derive(&MachineIdentifier::new(id)).unwrap();
        let mut bytes = encrypt(&key, &plaintext).unwrap().into_bytes();
        let i = index.index(bytes.len());
        bytes[i] ^= mask;
        let result = decrypt(&key, &EncryptedRecord::from(bytes));
        prop_assert!(matches!(result, Err(CredentialError::DecryptionFailed)));
    }

    #[test]
    fn derivation_is_deterministic(id in machine_id()) {
        let a = derive(&MachineIdentifier::new(id.clone())).unwrap();
        let b = derive(&MachineIdentifier::new(id)).unwrap();
        // Keys are not directly comparable; equal keys open each other's records.
        let record = encrypt(&a, b"probe").unwrap();
        let opened = decrypt(&b, &record).unwrap();
        prop_assert_eq!(opened.as_slice(), b"probe".as_slice());
    }
}
