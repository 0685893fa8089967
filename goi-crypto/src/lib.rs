// Copyright © 2019-2020 The Radicle Foundation <hello@radicle.foundation>
// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! The signing-key adapter required by `spec.md` §1: a public key, a
//! fingerprint, and a sign/verify capability, plus the AES-256-GCM at-rest
//! encryption used by the provenance-mark generator state file (§3, §6).

mod error;
mod keys;
pub mod aead;
pub mod ssh;

pub use error::{AeadError, IntoSecretKeyError};
pub use keys::{Fingerprint, PublicKey, SecretKey, Signature, PUBLICKEYBYTES};

/// The signing-key adapter consumed by the rest of the engine (`spec.md`
/// §1, external collaborator (ii)). Implemented here by [`SecretKey`];
/// callers that plug in a hardware token or `ssh-agent` provide their own
/// implementation.
pub trait SigningKey {
    fn public_key(&self) -> PublicKey;
    fn fingerprint(&self) -> Fingerprint {
        self.public_key().fingerprint()
    }
    fn sign(&self, data: &[u8]) -> Signature;
}

impl SigningKey for SecretKey {
    fn public_key(&self) -> PublicKey {
        self.public()
    }

    fn sign(&self, data: &[u8]) -> Signature {
        SecretKey::sign(self, data)
    }
}

/// Verify a signature produced by [`SigningKey::sign`] against a public key.
pub fn verify(pk: &PublicKey, data: &[u8], sig: &Signature) -> bool {
    pk.verify(data, sig)
}
