// Copyright © 2019-2020 The Radicle Foundation <hello@radicle.foundation>
// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use std::{
    convert::{TryFrom, TryInto},
    fmt,
};

use ed25519_zebra as ed25519;
use multibase::Base::Base32Z;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::IntoSecretKeyError;

pub const PUBLICKEYBYTES: usize = 32;

/// A device-specific signing key, the engine's own key material.
///
/// `spec.md` explicitly excludes *generating* these from the engine's scope;
/// callers obtain one from the signing-key adapter and the engine only ever
/// signs, verifies, and fingerprints with it.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey(ed25519::SigningKey);

impl SecretKey {
    /// Derive a `SecretKey` from caller-supplied seed bytes. Used by tests
    /// and by adapters that load a key from storage; the engine itself
    /// never invents key material.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self(ed25519::SigningKey::from(seed))
    }

    pub fn public(&self) -> PublicKey {
        PublicKey(ed25519::VerificationKey::from(&self.0).into())
    }

    pub fn sign(&self, data: &[u8]) -> Signature {
        Signature(self.0.sign(data))
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({})", self.public())
    }
}

impl TryFrom<&[u8]> for SecretKey {
    type Error = IntoSecretKeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| IntoSecretKeyError::InvalidSliceLength)?;
        Ok(Self::from_seed(arr))
    }
}

/// The public part of a [`SecretKey`].
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// The XID prefix (`spec.md` §2, §4.3): the first 4 bytes of the
    /// inception signing public key.
    pub fn xid_prefix(&self) -> [u8; 4] {
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.as_bytes()[0..4]);
        out
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let digest = Sha256::digest(self.as_bytes());
        Fingerprint(hex::encode(digest))
    }

    pub fn verify(&self, data: &[u8], sig: &Signature) -> bool {
        match ed25519::VerificationKey::try_from(self.0) {
            Ok(vk) => vk.verify(&sig.0, data).is_ok(),
            Err(_) => false,
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", multibase::encode(Base32Z, self.as_bytes()))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

/// A signature produced by [`SecretKey::sign`].
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(ed25519::Signature);

impl Signature {
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.into()
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 64] = bytes.try_into().ok()?;
        Some(Self(ed25519::Signature::from(arr)))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(self.to_bytes()))
    }
}

/// Hex-encoded SHA-256 digest of a public key. Used both as a
/// human-published fingerprint and, truncated to 8 hex chars, as the
/// indexer embedded in the AES-GCM cipher field format (`spec.md` §3).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short8(&self) -> &str {
        &self.0[0..8]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> SecretKey {
        SecretKey::from_seed([byte; 32])
    }

    #[test]
    fn sign_and_verify_round_trips() {
        let sk = key(1);
        let sig = sk.sign(b"hello");
        assert!(sk.public().verify(b"hello", &sig));
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let sk = key(1);
        let sig = sk.sign(b"hello");
        assert!(!sk.public().verify(b"goodbye", &sig));
    }

    #[test]
    fn xid_prefix_is_first_four_bytes() {
        let sk = key(7);
        let pk = sk.public();
        assert_eq!(&pk.xid_prefix(), &pk.as_bytes()[0..4]);
    }

    #[test]
    fn fingerprint_short8_is_stable() {
        let pk = key(3).public();
        let fp = pk.fingerprint();
        assert_eq!(fp.short8().len(), 8);
        assert_eq!(fp.short8(), pk.fingerprint().short8());
    }

    #[test]
    fn distinct_keys_have_distinct_fingerprints() {
        assert_ne!(key(1).public().fingerprint(), key(2).public().fingerprint());
    }
}
