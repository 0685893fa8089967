// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! AES-256-GCM at-rest encryption for the generator state file
//! (`spec.md` §3, §6): `aes-256-gcm:<8-hex-fingerprint>:<base64(iv‖ct‖tag)>`.

use aes_gcm::{
    aead::Aead,
    Aes256Gcm, Key, KeyInit, Nonce,
};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::AeadError;

const PREFIX: &str = "aes-256-gcm";
const IV_LEN: usize = 12;

fn key_fingerprint(key: &[u8; 32]) -> String {
    hex::encode(&Sha256::digest(key).as_slice()[0..4])
}

/// Encrypt `plaintext` under `key`, producing the cipher field format.
#[tracing::instrument(skip(key, plaintext))]
pub fn encrypt_field(key: &[u8; 32], plaintext: &str) -> String {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    let nonce = Nonce::from_slice(&iv);
    let ct = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .expect("AES-256-GCM encryption over a bounded plaintext cannot fail");

    let mut payload = Vec::with_capacity(IV_LEN + ct.len());
    payload.extend_from_slice(&iv);
    payload.extend_from_slice(&ct);

    format!(
        "{}:{}:{}",
        PREFIX,
        key_fingerprint(key),
        base64::encode(payload)
    )
}

/// Decrypt a cipher field previously produced by [`encrypt_field`].
#[tracing::instrument(skip(key, field))]
pub fn decrypt_field(key: &[u8; 32], field: &str) -> Result<String, AeadError> {
    let mut parts = field.splitn(3, ':');
    let prefix = parts.next().ok_or(AeadError::MalformedField)?;
    let fingerprint = parts.next().ok_or(AeadError::MalformedField)?;
    let payload_b64 = parts.next().ok_or(AeadError::MalformedField)?;
    if prefix != PREFIX {
        return Err(AeadError::MalformedField);
    }

    let expected_fingerprint = key_fingerprint(key);
    if fingerprint != expected_fingerprint {
        return Err(AeadError::FingerprintMismatch(fingerprint.to_string()));
    }

    let payload = base64::decode(payload_b64).map_err(|_| AeadError::Base64)?;
    if payload.len() < IV_LEN + 16 {
        return Err(AeadError::Truncated);
    }
    let (iv, ct) = payload.split_at(IV_LEN);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Nonce::from_slice(iv);
    let pt = cipher
        .decrypt(nonce, ct)
        .map_err(|_| AeadError::Decrypt)?;

    String::from_utf8(pt).map_err(|_| AeadError::Decrypt)
}

/// Is `field` in the `aes-256-gcm:...` cipher form, as opposed to a
/// plaintext field? Used by the generator (de)serializer to decide whether
/// a value needs decrypting.
pub fn is_cipher_field(field: &str) -> bool {
    field.starts_with(PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let key = [7u8; 32];
        let field = encrypt_field(&key, "super-secret-seed");
        assert!(is_cipher_field(&field));
        assert_eq!(decrypt_field(&key, &field).unwrap(), "super-secret-seed");
    }

    #[test]
    fn wrong_key_fails_fingerprint_check() {
        let field = encrypt_field(&[1u8; 32], "x");
        let err = decrypt_field(&[2u8; 32], &field).unwrap_err();
        assert!(matches!(err, AeadError::FingerprintMismatch(_)));
    }

    #[test]
    fn plaintext_is_not_mistaken_for_cipher() {
        assert!(!is_cipher_field("plain-chain-id"));
    }

    #[test]
    fn tampered_ciphertext_fails_to_decrypt() {
        let key = [3u8; 32];
        let mut field = encrypt_field(&key, "seed");
        field.push('x');
        assert!(decrypt_field(&key, &field).is_err());
    }
}
