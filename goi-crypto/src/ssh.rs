// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! SSH-signature ("PROTOCOL.sshsig") framing for the commits the VCS
//! adapter produces, and the `keyMatch` comparison `spec.md` §4.5 and §6
//! require between the repository identifier's two inception commits.
//!
//! `spec.md` §9 Open Question (c) flags that the original implementation
//! compares the *first line* of the armored signature block as a raw
//! string, and is vulnerable to false negatives on structurally equivalent
//! re-encodings. We decide that question here (see `DESIGN.md`) by
//! decoding the wire format and comparing the embedded public-key field
//! instead of the armored text.

use std::convert::TryInto;

use thiserror::Error;

use crate::keys::{PublicKey, SecretKey, Signature};

const MAGIC: &[u8] = b"SSHSIG";
const SIG_VERSION: u32 = 1;
const KEY_TYPE: &str = "ssh-ed25519";
const NAMESPACE: &str = "git";
const HASH_ALGO: &str = "sha512";
const LINE_WIDTH: usize = 76;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SshSigError {
    #[error("missing BEGIN/END SSH SIGNATURE markers")]
    MissingMarkers,
    #[error("invalid base64 in signature body")]
    Base64,
    #[error("truncated or malformed SSHSIG blob")]
    Malformed,
    #[error("unsupported key type `{0}`, only ssh-ed25519 is supported")]
    UnsupportedKeyType(String),
    #[error("signature namespace `{0}` does not match the required `git` namespace")]
    WrongNamespace(String),
}

/// A parsed `PROTOCOL.sshsig` blob: enough to recover the signer's public
/// key and to re-verify the signature over a given payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshSignature {
    pub public_key: PublicKey,
    pub namespace: String,
    pub signature: Signature,
}

/// Build a signed, armored SSH signature block over `data`, in the `git`
/// namespace, the form `spec.md` §6 requires commit signatures to take.
pub fn sign_armored(key: &SecretKey, data: &[u8]) -> String {
    let to_sign = signed_message(data);
    let sig = key.sign(&to_sign);
    let blob = encode_blob(&key.public(), &sig);
    armor(&blob)
}

/// Verify an armored signature block was produced over `data` by the
/// embedded public key, in the `git` namespace.
pub fn verify_armored(armored: &str, data: &[u8]) -> Result<SshSignature, SshSigError> {
    let blob = dearmor(armored)?;
    let parsed = decode_blob(&blob)?;
    if parsed.namespace != NAMESPACE {
        return Err(SshSigError::WrongNamespace(parsed.namespace));
    }
    let to_sign = signed_message(data);
    if !parsed.public_key.verify(&to_sign, &parsed.signature) {
        return Err(SshSigError::Malformed);
    }
    Ok(parsed)
}

/// Parse an armored block without verifying the signature, used where only
/// the embedded public key is needed (e.g. the `keyMatch` comparison).
pub fn parse_armored(armored: &str) -> Result<SshSignature, SshSigError> {
    let blob = dearmor(armored)?;
    decode_blob(&blob)
}

/// `spec.md` §4.5 `keyMatch`: true iff both signature blocks were produced
/// by binary-equal public keys. Unlike the upstream tool's raw first-line
/// string comparison, this decodes both blobs first, so cosmetic line-wrap
/// or base64 padding differences cannot cause a false negative or positive.
pub fn keys_match(a: &str, b: &str) -> bool {
    match (parse_armored(a), parse_armored(b)) {
        (Ok(a), Ok(b)) => a.public_key == b.public_key,
        _ => false,
    }
}

fn signed_message(data: &[u8]) -> Vec<u8> {
    use sha2::{Digest, Sha512};
    let mut msg = Vec::new();
    msg.extend_from_slice(MAGIC);
    write_string(&mut msg, NAMESPACE.as_bytes());
    write_string(&mut msg, &[]); // reserved
    write_string(&mut msg, HASH_ALGO.as_bytes());
    write_string(&mut msg, &Sha512::digest(data));
    msg
}

fn encode_blob(pk: &PublicKey, sig: &Signature) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&SIG_VERSION.to_be_bytes());
    write_string(&mut out, &encode_public_key(pk));
    write_string(&mut out, NAMESPACE.as_bytes());
    write_string(&mut out, &[]); // reserved
    write_string(&mut out, HASH_ALGO.as_bytes());
    write_string(&mut out, &encode_signature(sig));
    out
}

fn decode_blob(blob: &[u8]) -> Result<SshSignature, SshSigError> {
    let mut cur = blob;
    take_exact(&mut cur, MAGIC)?;
    let version = take_u32(&mut cur)?;
    if version != SIG_VERSION {
        return Err(SshSigError::Malformed);
    }
    let pubkey_field = take_string(&mut cur)?;
    let namespace = String::from_utf8(take_string(&mut cur)?.to_vec())
        .map_err(|_| SshSigError::Malformed)?;
    let _reserved = take_string(&mut cur)?;
    let _hash_algo = take_string(&mut cur)?;
    let sig_field = take_string(&mut cur)?;

    let public_key = decode_public_key(&pubkey_field)?;
    let signature = decode_signature(&sig_field)?;

    Ok(SshSignature {
        public_key,
        namespace,
        signature,
    })
}

fn encode_public_key(pk: &PublicKey) -> Vec<u8> {
    let mut out = Vec::new();
    write_string(&mut out, KEY_TYPE.as_bytes());
    write_string(&mut out, pk.as_bytes());
    out
}

fn decode_public_key(field: &[u8]) -> Result<PublicKey, SshSigError> {
    let mut cur = field;
    let key_type =
        String::from_utf8(take_string(&mut cur)?.to_vec()).map_err(|_| SshSigError::Malformed)?;
    if key_type != KEY_TYPE {
        return Err(SshSigError::UnsupportedKeyType(key_type));
    }
    let bytes = take_string(&mut cur)?;
    PublicKey::from_slice(bytes).ok_or(SshSigError::Malformed)
}

fn encode_signature(sig: &Signature) -> Vec<u8> {
    let mut out = Vec::new();
    write_string(&mut out, KEY_TYPE.as_bytes());
    write_string(&mut out, &sig.to_bytes());
    out
}

fn decode_signature(field: &[u8]) -> Result<Signature, SshSigError> {
    let mut cur = field;
    let key_type =
        String::from_utf8(take_string(&mut cur)?.to_vec()).map_err(|_| SshSigError::Malformed)?;
    if key_type != KEY_TYPE {
        return Err(SshSigError::UnsupportedKeyType(key_type));
    }
    let bytes = take_string(&mut cur)?;
    Signature::from_bytes(bytes).ok_or(SshSigError::Malformed)
}

fn write_string(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
}

fn take_exact<'a>(cur: &mut &'a [u8], expect: &[u8]) -> Result<(), SshSigError> {
    if cur.len() < expect.len() || &cur[..expect.len()] != expect {
        return Err(SshSigError::Malformed);
    }
    *cur = &cur[expect.len()..];
    Ok(())
}

fn take_u32(cur: &mut &[u8]) -> Result<u32, SshSigError> {
    if cur.len() < 4 {
        return Err(SshSigError::Malformed);
    }
    let (head, rest) = cur.split_at(4);
    *cur = rest;
    Ok(u32::from_be_bytes(head.try_into().unwrap()))
}

fn take_string<'a>(cur: &mut &'a [u8]) -> Result<&'a [u8], SshSigError> {
    let len = take_u32(cur)? as usize;
    if cur.len() < len {
        return Err(SshSigError::Malformed);
    }
    let (head, rest) = cur.split_at(len);
    *cur = rest;
    Ok(head)
}

fn armor(blob: &[u8]) -> String {
    let encoded = base64::encode(blob);
    let mut out = String::from("-----BEGIN SSH SIGNATURE-----\n");
    for chunk in encoded.as_bytes().chunks(LINE_WIDTH) {
        out.push_str(std::str::from_utf8(chunk).unwrap());
        out.push('\n');
    }
    out.push_str("-----END SSH SIGNATURE-----\n");
    out
}

fn dearmor(armored: &str) -> Result<Vec<u8>, SshSigError> {
    let body = armored
        .strip_prefix("-----BEGIN SSH SIGNATURE-----")
        .and_then(|s| s.find("-----END SSH SIGNATURE-----").map(|end| &s[..end]))
        .ok_or(SshSigError::MissingMarkers)?;
    let joined: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    base64::decode(&joined).map_err(|_| SshSigError::Base64)
}

/// The first non-marker line of an armored block, i.e. the literal string
/// the upstream tool compares for `keyMatch`. Exposed for parity testing
/// against the spec's documented (and flagged-as-fragile) behaviour; the
/// engine itself uses [`keys_match`].
pub fn first_body_line(armored: &str) -> Option<&str> {
    armored.lines().nth(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_armor() {
        let sk = SecretKey::from_seed([9; 32]);
        let armored = sign_armored(&sk, b"tree deadbeef");
        let parsed = verify_armored(&armored, b"tree deadbeef").unwrap();
        assert_eq!(parsed.public_key, sk.public());
        assert_eq!(parsed.namespace, "git");
    }

    #[test]
    fn rejects_tampered_payload() {
        let sk = SecretKey::from_seed([9; 32]);
        let armored = sign_armored(&sk, b"tree deadbeef");
        assert!(verify_armored(&armored, b"tree other").is_err());
    }

    #[test]
    fn keys_match_same_signer_different_payloads() {
        let sk = SecretKey::from_seed([1; 32]);
        let a = sign_armored(&sk, b"first commit");
        let b = sign_armored(&sk, b"second commit");
        assert!(keys_match(&a, &b));
    }

    #[test]
    fn keys_match_rejects_different_signers() {
        let a = sign_armored(&SecretKey::from_seed([1; 32]), b"x");
        let b = sign_armored(&SecretKey::from_seed([2; 32]), b"x");
        assert!(!keys_match(&a, &b));
    }

    #[test]
    fn first_body_line_is_exposed_for_the_naive_comparison() {
        let sk = SecretKey::from_seed([1; 32]);
        let armored = sign_armored(&sk, b"x");
        assert!(first_body_line(&armored).is_some());
    }
}
