// Copyright © 2021 The Radicle Link Contributors
// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! Canonical serialisation discipline.
//!
//! `radicle-link`'s `link-canonical` defines OLPC Canonical JSON: a
//! deterministic text encoding used so two independently-built values with
//! the same logical content hash identically. This engine needs the same
//! property over a *binary* encoding ("SHA-256 over a canonical binary
//! encoding"), so this crate keeps the discipline — length-prefixed,
//! type-tagged, NFC-normalised fields, no encoder-dependent ambiguity — and
//! drops the JSON-specific `Value`/parser machinery `link-canonical` needed
//! for its text format.

mod cstring;
mod writer;

pub use cstring::Cstring;
pub use writer::Writer;

use sha2::{Digest, Sha256};

/// A type that can be turned into a canonical byte sequence: feeding the
/// same logical value through `canonical_bytes` twice, however it was
/// constructed, always yields the same bytes.
pub trait Canonical {
    fn canonical_bytes(&self) -> Vec<u8>;
}

/// `SHA256(canonical_bytes(value))`, the digest primitive every
/// content-addressed structure in the engine (envelopes, provenance marks)
/// is built from.
pub fn digest<T: Canonical + ?Sized>(value: &T) -> [u8; 32] {
    Sha256::digest(&value.canonical_bytes()).into()
}

impl Canonical for [u8] {
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.bytes(self);
        w.into_bytes()
    }
}

impl Canonical for str {
    fn canonical_bytes(&self) -> Vec<u8> {
        Cstring::from(self).canonical_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(digest("hello"), digest("hello"));
    }

    #[test]
    fn digest_distinguishes_type() {
        // The length-prefix discipline must stop "ab"++"c" colliding with
        // "a"++"bc" when concatenated naively; Writer::bytes keeps each
        // field's length attached so this cannot happen.
        let mut a = Writer::new();
        a.bytes(b"ab");
        a.bytes(b"c");

        let mut b = Writer::new();
        b.bytes(b"a");
        b.bytes(b"bc");

        assert_ne!(a.into_bytes(), b.into_bytes());
    }
}
