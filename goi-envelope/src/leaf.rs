// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use goi_canonical::{Canonical, Cstring};

/// The scalar values an envelope subject, predicate, or object may carry
/// directly, as opposed to being a nested envelope or an elided digest
/// (`spec.md` §3: predicates are well-known shorthands or free-form
/// strings; objects carry arbitrary JSON-ish payloads such as
/// `GordianOpenIntegrity.Documents`' path-to-XID map).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Leaf {
    Text(Cstring),
    Bytes(Vec<u8>),
    Int(i64),
}

impl Leaf {
    pub fn text(s: impl Into<String>) -> Self {
        Leaf::Text(Cstring::from(s.into()))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Leaf::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for Leaf {
    fn from(s: &str) -> Self {
        Leaf::text(s)
    }
}

impl From<String> for Leaf {
    fn from(s: String) -> Self {
        Leaf::text(s)
    }
}

impl From<Vec<u8>> for Leaf {
    fn from(b: Vec<u8>) -> Self {
        Leaf::Bytes(b)
    }
}

impl From<i64> for Leaf {
    fn from(n: i64) -> Self {
        Leaf::Int(n)
    }
}

impl Canonical for Leaf {
    fn canonical_bytes(&self) -> Vec<u8> {
        match self {
            Leaf::Text(s) => s.canonical_bytes(),
            Leaf::Bytes(b) => b.canonical_bytes(),
            Leaf::Int(n) => n.to_be_bytes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_bytes_digest_differently() {
        let t = Leaf::text("a");
        let b = Leaf::from(vec![b'a']);
        assert_ne!(goi_canonical::digest(&t), goi_canonical::digest(&b));
    }

    #[test]
    fn as_text_only_matches_text_variant() {
        assert_eq!(Leaf::text("x").as_text(), Some("x"));
        assert_eq!(Leaf::from(1i64).as_text(), None);
    }
}
