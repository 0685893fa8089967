// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use goi_canonical::{Canonical, Writer};
use sha2::{Digest, Sha256};

use crate::{bytewords, date::MarkDate, resolution::Resolution};

/// One link in the provenance-mark chain (`spec.md` §3): a tuple
/// `(chainID, seq, date, nextHash, payload)` of fixed resolution.
///
/// `key` is this mark's own ratchet key; it is what the *previous* mark's
/// `next_key_hash` committed to. Publishing a mark reveals its `key`, which
/// is exactly what lets [`ProvenanceMark::precedes`] be checked by a third
/// party holding only the two adjacent marks, with no access to the
/// generator's seed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProvenanceMark {
    pub resolution: Resolution,
    pub chain_id: Vec<u8>,
    pub seq: u32,
    pub date: MarkDate,
    pub key: Vec<u8>,
    pub next_key_hash: Vec<u8>,
    pub payload: Vec<u8>,
}

impl ProvenanceMark {
    pub fn is_genesis(&self) -> bool {
        self.seq == 0
    }

    /// `SHA256(key)`, recomputed to check against a predecessor's
    /// `next_key_hash`.
    pub fn key_hash(&self) -> Vec<u8> {
        Sha256::digest(&self.key).to_vec()
    }

    /// `spec.md` §4.2: true iff `next` chain-continues from `self`.
    pub fn precedes(&self, next: &ProvenanceMark) -> bool {
        next.seq == self.seq + 1
            && next.chain_id == self.chain_id
            && next.key_hash() == self.next_key_hash
    }

    /// The mark's own digest, the basis for its publishable identifier.
    pub fn digest(&self) -> [u8; 32] {
        goi_canonical::digest(self)
    }

    /// Hex identifier: lowercase hex of the mark digest, truncated to 32
    /// hex chars (16 bytes) for publication brevity (`spec.md` §4.2).
    pub fn identifier_hex(&self) -> String {
        hex::encode(&self.digest()[0..16])
    }

    /// Bytewords identifier: a human-typeable word sequence over the same
    /// truncated digest (`spec.md` glossary: "Bytewords identifier").
    pub fn identifier_bytewords(&self) -> String {
        bytewords::encode(&self.digest()[0..16])
    }
}

impl Canonical for ProvenanceMark {
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.tag(b'M');
        w.bytes(&self.chain_id);
        w.bytes(&self.seq.to_be_bytes());
        w.bytes(self.date.to_string().as_bytes());
        w.bytes(&self.key);
        w.bytes(&self.next_key_hash);
        w.bytes(&self.payload);
        w.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{Generator, Source};

    fn chain() -> Vec<ProvenanceMark> {
        let mut gen = Generator::genesis(Resolution::Low, Source::SeedBytes(vec![1; 32]));
        (0..4)
            .map(|i| gen.next(MarkDate::new(2024, 1, 1 + i)))
            .collect()
    }

    #[test]
    fn adjacent_marks_precede() {
        let marks = chain();
        for pair in marks.windows(2) {
            assert!(pair[0].precedes(&pair[1]));
        }
    }

    #[test]
    fn non_adjacent_marks_do_not_precede() {
        let marks = chain();
        assert!(!marks[0].precedes(&marks[2]));
    }

    #[test]
    fn genesis_has_seq_zero() {
        assert!(chain()[0].is_genesis());
        assert!(!chain()[1].is_genesis());
    }

    #[test]
    fn identifiers_differ_per_mark() {
        let marks = chain();
        assert_ne!(marks[0].identifier_hex(), marks[1].identifier_hex());
        assert_ne!(marks[0].identifier_bytewords(), marks[1].identifier_bytewords());
    }
}
