// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::{date::MarkDate, mark::ProvenanceMark, resolution::Resolution};

/// How a new chain's seed is sourced (`spec.md` §4.2).
pub enum Source {
    Random,
    SeedBytes(Vec<u8>),
    Passphrase(String),
}

/// Mints the next mark in a chain on demand. Persisted state is exactly
/// `spec.md` §3's generator state: `seed`, `rngState` (here, `next_seq`
/// doubles as the only state that needs to advance), and `chainID`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Generator {
    resolution: Resolution,
    seed: Vec<u8>,
    chain_id: Vec<u8>,
    next_seq: u32,
}

impl Generator {
    /// Start a brand-new chain, returning a generator positioned to mint
    /// the genesis mark next.
    pub fn new(resolution: Resolution, source: Source) -> Self {
        let len = resolution.link_len();
        let seed = match source {
            Source::Random => {
                let mut buf = vec![0u8; 32];
                rand::thread_rng().fill_bytes(&mut buf);
                buf
            }
            Source::SeedBytes(bytes) => bytes,
            Source::Passphrase(pass) => Sha256::digest(pass.as_bytes()).to_vec(),
        };
        let chain_id = Sha256::digest(&[&seed[..], b"chain-id"].concat()).as_slice()[0..len].to_vec();
        Self {
            resolution,
            seed,
            chain_id,
            next_seq: 0,
        }
    }

    /// Create a generator and immediately mint its genesis mark
    /// (`seq == 0`), the common case (`spec.md` §4.2).
    pub fn genesis(resolution: Resolution, source: Source) -> Self {
        Self::new(resolution, source)
    }

    pub fn chain_id(&self) -> &[u8] {
        &self.chain_id
    }

    pub fn next_seq(&self) -> u32 {
        self.next_seq
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    /// Fast-forwards the generator to a persisted `nextSeq` without
    /// re-minting the intervening marks, the restore half of the generator
    /// state file round trip (`spec.md` §6).
    pub fn set_next_seq(&mut self, seq: u32) {
        self.next_seq = seq;
    }

    fn key_for(&self, seq: u32) -> Vec<u8> {
        let len = self.resolution.link_len();
        Sha256::digest(&[&self.seed[..], &self.chain_id[..], &seq.to_be_bytes()[..]].concat())
            .as_slice()[0..len]
            .to_vec()
    }

    /// `spec.md` §4.2: strictly increases `seq` by 1; adopts `date` as
    /// given. The generator does not clamp or validate monotonicity of
    /// `date` itself — callers (the ledger) are responsible for only
    /// calling this with a date not before the previous mark's.
    #[tracing::instrument(skip(self))]
    pub fn next(&mut self, date: MarkDate) -> ProvenanceMark {
        let seq = self.next_seq;
        let key = self.key_for(seq);
        let next_key_hash = Sha256::digest(&self.key_for(seq + 1)).to_vec();
        self.next_seq += 1;

        tracing::debug!(seq, chain_id = %hex::encode(&self.chain_id), "minted provenance mark");

        ProvenanceMark {
            resolution: self.resolution,
            chain_id: self.chain_id.clone(),
            seq,
            date,
            key,
            next_key_hash,
            payload: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_from_seed_bytes() {
        let mut a = Generator::genesis(Resolution::Low, Source::SeedBytes(vec![9; 16]));
        let mut b = Generator::genesis(Resolution::Low, Source::SeedBytes(vec![9; 16]));
        assert_eq!(a.next(MarkDate::new(2024, 1, 1)), b.next(MarkDate::new(2024, 1, 1)));
    }

    #[test]
    fn sequence_strictly_increases() {
        let mut g = Generator::genesis(Resolution::Medium, Source::SeedBytes(vec![1; 16]));
        let m0 = g.next(MarkDate::new(2024, 1, 1));
        let m1 = g.next(MarkDate::new(2024, 1, 2));
        assert_eq!(m0.seq, 0);
        assert_eq!(m1.seq, 1);
    }

    #[test]
    fn passphrase_and_random_sources_do_not_panic() {
        let mut g = Generator::genesis(Resolution::High, Source::Passphrase("correct horse".into()));
        let mark = g.next(MarkDate::new(2024, 6, 1));
        assert!(mark.is_genesis());

        let mut g = Generator::genesis(Resolution::Quartile, Source::Random);
        let mark = g.next(MarkDate::new(2024, 6, 1));
        assert!(mark.is_genesis());
    }
}
