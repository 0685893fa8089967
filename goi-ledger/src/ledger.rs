// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use std::path::PathBuf;

use goi_mark::{MarkDate, ProvenanceMark, Resolution, Source};
use goi_xid::{GeneratorOptions, PrivateKeyOptions, SigningOptions, Xid, XidDocument};

use crate::{
    error::LedgerError,
    generator_state,
    options::LedgerOptions,
    provenance_doc::{self, ProvenanceDoc},
    revision::Revision,
};

/// An append-only sequence of [`Revision`]s sharing one XID, with optional
/// on-disk persistence of the provenance document and generator state
/// (`spec.md` §4.4).
#[derive(Clone, Debug)]
pub struct Ledger {
    xid: Xid,
    revisions: Vec<Revision>,
    options: LedgerOptions,
}

fn mark_file_path(store_dir: &std::path::Path, seq: u32) -> PathBuf {
    store_dir.join("marks").join(format!("mark-{seq}.json"))
}

fn write_mark_file(store_dir: &std::path::Path, mark: &ProvenanceMark) -> Result<(), LedgerError> {
    let path = mark_file_path(store_dir, mark.seq);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let value = serde_json::json!({
        "seq": mark.seq,
        "chainID": hex::encode(&mark.chain_id),
        "date": mark.date.to_string(),
        "key": hex::encode(&mark.key),
        "nextKeyHash": hex::encode(&mark.next_key_hash),
        "identifier": mark.identifier_hex(),
    });
    std::fs::write(path, serde_json::to_vec_pretty(&value)?)?;
    Ok(())
}

fn write_generator(options: &LedgerOptions, doc: &XidDocument) -> Result<(), LedgerError> {
    let generator = match doc.generator() {
        Some(g) => g,
        None => return Ok(()),
    };
    if let Some(path) = &options.generator_path {
        generator_state::write(path, generator, options.encryption_key.as_ref())?;
    }
    if let Some(store_dir) = &options.store_dir {
        let path = store_dir.join("generator.json");
        generator_state::write(&path, generator, options.encryption_key.as_ref())?;
    }
    Ok(())
}

fn write_provenance_yaml(
    options: &LedgerOptions,
    doc: &XidDocument,
    mark: &ProvenanceMark,
    inception_mark: Option<&ProvenanceMark>,
) -> Result<(), LedgerError> {
    let path = match &options.document_path {
        Some(path) => path,
        None => return Ok(()),
    };

    let mut envelope = doc.to_envelope(&PrivateKeyOptions::Omit, &GeneratorOptions::Omit, &SigningOptions::None)?;
    for (predicate, object) in &options.assertions {
        envelope = envelope.add_assertion(predicate.as_str(), object.as_str());
    }

    let rendered = provenance_doc::render(&ProvenanceDoc {
        envelope,
        mark: mark.clone(),
        repository_did: options.repository_did.clone(),
        inception_mark: inception_mark.cloned(),
        contract: options.contract.clone(),
    })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, rendered)?;
    Ok(())
}

impl Ledger {
    /// `spec.md` §4.4 `createLedger`. `doc` must already carry a genesis
    /// mark (via [`XidDocument::with_provenance`]); otherwise fails
    /// [`LedgerError::ProvenanceRequired`].
    #[tracing::instrument(skip(doc, options))]
    pub fn create(doc: &XidDocument, options: LedgerOptions) -> Result<Self, LedgerError> {
        let mark = doc.current_mark().ok_or(LedgerError::ProvenanceRequired)?;
        if !mark.is_genesis() {
            return Err(LedgerError::ProvenanceRequired);
        }
        let mark = mark.clone();

        let revision = Revision::new(0, "genesis", mark.date, doc.clone(), mark.clone());

        if let Some(store_dir) = &options.store_dir {
            write_mark_file(store_dir, &mark)?;
        }
        write_generator(&options, doc)?;
        write_provenance_yaml(&options, doc, &mark, Some(&mark))?;

        tracing::info!(xid = %doc.xid(), "ledger created");

        Ok(Self { xid: doc.xid(), revisions: vec![revision], options })
    }

    pub fn xid(&self) -> Xid {
        self.xid
    }

    pub fn options(&self) -> &LedgerOptions {
        &self.options
    }

    /// `spec.md` §4.4 `commit`. Advances `doc`'s provenance, deep-clones it
    /// into a new revision, and rewrites configured files. The ledger is
    /// left untouched if `doc`'s XID mismatches or advancing fails.
    #[tracing::instrument(skip(self, doc))]
    pub fn commit(&mut self, doc: &mut XidDocument, label: impl Into<String> + std::fmt::Debug, date: MarkDate) -> Result<&Revision, LedgerError> {
        if doc.xid() != self.xid {
            return Err(LedgerError::XidMismatch);
        }
        let mark = doc.advance_provenance(date)?;
        let seq = self.next_seq();
        let inception_mark = self.current_trust_root().mark.clone();

        let revision = Revision::new(seq, label, date, doc.clone(), mark.clone());

        if let Some(store_dir) = &self.options.store_dir {
            write_mark_file(store_dir, &mark)?;
        }
        write_generator(&self.options, doc)?;
        write_provenance_yaml(&self.options, doc, &mark, Some(&inception_mark))?;

        self.revisions.push(revision);
        tracing::info!(seq, "ledger commit");
        Ok(self.revisions.last().expect("just pushed"))
    }

    /// `spec.md` §9 Open Question (a) / end-to-end scenario 6: mints a new
    /// genesis mark under a fresh chain ID for `doc` and appends it as a
    /// revision, preserving the ledger's XID. Revisions minted under the
    /// old chain remain in the ledger and individually valid; only the
    /// segment after this call governs [`Ledger::verify`]'s continuity
    /// check, per [`current_trust_root`](Self::current_trust_root).
    #[tracing::instrument(skip(self, doc, source))]
    pub fn reset_trust_root(
        &mut self,
        doc: &mut XidDocument,
        label: impl Into<String> + std::fmt::Debug,
        date: MarkDate,
        resolution: Resolution,
        source: Source,
    ) -> Result<&Revision, LedgerError> {
        if doc.xid() != self.xid {
            return Err(LedgerError::XidMismatch);
        }
        let mark = doc.reset_provenance(resolution, source, date);
        let seq = self.next_seq();

        let revision = Revision::new(seq, label, date, doc.clone(), mark.clone());

        if let Some(store_dir) = &self.options.store_dir {
            write_mark_file(store_dir, &mark)?;
        }
        write_generator(&self.options, doc)?;
        write_provenance_yaml(&self.options, doc, &mark, Some(&mark))?;

        self.revisions.push(revision);
        tracing::info!(seq, "ledger trust root reset");
        Ok(self.revisions.last().expect("just pushed"))
    }

    fn next_seq(&self) -> u32 {
        self.revisions.last().map(|r| r.seq + 1).unwrap_or(0)
    }

    pub fn get_genesis(&self) -> Option<&Revision> {
        self.revisions.first()
    }

    /// The revision beginning the trust segment currently governing
    /// verification: the ledger's original genesis, or the most recent
    /// [`Ledger::reset_trust_root`] call if one occurred.
    pub fn current_trust_root(&self) -> &Revision {
        let mut start = 0;
        for (i, pair) in self.revisions.windows(2).enumerate() {
            if pair[1].mark.is_genesis() && pair[1].mark.chain_id != pair[0].mark.chain_id {
                start = i + 1;
            }
        }
        &self.revisions[start]
    }

    pub fn get_latest(&self) -> Option<&Revision> {
        self.revisions.last()
    }

    pub fn get_revision(&self, seq: u32) -> Option<&Revision> {
        self.revisions.iter().find(|r| r.seq == seq)
    }

    pub fn get_revision_by_label(&self, label: &str) -> Option<&Revision> {
        self.revisions.iter().find(|r| r.label == label)
    }

    pub fn get_labels(&self) -> Vec<&str> {
        self.revisions.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn get_marks(&self) -> Vec<&ProvenanceMark> {
        self.revisions.iter().map(|r| &r.mark).collect()
    }

    pub fn length(&self) -> usize {
        self.revisions.len()
    }

    /// `spec.md` §4.4 `verify`: cross-checks XID stability, genesis
    /// presence, chain continuity, sequence numbering, and date
    /// monotonicity across all revisions.
    pub fn verify(&self) -> LedgerReport {
        let mut issues = Vec::new();

        let genesis_present = self.revisions.first().map(|r| r.seq == 0 && r.mark.is_genesis()).unwrap_or(false);
        if !genesis_present {
            issues.push("no genesis revision".to_string());
        }

        let xid_stable = self.revisions.iter().all(|r| r.snapshot.xid() == self.xid);
        if !xid_stable {
            issues.push("a revision snapshot's xid does not match the ledger's xid".to_string());
        }

        let mut sequence_valid = true;
        let mut dates_monotonic = true;
        let mut chain_intact = true;
        for pair in self.revisions.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.seq != prev.seq + 1 {
                sequence_valid = false;
                issues.push(format!("sequence regressed: revision after seq {} has seq {}", prev.seq, next.seq));
            }
            if next.date < prev.date {
                dates_monotonic = false;
                issues.push(format!("date regressed after seq {}", prev.seq));
            }
            // A trust-root reset legitimately starts a new mark chain; the
            // join itself is not a continuity failure (§9 Open Question a).
            let trust_root_reset = next.mark.is_genesis() && next.mark.chain_id != prev.mark.chain_id;
            if !trust_root_reset && !prev.mark.precedes(&next.mark) {
                chain_intact = false;
                issues.push(format!("mark chain broken between seq {} and seq {}", prev.seq, next.seq));
            }
        }

        LedgerReport {
            valid: issues.is_empty(),
            xid_stable,
            genesis_present,
            chain_intact,
            sequence_valid,
            dates_monotonic,
            issues,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerReport {
    pub valid: bool,
    pub xid_stable: bool,
    pub genesis_present: bool,
    pub chain_intact: bool,
    pub sequence_valid: bool,
    pub dates_monotonic: bool,
    pub issues: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use goi_crypto::SecretKey;
    use goi_mark::{Resolution, Source};

    fn doc_with_provenance() -> XidDocument {
        doc_with_provenance_seeded(1)
    }

    fn doc_with_provenance_seeded(seed: u8) -> XidDocument {
        let sk = SecretKey::from_seed([seed; 32]);
        XidDocument::new(sk.public()).with_provenance(Resolution::Low, Source::SeedBytes(vec![seed; 16]), MarkDate::new(2024, 1, 1))
    }

    #[test]
    fn creation_without_provenance_fails() {
        let sk = SecretKey::from_seed([2u8; 32]);
        let doc = XidDocument::new(sk.public());
        let err = Ledger::create(&doc, LedgerOptions::default()).unwrap_err();
        assert!(matches!(err, LedgerError::ProvenanceRequired));
    }

    #[test]
    fn create_seeds_a_genesis_revision() {
        let doc = doc_with_provenance();
        let ledger = Ledger::create(&doc, LedgerOptions::default()).unwrap();
        assert_eq!(ledger.length(), 1);
        assert_eq!(ledger.get_genesis().unwrap().label, "genesis");
        assert!(ledger.verify().valid);
    }

    #[test]
    fn commit_advances_and_appends() {
        let mut doc = doc_with_provenance();
        let mut ledger = Ledger::create(&doc, LedgerOptions::default()).unwrap();
        ledger.commit(&mut doc, "second", MarkDate::new(2024, 1, 2)).unwrap();
        assert_eq!(ledger.length(), 2);
        assert_eq!(ledger.get_latest().unwrap().seq, 1);
        assert!(ledger.verify().valid);
    }

    #[test]
    fn commit_with_mismatched_xid_fails_and_ledger_is_unchanged() {
        let mut doc = doc_with_provenance();
        let mut ledger = Ledger::create(&doc, LedgerOptions::default()).unwrap();

        let mut other = doc_with_provenance_seeded(2);
        let err = ledger.commit(&mut other, "bad", MarkDate::new(2024, 1, 2)).unwrap_err();
        assert!(matches!(err, LedgerError::XidMismatch));
        assert_eq!(ledger.length(), 1);

        // original doc's own provenance is untouched by the failed commit
        ledger.commit(&mut doc, "second", MarkDate::new(2024, 1, 2)).unwrap();
        assert_eq!(ledger.length(), 2);
    }

    #[test]
    fn queries_resolve_by_seq_and_label() {
        let mut doc = doc_with_provenance();
        let mut ledger = Ledger::create(&doc, LedgerOptions::default()).unwrap();
        ledger.commit(&mut doc, "second", MarkDate::new(2024, 1, 2)).unwrap();

        assert_eq!(ledger.get_revision(1).unwrap().label, "second");
        assert_eq!(ledger.get_revision_by_label("second").unwrap().seq, 1);
        assert_eq!(ledger.get_labels(), vec!["genesis", "second"]);
        assert_eq!(ledger.get_marks().len(), 2);
    }

    #[test]
    fn files_are_written_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let options = LedgerOptions {
            store_dir: Some(dir.path().to_path_buf()),
            document_path: Some(dir.path().join("GordianOpenIntegrity.yaml")),
            generator_path: Some(dir.path().join("generator.json")),
            repository_did: Some("did:repo:abc".into()),
            ..Default::default()
        };
        let mut doc = doc_with_provenance();
        let mut ledger = Ledger::create(&doc, options).unwrap();

        assert!(dir.path().join("marks/mark-0.json").exists());
        assert!(dir.path().join("generator.json").exists());
        assert!(dir.path().join("GordianOpenIntegrity.yaml").exists());

        let text = std::fs::read_to_string(dir.path().join("GordianOpenIntegrity.yaml")).unwrap();
        assert!(text.contains("did:repo:abc"));

        ledger.commit(&mut doc, "second", MarkDate::new(2024, 1, 2)).unwrap();
        assert!(dir.path().join("marks/mark-1.json").exists());
    }

    #[test]
    fn encrypted_generator_state_round_trips_on_restore() {
        let dir = tempfile::tempdir().unwrap();
        let key = [4u8; 32];
        let options = LedgerOptions {
            generator_path: Some(dir.path().join("generator.json")),
            encryption_key: Some(key),
            ..Default::default()
        };
        let doc = doc_with_provenance();
        let _ledger = Ledger::create(&doc, options).unwrap();

        let restored = generator_state::read(&dir.path().join("generator.json"), Some(&key)).unwrap();
        assert_eq!(restored.chain_id(), doc.generator().unwrap().chain_id());
    }

    #[test]
    fn trust_root_reset_preserves_xid_and_starts_a_new_segment() {
        let mut doc = doc_with_provenance();
        let mut ledger = Ledger::create(&doc, LedgerOptions::default()).unwrap();
        ledger.commit(&mut doc, "second", MarkDate::new(2024, 1, 2)).unwrap();

        let original_xid = ledger.xid();
        ledger
            .reset_trust_root(&mut doc, "reset", MarkDate::new(2024, 1, 3), Resolution::Low, Source::SeedBytes(vec![42; 16]))
            .unwrap();

        assert_eq!(ledger.xid(), original_xid);
        assert_eq!(ledger.length(), 3);
        assert!(ledger.get_latest().unwrap().mark.is_genesis());
        assert_eq!(ledger.current_trust_root().label, "reset");
        assert!(ledger.verify().valid, "{:?}", ledger.verify().issues);
    }

    #[test]
    fn dropped_mark_is_reported_by_verify() {
        let doc = doc_with_provenance();
        let mut ledger = Ledger::create(&doc, LedgerOptions::default()).unwrap();
        // Fabricate a second revision with a seq that skips ahead, bypassing
        // `commit`, to exercise `verify`'s continuity check directly.
        let mut gen = goi_mark::Generator::genesis(Resolution::Low, Source::SeedBytes(vec![9; 16]));
        let _ = gen.next(MarkDate::new(2024, 1, 1));
        let bogus_mark = gen.next(MarkDate::new(2024, 1, 2));
        ledger.revisions.push(Revision::new(2, "skip", MarkDate::new(2024, 1, 3), doc.clone(), bogus_mark));

        let report = ledger.verify();
        assert!(!report.valid);
        assert!(!report.sequence_valid || !report.chain_intact);
    }
}
