// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! Layer 3 — provenance chain (`spec.md` §4.6): walk a provenance
//! document's history, decode each envelope, and check mark continuity,
//! XID stability, and trust-root resets.

use goi_crypto::PublicKey;
use goi_envelope::Envelope;
use goi_mark::ProvenanceMark;
use goi_vcs::{CommitInfo, VcsAdapter};
use goi_xid::{VerifyPolicy, Xid, XidDocument};

use crate::error::VerifyError;

/// One historical revision of a provenance document: the commit that wrote
/// it, its decoded XID document, and the mark that document carried.
pub struct ProvenanceEntry {
    pub commit: CommitInfo,
    pub doc: XidDocument,
    pub mark: ProvenanceMark,
}

/// The result of walking one provenance document's history.
pub struct ChainResult {
    pub entries: Vec<ProvenanceEntry>,
    pub marks_monotonic: bool,
    pub xid_stable: bool,
    pub signer_union: Vec<PublicKey>,
    pub issues: Vec<String>,
}

/// `spec.md` §4.6 Layer 3. Decodes every historical blob at `path`,
/// reachable from `head`, collecting `issues` for anything that fails to
/// parse rather than aborting — a caller sees a populated report, not an
/// exception, for a corrupted history.
#[tracing::instrument(skip(adapter))]
pub fn collect(adapter: &impl VcsAdapter, head: &str, path: &str) -> Result<ChainResult, VerifyError> {
    let history = adapter.path_history(head, path)?;
    let mut entries = Vec::new();
    let mut issues = Vec::new();

    for commit in history {
        let blob = match adapter.blob_at(&commit.oid, path)? {
            Some(b) => b,
            None => continue,
        };
        let text = match String::from_utf8(blob) {
            Ok(t) => t,
            Err(_) => {
                issues.push(format!("provenance document at {} is not valid UTF-8", commit.oid));
                continue;
            }
        };
        let header = match goi_ledger::parse_provenance_header(&text) {
            Some(h) => h,
            None => {
                issues.push(format!("provenance document at {} is missing its header block", commit.oid));
                continue;
            }
        };
        let envelope = match Envelope::from_ur_string(&header.envelope_ur) {
            Ok(e) => e,
            Err(e) => {
                issues.push(format!("provenance document at {} failed envelope decoding: {e}", commit.oid));
                continue;
            }
        };
        let doc = match XidDocument::from_envelope(&envelope, None, VerifyPolicy::None) {
            Ok(d) => d,
            Err(e) => {
                issues.push(format!("provenance document at {} failed XID decoding: {e}", commit.oid));
                continue;
            }
        };
        let mark = match doc.current_mark() {
            Some(m) => m.clone(),
            None => {
                issues.push(format!("provenance document at {} carries no mark", commit.oid));
                continue;
            }
        };
        entries.push(ProvenanceEntry { commit, doc, mark });
    }

    if entries.is_empty() {
        issues.push(format!("No provenance documents found at {path}"));
        return Ok(ChainResult {
            entries,
            marks_monotonic: false,
            xid_stable: false,
            signer_union: Vec::new(),
            issues,
        });
    }

    let segment_start = latest_trust_segment_start(&entries);
    let latest_segment: Vec<ProvenanceMark> = entries[segment_start..].iter().map(|e| e.mark.clone()).collect();

    // `spec.md` §5's ordering guarantee: if the VCS commit order disagrees
    // with the embedded mark-seq order, report `MarksOutOfOrder` rather
    // than silently reordering the marks before validating continuity.
    // Distinguished from a genuinely broken chain by checking whether
    // sorting by `seq` alone would yield a chain that passes continuity —
    // if it would, the marks themselves are fine and only the VCS order is
    // wrong; if not, the chain is broken regardless of order and gets the
    // ordinary continuity message.
    let mut sorted_by_seq = latest_segment.clone();
    sorted_by_seq.sort_by_key(|m| m.seq);
    let vcs_order_matches_mark_order = latest_segment.iter().map(|m| m.seq).eq(sorted_by_seq.iter().map(|m| m.seq));

    let marks_monotonic = if !vcs_order_matches_mark_order && goi_mark::validate::is_sequence_valid(&sorted_by_seq) {
        issues.push("MarksOutOfOrder: VCS commit time order disagrees with the embedded mark sequence order".to_string());
        false
    } else {
        let monotonic = goi_mark::validate::is_sequence_valid(&latest_segment);
        if !monotonic {
            issues.push("marks are not monotonic within the current trust segment".to_string());
        }
        monotonic
    };

    let first_xid = entries[0].doc.xid();
    let xid_stable = entries.iter().all(|e| e.doc.xid() == first_xid);
    if !xid_stable {
        issues.push("provenance history does not yield a single stable XID".to_string());
    }

    let mut signer_union = Vec::new();
    for entry in &entries {
        if let Some(key) = entry.doc.signing_key() {
            if !signer_union.contains(&key.public_key) {
                signer_union.push(key.public_key);
            }
        }
    }

    Ok(ChainResult {
        entries,
        marks_monotonic,
        xid_stable,
        signer_union,
        issues,
    })
}

/// `spec.md` §4.6 "Trust-root reset": the start index of the run of
/// entries governed by the most recent genesis mark whose `chainID`
/// differs from the entries before it. Earlier entries still contribute
/// to the signer union, but only this segment governs mark validation.
fn latest_trust_segment_start(entries: &[ProvenanceEntry]) -> usize {
    let mut start = 0;
    for (i, entry) in entries.iter().enumerate().skip(1) {
        if entry.mark.is_genesis() && entry.mark.chain_id != entries[i - 1].mark.chain_id {
            start = i;
        }
    }
    start
}

pub fn xid_of(entries: &[ProvenanceEntry]) -> Option<Xid> {
    entries.last().map(|e| e.doc.xid())
}
