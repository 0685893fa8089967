// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! `spec.md` §4.6 "Document verification": Layer 3 over a child document's
//! own history, cross-checked against the inception envelope's
//! `GordianOpenIntegrity.Documents` map, under the combined signer union
//! of both histories.

use std::collections::HashMap;

use goi_vcs::{validate_identifier, VcsAdapter};

use crate::{error::VerifyError, layer1, layer3, options::VerifyOptions, report::{DocumentReport, RepositoryReport}};

#[tracing::instrument(skip(adapter, options))]
pub fn verify_document(adapter: &impl VcsAdapter, head: &str, path: &str, options: &VerifyOptions) -> Result<DocumentReport, VerifyError> {
    let mut issues = Vec::new();

    let doc_chain = layer3::collect(adapter, head, path)?;
    issues.extend(doc_chain.issues.iter().cloned());

    let inception_chain = layer3::collect(adapter, head, &options.provenance_path)?;

    let self_reference_matches = doc_chain.entries.last().map(|e| e.doc.document_path() == Some(path)).unwrap_or(false);

    let listed_in_documents_map = inception_chain
        .entries
        .last()
        .and_then(|e| e.doc.documents_map())
        .and_then(|json| serde_json::from_str::<HashMap<String, String>>(json).ok())
        .zip(doc_chain.entries.last())
        .map(|(map, entry)| map.get(path).map(|xid| xid.eq_ignore_ascii_case(&hex::encode(entry.doc.xid().as_bytes()))).unwrap_or(false))
        .unwrap_or(false);

    let mut union = doc_chain.signer_union.clone();
    for key in &inception_chain.signer_union {
        if !union.contains(key) {
            union.push(*key);
        }
    }
    let effective_allowed = if options.allowed_signers.is_empty() { union } else { options.allowed_signers.clone() };

    let origin = layer1::check(adapter, head, &effective_allowed)?;
    issues.extend(origin.issues.iter().cloned());

    let identifier = validate_identifier(adapter, head)?;
    if !identifier.valid {
        issues.extend(identifier.issues.iter().cloned());
    }

    let did = identifier.did.clone().or_else(|| inception_chain.entries.last().and_then(|e| e.doc.repository_did().map(String::from)));
    let total_commits = adapter.commit_chain(head)?.len();

    let report = RepositoryReport {
        valid: false,
        did,
        xid: layer3::xid_of(&doc_chain.entries),
        marks_monotonic: doc_chain.marks_monotonic,
        mark_matches_latest: true,
        xid_stable: doc_chain.xid_stable,
        total_commits,
        valid_signatures: origin.valid_signatures,
        invalid_signatures: origin.invalid_signatures,
        provenance_versions: doc_chain.entries.len(),
        issues,
    };

    Ok(DocumentReport {
        report,
        self_reference_matches,
        listed_in_documents_map,
    }
    .finish())
}
