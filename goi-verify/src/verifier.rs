// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! `spec.md` §4.6's repository integrity verifier: combines Layers 1-4
//! into a single report. Domain-level anomalies never raise — they are
//! collected into `RepositoryReport::issues` — matching `spec.md` §7's
//! propagation policy for read operations.

use goi_vcs::{validate_identifier, VcsAdapter};

use crate::{error::VerifyError, layer1, layer3, layer4, options::VerifyOptions, report::RepositoryReport};

#[tracing::instrument(skip(adapter, options))]
pub fn verify(adapter: &impl VcsAdapter, head: &str, options: &VerifyOptions) -> Result<RepositoryReport, VerifyError> {
    let mut issues = Vec::new();

    let chain3 = layer3::collect(adapter, head, &options.provenance_path)?;
    issues.extend(chain3.issues.iter().cloned());

    // Layer 1 always restricts to the historical signer union (`spec.md`
    // §4.6's "signersAllAuthorized" is this same restriction, just named
    // for strict governance reporting); an explicit `allowed_signers`
    // narrows it further.
    let allowed = if options.allowed_signers.is_empty() {
        chain3.signer_union.clone()
    } else {
        options.allowed_signers.clone()
    };
    let origin = layer1::check(adapter, head, &allowed)?;
    issues.extend(origin.issues.iter().cloned());

    let identifier = validate_identifier(adapter, head)?;
    if !identifier.valid {
        issues.extend(identifier.issues.iter().cloned());
    }

    let did = identifier.did.clone().or_else(|| chain3.entries.last().and_then(|e| e.doc.repository_did().map(String::from)));

    if options.strict {
        issues.extend(layer4::check(adapter, head, did.as_deref())?);
    }

    let mark_matches_latest = match &options.expected_mark_identifier {
        Some(expected) => {
            let matches = chain3.entries.last().map(|e| &e.mark.identifier_hex() == expected).unwrap_or(false);
            if !matches {
                issues.push(format!("published mark {expected} does not match latest provenance mark"));
            }
            matches
        }
        None => true,
    };

    let total_commits = adapter.commit_chain(head)?.len();

    Ok(RepositoryReport {
        valid: false,
        did,
        xid: layer3::xid_of(&chain3.entries),
        marks_monotonic: chain3.marks_monotonic,
        mark_matches_latest,
        xid_stable: chain3.xid_stable,
        total_commits,
        valid_signatures: origin.valid_signatures,
        invalid_signatures: origin.invalid_signatures,
        provenance_versions: chain3.entries.len(),
        issues,
    }
    .finish())
}
