// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! Layer 4 — governance (`spec.md` §4.6). `signersAllAuthorized` is just
//! the Layer 1 pass the verifier always runs under the historical signer
//! union, so this module covers the one check specific to strict mode:
//! `repoIdentifierIsInceptionCommit`.

use goi_vcs::VcsAdapter;

use crate::error::VerifyError;

#[tracing::instrument(skip(adapter))]
pub fn check(adapter: &impl VcsAdapter, head: &str, repository_did: Option<&str>) -> Result<Vec<String>, VerifyError> {
    let mut issues = Vec::new();

    let did = match repository_did {
        Some(d) => d,
        None => {
            issues.push("no repository DID to check against the inception commit".to_string());
            return Ok(issues);
        }
    };
    let hash = did.strip_prefix("did:repo:").unwrap_or(did);
    let root = adapter.root_commit(head)?;
    if hash != root.oid {
        issues.push(format!("repository identifier hash {hash} does not match the inception commit {}", root.oid));
    }
    Ok(issues)
}
