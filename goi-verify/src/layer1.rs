// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! Layer 1 — commit origin (`spec.md` §4.6): every commit must carry a
//! signature that verifies, a `Signed-off-by:` trailer, and a stable
//! `(authorName, authorEmail)` pair per signing-key fingerprint.

use std::collections::HashMap;

use goi_crypto::{ssh, Fingerprint, PublicKey};
use goi_vcs::{trailers, CommitInfo, VcsAdapter};

use crate::error::VerifyError;

pub struct OriginResult {
    pub valid_signatures: usize,
    pub invalid_signatures: usize,
    pub issues: Vec<String>,
}

/// Walks `head`'s full commit chain. `allowed` restricts which signing
/// keys are accepted; an empty slice means "any key that verifies".
#[tracing::instrument(skip(adapter, allowed))]
pub fn check(adapter: &impl VcsAdapter, head: &str, allowed: &[PublicKey]) -> Result<OriginResult, VerifyError> {
    let chain = adapter.commit_chain(head)?;
    let mut valid_signatures = 0;
    let mut invalid_signatures = 0;
    let mut issues = Vec::new();
    let mut authors_by_fingerprint: HashMap<Fingerprint, Vec<(String, String)>> = HashMap::new();

    for commit in &chain {
        match verify_one(adapter, commit, allowed)? {
            Ok(fingerprint) => {
                valid_signatures += 1;
                let pair = (commit.author_name.clone(), commit.author_email.clone());
                let pairs = authors_by_fingerprint.entry(fingerprint).or_default();
                if !pairs.contains(&pair) {
                    pairs.push(pair);
                }
            }
            Err(reason) => {
                invalid_signatures += 1;
                issues.push(format!("commit {}: {reason}", commit.oid));
            }
        }

        if !has_sign_off(commit) {
            issues.push(format!("commit {} is missing its Signed-off-by trailer", commit.oid));
        }
    }

    for (fingerprint, pairs) in &authors_by_fingerprint {
        if pairs.len() > 1 {
            issues.push(format!("MultipleAuthorsOneKey: key {} signed commits under {} different identities", fingerprint.short8(), pairs.len()));
        }
    }

    Ok(OriginResult { valid_signatures, invalid_signatures, issues })
}

fn verify_one(adapter: &impl VcsAdapter, commit: &CommitInfo, allowed: &[PublicKey]) -> Result<Result<Fingerprint, String>, VerifyError> {
    let armored = match &commit.signature {
        Some(s) => s,
        None => return Ok(Err("missing gpgsig".to_string())),
    };
    let payload = match adapter.signed_payload(&commit.oid)? {
        Some(p) => p,
        None => return Ok(Err("missing gpgsig".to_string())),
    };
    let parsed = match ssh::verify_armored(armored, &payload) {
        Ok(p) => p,
        Err(e) => return Ok(Err(format!("signature does not verify ({e})"))),
    };
    if !allowed.is_empty() && !allowed.contains(&parsed.public_key) {
        return Ok(Err("UnauthorizedSigner: signature verifies but the key is not authorized".to_string()));
    }
    Ok(Ok(parsed.public_key.fingerprint()))
}

fn has_sign_off(commit: &CommitInfo) -> bool {
    trailers::signed_off_by(&commit.message).iter().any(|(n, e)| n == &commit.author_name && e == &commit.author_email)
}
