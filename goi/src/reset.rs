// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! End-to-end scenario 6: mint a fresh trust root while preserving the
//! repository's `did:repo:` and the document's XID.

use goi_crypto::SecretKey;
use goi_ledger::Ledger;
use goi_mark::{MarkDate, Resolution, Source};
use goi_vcs::VcsAdapter;
use goi_xid::XidDocument;

use crate::{
    error::EngineError,
    provenance::{commit_provenance_document, INCEPTION_DOCUMENT_PATH},
};

#[allow(clippy::too_many_arguments)]
#[tracing::instrument(skip(adapter, ledger, document, signing_key, source))]
pub fn create_trust_root(
    adapter: &mut impl VcsAdapter,
    ledger: &mut Ledger,
    document: &mut XidDocument,
    signing_key: &SecretKey,
    author_name: &str,
    author_email: &str,
    parent: &str,
    resolution: Resolution,
    source: Source,
    date: MarkDate,
    timestamp: i64,
) -> Result<String, EngineError> {
    ledger.reset_trust_root(document, "trust-root-reset", date, resolution, source)?;
    let new_root = ledger.current_trust_root().mark.clone();
    let repository_did = document.repository_did().map(str::to_string);

    let head = commit_provenance_document(
        adapter,
        parent,
        signing_key,
        author_name,
        author_email,
        "Reset trust root",
        INCEPTION_DOCUMENT_PATH,
        document,
        repository_did.as_deref(),
        Some(&new_root),
        timestamp,
    )?;

    tracing::info!(xid = %document.xid(), "trust root reset");
    Ok(head)
}
