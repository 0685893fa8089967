// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! `spec.md` §4.3's key rotation algorithm, wired to a ledger commit and
//! a signed provenance-document update under the new key.

use goi_crypto::SecretKey;
use goi_ledger::Ledger;
use goi_mark::MarkDate;
use goi_vcs::VcsAdapter;
use goi_xid::XidDocument;

use crate::{
    error::EngineError,
    provenance::{commit_provenance_document, INCEPTION_DOCUMENT_PATH},
};

/// Adds `new_key` with `All` permission, removes the inception key,
/// advances the ledger, and commits the updated provenance document
/// signed with `new_key` — the only key left authorized to sign after
/// rotation.
#[allow(clippy::too_many_arguments)]
#[tracing::instrument(skip(adapter, ledger, document, new_key))]
pub fn rotate(
    adapter: &mut impl VcsAdapter,
    ledger: &mut Ledger,
    document: &mut XidDocument,
    new_key: &SecretKey,
    author_name: &str,
    author_email: &str,
    parent: &str,
    date: MarkDate,
    timestamp: i64,
) -> Result<String, EngineError> {
    document.rotate(new_key.public())?;
    ledger.commit(document, "rotate", date)?;
    let inception_mark = Some(ledger.current_trust_root().mark.clone());
    let repository_did = document.repository_did().map(str::to_string);

    let head = commit_provenance_document(
        adapter,
        parent,
        new_key,
        author_name,
        author_email,
        "Rotate signing key",
        INCEPTION_DOCUMENT_PATH,
        document,
        repository_did.as_deref(),
        inception_mark.as_ref(),
        timestamp,
    )?;

    tracing::info!(xid = %document.xid(), "signing key rotated");
    Ok(head)
}
