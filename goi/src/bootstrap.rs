// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! `spec.md` §4.7's inception flow: a signed empty inception commit fixes
//! `did:repo:`, and its signed follow-up commit writes both
//! `.repo-identifier` (`spec.md` §4.5) and the inception provenance
//! document in one step, so a freshly bootstrapped repository carries
//! exactly two commits (end-to-end scenario 1).

use goi_crypto::SecretKey;
use goi_ledger::{Ledger, LedgerOptions};
use goi_mark::{MarkDate, Resolution, Source};
use goi_vcs::{CreatedIdentifier, FileWrite, Identity, VcsAdapter, IDENTIFIER_PATH};
use goi_xid::XidDocument;

use crate::{
    error::EngineError,
    provenance::{render_document, INCEPTION_DOCUMENT_PATH},
};

/// The inception state of a freshly bootstrapped repository.
pub struct Bootstrapped {
    pub identifier: CreatedIdentifier,
    pub document: XidDocument,
    pub ledger: Ledger,
    pub head: String,
}

#[allow(clippy::too_many_arguments)]
#[tracing::instrument(skip(adapter, signing_key, source))]
pub fn bootstrap(
    adapter: &mut impl VcsAdapter,
    signing_key: &SecretKey,
    author_name: &str,
    author_email: &str,
    resolution: Resolution,
    source: Source,
    date: MarkDate,
    timestamp: i64,
) -> Result<Bootstrapped, EngineError> {
    let fingerprint = signing_key.public().fingerprint().as_str().to_string();
    let sign_off = goi_vcs::trailers::render_signed_off_by(author_name, author_email);

    let inception_message = format!("Repository identifier inception\n\n{sign_off}");
    let inception = adapter.commit_empty(
        None,
        signing_key,
        Identity { name: author_name, email: author_email },
        Identity { name: &fingerprint, email: author_email },
        &inception_message,
        timestamp,
    )?;
    let did = format!("did:repo:{}", inception.oid);

    let mut document = XidDocument::new(signing_key.public()).with_provenance(resolution, source, date);
    document.set_repository_did(did.clone());

    let ledger = Ledger::create(&document, LedgerOptions { repository_did: Some(did.clone()), ..Default::default() })?;
    let inception_mark = ledger.get_genesis().map(|r| r.mark.clone());
    let rendered = render_document(&document, Some(did.as_str()), inception_mark.as_ref())?;

    let follow_up_message = format!("Add repository identifier and inception provenance document\n\n{sign_off}");
    let identity = Identity { name: author_name, email: author_email };
    let follow_up = adapter.commit_files(
        &inception.oid,
        signing_key,
        identity,
        identity,
        &follow_up_message,
        &[
            FileWrite { path: IDENTIFIER_PATH, contents: format!("{did}\n").as_bytes() },
            FileWrite { path: INCEPTION_DOCUMENT_PATH, contents: rendered.as_bytes() },
        ],
        timestamp,
    )?;

    let identifier = CreatedIdentifier { did, commit_hash: inception.oid, fingerprint, inception_date: timestamp };
    tracing::info!(did = %identifier.did, xid = %document.xid(), "repository bootstrapped");
    Ok(Bootstrapped { identifier, document, ledger, head: follow_up.oid })
}
