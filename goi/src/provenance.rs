// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! Renders a [`XidDocument`]'s current state to the on-disk provenance
//! document format (`spec.md` §6) and commits it through a [`VcsAdapter`].
//! Shared by [`crate::bootstrap`], [`crate::rotate`], and
//! [`crate::reset`].

use goi_crypto::SecretKey;
use goi_ledger::ProvenanceDoc;
use goi_vcs::{FileWrite, Identity, VcsAdapter};
use goi_xid::{GeneratorOptions, PrivateKeyOptions, SigningOptions, XidDocument};

use crate::error::EngineError;

/// The well-known inception provenance document path (`spec.md` §6).
pub const INCEPTION_DOCUMENT_PATH: &str = ".o/GordianOpenIntegrity.yaml";

/// Renders `doc`'s current envelope and mark to the on-disk provenance
/// document format, without committing it. Used by
/// [`crate::bootstrap::bootstrap`] to fold the inception provenance
/// document into the repository identifier's own follow-up commit.
pub fn render_document(
    doc: &XidDocument,
    repository_did: Option<&str>,
    inception_mark: Option<&goi_mark::ProvenanceMark>,
) -> Result<String, EngineError> {
    let envelope = doc.to_envelope(&PrivateKeyOptions::Omit, &GeneratorOptions::Omit, &SigningOptions::None)?;
    let mark = doc.current_mark().ok_or(goi_xid::XidError::NoGenerator)?.clone();
    Ok(goi_ledger::render_provenance_doc(&ProvenanceDoc {
        envelope,
        mark,
        repository_did: repository_did.map(str::to_string),
        inception_mark: inception_mark.cloned(),
        contract: None,
    })?)
}

#[allow(clippy::too_many_arguments)]
pub fn commit_provenance_document(
    adapter: &mut impl VcsAdapter,
    parent: &str,
    signing_key: &SecretKey,
    author_name: &str,
    author_email: &str,
    message: &str,
    path: &str,
    doc: &XidDocument,
    repository_did: Option<&str>,
    inception_mark: Option<&goi_mark::ProvenanceMark>,
    timestamp: i64,
) -> Result<String, EngineError> {
    let rendered = render_document(doc, repository_did, inception_mark)?;

    let sign_off = goi_vcs::trailers::render_signed_off_by(author_name, author_email);
    let full_message = format!("{message}\n\n{sign_off}");
    let identity = Identity { name: author_name, email: author_email };
    let commit = adapter.commit_files(
        parent,
        signing_key,
        identity,
        identity,
        &full_message,
        &[FileWrite { path, contents: rendered.as_bytes() }],
        timestamp,
    )?;
    Ok(commit.oid)
}
