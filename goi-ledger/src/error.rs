// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use thiserror::Error;

/// `spec.md` §4.4, §7: ledger creation and commit failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LedgerError {
    #[error("document has no genesis provenance mark; call with_provenance first")]
    ProvenanceRequired,
    #[error("document xid does not match the ledger's xid")]
    XidMismatch,
    #[error("no revision with seq {0}")]
    NoSuchRevision(u32),
    #[error("no revision labelled {0:?}")]
    NoSuchLabel(String),
    #[error("generator state file is malformed: {0}")]
    MalformedGeneratorState(String),
    #[error("envelope failure: {0}")]
    Envelope(#[from] goi_envelope::EnvelopeError),
    #[error("xid document failure: {0}")]
    Xid(#[from] goi_xid::XidError),
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("generator state json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("provenance document yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("provenance document header is malformed: {0}")]
    MalformedHeader(String),
}
