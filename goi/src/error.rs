// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use thiserror::Error;

/// Failures from the write-side engine operations (`bootstrap`, `rotate`,
/// `create_trust_root`). Unlike `goi_verify`'s read-never-throws policy,
/// these are mutating operations: any failure aborts before the commit
/// that would have made the failed state visible.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error(transparent)]
    Vcs(#[from] goi_vcs::VcsError),
    #[error(transparent)]
    Ledger(#[from] goi_ledger::LedgerError),
    #[error(transparent)]
    Xid(#[from] goi_xid::XidError),
    #[error(transparent)]
    Verify(#[from] goi_verify::VerifyError),
    #[error(transparent)]
    Envelope(#[from] goi_envelope::EnvelopeError),
    #[error("repository has no commits yet")]
    EmptyHistory,
}
