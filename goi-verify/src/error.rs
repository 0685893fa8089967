// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use thiserror::Error;

/// `spec.md` §7's propagation policy: `verify`/`verifyDocument` never raise
/// on domain-level anomalies, only on adapter-level faults. This type is
/// reserved for the latter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerifyError {
    #[error(transparent)]
    Vcs(#[from] goi_vcs::VcsError),
    #[error("repository has no commits")]
    EmptyHistory,
}
