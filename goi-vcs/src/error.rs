// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use thiserror::Error;

/// `spec.md` §4.5, §7: VCS adapter and repository-identifier failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VcsError {
    #[error(transparent)]
    Git(#[from] git2::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("ssh signature error: {0}")]
    Signature(#[from] goi_crypto::ssh::SshSigError),
    #[error("commit {0} not found")]
    NoSuchCommit(String),
    #[error("identifier commit is malformed: {0}")]
    IdentifierCommitMalformed(String),
    #[error("commit message is missing the Signed-off-by trailer")]
    MissingSignOff,
    #[error("repository has no commits")]
    EmptyHistory,
}
