// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

/// Per-commit metadata the integrity verifier needs (`spec.md` §1's VCS
/// adapter contract): tree hash, parent hash, author/committer identity,
/// the raw message, and the signature blob if present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitInfo {
    pub oid: String,
    pub tree: String,
    pub parent: Option<String>,
    pub author_name: String,
    pub author_email: String,
    pub author_time: i64,
    pub committer_name: String,
    pub committer_email: String,
    pub committer_time: i64,
    pub message: String,
    pub signature: Option<String>,
}

impl CommitInfo {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}
