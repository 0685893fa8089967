// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use goi_crypto::SecretKey;

use crate::{commit_info::CommitInfo, error::VcsError};

/// The well-known empty-tree object hash (`spec.md` §6).
pub const EMPTY_TREE_HASH: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

pub fn is_empty_tree_hash(hash: &str) -> bool {
    hash == EMPTY_TREE_HASH
}

/// A single file write, relative to the repository root.
pub struct FileWrite<'a> {
    pub path: &'a str,
    pub contents: &'a [u8],
}

pub struct Identity<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

/// `spec.md` §1's VCS adapter: "create signed empty commits, append signed
/// commits with arbitrary tree mutations, walk history, and extract
/// per-commit metadata". Implemented by [`crate::Git2VcsAdapter`] against a
/// real repository and by the in-memory adapter under the `testing`
/// feature.
pub trait VcsAdapter {
    /// A signed commit whose tree is empty (root) or identical to its
    /// parent's tree (`spec.md` §4.5's identifier-commit requirement).
    fn commit_empty(
        &mut self,
        parent: Option<&str>,
        signing_key: &SecretKey,
        author: Identity<'_>,
        committer: Identity<'_>,
        message: &str,
        timestamp: i64,
    ) -> Result<CommitInfo, VcsError>;

    /// A signed commit that applies `writes` on top of `parent`'s tree.
    fn commit_files(
        &mut self,
        parent: &str,
        signing_key: &SecretKey,
        author: Identity<'_>,
        committer: Identity<'_>,
        message: &str,
        writes: &[FileWrite<'_>],
        timestamp: i64,
    ) -> Result<CommitInfo, VcsError>;

    fn commit_info(&self, oid: &str) -> Result<CommitInfo, VcsError>;

    /// The exact bytes the commit's `gpgsig` signature was computed over
    /// (the commit object with the signature header stripped out), needed
    /// to re-verify a signature rather than merely note its presence.
    /// `None` if the commit carries no signature.
    fn signed_payload(&self, oid: &str) -> Result<Option<Vec<u8>>, VcsError>;

    /// The blob at `path` in `oid`'s tree, if any.
    fn blob_at(&self, oid: &str, path: &str) -> Result<Option<Vec<u8>>, VcsError>;

    /// Every commit (ascending, i.e. oldest first) on the first-parent
    /// chain ending at `head`, in which `path`'s blob changed.
    fn path_history(&self, head: &str, path: &str) -> Result<Vec<CommitInfo>, VcsError>;

    /// The full first-parent commit chain ending at `head`, ascending.
    fn commit_chain(&self, head: &str) -> Result<Vec<CommitInfo>, VcsError>;

    fn root_commit(&self, head: &str) -> Result<CommitInfo, VcsError> {
        self.commit_chain(head)?.into_iter().next().ok_or(VcsError::EmptyHistory)
    }

    /// The adapter's current branch tip, if any commit has been made yet.
    /// Both implementations track a single default branch; `commit_empty`
    /// and `commit_files` advance it.
    fn head_oid(&self) -> Result<Option<String>, VcsError>;
}
