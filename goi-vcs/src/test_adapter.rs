// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! An in-memory [`VcsAdapter`] for exercising the ledger and verifier
//! without a real git repository, following `radicle-link`'s own
//! preference for plain Rust test fixtures over mocking frameworks.

use std::collections::BTreeMap;

use goi_crypto::{ssh, SecretKey};

use crate::{
    adapter::{FileWrite, Identity, VcsAdapter, EMPTY_TREE_HASH},
    commit_info::CommitInfo,
    error::VcsError,
};

#[derive(Clone, Debug, Default)]
struct StoredCommit {
    info: CommitInfo,
    files: BTreeMap<String, Vec<u8>>,
}

/// A repository held entirely in memory: commits are keyed by a
/// sequentially assigned fake hex oid, trees by a flat path→bytes map
/// inherited from the parent and overlaid with each commit's writes.
#[derive(Default)]
pub struct TestVcsAdapter {
    commits: BTreeMap<String, StoredCommit>,
    next_id: u64,
    head: Option<String>,
}

impl TestVcsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_oid(&mut self) -> String {
        let oid = format!("{:040x}", self.next_id);
        self.next_id += 1;
        oid
    }

    fn tree_hash(files: &BTreeMap<String, Vec<u8>>) -> String {
        if files.is_empty() {
            return EMPTY_TREE_HASH.to_string();
        }
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        for (path, contents) in files {
            hasher.update(path.as_bytes());
            hasher.update(contents);
        }
        hex::encode(&hasher.finalize()[0..20])
    }
}

impl VcsAdapter for TestVcsAdapter {
    fn commit_empty(
        &mut self,
        parent: Option<&str>,
        signing_key: &SecretKey,
        author: Identity<'_>,
        committer: Identity<'_>,
        message: &str,
        timestamp: i64,
    ) -> Result<CommitInfo, VcsError> {
        let files = match parent {
            Some(p) => self.commits.get(p).map(|c| c.files.clone()).unwrap_or_default(),
            None => BTreeMap::new(),
        };
        let oid = self.fresh_oid();
        let tree = Self::tree_hash(&files);
        let signed_payload = format!("{oid}:{tree}:{message}");
        let signature = ssh::sign_armored(signing_key, signed_payload.as_bytes());

        let info = CommitInfo {
            oid: oid.clone(),
            tree,
            parent: parent.map(str::to_string),
            author_name: author.name.to_string(),
            author_email: author.email.to_string(),
            author_time: timestamp,
            committer_name: committer.name.to_string(),
            committer_email: committer.email.to_string(),
            committer_time: timestamp,
            message: message.to_string(),
            signature: Some(signature),
        };
        self.head = Some(oid.clone());
        self.commits.insert(oid, StoredCommit { info: info.clone(), files });
        Ok(info)
    }

    fn commit_files(
        &mut self,
        parent: &str,
        signing_key: &SecretKey,
        author: Identity<'_>,
        committer: Identity<'_>,
        message: &str,
        writes: &[FileWrite<'_>],
        timestamp: i64,
    ) -> Result<CommitInfo, VcsError> {
        let mut files = self.commits.get(parent).map(|c| c.files.clone()).ok_or_else(|| VcsError::NoSuchCommit(parent.to_string()))?;
        for write in writes {
            files.insert(write.path.to_string(), write.contents.to_vec());
        }

        let oid = self.fresh_oid();
        let tree = Self::tree_hash(&files);
        let signed_payload = format!("{oid}:{tree}:{message}");
        let signature = ssh::sign_armored(signing_key, signed_payload.as_bytes());

        let info = CommitInfo {
            oid: oid.clone(),
            tree,
            parent: Some(parent.to_string()),
            author_name: author.name.to_string(),
            author_email: author.email.to_string(),
            author_time: timestamp,
            committer_name: committer.name.to_string(),
            committer_email: committer.email.to_string(),
            committer_time: timestamp,
            message: message.to_string(),
            signature: Some(signature),
        };
        self.head = Some(oid.clone());
        self.commits.insert(oid, StoredCommit { info: info.clone(), files });
        Ok(info)
    }

    fn commit_info(&self, oid: &str) -> Result<CommitInfo, VcsError> {
        self.commits.get(oid).map(|c| c.info.clone()).ok_or_else(|| VcsError::NoSuchCommit(oid.to_string()))
    }

    fn signed_payload(&self, oid: &str) -> Result<Option<Vec<u8>>, VcsError> {
        let commit = self.commits.get(oid).ok_or_else(|| VcsError::NoSuchCommit(oid.to_string()))?;
        if commit.info.signature.is_none() {
            return Ok(None);
        }
        Ok(Some(format!("{}:{}:{}", commit.info.oid, commit.info.tree, commit.info.message).into_bytes()))
    }

    fn blob_at(&self, oid: &str, path: &str) -> Result<Option<Vec<u8>>, VcsError> {
        let commit = self.commits.get(oid).ok_or_else(|| VcsError::NoSuchCommit(oid.to_string()))?;
        Ok(commit.files.get(path).cloned())
    }

    fn commit_chain(&self, head: &str) -> Result<Vec<CommitInfo>, VcsError> {
        let mut chain = Vec::new();
        let mut current = Some(head.to_string());
        while let Some(oid) = current {
            let commit = self.commits.get(&oid).ok_or_else(|| VcsError::NoSuchCommit(oid.clone()))?;
            current = commit.info.parent.clone();
            chain.push(commit.info.clone());
        }
        chain.reverse();
        Ok(chain)
    }

    fn path_history(&self, head: &str, path: &str) -> Result<Vec<CommitInfo>, VcsError> {
        let chain = self.commit_chain(head)?;
        let mut history = Vec::new();
        let mut previous: Option<Vec<u8>> = None;
        for commit in chain {
            let blob = self.blob_at(&commit.oid, path)?;
            if blob.is_some() && blob != previous {
                history.push(commit.clone());
            }
            previous = blob;
        }
        Ok(history)
    }

    fn head_oid(&self) -> Result<Option<String>, VcsError> {
        Ok(self.head.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_commit_is_empty_and_signed() {
        let mut adapter = TestVcsAdapter::new();
        let sk = SecretKey::from_seed([1; 32]);
        let info = adapter.commit_empty(None, &sk, Identity { name: "A", email: "a@example.com" }, Identity { name: "A", email: "a@example.com" }, "root", 0).unwrap();
        assert_eq!(info.tree, EMPTY_TREE_HASH);
        assert!(info.is_signed());
    }

    #[test]
    fn files_persist_and_chain_walks_in_order() {
        let mut adapter = TestVcsAdapter::new();
        let sk = SecretKey::from_seed([2; 32]);
        let root = adapter.commit_empty(None, &sk, Identity { name: "A", email: "a@example.com" }, Identity { name: "A", email: "a@example.com" }, "root", 0).unwrap();
        let c1 = adapter
            .commit_files(&root.oid, &sk, Identity { name: "A", email: "a@example.com" }, Identity { name: "A", email: "a@example.com" }, "v1", &[FileWrite { path: "doc.yaml", contents: b"v1" }], 1)
            .unwrap();
        assert_eq!(adapter.blob_at(&c1.oid, "doc.yaml").unwrap().unwrap(), b"v1");
        let chain = adapter.commit_chain(&c1.oid).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].oid, root.oid);
    }
}
