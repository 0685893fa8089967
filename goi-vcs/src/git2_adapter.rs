// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use std::collections::BTreeMap;

use git2::{Oid, Repository, Signature, Time};

use goi_crypto::{ssh, SecretKey};

use crate::{
    adapter::{FileWrite, Identity, VcsAdapter},
    commit_info::CommitInfo,
    error::VcsError,
};

/// A [`VcsAdapter`] backed by a real on-disk repository via `git2`
/// (`spec.md` §1's VCS-adapter collaborator).
const BRANCH: &str = "refs/heads/main";

pub struct Git2VcsAdapter {
    repo: Repository,
}

impl Git2VcsAdapter {
    pub fn open(path: &std::path::Path) -> Result<Self, VcsError> {
        Ok(Self { repo: Repository::open(path)? })
    }

    pub fn init(path: &std::path::Path) -> Result<Self, VcsError> {
        let repo = Repository::init(path)?;
        repo.set_head(BRANCH)?;
        Ok(Self { repo })
    }

    fn update_branch(&self, oid: Oid) -> Result<(), VcsError> {
        self.repo.reference(BRANCH, oid, true, "goi: advance branch")?;
        Ok(())
    }

    fn git_signature(identity: &Identity<'_>, timestamp: i64) -> Result<Signature<'static>, VcsError> {
        Ok(Signature::new(identity.name, identity.email, &Time::new(timestamp, 0))?)
    }

    /// Recursively rebuilds a tree on top of `base`, applying `writes`.
    /// `writes` are grouped by their first path component; single-segment
    /// entries become blobs, multi-segment entries recurse into (or
    /// create) a subtree.
    fn write_tree(&self, base: Option<Oid>, writes: &[(Vec<&str>, &[u8])]) -> Result<Oid, VcsError> {
        let base_tree = base.map(|oid| self.repo.find_tree(oid)).transpose()?;
        let mut builder = self.repo.treebuilder(base_tree.as_ref())?;

        let mut nested: BTreeMap<&str, Vec<(Vec<&str>, &[u8])>> = BTreeMap::new();
        for (segments, contents) in writes {
            if segments.len() == 1 {
                let blob = self.repo.blob(contents)?;
                builder.insert(segments[0], blob, 0o100644)?;
            } else {
                nested.entry(segments[0]).or_default().push((segments[1..].to_vec(), contents));
            }
        }

        for (dir, entries) in nested {
            let sub_base = base_tree
                .as_ref()
                .and_then(|t| t.get_name(dir))
                .map(|entry| entry.id());
            let sub_oid = self.write_tree(sub_base, &entries)?;
            builder.insert(dir, sub_oid, 0o040000)?;
        }

        Ok(builder.write()?)
    }

    fn commit_info_from_oid(&self, oid: Oid) -> Result<CommitInfo, VcsError> {
        let commit = self.repo.find_commit(oid)?;
        let signature = self
            .repo
            .extract_signature(&oid, Some("gpgsig"))
            .ok()
            .map(|(sig, _)| String::from_utf8_lossy(&sig).into_owned());
        let author = commit.author();
        let committer = commit.committer();

        Ok(CommitInfo {
            oid: oid.to_string(),
            tree: commit.tree_id().to_string(),
            parent: commit.parent_id(0).ok().map(|p| p.to_string()),
            author_name: author.name().unwrap_or_default().to_string(),
            author_email: author.email().unwrap_or_default().to_string(),
            author_time: author.when().seconds(),
            committer_name: committer.name().unwrap_or_default().to_string(),
            committer_email: committer.email().unwrap_or_default().to_string(),
            committer_time: committer.when().seconds(),
            message: commit.message().unwrap_or_default().to_string(),
            signature,
        })
    }

    fn sign_and_write(&self, author: Signature<'_>, committer: Signature<'_>, message: &str, tree_oid: Oid, parents: &[&git2::Commit<'_>], signing_key: &SecretKey) -> Result<Oid, VcsError> {
        let tree = self.repo.find_tree(tree_oid)?;
        let buffer = self.repo.commit_create_buffer(&author, &committer, message, &tree, parents)?;
        let content = std::str::from_utf8(&buffer).map_err(|_| VcsError::IdentifierCommitMalformed("non-utf8 commit buffer".into()))?;
        let armored = ssh::sign_armored(signing_key, content.as_bytes());
        Ok(self.repo.commit_signed(content, &armored, Some("gpgsig"))?)
    }
}

impl VcsAdapter for Git2VcsAdapter {
    fn commit_empty(
        &mut self,
        parent: Option<&str>,
        signing_key: &SecretKey,
        author: Identity<'_>,
        committer: Identity<'_>,
        message: &str,
        timestamp: i64,
    ) -> Result<CommitInfo, VcsError> {
        let author_sig = Self::git_signature(&author, timestamp)?;
        let committer_sig = Self::git_signature(&committer, timestamp)?;

        let (tree_oid, parent_commit) = match parent {
            None => {
                let builder = self.repo.treebuilder(None)?;
                (builder.write()?, None)
            }
            Some(p) => {
                let oid = Oid::from_str(p)?;
                let commit = self.repo.find_commit(oid)?;
                let tree = commit.tree_id();
                (tree, Some(commit))
            }
        };

        let parents: Vec<&git2::Commit<'_>> = parent_commit.iter().collect();
        let oid = self.sign_and_write(author_sig, committer_sig, message, tree_oid, &parents, signing_key)?;
        self.update_branch(oid)?;
        self.commit_info_from_oid(oid)
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
        let parent_oid = Oid::from_str(parent)?;
        let parent_commit = self.repo.find_commit(parent_oid)?;

        let segmented: Vec<(Vec<&str>, &[u8])> = writes
            .iter()
            .map(|w| (w.path.split('/').collect::<Vec<_>>(), w.contents))
            .collect();
        let tree_oid = self.write_tree(Some(parent_commit.tree_id()), &segmented)?;

        let author_sig = Self::git_signature(&author, timestamp)?;
        let committer_sig = Self::git_signature(&committer, timestamp)?;
        let oid = self.sign_and_write(author_sig, committer_sig, message, tree_oid, &[&parent_commit], signing_key)?;
        self.update_branch(oid)?;
        self.commit_info_from_oid(oid)
    }

    fn commit_info(&self, oid: &str) -> Result<CommitInfo, VcsError> {
        let oid = Oid::from_str(oid).map_err(VcsError::Git)?;
        self.commit_info_from_oid(oid)
    }

    fn signed_payload(&self, oid: &str) -> Result<Option<Vec<u8>>, VcsError> {
        let oid = Oid::from_str(oid)?;
        match self.repo.extract_signature(&oid, Some("gpgsig")) {
            Ok((_sig, signed_data)) => Ok(Some(signed_data.to_vec())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn blob_at(&self, oid: &str, path: &str) -> Result<Option<Vec<u8>>, VcsError> {
        let oid = Oid::from_str(oid)?;
        let commit = self.repo.find_commit(oid)?;
        let tree = commit.tree()?;
        match tree.get_path(std::path::Path::new(path)) {
            Ok(entry) => {
                let blob = entry.to_object(&self.repo)?.peel_to_blob()?;
                Ok(Some(blob.content().to_vec()))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn commit_chain(&self, head: &str) -> Result<Vec<CommitInfo>, VcsError> {
        let mut chain = Vec::new();
        let mut current = Some(Oid::from_str(head)?);
        while let Some(oid) = current {
            let info = self.commit_info_from_oid(oid)?;
            current = info.parent.as_deref().map(Oid::from_str).transpose()?;
            chain.push(info);
        }
        chain.reverse();
        Ok(chain)
    }

    fn path_history(&self, head: &str, path: &str) -> Result<Vec<CommitInfo>, VcsError> {
        let chain = self.commit_chain(head)?;
        let mut history = Vec::new();
        let mut previous_blob: Option<Vec<u8>> = None;
        for commit in chain {
            let blob = self.blob_at(&commit.oid, path)?;
            if blob.is_some() && blob != previous_blob {
                history.push(commit.clone());
            }
            previous_blob = blob;
        }
        Ok(history)
    }

    fn head_oid(&self) -> Result<Option<String>, VcsError> {
        match self.repo.find_reference(BRANCH) {
            Ok(reference) => Ok(reference.target().map(|oid| oid.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
