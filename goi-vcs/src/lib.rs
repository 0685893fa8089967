// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! VCS adapter abstraction over signed commits, history walking, and the
//! repository identifier construction (`spec.md` §1, §4.5).

mod adapter;
mod commit_info;
mod error;
mod git2_adapter;
mod repo_identifier;
pub mod trailers;

#[cfg(feature = "testing")]
mod test_adapter;

pub use adapter::{is_empty_tree_hash, FileWrite, Identity, VcsAdapter, EMPTY_TREE_HASH};
pub use commit_info::CommitInfo;
pub use error::VcsError;
pub use git2_adapter::Git2VcsAdapter;
pub use repo_identifier::{create_identifier, get_identifiers, validate_identifier, CreatedIdentifier, IdentifierValidation, IDENTIFIER_PATH};

#[cfg(feature = "testing")]
pub use test_adapter::TestVcsAdapter;
