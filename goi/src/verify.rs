// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! Thin forwarders onto `goi_verify` (`spec.md` §4.7): the facade does
//! not duplicate verification logic, only the inception/rotation/reset
//! write paths that `goi_verify` deliberately has no opinion on.

use goi_vcs::VcsAdapter;
use goi_verify::{DocumentReport, RepositoryReport, VerifyOptions};

use crate::error::EngineError;

pub fn verify(adapter: &impl VcsAdapter, head: &str, options: &VerifyOptions) -> Result<RepositoryReport, EngineError> {
    Ok(goi_verify::verify(adapter, head, options)?)
}

pub fn verify_document(adapter: &impl VcsAdapter, head: &str, path: &str, options: &VerifyOptions) -> Result<DocumentReport, EngineError> {
    Ok(goi_verify::verify_document(adapter, head, path, options)?)
}
