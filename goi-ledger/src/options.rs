// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use std::path::PathBuf;

/// `spec.md` §4.4's `createLedger` options: every field is optional, and
/// omitting all of them gives an in-memory-only ledger (no files written).
#[derive(Clone, Debug, Default)]
pub struct LedgerOptions {
    pub store_dir: Option<PathBuf>,
    pub document_path: Option<PathBuf>,
    pub generator_path: Option<PathBuf>,
    pub encryption_key: Option<[u8; 32]>,
    pub assertions: Vec<(String, String)>,
    pub contract: Option<String>,
    pub repository_did: Option<String>,
}
