// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use goi_xid::Xid;

/// `spec.md` §4.6 "Output shape": `valid` is `issues.is_empty()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepositoryReport {
    pub valid: bool,
    pub did: Option<String>,
    pub xid: Option<Xid>,
    pub marks_monotonic: bool,
    pub mark_matches_latest: bool,
    pub xid_stable: bool,
    pub total_commits: usize,
    pub valid_signatures: usize,
    pub invalid_signatures: usize,
    pub provenance_versions: usize,
    pub issues: Vec<String>,
}

impl RepositoryReport {
    pub(crate) fn finish(mut self) -> Self {
        self.valid = self.issues.is_empty();
        self
    }
}

/// `spec.md` §4.6 "Document verification": a [`RepositoryReport`] for the
/// document's own history, plus whether it matches the inception
/// envelope's `GordianOpenIntegrity.Documents` map entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentReport {
    pub report: RepositoryReport,
    pub self_reference_matches: bool,
    pub listed_in_documents_map: bool,
}

impl DocumentReport {
    pub(crate) fn finish(mut self) -> Self {
        if !self.self_reference_matches {
            self.report.issues.push("document's self-reference assertion does not match the requested path".to_string());
        }
        if !self.listed_in_documents_map {
            self.report.issues.push("document is not listed (or mismatched) in the inception envelope's Documents map".to_string());
        }
        self.report = self.report.finish();
        self
    }
}
