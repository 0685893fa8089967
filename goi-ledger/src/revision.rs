// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

use goi_mark::{MarkDate, ProvenanceMark};
use goi_xid::XidDocument;

/// One append-only entry in a [`crate::Ledger`] (`spec.md` §4.4): a labelled,
/// deep-cloned snapshot of the document plus the mark minted for it. The
/// first revision always carries `label == "genesis"` and `mark.is_genesis()`.
#[derive(Clone, Debug)]
pub struct Revision {
    pub seq: u32,
    pub label: String,
    pub date: MarkDate,
    pub snapshot: XidDocument,
    pub mark: ProvenanceMark,
}

impl Revision {
    pub fn new(seq: u32, label: impl Into<String>, date: MarkDate, snapshot: XidDocument, mark: ProvenanceMark) -> Self {
        Self { seq, label: label.into(), date, snapshot, mark }
    }
}
